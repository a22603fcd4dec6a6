//! Field level description of reflected types.
//!
//! - [`FieldKey`]: name or index of a child.
//! - [`ValueWrapper`]: erased get/set/borrow of one value inside an object.
//! - [`StructureWrapper`]: enumeration of the children of an object.
//! - [`FieldInfo`], [`MethodInfo`]: registered descriptors.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod key;
mod vec;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub use class::{ClassStructure, FieldInfo, MethodInfo, StructureWrapper};
pub use key::FieldKey;
pub use vec::VecStructure;
pub use wrapper::{IndexWrapper, MemberWrapper, PropertyWrapper, SelfWrapper, ValueWrapper};
