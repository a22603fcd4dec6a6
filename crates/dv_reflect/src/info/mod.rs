//! Static type descriptors.
//!
//! - [`TypePath`]: stable names of a type.
//! - [`Type`]: the runtime descriptor with layout, flags and relations.
//! - [`Typed`]: access to the unique `&'static Type` of a type.

// -----------------------------------------------------------------------------
// Modules

mod ty;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use ty::{DerefFns, Type, TypeFlags};
pub use type_path::{TypePath, TypePathTable};
pub use typed::Typed;
