//! The type database and its registration API.
//!
//! - [`TypeDb`]: registered types, inheritance graph and conversions.
//! - [`ReflectedType`]: what the database knows about one type.
//! - [`ReflectionRegistrator`]: builder committing a [`ReflectedType`].
//! - [`Reflected`]: types able to register themselves.
//! - [`TypeTrait`] and [`FromType`]: per-type capabilities:
//!     - [`TypeTraitValue`]: copy whole values in and out of [`Any`](crate::Any).
//!     - [`TypeTraitPrint`]: format values for dumps.
//!     - [`TypeTraitSerialize`], [`TypeTraitDeserialize`]: serde support.
//! - [`UpCast`]: one edge of the inheritance graph.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types deriving `Reflected` with
//! `#[reflect(auto_register)]`, or named in `impl_auto_register!`, are
//! collected at link time through [`inventory`] and registered by
//! [`TypeDb::auto_register`]. On platforms `inventory` does not support the
//! call returns `false` and registers nothing.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod from_type;
mod inheritance;
mod reflected;
mod reflected_type;
mod registrator;
mod traits;
mod type_db;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use error::RegistrationError;
pub use from_type::FromType;
pub use inheritance::{UpCast, UpCastFns};
pub use reflected::Reflected;
pub use reflected_type::ReflectedType;
pub use registrator::ReflectionRegistrator;
pub use traits::{TypeTraitDeserialize, TypeTraitPrint, TypeTraitSerialize, TypeTraitValue};
pub use type_db::{TypeDb, TypeDbArc};
pub use type_trait::TypeTrait;
