//! Runtime views of objects.
//!
//! [`Reflection`] walks registered structure: it lists fields, reads and
//! writes values through [`Any`](crate::Any), follows bases and pointers,
//! and calls registered methods. Views never own the object; they borrow it
//! for their whole lifetime, mutably for [`Reflection::create`] and
//! immutably for [`Reflection::create_const`].
//!
//! Views of unregistered types, missing fields and impossible casts are
//! invalid rather than errors. Enable the `debug` feature to get a
//! `log::debug!` line explaining each of them.

// -----------------------------------------------------------------------------
// Modules

mod dump;
mod error;
mod handle;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use error::ReflectionError;
pub use handle::{Field, Reflection};
