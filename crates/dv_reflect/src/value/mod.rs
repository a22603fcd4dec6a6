//! Type-erased values and callables.
//!
//! - [`Any`]: an owned value remembering its [`Type`](crate::info::Type).
//! - [`ConversionTable`]: explicit conversions used by [`Any::cast`].
//! - [`BoxedObject`]: an owned object that is not necessarily `Clone`.
//! - [`AnyFn`] and [`AnyCtor`]: erased methods and constructors.

// -----------------------------------------------------------------------------
// Modules

mod any;
mod any_fn;
mod boxed;
mod conversion;

// -----------------------------------------------------------------------------
// Exports

pub use any::Any;
pub use any_fn::{AnyCtor, AnyFn, CtorMarker, IntoConstructor, IntoMethod, InvokeError};
pub use any_fn::{MutMethod, Receiver, RefMethod};
pub use boxed::BoxedObject;
pub use conversion::{CastError, ConversionTable, Converter};
