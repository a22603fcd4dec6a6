use alloc::string::String;

use thiserror::Error;

/// Failure to commit a registration into a [`TypeDb`](crate::TypeDb).
///
/// Nothing is committed when an error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("field `{field}` of `{ty}` is declared twice")]
    DuplicateField { ty: &'static str, field: String },
    #[error("`{0}` is already registered")]
    AlreadyRegistered(&'static str),
    #[error("permanent name `{name}` is already used by `{used_by}`")]
    DuplicatePermanentName { name: String, used_by: &'static str },
    #[error("`{base}` cannot be a base of `{ty}`, it already derives from it")]
    CyclicBase { ty: &'static str, base: &'static str },
}
