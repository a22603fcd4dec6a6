use alloc::string::String;

use thiserror::Error;

use crate::value::InvokeError;

/// Failure of an operation on a [`Reflection`](crate::Reflection).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReflectionError {
    #[error("the reflection does not refer to a value")]
    Invalid,
    #[error("the value is read-only")]
    ReadOnly,
    #[error("expected a `{expected}`, got `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("the value cannot be reached")]
    Unavailable,
    #[error("no method named `{0}`")]
    MethodNotFound(String),
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}
