use alloc::boxed::Box;
use alloc::string::String;
use core::any::TypeId;
use core::fmt;

use dv_utils::hash::HashMap;
use thiserror::Error;

use crate::info::{Type, Typed};
use crate::value::Any;

// -----------------------------------------------------------------------------
// CastError

/// Failure of [`Any::cast`] and [`Any::convert_to`].
///
/// New variants may be added, so matches need a wildcard arm:
///
/// ```compile_fail
/// use dv_reflect::value::CastError;
///
/// fn describe(err: CastError) -> &'static str {
///     match err {
///         CastError::Empty => "empty",
///         CastError::NotConvertible { .. } => "not convertible",
///     }
/// }
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CastError {
    #[error("cannot cast an empty value")]
    Empty,
    #[error("no conversion registered from `{from}` to `{to}`")]
    NotConvertible {
        from: &'static str,
        to: &'static str,
    },
}

// -----------------------------------------------------------------------------
// Converter

/// An erased conversion from one type to another.
pub trait Converter: Send + Sync {
    /// Converts `value`, `None` if it is not of the source type.
    fn convert(&self, value: &dyn core::any::Any) -> Option<Any>;
}

struct ConversionFn<F, T> {
    func: fn(&F) -> T,
}

impl<F: 'static, T: Typed + Clone + Send + Sync> Converter for ConversionFn<F, T> {
    fn convert(&self, value: &dyn core::any::Any) -> Option<Any> {
        value.downcast_ref::<F>().map(|from| Any::new((self.func)(from)))
    }
}

// -----------------------------------------------------------------------------
// ConversionTable

/// Explicit conversions between distinct types, keyed by (from, to).
///
/// Conversions are never chained: converting `A` to `C` requires an
/// `(A, C)` entry even if `(A, B)` and `(B, C)` exist.
///
/// # Examples
///
/// ```
/// use dv_reflect::Any;
/// use dv_reflect::value::ConversionTable;
///
/// let mut table = ConversionTable::new();
/// table.insert::<u8, String>(|v| v.to_string());
///
/// let out = table.convert(&Any::new(42_u8), dv_reflect::info::Type::of::<String>());
/// assert_eq!(out.unwrap().get::<String>().unwrap(), "42");
/// ```
#[derive(Default)]
pub struct ConversionTable {
    converters: HashMap<(TypeId, TypeId), Box<dyn Converter>>,
}

impl ConversionTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a conversion from `F` to `T`, replacing a previous one.
    pub fn insert<F: Typed, T: Typed + Clone + Send + Sync>(&mut self, func: fn(&F) -> T) {
        self.insert_converter(
            F::ty(),
            T::ty(),
            Box::new(ConversionFn { func }),
        );
    }

    /// Registers `T::from` as conversion from `F` to `T`.
    pub fn insert_from<F, T>(&mut self)
    where
        F: Typed + Clone,
        T: Typed + From<F> + Clone + Send + Sync,
    {
        self.insert::<F, T>(|value| T::from(value.clone()));
    }

    /// Registers an erased converter.
    pub fn insert_converter(
        &mut self,
        from: &'static Type,
        to: &'static Type,
        converter: Box<dyn Converter>,
    ) {
        self.converters.insert((from.id(), to.id()), converter);
    }

    /// Checks if a conversion from `from` to `to` is registered.
    #[inline]
    pub fn contains(&self, from: &Type, to: &Type) -> bool {
        self.converters.contains_key(&(from.id(), to.id()))
    }

    /// Converts `value` into `to`, `None` if no conversion applies.
    ///
    /// Identity is not handled here, see [`Any::convert_to`].
    pub fn convert(&self, value: &Any, to: &Type) -> Option<Any> {
        let from = value.ty()?;
        let converter = self.converters.get(&(from.id(), to.id()))?;
        converter.convert(value.as_dyn()?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Registers the lossless numeric conversions and `&'static str` to
    /// `String`.
    pub(crate) fn insert_builtin(&mut self) {
        macro_rules! widen {
            ($table:ident; $($from:ty => [$($to:ty),*]),* $(,)?) => {
                $($( $table.insert_from::<$from, $to>(); )*)*
            };
        }

        let table = self;
        widen! {
            table;
            u8 => [u16, u32, u64, u128, usize, i16, i32, i64, i128, isize, f32, f64],
            u16 => [u32, u64, u128, usize, i32, i64, i128, f32, f64],
            u32 => [u64, u128, i64, i128, f64],
            u64 => [u128, i128],
            i8 => [i16, i32, i64, i128, isize, f32, f64],
            i16 => [i32, i64, i128, isize, f32, f64],
            i32 => [i64, i128, f64],
            i64 => [i128],
            f32 => [f64],
            bool => [u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize],
            char => [u32, u64, u128],
        }

        table.insert::<&'static str, String>(|s| String::from(*s));
    }
}

impl fmt::Debug for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionTable")
            .field("len", &self.converters.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::ConversionTable;
    use crate::info::Type;
    use crate::value::Any;

    #[test]
    fn builtin_conversions_are_lossless() {
        let mut table = ConversionTable::new();
        table.insert_builtin();

        assert!(table.contains(Type::of::<i16>(), Type::of::<i32>()));
        assert!(table.contains(Type::of::<u8>(), Type::of::<f32>()));
        assert!(!table.contains(Type::of::<i64>(), Type::of::<i32>()));
        assert!(!table.contains(Type::of::<u32>(), Type::of::<f32>()));

        let text = table.convert(&Any::new("hi"), Type::of::<String>()).unwrap();
        assert_eq!(text.get::<String>().unwrap(), "hi");
    }

    #[test]
    fn no_chaining() {
        let mut table = ConversionTable::new();
        table.insert_from::<u8, u16>();
        table.insert_from::<u16, u32>();

        assert!(table.convert(&Any::new(1_u8), Type::of::<u32>()).is_none());
        assert_eq!(
            table.convert(&Any::new(1_u8), Type::of::<u16>()).unwrap().get::<u16>(),
            Some(&1)
        );
    }
}
