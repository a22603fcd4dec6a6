use alloc::boxed::Box;
use core::fmt;

use crate::info::{Type, Typed};
use crate::registry::TypeDb;
use crate::value::CastError;

// -----------------------------------------------------------------------------
// AnyValue

trait AnyValue: core::any::Any + Send + Sync {
    fn ty(&self) -> &'static Type;

    fn clone_value(&self) -> Box<dyn AnyValue>;

    fn into_any(self: Box<Self>) -> Box<dyn core::any::Any>;
}

impl<T: Typed + Clone + Send + Sync> AnyValue for T {
    #[inline]
    fn ty(&self) -> &'static Type {
        T::ty()
    }

    fn clone_value(&self) -> Box<dyn AnyValue> {
        Box::new(self.clone())
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn core::any::Any> {
        self
    }
}

// -----------------------------------------------------------------------------
// Any

/// A type-erased value that remembers its [`Type`].
///
/// `Any` owns its value. Reading it back requires the exact type, values of
/// other types are only reachable through [`cast`](Any::cast), which
/// consults the conversions registered in a [`TypeDb`].
///
/// # Examples
///
/// ```
/// use dv_reflect::{Any, TypeDb};
///
/// let db = TypeDb::new();
/// let value = Any::new(7_i16);
///
/// assert_eq!(value.get::<i16>(), Some(&7));
/// assert_eq!(value.get::<i32>(), None);
///
/// assert!(value.can_cast::<i32>(&db));
/// assert_eq!(value.cast::<i32>(&db), Ok(7));
/// assert!(!Any::new(7_i64).can_cast::<i32>(&db));
/// ```
#[derive(Default)]
pub struct Any {
    value: Option<Box<dyn AnyValue>>,
}

impl Any {
    /// Creates an `Any` holding `value`.
    #[inline]
    pub fn new<T: Typed + Clone + Send + Sync>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
        }
    }

    /// Creates an empty `Any`.
    #[inline]
    pub const fn empty() -> Self {
        Self { value: None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Drops the held value.
    #[inline]
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Replaces the held value.
    #[inline]
    pub fn set<T: Typed + Clone + Send + Sync>(&mut self, value: T) {
        self.value = Some(Box::new(value));
    }

    /// Type of the held value, `None` when empty.
    #[inline]
    pub fn ty(&self) -> Option<&'static Type> {
        self.value.as_deref().map(AnyValue::ty)
    }

    /// Checks if the held value is exactly a `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.ty().is_some_and(Type::is::<T>)
    }

    /// Checks if [`get`](Any::get) would succeed.
    #[inline]
    pub fn can_get<T: 'static>(&self) -> bool {
        self.is::<T>()
    }

    /// Returns the held value if it is a `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.as_dyn()?.downcast_ref::<T>()
    }

    /// Returns the held value mutably if it is a `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.as_dyn_mut()?.downcast_mut::<T>()
    }

    /// Moves the held value out, returning `self` back if it is not a `T`.
    pub fn take<T: 'static>(self) -> Result<T, Any> {
        if !self.is::<T>() {
            return Err(self);
        }
        let Some(value) = self.value else {
            return Err(Any::empty());
        };
        value.into_any().downcast::<T>().map(|v| *v).map_err(|_| Any::empty())
    }

    /// The held value as a standard trait object.
    #[inline]
    pub fn as_dyn(&self) -> Option<&dyn core::any::Any> {
        let value: &dyn core::any::Any = self.value.as_deref()?;
        Some(value)
    }

    /// The held value as a mutable standard trait object.
    #[inline]
    pub fn as_dyn_mut(&mut self) -> Option<&mut dyn core::any::Any> {
        let value: &mut dyn core::any::Any = self.value.as_deref_mut()?;
        Some(value)
    }

    /// Checks if the value is a `T` or can be converted into one.
    pub fn can_cast<T: Typed>(&self, db: &TypeDb) -> bool {
        match self.ty() {
            Some(from) => from == T::ty() || db.conversions().contains(from, T::ty()),
            None => false,
        }
    }

    /// Returns the value as a `T`, converting it if needed.
    ///
    /// Fails when the value is empty or no conversion is registered.
    pub fn cast<T: Typed + Clone + Send + Sync>(&self, db: &TypeDb) -> Result<T, CastError> {
        if let Some(value) = self.get::<T>() {
            return Ok(value.clone());
        }
        self.convert_to(T::ty(), db)?
            .take::<T>()
            .map_err(|_| self.not_convertible(T::ty()))
    }

    /// Returns a copy of the value converted to `target`.
    ///
    /// An `Any` already holding `target` is cloned.
    pub fn convert_to(&self, target: &'static Type, db: &TypeDb) -> Result<Any, CastError> {
        let from = self.ty().ok_or(CastError::Empty)?;
        if from == target {
            return Ok(self.clone());
        }
        db.conversions()
            .convert(self, target)
            .ok_or_else(|| self.not_convertible(target))
    }

    fn not_convertible(&self, target: &'static Type) -> CastError {
        let from = self.ty().map_or("<empty>", Type::path);
        log::trace!("no conversion from `{from}` to `{}`", target.path());
        CastError::NotConvertible {
            from,
            to: target.path(),
        }
    }
}

impl Clone for Any {
    fn clone(&self) -> Self {
        Self {
            value: self.value.as_deref().map(AnyValue::clone_value),
        }
    }
}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty() {
            Some(ty) => write!(f, "Any({})", ty.path()),
            None => f.write_str("Any(<empty>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Any;
    use crate::info::Type;

    #[test]
    fn holds_a_clone() {
        let original = String::from("name");
        let mut value = Any::new(original.clone());
        value.get_mut::<String>().unwrap().push_str("d");

        assert_eq!(original, "name");
        assert_eq!(value.get::<String>().unwrap(), "named");
        assert_eq!(value.ty(), Some(Type::of::<String>()));
    }

    #[test]
    fn take_returns_self_on_mismatch() {
        let value = Any::new(3_u8);
        let value = value.take::<u16>().unwrap_err();
        assert_eq!(value.take::<u8>().ok(), Some(3));
        assert!(Any::empty().take::<u8>().unwrap_err().is_empty());
    }

    #[test]
    fn clone_and_debug() {
        let a = Any::new(1.5_f32);
        let b = a.clone();
        assert_eq!(b.get::<f32>(), Some(&1.5));
        assert_eq!(alloc::format!("{b:?}"), "Any(f32)");
        assert_eq!(alloc::format!("{:?}", Any::empty()), "Any(<empty>)");
    }
}
