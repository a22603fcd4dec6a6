//! Containers for static storage of type descriptors.
//!
//! - [`NonGenericTypeCell`]: a [`OnceLock`] holding the [`Type`] of one type.
//! - [`GenericTypeCell`]: a `static` inside a generic function is shared by
//!   every instantiation, so this one keys its values by [`TypeId`].
//!
//! Values are created at most once per type, even when several threads ask
//! for them at the same time, and are never freed.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use dv_utils::TypeIdMap;

use crate::info::Type;

mod sealed {
    use super::{String, Type};

    pub trait CellValue: Sync + 'static {}

    impl CellValue for String {}
    impl CellValue for Type {}
}

use sealed::CellValue;

/// Static storage of the [`Type`] of a non-generic type.
///
/// # Examples
///
/// ```
/// use dv_reflect::impls::NonGenericTypeCell;
/// use dv_reflect::info::{Type, TypePath, Typed};
///
/// struct Meters(f32);
///
/// impl TypePath for Meters {
///     fn type_path() -> &'static str { "units::Meters" }
///     fn type_name() -> &'static str { "Meters" }
///     fn type_ident() -> &'static str { "Meters" }
/// }
///
/// impl Typed for Meters {
///     fn ty() -> &'static Type {
///         static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
///         CELL.get_or_init(Type::new::<Self>)
///     }
/// }
///
/// assert_eq!(Type::of::<Meters>().size(), Some(4));
/// ```
pub struct NonGenericTypeCell(OnceLock<Type>);

impl NonGenericTypeCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored value, creating it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> Type) -> &Type {
        self.0.get_or_init(f)
    }
}

impl Default for NonGenericTypeCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Static storage for generic types, one value per instantiation.
///
/// See [`GenericTypeInfoCell`] and [`GenericTypePathCell`].
pub struct GenericTypeCell<T: CellValue>(RwLock<TypeIdMap<&'static T>>);

/// Static storage of the [`Type`] of a generic type.
///
/// ```
/// use dv_reflect::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
/// use dv_reflect::info::{Type, TypePath, Typed};
///
/// struct Handle<T>(u32, core::marker::PhantomData<T>);
///
/// impl<T: TypePath> TypePath for Handle<T> {
///     fn type_path() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["assets::Handle<", T::type_path(), ">"]))
///     }
///     fn type_name() -> &'static str {
///         static CELL: GenericTypePathCell = GenericTypePathCell::new();
///         CELL.get_or_insert::<Self>(|| concat(&["Handle<", T::type_name(), ">"]))
///     }
///     fn type_ident() -> &'static str { "Handle" }
/// }
///
/// impl<T: TypePath> Typed for Handle<T> {
///     fn ty() -> &'static Type {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(Type::new::<Self>)
///     }
/// }
///
/// assert_eq!(Type::of::<Handle<u8>>().name(), "Handle<u8>");
/// assert_ne!(Type::of::<Handle<u8>>(), Type::of::<Handle<i8>>());
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<Type>;

/// Static storage of generated type path strings.
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: CellValue> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for `G`, creating it with `f` on first use.
    ///
    /// `f` runs without holding the lock, so it may itself query other
    /// cells. If two threads race, the first inserted value is kept.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &'static T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: CellValue> Default for GenericTypeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use std::thread;

    use super::GenericTypePathCell;

    static CELL: GenericTypePathCell = GenericTypePathCell::new();

    fn name_of<T: 'static>() -> &'static String {
        CELL.get_or_insert::<T>(|| core::any::type_name::<T>().to_string())
    }

    #[test]
    fn one_value_per_type_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| name_of::<Vec<u8>>() as *const String as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_ne!(name_of::<u8>(), name_of::<u16>());
    }
}
