use alloc::vec::Vec;
use core::any::Any as DynAny;
use core::marker::PhantomData;

use crate::info::{Type, Typed};
use crate::reflection::ReflectionError;
use crate::registry::TypeTraitValue;
use crate::value::Any;

// -----------------------------------------------------------------------------
// ValueWrapper

/// Erased access to one value inside an object.
///
/// The object passed in is the owner of the value: the class instance for
/// a field, the container for an element, the value itself for a root.
/// Implementations return `None` (or [`ReflectionError::Unavailable`]) when
/// given an object of the wrong type.
pub trait ValueWrapper: Send + Sync {
    /// Type of the wrapped value.
    fn value_type(&self) -> &'static Type;

    fn is_read_only(&self) -> bool;

    /// Returns a copy of the value.
    fn get_value(&self, object: &dyn DynAny) -> Option<Any>;

    /// Replaces the value. `value` must hold exactly [`value_type`](Self::value_type).
    fn set_value(&self, object: &mut dyn DynAny, value: Any) -> Result<(), ReflectionError>;

    /// Borrows the value in place, `None` for computed values.
    fn member<'o>(&self, object: &'o dyn DynAny) -> Option<&'o dyn DynAny>;

    /// Mutably borrows the value in place, `None` for computed or read-only values.
    fn member_mut<'o>(&self, object: &'o mut dyn DynAny) -> Option<&'o mut dyn DynAny>;
}

fn mismatch(expected: &'static Type, value: &Any) -> ReflectionError {
    ReflectionError::TypeMismatch {
        expected: expected.path(),
        found: value.ty().map_or("<empty>", Type::path),
    }
}

fn take<F: Typed>(value: Any) -> Result<F, ReflectionError> {
    value.take::<F>().map_err(|value| mismatch(F::ty(), &value))
}

// -----------------------------------------------------------------------------
// MemberWrapper

/// A field stored inline in `T`, reached through accessor functions.
pub struct MemberWrapper<T, F> {
    get: fn(&T) -> &F,
    get_mut: Option<fn(&mut T) -> &mut F>,
}

impl<T, F> MemberWrapper<T, F> {
    pub const fn new(get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self {
            get,
            get_mut: Some(get_mut),
        }
    }

    pub const fn read_only(get: fn(&T) -> &F) -> Self {
        Self { get, get_mut: None }
    }
}

impl<T, F> ValueWrapper for MemberWrapper<T, F>
where
    T: Typed,
    F: Typed + Clone + Send + Sync,
{
    #[inline]
    fn value_type(&self) -> &'static Type {
        F::ty()
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.get_mut.is_none()
    }

    fn get_value(&self, object: &dyn DynAny) -> Option<Any> {
        let object = object.downcast_ref::<T>()?;
        Some(Any::new((self.get)(object).clone()))
    }

    fn set_value(&self, object: &mut dyn DynAny, value: Any) -> Result<(), ReflectionError> {
        let get_mut = self.get_mut.ok_or(ReflectionError::ReadOnly)?;
        let object = object
            .downcast_mut::<T>()
            .ok_or(ReflectionError::Unavailable)?;
        *get_mut(object) = take::<F>(value)?;
        Ok(())
    }

    fn member<'o>(&self, object: &'o dyn DynAny) -> Option<&'o dyn DynAny> {
        let object = object.downcast_ref::<T>()?;
        Some((self.get)(object))
    }

    fn member_mut<'o>(&self, object: &'o mut dyn DynAny) -> Option<&'o mut dyn DynAny> {
        let get_mut = self.get_mut?;
        let object = object.downcast_mut::<T>()?;
        Some(get_mut(object))
    }
}

// -----------------------------------------------------------------------------
// PropertyWrapper

/// A computed value of `T`, read with a getter and written with a setter.
///
/// Properties have no storage to borrow, so they have no children.
pub struct PropertyWrapper<T, F> {
    get: fn(&T) -> F,
    set: Option<fn(&mut T, F)>,
}

impl<T, F> PropertyWrapper<T, F> {
    pub const fn new(get: fn(&T) -> F, set: fn(&mut T, F)) -> Self {
        Self {
            get,
            set: Some(set),
        }
    }

    pub const fn read_only(get: fn(&T) -> F) -> Self {
        Self { get, set: None }
    }
}

impl<T, F> ValueWrapper for PropertyWrapper<T, F>
where
    T: Typed,
    F: Typed + Clone + Send + Sync,
{
    #[inline]
    fn value_type(&self) -> &'static Type {
        F::ty()
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    fn get_value(&self, object: &dyn DynAny) -> Option<Any> {
        let object = object.downcast_ref::<T>()?;
        Some(Any::new((self.get)(object)))
    }

    fn set_value(&self, object: &mut dyn DynAny, value: Any) -> Result<(), ReflectionError> {
        let set = self.set.ok_or(ReflectionError::ReadOnly)?;
        let object = object
            .downcast_mut::<T>()
            .ok_or(ReflectionError::Unavailable)?;
        set(object, take::<F>(value)?);
        Ok(())
    }

    #[inline]
    fn member<'o>(&self, _: &'o dyn DynAny) -> Option<&'o dyn DynAny> {
        None
    }

    #[inline]
    fn member_mut<'o>(&self, _: &'o mut dyn DynAny) -> Option<&'o mut dyn DynAny> {
        None
    }
}

// -----------------------------------------------------------------------------
// IndexWrapper

/// The element at a fixed index of a `Vec<T>`.
pub struct IndexWrapper<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> IndexWrapper<T> {
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }
}

impl<T: Typed + Clone + Send + Sync> ValueWrapper for IndexWrapper<T> {
    #[inline]
    fn value_type(&self) -> &'static Type {
        T::ty()
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        false
    }

    fn get_value(&self, object: &dyn DynAny) -> Option<Any> {
        let item = object.downcast_ref::<Vec<T>>()?.get(self.index)?;
        Some(Any::new(item.clone()))
    }

    fn set_value(&self, object: &mut dyn DynAny, value: Any) -> Result<(), ReflectionError> {
        let item = object
            .downcast_mut::<Vec<T>>()
            .and_then(|vec| vec.get_mut(self.index))
            .ok_or(ReflectionError::Unavailable)?;
        *item = take::<T>(value)?;
        Ok(())
    }

    fn member<'o>(&self, object: &'o dyn DynAny) -> Option<&'o dyn DynAny> {
        let item = object.downcast_ref::<Vec<T>>()?.get(self.index)?;
        Some(item)
    }

    fn member_mut<'o>(&self, object: &'o mut dyn DynAny) -> Option<&'o mut dyn DynAny> {
        let item = object
            .downcast_mut::<Vec<T>>()?
            .get_mut(self.index)?;
        Some(item)
    }
}

// -----------------------------------------------------------------------------
// SelfWrapper

/// The object itself, used at the root of a reflection.
///
/// Getting and setting the whole object needs the [`TypeTraitValue`] of its
/// type; without it the object can only be browsed.
pub struct SelfWrapper {
    ty: &'static Type,
    value_ops: Option<TypeTraitValue>,
    read_only: bool,
}

impl SelfWrapper {
    pub const fn new(ty: &'static Type, value_ops: Option<TypeTraitValue>, read_only: bool) -> Self {
        Self {
            ty,
            value_ops,
            read_only,
        }
    }
}

impl ValueWrapper for SelfWrapper {
    #[inline]
    fn value_type(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn get_value(&self, object: &dyn DynAny) -> Option<Any> {
        self.value_ops.as_ref()?.clone_value(object)
    }

    fn set_value(&self, object: &mut dyn DynAny, value: Any) -> Result<(), ReflectionError> {
        if self.read_only {
            return Err(ReflectionError::ReadOnly);
        }
        let ops = self.value_ops.as_ref().ok_or(ReflectionError::Unavailable)?;
        ops.assign(object, value)
            .map_err(|value| mismatch(self.ty, &value))
    }

    #[inline]
    fn member<'o>(&self, object: &'o dyn DynAny) -> Option<&'o dyn DynAny> {
        Some(object)
    }

    #[inline]
    fn member_mut<'o>(&self, object: &'o mut dyn DynAny) -> Option<&'o mut dyn DynAny> {
        Some(object)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::{IndexWrapper, MemberWrapper, PropertyWrapper, ValueWrapper};
    use crate::derive::Typed;
    use crate::reflection::ReflectionError;
    use crate::value::Any;

    #[derive(Typed)]
    struct Label {
        text: String,
    }

    #[test]
    fn member_access() {
        let wrapper = MemberWrapper::new(|s: &Label| &s.text, |s| &mut s.text);
        let mut object = Label {
            text: String::from("a"),
        };

        assert_eq!(wrapper.get_value(&object).unwrap().get::<String>().unwrap(), "a");
        wrapper.set_value(&mut object, Any::new(String::from("b"))).unwrap();
        assert_eq!(object.text, "b");

        assert!(matches!(
            wrapper.set_value(&mut object, Any::new(3_u8)),
            Err(ReflectionError::TypeMismatch { .. })
        ));
        assert!(wrapper.get_value(&3_u8).is_none());
    }

    #[test]
    fn read_only_property_has_no_member() {
        let wrapper = PropertyWrapper::read_only(|v: &Vec<u8>| v.len());
        let mut object = vec![1_u8, 2];

        assert!(wrapper.is_read_only());
        assert_eq!(wrapper.get_value(&object).unwrap().get::<usize>(), Some(&2));
        assert!(wrapper.member(&object).is_none());
        assert_eq!(
            wrapper.set_value(&mut object, Any::new(0_usize)),
            Err(ReflectionError::ReadOnly)
        );
    }

    #[test]
    fn index_out_of_range() {
        let wrapper = IndexWrapper::<i32>::new(3);
        let mut object = vec![0_i32; 2];

        assert!(wrapper.get_value(&object).is_none());
        assert_eq!(
            wrapper.set_value(&mut object, Any::new(1_i32)),
            Err(ReflectionError::Unavailable)
        );
    }
}
