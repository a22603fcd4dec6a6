use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::{Type, Typed};

/// A heap allocated object of a reflected type.
///
/// Produced by registered constructors. Unlike [`Any`](crate::Any) the
/// value does not need to be `Clone`.
///
/// # Examples
///
/// ```
/// use dv_reflect::value::BoxedObject;
///
/// let object = BoxedObject::new(String::from("hello"));
/// assert_eq!(object.ty().name(), "String");
///
/// let value = object.downcast::<String>().unwrap();
/// assert_eq!(*value, "hello");
/// ```
pub struct BoxedObject {
    value: Box<dyn Any + Send + Sync>,
    ty: &'static Type,
}

impl BoxedObject {
    pub fn new<T: Typed + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            ty: T::ty(),
        }
    }

    #[inline]
    pub fn ty(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    #[inline]
    pub fn as_dyn(&self) -> &dyn Any {
        &*self.value
    }

    #[inline]
    pub fn as_dyn_mut(&mut self) -> &mut dyn Any {
        &mut *self.value
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Moves the object out, returning `self` back if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Self> {
        let ty = self.ty;
        self.value
            .downcast::<T>()
            .map_err(|value| Self { value, ty })
    }
}

impl fmt::Debug for BoxedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxedObject({})", self.ty.path())
    }
}
