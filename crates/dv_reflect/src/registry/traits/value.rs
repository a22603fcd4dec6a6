use core::any::Any as DynAny;

use crate::info::Typed;
use crate::registry::{FromType, TypeTrait};
use crate::value::Any;

/// Copies whole values of a type in and out of [`Any`].
///
/// Reflections use it to get and set their root object.
///
/// # Examples
///
/// ```
/// use dv_reflect::Any;
/// use dv_reflect::registry::{FromType, TypeTraitValue};
///
/// let ops = <TypeTraitValue as FromType<i32>>::from_type();
/// let mut value = 1_i32;
///
/// ops.assign(&mut value, Any::new(5_i32)).unwrap();
/// assert_eq!(ops.clone_value(&value).unwrap().get::<i32>(), Some(&5));
/// assert!(ops.assign(&mut value, Any::new(5_u8)).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitValue {
    clone_value: fn(&dyn DynAny) -> Option<Any>,
    assign: fn(&mut dyn DynAny, Any) -> Result<(), Any>,
}

impl TypeTraitValue {
    /// Copies `object` into an [`Any`], `None` if it has another type.
    #[inline]
    pub fn clone_value(&self, object: &dyn DynAny) -> Option<Any> {
        (self.clone_value)(object)
    }

    /// Replaces `object` with the content of `value`.
    ///
    /// Gives `value` back when either has another type.
    #[inline]
    pub fn assign(&self, object: &mut dyn DynAny, value: Any) -> Result<(), Any> {
        (self.assign)(object, value)
    }
}

impl<T: Typed + Clone + Send + Sync> FromType<T> for TypeTraitValue {
    fn from_type() -> Self {
        Self {
            clone_value: |object| object.downcast_ref::<T>().map(|v| Any::new(v.clone())),
            assign: |object, value| match object.downcast_mut::<T>() {
                Some(object) => {
                    *object = value.take::<T>()?;
                    Ok(())
                }
                None => Err(value),
            },
        }
    }
}

impl TypeTrait for TypeTraitValue {}
