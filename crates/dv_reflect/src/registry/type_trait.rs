use core::any::Any;

/// A capability of a registered type, stored in its
/// [`ReflectedType`](crate::registry::ReflectedType) and looked up by the
/// trait's own type.
///
/// Built-in capabilities are the `TypeTrait*` structs of this module. Custom
/// ones only need to be `Send + Sync + 'static`:
///
/// ```
/// use dv_reflect::registry::{FromType, TypeTrait};
/// use dv_reflect::info::Typed;
///
/// #[derive(Clone)]
/// struct TypeTraitSize(usize);
///
/// impl TypeTrait for TypeTraitSize {}
///
/// impl<T: Typed> FromType<T> for TypeTraitSize {
///     fn from_type() -> Self {
///         Self(core::mem::size_of::<T>())
///     }
/// }
///
/// let size: Box<dyn TypeTrait> = Box::new(<TypeTraitSize as FromType<u32>>::from_type());
/// assert_eq!(size.downcast_ref::<TypeTraitSize>().unwrap().0, 4);
/// ```
pub trait TypeTrait: Any + Send + Sync {}

impl dyn TypeTrait {
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
