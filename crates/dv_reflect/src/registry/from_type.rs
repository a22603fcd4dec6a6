use crate::info::Typed;

/// Builds a [`TypeTrait`] for the type `T`.
///
/// Used by [`ReflectionRegistrator::type_trait`] and
/// [`TypeDb::register_type_trait`].
///
/// # Examples
///
/// ```
/// use dv_reflect::registry::{FromType, TypeTraitPrint};
///
/// let print = <TypeTraitPrint as FromType<u8>>::from_type();
/// assert_eq!(print.print(&7_u8).as_deref(), Some("7"));
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`ReflectionRegistrator::type_trait`]: crate::registry::ReflectionRegistrator::type_trait
/// [`TypeDb::register_type_trait`]: crate::registry::TypeDb::register_type_trait
pub trait FromType<T: Typed + ?Sized> {
    fn from_type() -> Self;
}
