use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the [`Type`] descriptor.
///
/// Implemented by [`#[derive(Typed)]`](crate::derive::Typed) and
/// [`#[derive(Reflected)]`](crate::derive::Reflected). Built-in types are
/// covered in [`impls`](crate::impls).
///
/// Manual implementations keep the descriptor in a
/// [`NonGenericTypeCell`](crate::impls::NonGenericTypeCell) or a
/// [`GenericTypeInfoCell`](crate::impls::GenericTypeInfoCell), which
/// guarantees a single instance per type.
///
/// # Examples
///
/// ```
/// use dv_reflect::derive::Typed;
/// use dv_reflect::info::{Type, Typed};
///
/// #[derive(Typed)]
/// struct Velocity { x: f32, y: f32 }
///
/// let ty: &'static Type = Velocity::ty();
/// assert_eq!(ty.name(), "Velocity");
/// assert_eq!(ty.size(), Some(8));
/// ```
pub trait Typed: TypePath {
    /// Returns the unique descriptor of `Self`.
    fn ty() -> &'static Type;
}
