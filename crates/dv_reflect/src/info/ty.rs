use core::alloc::Layout;
use core::any::{Any, TypeId};
use core::ops::DerefMut;
use std::sync::OnceLock;

use bitflags::bitflags;

use crate::info::{TypePath, TypePathTable, Typed};

// -----------------------------------------------------------------------------
// TypeFlags

bitflags! {
    /// Qualifiers of a [`Type`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        /// Built-in scalar or string.
        const FUNDAMENTAL = 1 << 0;
        /// A shared `&'static T` reference.
        const REFERENCE   = 1 << 1;
        /// An owning pointer, dereferences to another reflected type.
        const POINTER     = 1 << 2;
        /// An indexed container of one element type.
        const CONTAINER   = 1 << 3;
        /// A dynamically sized type, such as `str`.
        const UNSIZED     = 1 << 4;
    }
}

// -----------------------------------------------------------------------------
// DerefFns

/// Erased accessors from a pointer object to its pointee.
#[derive(Clone, Copy)]
pub struct DerefFns {
    get: fn(&dyn Any) -> Option<&dyn Any>,
    get_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

fn deref_get<P, T>(object: &dyn Any) -> Option<&dyn Any>
where
    P: DerefMut<Target = T> + Any,
    T: Any,
{
    object.downcast_ref::<P>().map(|ptr| &**ptr as &dyn Any)
}

fn deref_get_mut<P, T>(object: &mut dyn Any) -> Option<&mut dyn Any>
where
    P: DerefMut<Target = T> + Any,
    T: Any,
{
    object
        .downcast_mut::<P>()
        .map(|ptr| &mut **ptr as &mut dyn Any)
}

impl DerefFns {
    /// Accessors for pointer type `P` with target `T`.
    pub fn of<P, T>() -> Self
    where
        P: DerefMut<Target = T> + Any,
        T: Any,
    {
        Self {
            get: deref_get::<P, T>,
            get_mut: deref_get_mut::<P, T>,
        }
    }

    /// Returns the pointee, `None` if `object` is not the pointer type.
    #[inline]
    pub fn get<'o>(&self, object: &'o dyn Any) -> Option<&'o dyn Any> {
        (self.get)(object)
    }

    /// Returns the pointee mutably, `None` if `object` is not the pointer type.
    #[inline]
    pub fn get_mut<'o>(&self, object: &'o mut dyn Any) -> Option<&'o mut dyn Any> {
        (self.get_mut)(object)
    }
}

// -----------------------------------------------------------------------------
// Type

/// The runtime descriptor of a Rust type.
///
/// There is exactly one `Type` per type, obtained with [`Type::of`] (or
/// [`Typed::ty`]). It is built the first time it is requested, inside a
/// synchronized cell, and lives for the rest of the process, so a
/// `&'static Type` can be compared and stored freely.
///
/// Besides identity and names it records:
///
/// - the memory layout,
/// - [`TypeFlags`] qualifiers,
/// - `decay`: `&'static T` to `T`,
/// - `deref`: pointer to pointee, e.g. `Box<T>` to `T`,
/// - `pointer`: `T` to `Box<T>`, once `Box<T>` has been described,
/// - `element`: container to element, e.g. `Vec<T>` to `T`.
///
/// Inheritance is not stored here; it lives in the cast graph of a
/// [`TypeDb`](crate::registry::TypeDb).
///
/// # Examples
///
/// ```
/// use dv_reflect::info::Type;
///
/// let ty = Type::of::<Box<i32>>();
///
/// assert!(ty.is_pointer());
/// assert_eq!(ty.deref(), Some(Type::of::<i32>()));
/// assert_eq!(Type::of::<i32>().pointer(), Some(ty));
/// assert_eq!(Type::of::<i32>().size(), Some(4));
/// assert_eq!(Type::of::<str>().size(), None);
/// ```
pub struct Type {
    type_id: TypeId,
    type_path_table: TypePathTable,
    layout: Option<Layout>,
    flags: TypeFlags,
    decay: Option<fn() -> &'static Type>,
    deref: Option<(fn() -> &'static Type, DerefFns)>,
    element: Option<fn() -> &'static Type>,
    pointer: OnceLock<&'static Type>,
}

impl Type {
    /// Creates a plain descriptor for `T`, without flags or relations.
    ///
    /// This is meant for [`Typed`] implementations, which keep the result in
    /// a static cell. Use [`Type::of`] to get the canonical instance.
    pub fn new<T: TypePath>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path_table: TypePathTable::of::<T>(),
            layout: Some(Layout::new::<T>()),
            flags: TypeFlags::empty(),
            decay: None,
            deref: None,
            element: None,
            pointer: OnceLock::new(),
        }
    }

    /// Creates a descriptor for a dynamically sized type.
    ///
    /// The layout is unknown and [`TypeFlags::UNSIZED`] is set.
    pub fn new_unsized<T: TypePath + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path_table: TypePathTable::of::<T>(),
            layout: None,
            flags: TypeFlags::UNSIZED,
            decay: None,
            deref: None,
            element: None,
            pointer: OnceLock::new(),
        }
    }

    /// Returns the canonical descriptor of `T`.
    #[inline(always)]
    pub fn of<T: Typed + ?Sized>() -> &'static Type {
        T::ty()
    }

    /// Adds qualifier flags.
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// Marks the type as a reference decaying to `U`.
    pub fn with_decay<U: Typed + ?Sized>(mut self) -> Self {
        self.flags = self.flags.union(TypeFlags::REFERENCE);
        self.decay = Some(U::ty);
        self
    }

    /// Marks the type as a pointer `P` dereferencing to `U`.
    ///
    /// `P` must be the type being described.
    pub fn with_deref<P, U>(mut self) -> Self
    where
        P: DerefMut<Target = U> + Any,
        U: Typed,
    {
        self.flags = self.flags.union(TypeFlags::POINTER);
        self.deref = Some((U::ty, DerefFns::of::<P, U>()));
        self
    }

    /// Marks the type as a container of `U`.
    pub fn with_element<U: Typed>(mut self) -> Self {
        self.flags = self.flags.union(TypeFlags::CONTAINER);
        self.element = Some(U::ty);
        self
    }

    /// Records `ptr` as the pointer type of `self`.
    ///
    /// The first link wins; later calls are ignored.
    pub(crate) fn link_pointer(&self, ptr: &'static Type) {
        let _ = self.pointer.set(ptr);
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Checks if this describes `T`.
    #[inline(always)]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.type_path_table
    }

    /// See [`TypePath::type_path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path_table.path()
    }

    /// See [`TypePath::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.type_path_table.name()
    }

    /// See [`TypePath::type_ident`].
    #[inline]
    pub fn ident(&self) -> &'static str {
        self.type_path_table.ident()
    }

    /// See [`TypePath::module_path`].
    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.type_path_table.module_path()
    }

    #[inline]
    pub fn crate_name(&self) -> Option<&'static str> {
        self.type_path_table.crate_name()
    }

    /// Memory layout, `None` for unsized types.
    #[inline]
    pub const fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Size in bytes, `None` for unsized types.
    #[inline]
    pub fn size(&self) -> Option<usize> {
        self.layout.map(|layout| layout.size())
    }

    #[inline]
    pub fn align(&self) -> Option<usize> {
        self.layout.map(|layout| layout.align())
    }

    #[inline]
    pub const fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub const fn is_fundamental(&self) -> bool {
        self.flags.contains(TypeFlags::FUNDAMENTAL)
    }

    #[inline]
    pub const fn is_reference(&self) -> bool {
        self.flags.contains(TypeFlags::REFERENCE)
    }

    #[inline]
    pub const fn is_pointer(&self) -> bool {
        self.flags.contains(TypeFlags::POINTER)
    }

    #[inline]
    pub const fn is_container(&self) -> bool {
        self.flags.contains(TypeFlags::CONTAINER)
    }

    #[inline]
    pub const fn is_unsized(&self) -> bool {
        self.flags.contains(TypeFlags::UNSIZED)
    }

    /// The referenced type, for `&'static T`.
    #[inline]
    pub fn decay(&self) -> Option<&'static Type> {
        self.decay.map(|f| f())
    }

    /// The pointee type, for pointers.
    #[inline]
    pub fn deref(&self) -> Option<&'static Type> {
        self.deref.map(|(f, _)| f())
    }

    /// Erased accessors to the pointee, for pointers.
    #[inline]
    pub fn deref_fns(&self) -> Option<DerefFns> {
        self.deref.map(|(_, fns)| fns)
    }

    /// The `Box<Self>` descriptor, once it has been created.
    #[inline]
    pub fn pointer(&self) -> Option<&'static Type> {
        self.pointer.get().copied()
    }

    /// The element type, for containers.
    #[inline]
    pub fn element(&self) -> Option<&'static Type> {
        self.element.map(|f| f())
    }

    /// Follows `deref` until a non-pointer type is reached.
    pub fn pointee(&'static self) -> &'static Type {
        let mut ty = self;
        while let Some(target) = ty.deref() {
            ty = target;
        }
        ty
    }
}

/// Compares the [`TypeId`] only.
impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// Prints the type path only.
impl core::fmt::Debug for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{Type, TypeFlags};

    #[test]
    fn same_instance_every_time() {
        let a = Type::of::<Vec<u16>>() as *const Type;
        let b = Type::of::<Vec<u16>>() as *const Type;
        assert_eq!(a, b);
        assert!(!core::ptr::eq(Type::of::<Vec<u16>>(), Type::of::<Vec<u32>>()));
    }

    #[test]
    fn relations() {
        let reference = Type::of::<&'static String>();
        assert!(reference.is_reference());
        assert_eq!(reference.decay(), Some(Type::of::<String>()));

        let vec = Type::of::<Vec<f32>>();
        assert_eq!(vec.flags(), TypeFlags::CONTAINER);
        assert_eq!(vec.element(), Some(Type::of::<f32>()));

        let boxed = Type::of::<Box<Box<u8>>>();
        assert_eq!(boxed.pointee(), Type::of::<u8>());
        assert!(Type::of::<u8>().is_fundamental());
        assert_eq!(Type::of::<u8>().deref(), None);

        let text = Type::of::<&'static str>();
        assert_eq!(text.decay(), Some(Type::of::<str>()));
        assert!(Type::of::<str>().is_unsized());
    }

    #[test]
    fn pointer_backlink() {
        let boxed = Type::of::<Box<i64>>();
        assert_eq!(Type::of::<i64>().pointer(), Some(boxed));
    }

    #[test]
    fn deref_fns_reach_pointee() {
        let mut value: Box<i32> = Box::new(5);
        let fns = Type::of::<Box<i32>>().deref_fns().unwrap();

        let target = fns.get(&value).unwrap();
        assert_eq!(target.downcast_ref::<i32>(), Some(&5));

        *fns.get_mut(&mut value).unwrap().downcast_mut::<i32>().unwrap() = 9;
        assert_eq!(*value, 9);
        assert!(fns.get(&7_i32).is_none());
    }
}
