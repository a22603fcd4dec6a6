// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// A stable alternative to [`core::any::type_name`]: the strings do not
/// depend on the compiler version, and can be pinned with
/// `#[reflect(type_path = "...")]` so they survive moving the type.
///
/// - [`type_path`]: unique identifier of the type, never shared by two types.
/// - [`type_name`]: path without the module prefix, may be shared.
/// - [`type_ident`]: the bare identifier, without module or generics.
/// - [`module_path`]: optional module path.
///
/// None of these strings start with `::`.
///
/// # Implementation
///
/// Usually through [`#[derive(Typed)]`](crate::derive::Typed) or
/// [`#[derive(Reflected)]`](crate::derive::Reflected):
///
/// ```
/// use dv_reflect::derive::Typed;
/// use dv_reflect::info::TypePath;
///
/// #[derive(Typed)]
/// #[reflect(type_path = "game::units::Health")]
/// struct Health(u32);
///
/// assert_eq!(Health::type_path(), "game::units::Health");
/// assert_eq!(Health::type_name(), "Health");
/// assert_eq!(Health::module_path(), Some("game::units"));
/// ```
///
/// Manually, for a non-generic type:
///
/// ```
/// use dv_reflect::info::TypePath;
///
/// struct Foo;
///
/// impl TypePath for Foo {
///     fn type_path() -> &'static str { "my_crate::foo::Foo" }
///     fn type_name() -> &'static str { "Foo" }
///     fn type_ident() -> &'static str { "Foo" }
///     fn module_path() -> Option<&'static str> { Some("my_crate::foo") }
/// }
/// ```
///
/// Generic types build their strings once per instantiation with
/// [`GenericTypePathCell`](crate::impls::GenericTypePathCell).
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`type_ident`]: TypePath::type_ident
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    /// Returns the fully qualified path with generics.
    ///
    /// For `Vec<Option<i32>>` this is `"alloc::vec::Vec<core::option::Option<i32>>"`.
    fn type_path() -> &'static str;

    /// Returns the short name with generics.
    ///
    /// For `Vec<Option<i32>>` this is `"Vec<Option<i32>>"`.
    fn type_name() -> &'static str;

    /// Returns the identifier without generics.
    ///
    /// For `Vec<Option<i32>>` this is `"Vec"`.
    fn type_ident() -> &'static str;

    /// Module where the type is defined, `None` for primitives.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// TypePathTable

/// Function pointers to a type's [`TypePath`] implementation.
///
/// # Examples
///
/// ```
/// use dv_reflect::info::TypePathTable;
///
/// let x = TypePathTable::of::<String>();
/// assert_eq!(x.path(), "alloc::string::String");
/// assert_eq!(x.name(), "String");
/// assert_eq!(x.module_path(), Some("alloc::string"));
/// assert_eq!(x.crate_name(), Some("alloc"));
/// ```
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
}

impl TypePathTable {
    /// Creates the table of `T`.
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
        }
    }

    /// See [`TypePath::type_path`].
    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    /// See [`TypePath::type_name`].
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    /// See [`TypePath::type_ident`].
    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    /// See [`TypePath::module_path`].
    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }

    /// First segment of the module path.
    pub fn crate_name(&self) -> Option<&'static str> {
        let module = self.module_path()?;
        Some(module.split("::").next().unwrap_or(module))
    }
}

impl core::fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.path())
            .field("type_name", &self.name())
            .field("module_path", &self.module_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TypePath, TypePathTable};

    struct Local;

    impl TypePath for Local {
        fn type_path() -> &'static str {
            "你好::world::Local"
        }
        fn type_name() -> &'static str {
            "Local"
        }
        fn type_ident() -> &'static str {
            "Local"
        }
        fn module_path() -> Option<&'static str> {
            Some("你好::world")
        }
    }

    #[test]
    fn utf8_crate_name() {
        let table = TypePathTable::of::<Local>();
        assert_eq!(table.crate_name(), Some("你好"));
        assert_eq!(TypePathTable::of::<i32>().crate_name(), None);
    }
}
