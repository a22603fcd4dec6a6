use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::Typed;
use crate::registry::{FromType, TypeTrait};

/// Formats values of a type for [`Reflection::dump`](crate::Reflection::dump).
///
/// [`FromType`] uses [`Debug`](fmt::Debug); [`display`](Self::display) uses
/// [`Display`](fmt::Display) instead, which is what the built-in string types
/// register.
///
/// # Examples
///
/// ```
/// use dv_reflect::registry::{FromType, TypeTraitPrint};
///
/// let debug = <TypeTraitPrint as FromType<String>>::from_type();
/// let display = TypeTraitPrint::display::<String>();
/// let text = String::from("hi");
///
/// assert_eq!(debug.print(&text).unwrap(), "\"hi\"");
/// assert_eq!(display.print(&text).unwrap(), "hi");
/// assert!(display.print(&1_u8).is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitPrint {
    type_id: TypeId,
    fmt: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl TypeTraitPrint {
    pub fn display<T: Typed + fmt::Display>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            fmt: |value, f| match value.downcast_ref::<T>() {
                Some(value) => fmt::Display::fmt(value, f),
                None => Err(fmt::Error),
            },
        }
    }

    /// Formats `value`, `None` if it has another type.
    pub fn print(&self, value: &dyn Any) -> Option<String> {
        use core::fmt::Write;

        if value.type_id() != self.type_id {
            return None;
        }
        let mut out = String::new();
        write!(out, "{}", Printed { print: self, value }).ok()?;
        Some(out)
    }

    /// Writes `value` into a formatter.
    pub fn fmt(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.fmt)(value, f)
    }
}

impl<T: Typed + fmt::Debug> FromType<T> for TypeTraitPrint {
    fn from_type() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            fmt: |value, f| match value.downcast_ref::<T>() {
                Some(value) => fmt::Debug::fmt(value, f),
                None => Err(fmt::Error),
            },
        }
    }
}

impl TypeTrait for TypeTraitPrint {}

struct Printed<'a> {
    print: &'a TypeTraitPrint,
    value: &'a dyn Any,
}

impl fmt::Display for Printed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print.fmt(self.value, f)
    }
}
