use core::fmt;

/// Identifies a child of a reflected object.
///
/// Class fields are named, container elements are indexed. Registered keys
/// are `FieldKey<'static>`; lookups may borrow shorter strings.
///
/// # Examples
///
/// ```
/// use dv_reflect::structure::FieldKey;
///
/// assert_eq!(FieldKey::from("value"), FieldKey::Name("value"));
/// assert_eq!(FieldKey::from(2_usize).to_string(), "[2]");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey<'k> {
    Name(&'k str),
    Index(usize),
}

impl<'k> FieldKey<'k> {
    /// The name, for named keys.
    #[inline]
    pub fn as_name(&self) -> Option<&'k str> {
        match *self {
            FieldKey::Name(name) => Some(name),
            FieldKey::Index(_) => None,
        }
    }

    /// The index, for indexed keys.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match *self {
            FieldKey::Name(_) => None,
            FieldKey::Index(index) => Some(index),
        }
    }
}

impl<'k> From<&'k str> for FieldKey<'k> {
    #[inline]
    fn from(name: &'k str) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey<'_> {
    #[inline]
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

impl<'k> From<&FieldKey<'k>> for FieldKey<'k> {
    #[inline]
    fn from(key: &FieldKey<'k>) -> Self {
        *key
    }
}

impl fmt::Display for FieldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => f.write_str(name),
            FieldKey::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl fmt::Debug for FieldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "{name:?}"),
            FieldKey::Index(index) => write!(f, "[{index}]"),
        }
    }
}
