use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use dv_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// Meta

/// A value that can be stored in a [`ReflectedMeta`].
///
/// Implemented for every `'static + Send + Sync + Debug` type.
pub trait Meta: Any + Send + Sync + fmt::Debug {}

impl<T: Any + Send + Sync + fmt::Debug> Meta for T {}

// -----------------------------------------------------------------------------
// ReflectedMeta

/// A set of meta values keyed by their type.
#[derive(Default)]
pub struct ReflectedMeta {
    items: TypeIdMap<Box<dyn Meta>>,
}

impl ReflectedMeta {
    #[inline]
    pub const fn new() -> Self {
        Self {
            items: TypeIdMap::new(),
        }
    }

    /// Adds `meta` and returns `self`.
    #[inline]
    pub fn with<M: Meta>(mut self, meta: M) -> Self {
        self.insert(meta);
        self
    }

    /// Inserts `meta`, returning `true` if a value of the same type was replaced.
    pub fn insert<M: Meta>(&mut self, meta: M) -> bool {
        self.insert_boxed(Box::new(meta))
    }

    /// Inserts an already boxed meta value.
    pub fn insert_boxed(&mut self, meta: Box<dyn Meta>) -> bool {
        let type_id = (*meta).type_id();
        self.items.insert(type_id, meta).is_some()
    }

    /// Returns the value of type `M`.
    pub fn get<M: Meta>(&self) -> Option<&M> {
        let meta: &dyn Any = &**self.items.get_type::<M>()?;
        meta.downcast_ref::<M>()
    }

    /// Returns the value stored under `type_id`.
    pub fn get_by_id(&self, type_id: TypeId) -> Option<&dyn Meta> {
        self.items.get(&type_id).map(|meta| &**meta)
    }

    #[inline]
    pub fn contains<M: Meta>(&self) -> bool {
        self.items.contains_type::<M>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the stored values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Meta> {
        self.items.values().map(|meta| &**meta)
    }
}

impl fmt::Debug for ReflectedMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::ReflectedMeta;
    use crate::meta::m;

    #[test]
    fn last_insert_wins() {
        let mut meta = ReflectedMeta::new();
        assert!(!meta.insert(m::Tooltip("first")));
        assert!(meta.insert(m::Tooltip("second")));

        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get::<m::Tooltip>(), Some(&m::Tooltip("second")));
    }

    #[test]
    fn lookups_by_type() {
        let meta = ReflectedMeta::new().with(m::ReadOnly).with(m::Group("Transform"));

        assert!(meta.contains::<m::ReadOnly>());
        assert!(meta.get_by_id(core::any::TypeId::of::<m::Group>()).is_some());
        assert_eq!(meta.get::<m::Hidden>(), None);
        assert!(format!("{meta:?}").contains("Transform"));
    }
}
