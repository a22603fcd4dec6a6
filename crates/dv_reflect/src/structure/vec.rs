use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any as DynAny;
use core::marker::PhantomData;

use crate::info::Typed;
use crate::structure::{FieldInfo, FieldKey, IndexWrapper, StructureWrapper};

/// One indexed child per element of a `Vec<T>`.
pub struct VecStructure<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> VecStructure<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for VecStructure<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Typed + Clone + Send + Sync> VecStructure<T> {
    fn element(index: usize) -> FieldInfo {
        FieldInfo::new(
            FieldKey::Index(index),
            <Vec<T> as Typed>::ty(),
            Arc::new(IndexWrapper::<T>::new(index)),
            None,
        )
    }

    fn len(object: &dyn DynAny) -> usize {
        object.downcast_ref::<Vec<T>>().map_or(0, Vec::len)
    }
}

impl<T: Typed + Clone + Send + Sync> StructureWrapper for VecStructure<T> {
    fn fields(&self, object: &dyn DynAny) -> Vec<FieldInfo> {
        (0..Self::len(object)).map(Self::element).collect()
    }

    fn field(&self, object: &dyn DynAny, key: FieldKey<'_>) -> Option<FieldInfo> {
        let index = key.as_index()?;
        (index < Self::len(object)).then(|| Self::element(index))
    }

    fn has_fields(&self, object: &dyn DynAny) -> bool {
        Self::len(object) > 0
    }

    fn is_indexed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::VecStructure;
    use crate::structure::{FieldKey, StructureWrapper};

    #[test]
    fn one_child_per_element() {
        let structure = VecStructure::<u8>::new();
        let object = vec![4_u8, 5, 6];

        let keys: Vec<_> = structure.fields(&object).iter().map(|f| f.key()).collect();
        assert_eq!(keys, [FieldKey::Index(0), FieldKey::Index(1), FieldKey::Index(2)]);
        assert!(structure.field(&object, FieldKey::Index(3)).is_none());
        assert!(structure.field(&object, FieldKey::Name("0")).is_none());
        assert!(!structure.has_fields(&Vec::<u8>::new()));
    }
}
