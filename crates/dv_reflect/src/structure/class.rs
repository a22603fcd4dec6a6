use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any as DynAny;
use core::fmt;

use crate::info::Type;
use crate::meta::ReflectedMeta;
use crate::structure::{FieldKey, ValueWrapper};
use crate::value::AnyFn;

// -----------------------------------------------------------------------------
// FieldInfo

/// Descriptor of one field: key, owning type, value access and meta.
#[derive(Clone)]
pub struct FieldInfo {
    key: FieldKey<'static>,
    owner: &'static Type,
    value: Arc<dyn ValueWrapper>,
    meta: Option<Arc<ReflectedMeta>>,
}

impl FieldInfo {
    pub fn new(
        key: FieldKey<'static>,
        owner: &'static Type,
        value: Arc<dyn ValueWrapper>,
        meta: Option<Arc<ReflectedMeta>>,
    ) -> Self {
        Self {
            key,
            owner,
            value,
            meta,
        }
    }

    #[inline]
    pub fn key(&self) -> FieldKey<'static> {
        self.key
    }

    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.key.as_name()
    }

    /// The type declaring this field.
    #[inline]
    pub fn owner(&self) -> &'static Type {
        self.owner
    }

    #[inline]
    pub fn value_wrapper(&self) -> &Arc<dyn ValueWrapper> {
        &self.value
    }

    #[inline]
    pub fn value_type(&self) -> &'static Type {
        self.value.value_type()
    }

    #[inline]
    pub fn meta(&self) -> Option<&Arc<ReflectedMeta>> {
        self.meta.as_ref()
    }

    /// Checks the wrapper and the [`ReadOnly`](crate::meta::m::ReadOnly) meta.
    pub fn is_read_only(&self) -> bool {
        self.value.is_read_only()
            || self
                .meta
                .as_ref()
                .is_some_and(|meta| meta.contains::<crate::meta::m::ReadOnly>())
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("key", &self.key)
            .field("owner", &self.owner)
            .field("value_type", &self.value_type())
            .field("meta", &self.meta)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StructureWrapper

/// Enumerates the children of objects of one type.
///
/// Fields are usually fixed per type, but containers list one child per
/// element, so every query receives the object.
pub trait StructureWrapper: Send + Sync {
    /// Own fields, in declaration order.
    fn fields(&self, object: &dyn DynAny) -> Vec<FieldInfo>;

    fn field(&self, object: &dyn DynAny, key: FieldKey<'_>) -> Option<FieldInfo>;

    fn has_fields(&self, object: &dyn DynAny) -> bool;

    /// `true` if children are keyed by index.
    fn is_indexed(&self) -> bool {
        false
    }
}

/// Fixed, named fields of a class.
#[derive(Default)]
pub struct ClassStructure {
    fields: Vec<FieldInfo>,
}

impl ClassStructure {
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        Self { fields }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl StructureWrapper for ClassStructure {
    fn fields(&self, _: &dyn DynAny) -> Vec<FieldInfo> {
        self.fields.clone()
    }

    fn field(&self, _: &dyn DynAny, key: FieldKey<'_>) -> Option<FieldInfo> {
        let field = match key {
            FieldKey::Name(name) => self.fields.iter().find(|f| f.name() == Some(name)),
            FieldKey::Index(index) => self.fields.get(index),
        };
        field.cloned()
    }

    fn has_fields(&self, _: &dyn DynAny) -> bool {
        !self.fields.is_empty()
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A named method registered for a type.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    name: &'static str,
    func: Arc<AnyFn>,
}

impl MethodInfo {
    pub fn new(name: &'static str, func: AnyFn) -> Self {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn func(&self) -> &AnyFn {
        &self.func
    }
}
