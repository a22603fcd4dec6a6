use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::ops::Deref;

use dv_utils::TypeIdMap;

use crate::info::{Type, Typed};
use crate::meta::{Meta, ReflectedMeta};
use crate::registry::TypeTrait;
use crate::structure::{MethodInfo, StructureWrapper};
use crate::value::{Any, AnyCtor, BoxedObject};

/// Everything a [`TypeDb`](crate::TypeDb) knows about one type.
///
/// Created by [`ReflectionRegistrator`](crate::ReflectionRegistrator) (a
/// full registration) or [`TypeDb::register_type`](crate::TypeDb::register_type)
/// (a bare entry, without structure). Immutable once committed, except for
/// type traits and the permanent name.
pub struct ReflectedType {
    ty: &'static Type,
    permanent_name: Option<String>,
    structure: Option<Box<dyn StructureWrapper>>,
    meta: Option<Arc<ReflectedMeta>>,
    traits: TypeIdMap<Box<dyn TypeTrait>>,
    methods: Vec<MethodInfo>,
    ctors: Vec<AnyCtor>,
    complete: bool,
}

impl ReflectedType {
    /// A bare entry for `T`.
    pub fn of<T: Typed + ?Sized>() -> Self {
        Self::new(T::ty())
    }

    pub fn new(ty: &'static Type) -> Self {
        Self {
            ty,
            permanent_name: None,
            structure: None,
            meta: None,
            traits: TypeIdMap::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            complete: false,
        }
    }

    #[inline]
    pub fn ty(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    /// Name stable across builds, used by serialization formats.
    #[inline]
    pub fn permanent_name(&self) -> Option<&str> {
        self.permanent_name.as_deref()
    }

    #[inline]
    pub fn structure(&self) -> Option<&dyn StructureWrapper> {
        self.structure.as_deref()
    }

    /// `true` once a full registration was committed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    // -------------------------------------------------------------------------
    // Meta

    #[inline]
    pub fn meta(&self) -> Option<&ReflectedMeta> {
        self.meta.as_deref()
    }

    pub fn get_meta<M: Meta>(&self) -> Option<&M> {
        self.meta.as_ref()?.get::<M>()
    }

    pub fn has_meta<M: Meta>(&self) -> bool {
        self.meta.as_ref().is_some_and(|meta| meta.contains::<M>())
    }

    // -------------------------------------------------------------------------
    // Type traits

    /// Inserts a type trait, replacing one of the same type.
    pub fn insert_type_trait<D: TypeTrait>(&mut self, data: D) {
        self.traits.insert(TypeId::of::<D>(), Box::new(data));
    }

    pub fn get_type_trait<D: TypeTrait>(&self) -> Option<&D> {
        self.traits
            .get(&TypeId::of::<D>())
            .and_then(|data| <dyn TypeTrait>::downcast_ref(data.deref()))
    }

    pub fn get_type_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.traits.get(&type_id).map(Deref::deref)
    }

    #[inline]
    pub fn has_type_trait<D: TypeTrait>(&self) -> bool {
        self.traits.contains_type::<D>()
    }

    #[inline]
    pub fn type_trait_count(&self) -> usize {
        self.traits.len()
    }

    // -------------------------------------------------------------------------
    // Methods and constructors

    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name() == name)
    }

    #[inline]
    pub fn constructors(&self) -> &[AnyCtor] {
        &self.ctors
    }

    /// Creates an object with the first constructor accepting `args`.
    ///
    /// `None` if no constructor has this signature.
    pub fn create_object(&self, args: &[Any]) -> Option<BoxedObject> {
        let ctor = self.ctors.iter().find(|ctor| ctor.accepts(args))?;
        ctor.create(args).ok()
    }

    // -------------------------------------------------------------------------
    // Building

    pub(crate) fn set_permanent_name(&mut self, name: Option<String>) {
        self.permanent_name = name;
    }

    pub(crate) fn complete(
        &mut self,
        structure: Option<Box<dyn StructureWrapper>>,
        meta: Option<ReflectedMeta>,
        methods: Vec<MethodInfo>,
        ctors: Vec<AnyCtor>,
    ) {
        self.structure = structure;
        self.meta = meta.map(Arc::new);
        self.methods = methods;
        self.ctors = ctors;
        self.complete = true;
    }

    /// Moves the type traits of `other` in, keeping the ones of `self` on
    /// collision.
    pub(crate) fn absorb_traits(&mut self, other: ReflectedType) {
        for (id, data) in other.traits {
            if !self.traits.contains(&id) {
                self.traits.insert(id, data);
            }
        }
    }
}

impl fmt::Debug for ReflectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectedType")
            .field("ty", &self.ty)
            .field("permanent_name", &self.permanent_name)
            .field("has_structure", &self.structure.is_some())
            .field("meta", &self.meta)
            .field("traits", &self.traits.len())
            .field("methods", &self.methods)
            .field("ctors", &self.ctors)
            .field("complete", &self.complete)
            .finish()
    }
}
