use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dv_utils::TypeIdMap;
use dv_utils::hash::{HashMap, HashSet};

use crate::info::{Type, Typed};
use crate::registry::inheritance::InheritanceMap;
use crate::registry::{FromType, Reflected, ReflectedType, RegistrationError, TypeTrait, UpCast};
use crate::value::ConversionTable;

// -----------------------------------------------------------------------------
// TypeDb

/// The registry of reflected types.
///
/// Holds one [`ReflectedType`] per registered type, the inheritance graph
/// between them and the [`ConversionTable`] used by [`Any::cast`].
///
/// Registration needs `&mut TypeDb`; once filled the database is shared
/// through `&TypeDb` or [`TypeDbArc`].
///
/// # Examples
///
/// ```
/// use dv_reflect::TypeDb;
/// use dv_reflect::derive::Reflected;
///
/// #[derive(Reflected, Clone)]
/// struct Point {
///     x: f32,
///     y: f32,
/// }
///
/// let mut db = TypeDb::new();
/// db.register::<Point>().unwrap();
///
/// let entry = db.get::<Point>().unwrap();
/// assert!(entry.is_complete());
/// assert!(db.get_by_type_name("Point").is_some());
/// assert!(db.get::<f32>().is_some());
/// ```
///
/// [`Any::cast`]: crate::Any::cast
pub struct TypeDb {
    types: TypeIdMap<ReflectedType>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    permanent_names: HashMap<String, TypeId>,
    inheritance: InheritanceMap,
    conversions: ConversionTable,
}

impl Default for TypeDb {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDb {
    /// A database without any type or conversion.
    pub fn empty() -> Self {
        Self {
            types: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            permanent_names: HashMap::default(),
            inheritance: InheritanceMap::new(),
            conversions: ConversionTable::new(),
        }
    }

    /// A database with the primitives, `String` and `&'static str`, and
    /// the lossless numeric conversions.
    pub fn new() -> Self {
        let mut db = Self::empty();
        db.conversions.insert_builtin();
        crate::impls::register_builtin(&mut db);
        db
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers `T` and the types its registration depends on.
    ///
    /// Registering an already complete type is a no-op.
    pub fn register<T: Reflected + ?Sized>(&mut self) -> Result<(), RegistrationError> {
        if self.get::<T>().is_some_and(ReflectedType::is_complete) {
            return Ok(());
        }
        T::register_reflection(self)
    }

    /// Adds a bare entry for `T`: no structure, no methods, no constructors.
    ///
    /// Returns `false` if `T` already has an entry. A later full
    /// registration of `T` keeps the type traits of the bare entry.
    pub fn register_type<T: Typed + ?Sized>(&mut self) -> bool {
        let ty = T::ty();
        if self.types.contains(&ty.id()) {
            return false;
        }
        self.index(ty);
        self.types.insert(ty.id(), ReflectedType::new(ty));
        true
    }

    /// Adds the type trait `D` to `T`, creating a bare entry if needed.
    pub fn register_type_trait<T: Typed + ?Sized, D: TypeTrait + FromType<T>>(&mut self) {
        self.entry(T::ty()).insert_type_trait(D::from_type());
    }

    /// Registers a conversion from `F` to `T` for [`Any::cast`](crate::Any::cast).
    pub fn register_conversion<F: Typed, T: Typed + Clone + Send + Sync>(
        &mut self,
        func: fn(&F) -> T,
    ) {
        self.conversions.insert(func);
    }

    /// Registers all types marked with `auto_register`.
    ///
    /// Returns `false` if the platform does not support static
    /// registration or the `auto_register` feature is disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        crate::cfg::auto_register! {
            if {
                use crate::__macro_exports::auto_register;
                if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                    return true;
                }
                auto_register::__register_types(self);
                self.contains(TypeId::of::<auto_register::__AvailFlag>())
            } else {
                false
            }
        }
    }

    /// Sets the stable name of `ty`, creating a bare entry if needed.
    pub fn set_permanent_name(
        &mut self,
        ty: &'static Type,
        name: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        self.check_permanent_name(&name, ty)?;
        self.claim_permanent_name(name, ty);
        Ok(())
    }

    pub(crate) fn commit(
        &mut self,
        mut entry: ReflectedType,
        bases: Vec<Arc<dyn UpCast>>,
    ) -> Result<(), RegistrationError> {
        let ty = entry.ty();

        if self.get_by_id(ty.id()).is_some_and(ReflectedType::is_complete) {
            log::warn!(
                "`{}` is already registered, the new registration is ignored",
                ty.path()
            );
            return Err(RegistrationError::AlreadyRegistered(ty.path()));
        }
        if let Some(edge) = bases
            .iter()
            .find(|edge| self.inheritance.path(edge.base(), ty).is_some())
        {
            let base = edge.base();
            log::warn!(
                "`{}` cannot be a base of `{}`, the inheritance would be cyclic",
                base.path(),
                ty.path()
            );
            return Err(RegistrationError::CyclicBase {
                ty: ty.path(),
                base: base.path(),
            });
        }
        let name = entry.permanent_name().map(String::from);
        if let Some(name) = &name {
            self.check_permanent_name(name, ty)?;
        }

        match self.types.remove(&ty.id()) {
            Some(bare) => {
                if name.is_none() {
                    entry.set_permanent_name(bare.permanent_name().map(String::from));
                }
                entry.absorb_traits(bare);
            }
            None => self.index(ty),
        }
        self.types.insert(ty.id(), entry);
        if let Some(name) = name {
            self.claim_permanent_name(name, ty);
        }
        for edge in bases {
            self.inheritance.insert(edge);
        }

        log::debug!("registered `{}`", ty.path());
        Ok(())
    }

    fn entry(&mut self, ty: &'static Type) -> &mut ReflectedType {
        if !self.types.contains(&ty.id()) {
            self.index(ty);
        }
        self.types
            .get_or_insert(ty.id(), || ReflectedType::new(ty))
    }

    fn index(&mut self, ty: &'static Type) {
        let name = ty.name();
        if !self.ambiguous_names.contains(name) {
            if self.type_name_to_id.remove(name).is_some() {
                self.ambiguous_names.insert(name);
            } else {
                self.type_name_to_id.insert(name, ty.id());
            }
        }
        self.type_path_to_id.insert(ty.path(), ty.id());
    }

    fn check_permanent_name(&self, name: &str, ty: &Type) -> Result<(), RegistrationError> {
        match self.permanent_names.get(name) {
            Some(id) if *id != ty.id() => {
                let used_by = self.get_by_id(*id).map_or("<unknown>", |e| e.ty().path());
                log::warn!("permanent name `{name}` of `{}` is used by `{used_by}`", ty.path());
                Err(RegistrationError::DuplicatePermanentName {
                    name: String::from(name),
                    used_by,
                })
            }
            _ => Ok(()),
        }
    }

    fn claim_permanent_name(&mut self, name: String, ty: &'static Type) {
        let entry = self.entry(ty);
        let old = entry.permanent_name().map(String::from);
        entry.set_permanent_name(Some(name.clone()));
        if let Some(old) = old
            && old != name
        {
            self.permanent_names.remove(&old);
        }
        self.permanent_names.insert(name, ty.id());
    }

    // -------------------------------------------------------------------------
    // Lookup

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    #[inline]
    pub fn get<T: ?Sized + 'static>(&self) -> Option<&ReflectedType> {
        self.types.get_type::<T>()
    }

    #[inline]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<&ReflectedType> {
        self.types.get(&type_id)
    }

    #[inline]
    pub fn get_by_type(&self, ty: &Type) -> Option<&ReflectedType> {
        self.get_by_id(ty.id())
    }

    pub fn get_by_type_path(&self, type_path: &str) -> Option<&ReflectedType> {
        self.get_by_id(*self.type_path_to_id.get(type_path)?)
    }

    /// Looks up a type by its short name.
    ///
    /// `None` for names shared by several registered types, see
    /// [`is_ambiguous`](Self::is_ambiguous).
    pub fn get_by_type_name(&self, type_name: &str) -> Option<&ReflectedType> {
        self.get_by_id(*self.type_name_to_id.get(type_name)?)
    }

    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_by_permanent_name(&self, name: &str) -> Option<&ReflectedType> {
        self.get_by_id(*self.permanent_names.get(name)?)
    }

    pub fn get_type_trait<D: TypeTrait>(&self, type_id: TypeId) -> Option<&D> {
        self.get_by_id(type_id)?.get_type_trait::<D>()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ReflectedType> {
        self.types.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    #[inline]
    pub fn conversions_mut(&mut self) -> &mut ConversionTable {
        &mut self.conversions
    }

    // -------------------------------------------------------------------------
    // Inheritance

    /// Direct bases of `ty`, in registration order.
    #[inline]
    pub fn base_types(&self, ty: &Type) -> &[Arc<dyn UpCast>] {
        self.inheritance.bases(ty)
    }

    /// Types having `ty` as direct base.
    #[inline]
    pub fn derived_types(&self, ty: &Type) -> &[&'static Type] {
        self.inheritance.derived(ty)
    }

    /// Up-cast edges leading from `from` to `to`.
    ///
    /// Empty for `from == to`, `None` if `to` is not a base of `from`.
    #[inline]
    pub fn cast_path(&self, from: &Type, to: &Type) -> Option<Vec<Arc<dyn UpCast>>> {
        self.inheritance.path(from, to)
    }

    /// Borrows the `to` part of an object of type `from`.
    pub fn upcast<'o>(&self, object: &'o dyn Any, from: &Type, to: &Type) -> Option<&'o dyn Any> {
        let path = self.cast_path(from, to)?;
        path.iter().try_fold(object, |object, edge| edge.up(object))
    }

    pub fn upcast_mut<'o>(
        &self,
        object: &'o mut dyn Any,
        from: &Type,
        to: &Type,
    ) -> Option<&'o mut dyn Any> {
        let path = self.cast_path(from, to)?;
        path.iter().try_fold(object, |object, edge| edge.up_mut(object))
    }
}

impl fmt::Debug for TypeDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDb")
            .field("types", &self.types.len())
            .field("conversions", &self.conversions)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeDbArc

/// A shared [`TypeDb`].
///
/// Lock poisoning is ignored: registration never leaves the database half
/// updated.
#[derive(Clone, Default)]
pub struct TypeDbArc {
    pub internal: Arc<RwLock<TypeDb>>,
}

impl TypeDbArc {
    pub fn new(db: TypeDb) -> Self {
        Self {
            internal: Arc::new(RwLock::new(db)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TypeDb> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TypeDb> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeDbArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().type_path_to_id.keys().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::TypeId;

    use super::{TypeDb, TypeDbArc};
    use crate::derive::Typed;
    use crate::info::Type;
    use crate::registry::{RegistrationError, TypeTraitPrint};

    mod one {
        #[derive(crate::derive::Typed)]
        pub struct Same;
    }

    mod two {
        #[derive(crate::derive::Typed)]
        pub struct Same;
    }

    #[derive(Typed)]
    struct Bare;

    #[test]
    fn builtins() {
        let db = TypeDb::new();
        for ty in [Type::of::<bool>(), Type::of::<i32>(), Type::of::<String>(), Type::of::<&'static str>()] {
            let entry = db.get_by_type(ty).unwrap();
            assert!(entry.has_type_trait::<TypeTraitPrint>(), "{}", ty.path());
        }
        assert!(TypeDb::empty().is_empty());
        assert!(db.conversions().contains(Type::of::<u8>(), Type::of::<u32>()));
    }

    #[test]
    fn ambiguous_names() {
        let mut db = TypeDb::empty();
        assert!(db.register_type::<one::Same>());
        assert!(db.get_by_type_name("Same").is_some());
        assert!(db.register_type::<two::Same>());
        assert!(!db.register_type::<two::Same>());

        assert!(db.get_by_type_name("Same").is_none());
        assert!(db.is_ambiguous("Same"));
        assert!(db.get_by_type_path(Type::of::<two::Same>().path()).is_some());
    }

    #[test]
    fn permanent_names() {
        let mut db = TypeDb::empty();
        db.set_permanent_name(Type::of::<Bare>(), "bare").unwrap();
        assert_eq!(db.get_by_permanent_name("bare").unwrap().ty(), Type::of::<Bare>());

        assert!(matches!(
            db.set_permanent_name(Type::of::<u8>(), "bare"),
            Err(RegistrationError::DuplicatePermanentName { .. })
        ));
        assert!(!db.contains(TypeId::of::<u8>()));

        db.set_permanent_name(Type::of::<Bare>(), "bare2").unwrap();
        assert!(db.get_by_permanent_name("bare").is_none());
        assert_eq!(db.get::<Bare>().unwrap().permanent_name(), Some("bare2"));
    }

    #[test]
    fn type_trait_creates_entry() {
        let mut db = TypeDb::empty();
        db.register_type_trait::<u8, TypeTraitPrint>();
        let entry = db.get::<u8>().unwrap();
        assert!(!entry.is_complete());
        assert_eq!(db.get_type_trait::<TypeTraitPrint>(TypeId::of::<u8>()).unwrap().print(&3_u8).unwrap(), "3");
    }

    #[derive(crate::derive::Reflected, Clone)]
    #[reflect(auto_register)]
    struct Marker {
        level: u8,
    }

    crate::derive::impl_auto_register!(Vec<Marker>);

    #[test]
    fn auto_register() {
        let mut db = TypeDb::empty();
        if !db.auto_register() {
            return;
        }
        assert!(db.get::<Marker>().unwrap().is_complete());
        assert!(db.get::<u8>().unwrap().is_complete());
        assert!(db.get::<Vec<Marker>>().is_some());
        assert!(db.auto_register());
    }

    #[test]
    fn shared() {
        let db = TypeDbArc::new(TypeDb::empty());
        db.write().register_type::<Bare>();
        assert!(db.clone().read().get::<Bare>().is_some());
    }
}
