use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::mem;

use crate::info::Typed;
use crate::meta::{Meta, ReflectedMeta};
use crate::registry::{FromType, ReflectedType, RegistrationError, TypeDb, TypeTrait};
use crate::registry::{UpCast, UpCastFns};
use crate::structure::{ClassStructure, FieldInfo, FieldKey, MethodInfo, StructureWrapper};
use crate::structure::{MemberWrapper, PropertyWrapper, ValueWrapper};
use crate::value::{AnyCtor, AnyFn, IntoConstructor, IntoMethod};

struct PendingField {
    name: &'static str,
    value: Arc<dyn ValueWrapper>,
    meta: Option<ReflectedMeta>,
}

/// Builder describing the reflection of `T`.
///
/// Started with [`begin`](Self::begin) and committed into the
/// [`TypeDb`] by [`end`](Self::end). Nothing is visible in the database
/// before `end` succeeds; a registrator dropped without `end` commits
/// nothing.
///
/// # Examples
///
/// ```
/// use dv_reflect::prelude::*;
///
/// #[derive(Typed, Clone)]
/// struct Account {
///     owner: String,
///     cents: i64,
/// }
///
/// impl Account {
///     fn balance(&self) -> f64 {
///         self.cents as f64 / 100.0
///     }
///
///     fn set_balance(&mut self, value: f64) {
///         self.cents = (value * 100.0) as i64;
///     }
/// }
///
/// let mut db = TypeDb::new();
/// ReflectionRegistrator::<Account>::begin(&mut db)
///     .type_meta(m::DisplayName("Bank account"))
///     .field_read_only("owner", |a| &a.owner)
///     .field("cents", |a| &a.cents, |a| &mut a.cents)
///     .property("balance", Account::balance, Account::set_balance)
///     .meta(m::Range::new(0.0, 1e6, 0.01))
///     .end()
///     .unwrap();
///
/// let entry = db.get::<Account>().unwrap();
/// assert_eq!(entry.get_meta::<m::DisplayName>().unwrap().0, "Bank account");
/// ```
#[must_use = "the registration is only committed by `end()`"]
pub struct ReflectionRegistrator<'db, T: Typed> {
    db: &'db mut TypeDb,
    entry: ReflectedType,
    fields: Vec<PendingField>,
    type_meta: Option<ReflectedMeta>,
    methods: Vec<MethodInfo>,
    ctors: Vec<AnyCtor>,
    bases: Vec<Arc<dyn UpCast>>,
    structure: Option<Box<dyn StructureWrapper>>,
    duplicate: Option<&'static str>,
    ended: bool,
    _marker: PhantomData<fn(T)>,
}

impl<'db, T: Typed> ReflectionRegistrator<'db, T> {
    pub fn begin(db: &'db mut TypeDb) -> Self {
        Self {
            db,
            entry: ReflectedType::of::<T>(),
            fields: Vec::new(),
            type_meta: None,
            methods: Vec::new(),
            ctors: Vec::new(),
            bases: Vec::new(),
            structure: None,
            duplicate: None,
            ended: false,
            _marker: PhantomData,
        }
    }

    fn push_field(&mut self, name: &'static str, value: Arc<dyn ValueWrapper>) {
        if self.fields.iter().any(|field| field.name == name) {
            self.duplicate.get_or_insert(name);
            return;
        }
        self.fields.push(PendingField {
            name,
            value,
            meta: None,
        });
    }

    // -------------------------------------------------------------------------
    // Fields

    /// Declares a field stored in `T`.
    pub fn field<F>(mut self, name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: Typed + Clone + Send + Sync,
    {
        self.push_field(name, Arc::new(MemberWrapper::new(get, get_mut)));
        self
    }

    pub fn field_read_only<F>(mut self, name: &'static str, get: fn(&T) -> &F) -> Self
    where
        F: Typed + Clone + Send + Sync,
    {
        self.push_field(name, Arc::new(MemberWrapper::read_only(get)));
        self
    }

    /// Declares a computed field, read and written through accessors.
    pub fn property<F>(mut self, name: &'static str, get: fn(&T) -> F, set: fn(&mut T, F)) -> Self
    where
        F: Typed + Clone + Send + Sync,
    {
        self.push_field(name, Arc::new(PropertyWrapper::new(get, set)));
        self
    }

    pub fn property_read_only<F>(mut self, name: &'static str, get: fn(&T) -> F) -> Self
    where
        F: Typed + Clone + Send + Sync,
    {
        self.push_field(name, Arc::new(PropertyWrapper::read_only(get)));
        self
    }

    /// Replaces the declared fields with a custom enumeration.
    pub fn structure(mut self, structure: impl StructureWrapper + 'static) -> Self {
        self.structure = Some(Box::new(structure));
        self
    }

    // -------------------------------------------------------------------------
    // Meta

    /// Attaches meta to the last declared field, or to the type if no field
    /// was declared yet.
    pub fn meta<M: Meta>(mut self, meta: M) -> Self {
        let target = match self.fields.last_mut() {
            Some(field) => &mut field.meta,
            None => &mut self.type_meta,
        };
        target.get_or_insert_with(ReflectedMeta::new).insert(meta);
        self
    }

    /// Attaches meta to the type.
    pub fn type_meta<M: Meta>(mut self, meta: M) -> Self {
        self.type_meta
            .get_or_insert_with(ReflectedMeta::new)
            .insert(meta);
        self
    }

    // -------------------------------------------------------------------------
    // Relations, methods and constructors

    /// Declares `B` as base type of `T`.
    pub fn base<B: Typed>(mut self, up: fn(&T) -> &B, up_mut: fn(&mut T) -> &mut B) -> Self {
        self.bases.push(Arc::new(UpCastFns::new(up, up_mut)));
        self
    }

    pub fn constructor<Marker>(mut self, func: impl IntoConstructor<T, Marker>) -> Self {
        self.ctors.push(AnyCtor::new(func));
        self
    }

    pub fn default_constructor(self) -> Self
    where
        T: Default + Send + Sync,
    {
        self.constructor(T::default)
    }

    /// Declares a method taking `&T` or `&mut T`.
    pub fn method<Marker>(mut self, name: &'static str, func: impl IntoMethod<T, Marker>) -> Self {
        self.methods.push(MethodInfo::new(name, AnyFn::new(func)));
        self
    }

    // -------------------------------------------------------------------------
    // Type traits

    pub fn type_trait<D: TypeTrait + FromType<T>>(mut self) -> Self {
        self.entry.insert_type_trait(D::from_type());
        self
    }

    pub fn insert_type_trait<D: TypeTrait>(mut self, data: D) -> Self {
        self.entry.insert_type_trait(data);
        self
    }

    pub fn permanent_name(mut self, name: impl Into<String>) -> Self {
        self.entry.set_permanent_name(Some(name.into()));
        self
    }

    // -------------------------------------------------------------------------
    // Commit

    /// Commits the registration.
    ///
    /// Fails without committing anything on a duplicated field name, when
    /// `T` was already registered, when the permanent name is taken, or
    /// when a base already derives from `T`.
    pub fn end(mut self) -> Result<(), RegistrationError> {
        self.ended = true;

        if let Some(field) = self.duplicate {
            log::warn!("field `{field}` of `{}` is declared twice", T::type_path());
            return Err(RegistrationError::DuplicateField {
                ty: T::type_path(),
                field: String::from(field),
            });
        }

        let ty = T::ty();
        let fields: Vec<FieldInfo> = mem::take(&mut self.fields)
            .into_iter()
            .map(|field| FieldInfo::new(FieldKey::Name(field.name), ty, field.value, field.meta.map(Arc::new)))
            .collect();
        let structure = match self.structure.take() {
            Some(structure) => Some(structure),
            None if !fields.is_empty() => {
                Some(Box::new(ClassStructure::new(fields)) as Box<dyn StructureWrapper>)
            }
            None => None,
        };

        let mut entry = mem::replace(&mut self.entry, ReflectedType::new(ty));
        entry.complete(
            structure,
            self.type_meta.take(),
            mem::take(&mut self.methods),
            mem::take(&mut self.ctors),
        );
        self.db.commit(entry, mem::take(&mut self.bases))
    }
}

impl<T: Typed> Drop for ReflectionRegistrator<'_, T> {
    fn drop(&mut self) {
        if !self.ended {
            log::warn!(
                "registration of `{}` dropped without `end()`, nothing was committed",
                T::type_path()
            );
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::ReflectionRegistrator;
    use crate::derive::Typed;
    use crate::info::Type;
    use crate::meta::m;
    use crate::registry::{RegistrationError, TypeDb, TypeTraitValue};
    use crate::value::Any;

    #[derive(Typed, Clone, Default)]
    struct Shape {
        sides: u32,
    }

    #[derive(Typed, Clone, Default)]
    struct Square {
        shape: Shape,
        size: f32,
    }

    #[derive(Typed)]
    struct Left {
        right: Box<Right>,
    }

    #[derive(Typed)]
    struct Right {
        left: Box<Left>,
    }

    fn register_shape(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Shape>::begin(db)
            .field("sides", |s| &s.sides, |s| &mut s.sides)
            .end()
    }

    #[test]
    fn duplicate_field_commits_nothing() {
        let mut db = TypeDb::empty();
        let result = ReflectionRegistrator::<Shape>::begin(&mut db)
            .field("sides", |s| &s.sides, |s| &mut s.sides)
            .field_read_only("sides", |s| &s.sides)
            .end();

        assert_eq!(
            result,
            Err(RegistrationError::DuplicateField {
                ty: Type::of::<Shape>().path(),
                field: String::from("sides"),
            })
        );
        assert!(db.get::<Shape>().is_none());
    }

    #[test]
    fn cyclic_base_commits_nothing() {
        let mut db = TypeDb::empty();
        let result = ReflectionRegistrator::<Shape>::begin(&mut db)
            .base(|s| s, |s| s)
            .field("sides", |s| &s.sides, |s| &mut s.sides)
            .end();

        let shape = Type::of::<Shape>().path();
        assert_eq!(
            result,
            Err(RegistrationError::CyclicBase {
                ty: shape,
                base: shape,
            })
        );
        assert!(db.get::<Shape>().is_none());
        assert!(db.base_types(Type::of::<Shape>()).is_empty());

        ReflectionRegistrator::<Left>::begin(&mut db)
            .base(|l| &*l.right, |l| &mut *l.right)
            .end()
            .unwrap();
        let result = ReflectionRegistrator::<Right>::begin(&mut db)
            .base(|r| &*r.left, |r| &mut *r.left)
            .end();

        assert!(matches!(result, Err(RegistrationError::CyclicBase { .. })));
        assert!(db.get::<Right>().is_none());
        assert!(db.base_types(Type::of::<Right>()).is_empty());
        assert!(db.cast_path(Type::of::<Left>(), Type::of::<Right>()).is_some());
    }

    #[test]
    fn second_registration_is_rejected() {
        let mut db = TypeDb::empty();
        register_shape(&mut db).unwrap();

        let result = ReflectionRegistrator::<Shape>::begin(&mut db)
            .field("a", |s| &s.sides, |s| &mut s.sides)
            .field("b", |s| &s.sides, |s| &mut s.sides)
            .end();
        assert!(matches!(result, Err(RegistrationError::AlreadyRegistered(_))));

        let entry = db.get::<Shape>().unwrap();
        let object = Shape::default();
        assert_eq!(entry.structure().unwrap().fields(&object).len(), 1);
    }

    #[test]
    fn dropped_registrator_commits_nothing() {
        let mut db = TypeDb::empty();
        let _ = ReflectionRegistrator::<Shape>::begin(&mut db).field("sides", |s| &s.sides, |s| &mut s.sides);
        assert!(db.get::<Shape>().is_none());
    }

    #[test]
    fn meta_targets() {
        let mut db = TypeDb::empty();
        ReflectionRegistrator::<Square>::begin(&mut db)
            .meta(m::Tooltip("a square"))
            .field("size", |s| &s.size, |s| &mut s.size)
            .meta(m::ReadOnly)
            .end()
            .unwrap();

        let entry = db.get::<Square>().unwrap();
        assert!(entry.has_meta::<m::Tooltip>());
        assert!(!entry.has_meta::<m::ReadOnly>());

        let object = Square::default();
        let field = entry.structure().unwrap().field(&object, "size".into()).unwrap();
        assert!(field.is_read_only());
    }

    #[test]
    fn bases_and_constructors() {
        let mut db = TypeDb::empty();
        register_shape(&mut db).unwrap();
        ReflectionRegistrator::<Square>::begin(&mut db)
            .base(|s| &s.shape, |s| &mut s.shape)
            .default_constructor()
            .constructor(|size: f32| Square {
                shape: Shape { sides: 4 },
                size,
            })
            .type_trait::<TypeTraitValue>()
            .end()
            .unwrap();

        assert_eq!(db.derived_types(Type::of::<Shape>()), &[Type::of::<Square>()]);

        let entry = db.get::<Square>().unwrap();
        assert!(entry.has_type_trait::<TypeTraitValue>());
        let object = entry.create_object(&[Any::new(2.0_f32)]).unwrap();
        assert_eq!(object.downcast_ref::<Square>().unwrap().shape.sides, 4);
        assert!(entry.create_object(&[]).is_some());
        assert!(entry.create_object(&[Any::new(2.0_f64)]).is_none());
    }

    #[test]
    fn bare_entry_is_completed() {
        let mut db = TypeDb::empty();
        db.register_type_trait::<Shape, TypeTraitValue>();
        db.set_permanent_name(Type::of::<Shape>(), "shape").unwrap();
        register_shape(&mut db).unwrap();

        let entry = db.get_by_permanent_name("shape").unwrap();
        assert!(entry.is_complete());
        assert!(entry.has_type_trait::<TypeTraitValue>());
    }
}
