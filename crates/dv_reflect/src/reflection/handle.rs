use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any as DynAny;
use core::fmt;

use crate::info::{Type, Typed};
use crate::meta::{Meta, ReflectedMeta};
use crate::reflection::ReflectionError;
use crate::reflection::object::ReflectedObject;
use crate::registry::{ReflectedType, TypeDb, TypeTraitValue};
use crate::structure::{FieldInfo, FieldKey, MethodInfo, SelfWrapper, ValueWrapper};
use crate::value::{Any, BoxedObject, Receiver};

// -----------------------------------------------------------------------------
// Reflection

#[derive(Clone)]
struct State<'a> {
    /// Object holding the value.
    owner: ReflectedObject<'a>,
    /// The value itself.
    value: ReflectedObject<'a>,
    wrapper: Arc<dyn ValueWrapper>,
    meta: Option<Arc<ReflectedMeta>>,
    read_only: bool,
}

/// A view of a value through the [`TypeDb`].
///
/// A view borrows the root object for `'a` and walks from it to the viewed
/// value on every operation. Child views come from [`get_field`] and
/// [`get_fields`] and share the root borrow.
///
/// Lookups that find nothing return an invalid view rather than an error,
/// see [`is_valid`].
///
/// # Examples
///
/// ```
/// use dv_reflect::{Any, Reflection, TypeDb};
/// use dv_reflect::derive::Reflected;
///
/// #[derive(Reflected, Clone)]
/// struct Health {
///     current: i32,
///     max: i32,
/// }
///
/// let mut db = TypeDb::new();
/// db.register::<Health>().unwrap();
///
/// let mut health = Health { current: 10, max: 20 };
/// let view = Reflection::create(&db, &mut health);
///
/// let current = view.get_field("current");
/// assert_eq!(current.get_value().get::<i32>(), Some(&10));
/// current.set_value(Any::new(15_i32)).unwrap();
///
/// // `i16` converts losslessly to `i32`.
/// view.get_field("max").set_value(Any::new(30_i16)).unwrap();
/// assert!(!view.get_field("missing").is_valid());
///
/// drop(view);
/// assert_eq!((health.current, health.max), (15, 30));
/// ```
///
/// [`get_field`]: Reflection::get_field
/// [`get_fields`]: Reflection::get_fields
/// [`is_valid`]: Reflection::is_valid
#[derive(Clone)]
pub struct Reflection<'a> {
    db: &'a TypeDb,
    state: Option<State<'a>>,
}

/// One child of a reflected object.
#[derive(Clone, Debug)]
pub struct Field<'a> {
    pub key: FieldKey<'static>,
    pub reflection: Reflection<'a>,
    /// The base type declaring the field, `None` for own fields.
    pub inherited_from: Option<&'static Type>,
}

impl<'a> Reflection<'a> {
    /// A view of `object` allowing modification.
    pub fn create<T: Typed>(db: &'a TypeDb, object: &'a mut T) -> Self {
        Self::from_root(db, ReflectedObject::new_mut(object, T::ty()), false)
    }

    /// A read-only view of `object`.
    pub fn create_const<T: Typed>(db: &'a TypeDb, object: &'a T) -> Self {
        Self::from_root(db, ReflectedObject::new_const(object, T::ty()), true)
    }

    /// A view of the object held by `boxed`.
    pub fn create_boxed(db: &'a TypeDb, boxed: &'a mut BoxedObject) -> Self {
        let ty = boxed.ty();
        Self::from_root(db, ReflectedObject::new_mut(boxed.as_dyn_mut(), ty), false)
    }

    /// A view referring to nothing.
    #[inline]
    pub fn invalid(db: &'a TypeDb) -> Self {
        Self { db, state: None }
    }

    fn from_root(db: &'a TypeDb, root: ReflectedObject<'a>, read_only: bool) -> Self {
        let ty = root.ty();
        if !db.contains(ty.id()) {
            crate::cfg::debug! {
                log::debug!("`{}` is not registered, the reflection is invalid", ty.path());
            }
            return Self::invalid(db);
        }
        Self::with_self(db, root, None, read_only)
    }

    fn with_self(
        db: &'a TypeDb,
        object: ReflectedObject<'a>,
        meta: Option<Arc<ReflectedMeta>>,
        read_only: bool,
    ) -> Self {
        let ty = object.ty();
        let ops = db.get_type_trait::<TypeTraitValue>(ty.id()).copied();
        Self {
            db,
            state: Some(State {
                owner: object.clone(),
                value: object,
                wrapper: Arc::new(SelfWrapper::new(ty, ops, read_only)),
                meta,
                read_only,
            }),
        }
    }

    fn child(&self, object: &ReflectedObject<'a>, info: &FieldInfo, read_only: bool) -> Self {
        let wrapper = info.value_wrapper().clone();
        Self {
            db: self.db,
            state: Some(State {
                owner: object.clone(),
                value: object.member(wrapper.clone()),
                wrapper,
                meta: info.meta().cloned(),
                read_only: read_only || info.is_read_only(),
            }),
        }
    }

    /// The object whose children are this view's children.
    fn inner(&self) -> Option<(ReflectedObject<'a>, bool)> {
        let state = self.state.as_ref()?;
        Some((state.value.pointee(), state.read_only))
    }

    // -------------------------------------------------------------------------
    // Properties

    #[inline]
    pub fn db(&self) -> &'a TypeDb {
        self.db
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.state.is_some()
    }

    /// `true` for const roots, read-only fields and everything below them.
    /// Invalid views are read-only.
    pub fn is_read_only(&self) -> bool {
        self.state.as_ref().is_none_or(|state| state.read_only)
    }

    /// Type of the viewed value.
    pub fn value_type(&self) -> Option<&'static Type> {
        Some(self.state.as_ref()?.wrapper.value_type())
    }

    /// Type of the object holding the value; the value itself for roots.
    pub fn object_type(&self) -> Option<&'static Type> {
        Some(self.state.as_ref()?.owner.ty())
    }

    /// The registration of the value type, or of its pointee for pointers.
    pub fn reflected_type(&self) -> Option<&'a ReflectedType> {
        let ty = self.value_type()?;
        self.db
            .get_by_type(ty)
            .or_else(|| self.db.get_by_type(ty.pointee()))
    }

    /// Looks up meta on the field first, then on the value type.
    pub fn meta<M: Meta>(&self) -> Option<&M> {
        let state = self.state.as_ref()?;
        state
            .meta
            .as_deref()
            .and_then(ReflectedMeta::get::<M>)
            .or_else(|| self.reflected_type()?.get_meta::<M>())
    }

    #[inline]
    pub fn has_meta<M: Meta>(&self) -> bool {
        self.meta::<M>().is_some()
    }

    // -------------------------------------------------------------------------
    // Values

    /// A copy of the value, empty for invalid views and values that cannot
    /// be copied.
    pub fn get_value(&self) -> Any {
        let Some(state) = &self.state else {
            return Any::default();
        };
        state
            .owner
            .with(|object| state.wrapper.get_value(object))
            .flatten()
            .unwrap_or_default()
    }

    /// Replaces the value.
    ///
    /// `value` must hold the value type, or a type with a registered
    /// conversion to it.
    pub fn set_value(&self, value: Any) -> Result<(), ReflectionError> {
        let state = self.state.as_ref().ok_or(ReflectionError::Invalid)?;
        if state.read_only {
            return Err(ReflectionError::ReadOnly);
        }

        let expected = state.wrapper.value_type();
        let value = match value.ty() {
            Some(found) if found != expected => value.convert_to(expected, self.db).map_err(|_| {
                ReflectionError::TypeMismatch {
                    expected: expected.path(),
                    found: found.path(),
                }
            })?,
            _ => value,
        };

        state
            .owner
            .with_mut(|object| state.wrapper.set_value(object, value))
            .unwrap_or(Err(ReflectionError::Unavailable))
    }

    /// Borrows the value as a `T`.
    pub fn with_value<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.state.as_ref()?;
        state
            .value
            .with(|object| object.downcast_ref::<T>().map(f))
            .flatten()
    }

    /// Mutably borrows the value as a `T`, `None` for read-only views.
    pub fn with_value_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let state = self.state.as_ref().filter(|state| !state.read_only)?;
        state
            .value
            .with_mut(|object| object.downcast_mut::<T>().map(f))
            .flatten()
    }

    /// Runs `f` on the value, in place when it is stored, on a copy when
    /// it is computed.
    pub(crate) fn visit_value<R>(&self, f: impl FnOnce(&dyn DynAny) -> R) -> Option<R> {
        let state = self.state.as_ref()?;
        let stored = state
            .owner
            .with(|object| state.wrapper.member(object).is_some())
            .unwrap_or(false);
        if stored {
            state.value.with(f)
        } else {
            self.get_value().as_dyn().map(f)
        }
    }

    /// Runs `f` on the stored value, `None` for computed values.
    pub(crate) fn with_stored<R>(&self, f: impl FnOnce(&dyn DynAny) -> R) -> Option<R> {
        self.state.as_ref()?.value.with(f)
    }

    // -------------------------------------------------------------------------
    // Fields

    /// Finds a child by name or index, searching base types after the
    /// object's own fields.
    ///
    /// Indices address container elements. For classes `get_field(i)` is
    /// the `i`-th entry of [`get_fields`](Self::get_fields).
    pub fn get_field<'k>(&self, key: impl Into<FieldKey<'k>>) -> Reflection<'a> {
        let key = key.into();
        let found = self
            .inner()
            .and_then(|(object, read_only)| self.find_field(&object, key, read_only));
        match found {
            Some(field) => field,
            None => {
                crate::cfg::debug! {
                    log::debug!(
                        "no field `{key}` in `{}`",
                        self.value_type().map_or("<invalid>", Type::path)
                    );
                }
                Self::invalid(self.db)
            }
        }
    }

    fn find_field(
        &self,
        object: &ReflectedObject<'a>,
        key: FieldKey<'_>,
        read_only: bool,
    ) -> Option<Reflection<'a>> {
        let structure = self.db.get_by_type(object.ty()).and_then(ReflectedType::structure);
        if let FieldKey::Index(index) = key
            && !structure.is_some_and(|structure| structure.is_indexed())
        {
            let mut fields = Vec::new();
            self.collect_fields(object, read_only, None, &mut vec![object.ty()], &mut fields);
            return fields.into_iter().nth(index).map(|field| field.reflection);
        }
        self.find_named_field(object, key, read_only, &mut vec![object.ty()])
    }

    fn find_named_field(
        &self,
        object: &ReflectedObject<'a>,
        key: FieldKey<'_>,
        read_only: bool,
        visited: &mut Vec<&'static Type>,
    ) -> Option<Reflection<'a>> {
        if let Some(structure) = self.db.get_by_type(object.ty()).and_then(ReflectedType::structure)
            && let Some(info) = object.with(|o| structure.field(o, key)).flatten()
        {
            return Some(self.child(object, &info, read_only));
        }
        for edge in self.db.base_types(object.ty()) {
            if visit(visited, edge.base())
                && let Some(field) =
                    self.find_named_field(&object.upcast(edge.clone()), key, read_only, visited)
            {
                return Some(field);
            }
        }
        None
    }

    /// All children: base type fields first, then own fields.
    ///
    /// A base reached through several paths is listed once, at its first
    /// occurrence.
    pub fn get_fields(&self) -> Vec<Field<'a>> {
        let mut fields = Vec::new();
        if let Some((object, read_only)) = self.inner() {
            self.collect_fields(&object, read_only, None, &mut vec![object.ty()], &mut fields);
        }
        fields
    }

    fn collect_fields(
        &self,
        object: &ReflectedObject<'a>,
        read_only: bool,
        inherited_from: Option<&'static Type>,
        visited: &mut Vec<&'static Type>,
        out: &mut Vec<Field<'a>>,
    ) {
        for edge in self.db.base_types(object.ty()) {
            if visit(visited, edge.base()) {
                let base = object.upcast(edge.clone());
                self.collect_fields(&base, read_only, Some(edge.base()), visited, out);
            }
        }

        let Some(structure) = self.db.get_by_type(object.ty()).and_then(ReflectedType::structure)
        else {
            return;
        };
        let infos = object.with(|o| structure.fields(o)).unwrap_or_default();
        out.extend(infos.iter().map(|info| Field {
            key: info.key(),
            reflection: self.child(object, info, read_only),
            inherited_from,
        }));
    }

    /// Checks if [`get_fields`](Self::get_fields) would return anything.
    pub fn has_fields(&self) -> bool {
        self.inner()
            .is_some_and(|(object, _)| self.object_has_fields(&object, &mut vec![object.ty()]))
    }

    fn object_has_fields(
        &self,
        object: &ReflectedObject<'a>,
        visited: &mut Vec<&'static Type>,
    ) -> bool {
        let own = self
            .db
            .get_by_type(object.ty())
            .and_then(ReflectedType::structure)
            .and_then(|structure| object.with(|o| structure.has_fields(o)))
            .unwrap_or(false);
        own || self.db.base_types(object.ty()).iter().any(|edge| {
            visit(visited, edge.base())
                && self.object_has_fields(&object.upcast(edge.clone()), visited)
        })
    }

    // -------------------------------------------------------------------------
    // Methods

    /// Methods of the value type and its bases, base methods first.
    pub fn get_methods(&self) -> Vec<&'a MethodInfo> {
        let mut methods = Vec::new();
        if let Some((object, _)) = self.inner() {
            self.collect_methods(object.ty(), &mut vec![object.ty()], &mut methods);
        }
        methods
    }

    fn collect_methods(
        &self,
        ty: &Type,
        visited: &mut Vec<&'static Type>,
        out: &mut Vec<&'a MethodInfo>,
    ) {
        for edge in self.db.base_types(ty) {
            if visit(visited, edge.base()) {
                self.collect_methods(edge.base(), visited, out);
            }
        }
        if let Some(entry) = self.db.get_by_type(ty) {
            out.extend(entry.methods());
        }
    }

    /// Finds a method by name, own methods hiding base ones.
    pub fn get_method(&self, name: &str) -> Option<&'a MethodInfo> {
        let (object, _) = self.inner()?;
        self.find_method(&object, name, &mut vec![object.ty()])
            .map(|(_, method)| method)
    }

    fn find_method(
        &self,
        object: &ReflectedObject<'a>,
        name: &str,
        visited: &mut Vec<&'static Type>,
    ) -> Option<(ReflectedObject<'a>, &'a MethodInfo)> {
        if let Some(method) = self.db.get_by_type(object.ty()).and_then(|e| e.method(name)) {
            return Some((object.clone(), method));
        }
        for edge in self.db.base_types(object.ty()) {
            if visit(visited, edge.base())
                && let Some(found) = self.find_method(&object.upcast(edge.clone()), name, visited)
            {
                return Some(found);
            }
        }
        None
    }

    /// Calls the method `name` on the value.
    ///
    /// `&mut self` methods need a view that is not read-only.
    pub fn invoke(&self, name: &str, args: &[Any]) -> Result<Any, ReflectionError> {
        let (object, read_only) = self.inner().ok_or(ReflectionError::Invalid)?;
        let (object, method) = self
            .find_method(&object, name, &mut vec![object.ty()])
            .ok_or_else(|| ReflectionError::MethodNotFound(name.into()))?;

        let func = method.func();
        let result = match func.receiver() {
            Receiver::Ref => object.with(|o| func.invoke(o, args)),
            Receiver::Mut if read_only => return Err(ReflectionError::ReadOnly),
            Receiver::Mut => object.with_mut(|o| func.invoke_mut(o, args)),
        };
        let value = result.ok_or(ReflectionError::Unavailable)??;
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Casts

    /// Views the value behind a pointer, `self` for other values.
    pub fn deref(&self) -> Reflection<'a> {
        match &self.state {
            Some(state) if state.value.ty().is_pointer() => Self::with_self(
                self.db,
                state.value.pointee(),
                state.meta.clone(),
                state.read_only,
            ),
            _ => self.clone(),
        }
    }

    /// Views the value as `target`.
    ///
    /// Up-casts follow the registered bases; down-casts only undo earlier
    /// up-casts. Invalid when neither applies.
    pub fn cast_to(&self, target: &'static Type) -> Reflection<'a> {
        let cast = self
            .inner()
            .and_then(|(object, read_only)| Some((object.cast_to(target, self.db)?, read_only)));
        match cast {
            Some((object, read_only)) => Self::with_self(self.db, object, None, read_only),
            None => {
                crate::cfg::debug! {
                    log::debug!(
                        "cannot cast `{}` to `{}`",
                        self.value_type().map_or("<invalid>", Type::path),
                        target.path()
                    );
                }
                Self::invalid(self.db)
            }
        }
    }
}

/// Marks `ty` as visited, `false` if it already was.
fn visit(visited: &mut Vec<&'static Type>, ty: &'static Type) -> bool {
    if visited.contains(&ty) {
        return false;
    }
    visited.push(ty);
    true
}

impl fmt::Debug for Reflection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_type() {
            Some(ty) => write!(f, "Reflection({})", ty.path()),
            None => f.write_str("Reflection(<invalid>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Reflection;
    use crate::derive::Typed;
    use crate::info::{Type, Typed as _};
    use crate::meta::m;
    use crate::reflection::ReflectionError;
    use crate::registry::{ReflectionRegistrator, TypeDb};
    use crate::structure::FieldKey;
    use crate::value::{Any, BoxedObject, InvokeError};

    #[derive(Typed, Clone, Default)]
    struct Entity {
        id: u32,
        name: String,
    }

    #[derive(Typed, Clone, Default)]
    struct Player {
        entity: Entity,
        score: i64,
        tags: Vec<String>,
    }

    fn db() -> TypeDb {
        let mut db = TypeDb::new();
        db.register::<Vec<String>>().unwrap();
        ReflectionRegistrator::<Entity>::begin(&mut db)
            .field("id", |e| &e.id, |e| &mut e.id)
            .meta(m::Tooltip("Unique id"))
            .field("name", |e| &e.name, |e| &mut e.name)
            .type_meta(m::DisplayName("Entity"))
            .method("name_len", |e: &Entity| e.name.len())
            .method("rename", |e: &mut Entity, name: String| e.name = name)
            .default_constructor()
            .end()
            .unwrap();
        ReflectionRegistrator::<Player>::begin(&mut db)
            .base(|p| &p.entity, |p| &mut p.entity)
            .field("score", |p| &p.score, |p| &mut p.score)
            .field("tags", |p| &p.tags, |p| &mut p.tags)
            .property_read_only("tag_count", |p| p.tags.len())
            .end()
            .unwrap();
        db
    }

    fn player() -> Player {
        Player {
            entity: Entity {
                id: 7,
                name: String::from("ann"),
            },
            score: 10,
            tags: vec![String::from("a"), String::from("b")],
        }
    }

    #[test]
    fn unregistered_is_invalid() {
        let db = TypeDb::empty();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        assert!(!view.is_valid());
        assert!(view.get_value().is_empty());
        assert!(view.get_fields().is_empty());
        assert!(!view.get_field("score").is_valid());
        assert_eq!(view.set_value(Any::new(1_u8)), Err(ReflectionError::Invalid));
    }

    #[test]
    fn set_and_read_back() {
        #[derive(Typed, Clone, Default)]
        struct Record {
            value: i32,
            name: String,
        }

        #[derive(Typed, Clone)]
        struct Empty;

        let mut db = TypeDb::new();
        ReflectionRegistrator::<Record>::begin(&mut db)
            .field("value", |r| &r.value, |r| &mut r.value)
            .field("name", |r| &r.name, |r| &mut r.name)
            .end()
            .unwrap();
        ReflectionRegistrator::<Empty>::begin(&mut db).end().unwrap();

        let mut record = Record::default();
        let view = Reflection::create(&db, &mut record);
        for _ in 0..3 {
            let keys: Vec<_> = view.get_fields().iter().map(|f| f.key).collect();
            assert_eq!(keys, [FieldKey::Name("value"), FieldKey::Name("name")]);
        }

        let field = view.get_field("value");
        field.set_value(Any::new(42_i32)).unwrap();
        let value = field.get_value();
        assert!(value.can_cast::<i32>(&db));
        assert_eq!(value.cast::<i32>(&db), Ok(42));

        let mut empty = Empty;
        let view = Reflection::create(&db, &mut empty);
        assert!(view.is_valid());
        assert!(view.get_fields().is_empty());
    }

    #[test]
    fn base_fields_first() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        let fields = view.get_fields();
        let keys: Vec<_> = fields.iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            [
                FieldKey::Name("id"),
                FieldKey::Name("name"),
                FieldKey::Name("score"),
                FieldKey::Name("tags"),
                FieldKey::Name("tag_count"),
            ]
        );
        assert_eq!(fields[0].inherited_from, Some(Entity::ty()));
        assert_eq!(fields[2].inherited_from, None);
        assert_eq!(fields[1].reflection.object_type(), Some(Entity::ty()));
        assert!(view.has_fields());
    }

    #[test]
    fn shared_base_is_listed_once() {
        #[derive(Typed, Clone, Default)]
        struct Root {
            id: u32,
        }

        #[derive(Typed, Clone, Default)]
        struct Left {
            root: Root,
            left: u8,
        }

        #[derive(Typed, Clone, Default)]
        struct Right {
            root: Root,
            right: u8,
        }

        #[derive(Typed, Clone, Default)]
        struct Diamond {
            left: Left,
            right: Right,
            extra: u8,
        }

        let mut db = TypeDb::new();
        ReflectionRegistrator::<Root>::begin(&mut db)
            .field("id", |r| &r.id, |r| &mut r.id)
            .method("root_id", |r: &Root| r.id)
            .end()
            .unwrap();
        ReflectionRegistrator::<Left>::begin(&mut db)
            .base(|l| &l.root, |l| &mut l.root)
            .field("left", |l| &l.left, |l| &mut l.left)
            .end()
            .unwrap();
        ReflectionRegistrator::<Right>::begin(&mut db)
            .base(|r| &r.root, |r| &mut r.root)
            .field("right", |r| &r.right, |r| &mut r.right)
            .end()
            .unwrap();
        ReflectionRegistrator::<Diamond>::begin(&mut db)
            .base(|d| &d.left, |d| &mut d.left)
            .base(|d| &d.right, |d| &mut d.right)
            .field("extra", |d| &d.extra, |d| &mut d.extra)
            .end()
            .unwrap();

        let mut value = Diamond::default();
        let view = Reflection::create(&db, &mut value);

        let fields = view.get_fields();
        let keys: Vec<_> = fields.iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            [
                FieldKey::Name("id"),
                FieldKey::Name("left"),
                FieldKey::Name("right"),
                FieldKey::Name("extra"),
            ]
        );
        assert_eq!(fields[0].inherited_from, Some(Root::ty()));

        let names: Vec<_> = view.get_methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["root_id"]);
        assert!(view.has_fields());

        // Indices follow `get_fields`.
        view.get_field(0_usize).set_value(Any::new(6_u32)).unwrap();
        view.get_field(3_usize).set_value(Any::new(1_u8)).unwrap();
        assert!(!view.get_field(4_usize).is_valid());
        assert_eq!(view.invoke("root_id", &[]).unwrap().get::<u32>(), Some(&6));

        drop((view, fields));
        assert_eq!((value.left.root.id, value.right.root.id), (6, 0));
        assert_eq!(value.extra, 1);
    }

    #[test]
    fn class_indices_follow_field_order() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        for (index, field) in view.get_fields().iter().enumerate() {
            let by_index = view.get_field(index);
            assert_eq!(by_index.value_type(), field.reflection.value_type());
            assert_eq!(by_index.object_type(), field.reflection.object_type());
        }
        assert_eq!(view.get_field(2_usize).get_value().get::<i64>(), Some(&10));
        assert!(!view.get_field(5_usize).is_valid());
    }

    #[test]
    fn set_through_base_and_container() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        view.get_field("name")
            .set_value(Any::new(String::from("bob")))
            .unwrap();
        let tags = view.get_field("tags");
        assert_eq!(tags.get_fields().len(), 2);
        tags.get_field(1_usize)
            .set_value(Any::new(String::from("z")))
            .unwrap();
        assert!(!tags.get_field(5_usize).is_valid());
        assert_eq!(view.get_field("tag_count").get_value().get::<usize>(), Some(&2));

        drop((view, tags));
        assert_eq!(value.entity.name, "bob");
        assert_eq!(value.tags, ["a", "z"]);
    }

    #[test]
    fn conversions_and_mismatches() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);
        let score = view.get_field("score");

        score.set_value(Any::new(5_i32)).unwrap();
        assert_eq!(score.get_value().get::<i64>(), Some(&5));
        assert!(matches!(
            score.set_value(Any::new(String::from("x"))),
            Err(ReflectionError::TypeMismatch { .. })
        ));
        assert_eq!(
            view.get_field("tag_count").set_value(Any::new(1_usize)),
            Err(ReflectionError::ReadOnly)
        );
    }

    #[test]
    fn read_only_views() {
        let db = db();
        let value = player();
        let view = Reflection::create_const(&db, &value);

        assert!(view.is_read_only());
        let score = view.get_field("score");
        assert!(score.is_read_only());
        assert_eq!(score.get_value().get::<i64>(), Some(&10));
        assert_eq!(score.set_value(Any::new(1_i64)), Err(ReflectionError::ReadOnly));
        assert!(score.with_value_mut(|v: &mut i64| *v = 0).is_none());
        assert_eq!(score.with_value(|v: &i64| *v), Some(10));
    }

    #[test]
    fn meta_lookup() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        assert_eq!(
            view.get_field("id").meta::<m::Tooltip>(),
            Some(&m::Tooltip("Unique id"))
        );
        assert!(!view.get_field("name").has_meta::<m::Tooltip>());

        let entity = view.cast_to(Entity::ty());
        assert_eq!(entity.meta::<m::DisplayName>(), Some(&m::DisplayName("Entity")));
    }

    #[test]
    fn methods_and_invoke() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        let names: Vec<_> = view.get_methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["name_len", "rename"]);
        assert!(view.get_method("rename").is_some());

        view.invoke("rename", &[Any::new(String::from("carl"))]).unwrap();
        let len = view.invoke("name_len", &[]).unwrap();
        assert_eq!(len.get::<usize>(), Some(&4));

        assert!(matches!(
            view.invoke("fly", &[]),
            Err(ReflectionError::MethodNotFound(name)) if name == "fly"
        ));
        assert!(matches!(
            view.invoke("rename", &[]),
            Err(ReflectionError::Invoke(InvokeError::ArgCount { .. }))
        ));

        let value = player();
        let frozen = Reflection::create_const(&db, &value);
        assert!(matches!(
            frozen.invoke("rename", &[Any::new(String::new())]),
            Err(ReflectionError::ReadOnly)
        ));
    }

    #[test]
    fn cast_round_trip() {
        let db = db();
        let mut value = player();
        let view = Reflection::create(&db, &mut value);

        let entity = view.cast_to(Entity::ty());
        assert_eq!(entity.value_type(), Some(Entity::ty()));
        entity.get_field("id").set_value(Any::new(9_u32)).unwrap();

        let back = entity.cast_to(Player::ty());
        assert_eq!(back.get_field("score").get_value().get::<i64>(), Some(&10));
        assert!(!view.cast_to(Type::of::<u8>()).is_valid());

        drop((view, entity, back));
        assert_eq!(value.entity.id, 9);
    }

    #[test]
    fn deref_pointer_fields() {
        #[derive(Typed, Clone)]
        struct Holder {
            value: Box<u16>,
        }

        let mut db = TypeDb::new();
        ReflectionRegistrator::<Holder>::begin(&mut db)
            .field("value", |h| &h.value, |h| &mut h.value)
            .end()
            .unwrap();
        let mut holder = Holder {
            value: Box::new(1),
        };
        let view = Reflection::create(&db, &mut holder);

        let target = view.get_field("value").deref();
        assert_eq!(target.value_type(), Some(Type::of::<u16>()));
        target.set_value(Any::new(4_u16)).unwrap();
        assert_eq!(view.deref().value_type(), Some(Holder::ty()));

        drop((view, target));
        assert_eq!(*holder.value, 4);
    }

    #[test]
    fn whole_value_and_boxed_objects() {
        let db = db();
        let mut boxed = BoxedObject::new(Entity::default());
        let view = Reflection::create_boxed(&db, &mut boxed);

        assert_eq!(view.value_type(), Some(Entity::ty()));
        view.get_field("id").set_value(Any::new(3_u32)).unwrap();
        drop(view);
        assert_eq!(boxed.downcast_ref::<Entity>().unwrap().id, 3);

        let mut id = 1_u32;
        let view = Reflection::create(&db, &mut id);
        view.set_value(Any::new(2_u32)).unwrap();
        assert!(!view.has_fields());
        drop(view);
        assert_eq!(id, 2);
    }
}
