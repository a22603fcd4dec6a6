use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use crate::info::{DerefFns, Type};
use crate::registry::{TypeDb, UpCast};
use crate::structure::ValueWrapper;

/// The borrow every view of one object derives from.
enum ObjectRoot<'a> {
    Const(&'a dyn Any),
    Mut(RefCell<&'a mut dyn Any>),
}

/// One move from an object to a part of it.
#[derive(Clone)]
enum Step {
    Member(Arc<dyn ValueWrapper>),
    Deref(DerefFns),
    Cast(Arc<dyn UpCast>),
}

impl Step {
    fn resolve<'o>(&self, object: &'o dyn Any) -> Option<&'o dyn Any> {
        match self {
            Step::Member(wrapper) => wrapper.member(object),
            Step::Deref(fns) => fns.get(object),
            Step::Cast(edge) => edge.up(object),
        }
    }

    fn resolve_mut<'o>(&self, object: &'o mut dyn Any) -> Option<&'o mut dyn Any> {
        match self {
            Step::Member(wrapper) => wrapper.member_mut(object),
            Step::Deref(fns) => fns.get_mut(object),
            Step::Cast(edge) => edge.up_mut(object),
        }
    }
}

/// A path from a root borrow to an object of type `ty`.
///
/// Nothing below the root is borrowed between operations: each access walks
/// the path again, so no reference outlives the call that produced it.
#[derive(Clone)]
pub(crate) struct ReflectedObject<'a> {
    root: Rc<ObjectRoot<'a>>,
    path: Vec<Step>,
    ty: &'static Type,
}

impl<'a> ReflectedObject<'a> {
    pub fn new_const(object: &'a dyn Any, ty: &'static Type) -> Self {
        Self {
            root: Rc::new(ObjectRoot::Const(object)),
            path: Vec::new(),
            ty,
        }
    }

    pub fn new_mut(object: &'a mut dyn Any, ty: &'static Type) -> Self {
        Self {
            root: Rc::new(ObjectRoot::Mut(RefCell::new(object))),
            path: Vec::new(),
            ty,
        }
    }

    #[inline]
    pub fn ty(&self) -> &'static Type {
        self.ty
    }

    fn push(&self, step: Step, ty: &'static Type) -> Self {
        let mut path = self.path.clone();
        path.push(step);
        Self {
            root: self.root.clone(),
            path,
            ty,
        }
    }

    /// The value reached through `wrapper`.
    pub fn member(&self, wrapper: Arc<dyn ValueWrapper>) -> Self {
        let ty = wrapper.value_type();
        self.push(Step::Member(wrapper), ty)
    }

    /// The `edge.base()` part of the object.
    pub fn upcast(&self, edge: Arc<dyn UpCast>) -> Self {
        let ty = edge.base();
        self.push(Step::Cast(edge), ty)
    }

    /// Follows pointers down to the first non-pointer type.
    pub fn pointee(&self) -> Self {
        let mut object = self.clone();
        while let (Some(target), Some(fns)) = (object.ty.deref(), object.ty.deref_fns()) {
            object.path.push(Step::Deref(fns));
            object.ty = target;
        }
        object
    }

    /// Views the object as `target`.
    ///
    /// Up-casts follow the inheritance graph of `db`. Down-casts only undo
    /// earlier up-casts of this path, so they return the original object.
    pub fn cast_to(&self, target: &'static Type, db: &TypeDb) -> Option<Self> {
        if self.ty == target {
            return Some(self.clone());
        }
        if let Some(edges) = db.cast_path(self.ty, target) {
            let mut object = self.clone();
            for edge in edges {
                object.path.push(Step::Cast(edge));
            }
            object.ty = target;
            return Some(object);
        }

        let mut object = self.clone();
        while let Some(Step::Cast(edge)) = object.path.last() {
            object.ty = edge.derived();
            object.path.pop();
            if object.ty == target {
                return Some(object);
            }
        }
        None
    }

    /// Runs `f` on the object, `None` if the path is broken.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Any) -> R) -> Option<R> {
        match &*self.root {
            ObjectRoot::Const(root) => self.walk(*root).map(f),
            ObjectRoot::Mut(cell) => {
                let guard = cell.try_borrow().ok()?;
                self.walk(&**guard).map(f)
            }
        }
    }

    /// Runs `f` on the object mutably, `None` for immutable roots and
    /// broken paths.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Any) -> R) -> Option<R> {
        let ObjectRoot::Mut(cell) = &*self.root else {
            return None;
        };
        let mut guard = cell.try_borrow_mut().ok()?;
        let mut object: &mut dyn Any = &mut **guard;
        for step in &self.path {
            object = step.resolve_mut(object)?;
        }
        Some(f(object))
    }

    fn walk<'o>(&self, root: &'o dyn Any) -> Option<&'o dyn Any> {
        self.path
            .iter()
            .try_fold(root, |object, step| step.resolve(object))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;

    use super::ReflectedObject;
    use crate::derive::Typed;
    use crate::info::{Type, Typed};
    use crate::registry::{ReflectionRegistrator, TypeDb};
    use crate::structure::MemberWrapper;

    #[derive(Typed, Clone)]
    struct Inner {
        value: i32,
    }

    #[derive(Typed, Clone)]
    struct Outer {
        inner: Box<Inner>,
    }

    #[test]
    fn member_then_pointee() {
        let mut object = Outer {
            inner: Box::new(Inner { value: 1 }),
        };
        let root = ReflectedObject::new_mut(&mut object, Outer::ty());
        let inner = root
            .member(Arc::new(MemberWrapper::new(|o: &Outer| &o.inner, |o| &mut o.inner)))
            .pointee();
        assert_eq!(inner.ty(), Type::of::<Inner>());

        inner
            .with_mut(|o| o.downcast_mut::<Inner>().unwrap().value = 5)
            .unwrap();
        drop(inner);
        drop(root);
        assert_eq!(object.inner.value, 5);
    }

    #[test]
    fn const_root_refuses_mutation() {
        let object = Inner { value: 1 };
        let root = ReflectedObject::new_const(&object, Inner::ty());
        assert!(root.with_mut(|_| ()).is_none());
        assert_eq!(root.with(|o| o.downcast_ref::<Inner>().unwrap().value), Some(1));
    }

    #[test]
    fn cast_round_trip_keeps_address() {
        let mut db = TypeDb::empty();
        ReflectionRegistrator::<Outer>::begin(&mut db)
            .base(|o| &*o.inner, |o| &mut *o.inner)
            .end()
            .unwrap();

        let object = Outer {
            inner: Box::new(Inner { value: 1 }),
        };
        let root = ReflectedObject::new_const(&object, Outer::ty());
        let up = root.cast_to(Inner::ty(), &db).unwrap();
        let down = up.cast_to(Outer::ty(), &db).unwrap();

        let address = down.with(|o| o as *const dyn core::any::Any as *const ()).unwrap();
        assert_eq!(address, &object as *const Outer as *const ());
        assert!(root.cast_to(Type::of::<u8>(), &db).is_none());
        assert!(ReflectedObject::new_const(&*object.inner, Inner::ty()).cast_to(Outer::ty(), &db).is_none());
    }
}
