use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use dv_utils::TypeIdMap;

use crate::info::{Type, Typed};

// -----------------------------------------------------------------------------
// UpCast

/// One inheritance edge: a way to reach the `B` part of a `T`.
pub trait UpCast: Send + Sync {
    /// The derived type.
    fn derived(&self) -> &'static Type;

    /// The base type.
    fn base(&self) -> &'static Type;

    /// Borrows the base part, `None` if `object` is not of the derived type.
    fn up<'o>(&self, object: &'o dyn Any) -> Option<&'o dyn Any>;

    fn up_mut<'o>(&self, object: &'o mut dyn Any) -> Option<&'o mut dyn Any>;
}

/// An [`UpCast`] from accessor functions.
///
/// # Examples
///
/// ```
/// use dv_reflect::derive::Typed;
/// use dv_reflect::registry::{UpCast, UpCastFns};
///
/// #[derive(Typed)]
/// struct Base { id: u32 }
///
/// #[derive(Typed)]
/// struct Derived { base: Base }
///
/// let edge = UpCastFns::new(|d: &Derived| &d.base, |d| &mut d.base);
/// let object = Derived { base: Base { id: 3 } };
///
/// let base = edge.up(&object).unwrap().downcast_ref::<Base>().unwrap();
/// assert!(core::ptr::eq(base, &object.base));
/// ```
pub struct UpCastFns<T, B> {
    up: fn(&T) -> &B,
    up_mut: fn(&mut T) -> &mut B,
    _marker: PhantomData<fn(T) -> B>,
}

impl<T, B> UpCastFns<T, B> {
    pub const fn new(up: fn(&T) -> &B, up_mut: fn(&mut T) -> &mut B) -> Self {
        Self {
            up,
            up_mut,
            _marker: PhantomData,
        }
    }
}

impl<T: Typed, B: Typed> UpCast for UpCastFns<T, B> {
    #[inline]
    fn derived(&self) -> &'static Type {
        T::ty()
    }

    #[inline]
    fn base(&self) -> &'static Type {
        B::ty()
    }

    fn up<'o>(&self, object: &'o dyn Any) -> Option<&'o dyn Any> {
        object.downcast_ref::<T>().map(|object| (self.up)(object) as &dyn Any)
    }

    fn up_mut<'o>(&self, object: &'o mut dyn Any) -> Option<&'o mut dyn Any> {
        object
            .downcast_mut::<T>()
            .map(|object| (self.up_mut)(object) as &mut dyn Any)
    }
}

impl fmt::Debug for dyn UpCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.derived().path(), self.base().path())
    }
}

// -----------------------------------------------------------------------------
// InheritanceMap

/// Directed graph of registered (derived, base) edges.
pub(crate) struct InheritanceMap {
    bases: TypeIdMap<Vec<Arc<dyn UpCast>>>,
    derived: TypeIdMap<Vec<&'static Type>>,
}

impl InheritanceMap {
    pub const fn new() -> Self {
        Self {
            bases: TypeIdMap::new(),
            derived: TypeIdMap::new(),
        }
    }

    /// Adds an edge, `false` if the pair was already linked.
    pub fn insert(&mut self, edge: Arc<dyn UpCast>) -> bool {
        let derived = edge.derived();
        let base = edge.base();

        let bases = self.bases.get_or_insert(derived.id(), Vec::new);
        if bases.iter().any(|e| e.base() == base) {
            return false;
        }
        bases.push(edge);
        self.derived
            .get_or_insert(base.id(), Vec::new)
            .push(derived);
        true
    }

    pub fn bases(&self, ty: &Type) -> &[Arc<dyn UpCast>] {
        self.bases.get(&ty.id()).map_or(&[], Vec::as_slice)
    }

    pub fn derived(&self, ty: &Type) -> &[&'static Type] {
        self.derived.get(&ty.id()).map_or(&[], Vec::as_slice)
    }

    /// Edges leading from `from` up to `to`, depth first in registration
    /// order. Empty for `from == to`.
    pub fn path(&self, from: &Type, to: &Type) -> Option<Vec<Arc<dyn UpCast>>> {
        let mut path = Vec::new();
        let mut visited = Vec::new();
        self.search(from, to, &mut path, &mut visited)
            .then_some(path)
    }

    fn search(
        &self,
        from: &Type,
        to: &Type,
        path: &mut Vec<Arc<dyn UpCast>>,
        visited: &mut Vec<&'static Type>,
    ) -> bool {
        if from == to {
            return true;
        }
        for edge in self.bases(from) {
            let base = edge.base();
            if visited.contains(&base) {
                continue;
            }
            visited.push(base);
            path.push(edge.clone());
            if self.search(base, to, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{InheritanceMap, UpCastFns};
    use crate::derive::Typed;
    use crate::info::Type;

    #[derive(Typed)]
    struct A {
        value: u8,
    }

    #[derive(Typed)]
    struct B {
        a: A,
    }

    #[derive(Typed)]
    struct C {
        b: B,
    }

    fn map() -> InheritanceMap {
        let mut map = InheritanceMap::new();
        assert!(map.insert(Arc::new(UpCastFns::new(|c: &C| &c.b, |c| &mut c.b))));
        assert!(map.insert(Arc::new(UpCastFns::new(|b: &B| &b.a, |b| &mut b.a))));
        map
    }

    #[test]
    fn edges_both_directions() {
        let mut map = map();
        assert!(!map.insert(Arc::new(UpCastFns::new(|b: &B| &b.a, |b| &mut b.a))));

        assert_eq!(map.bases(Type::of::<B>()).len(), 1);
        assert_eq!(map.derived(Type::of::<A>()), &[Type::of::<B>()]);
        assert!(map.bases(Type::of::<A>()).is_empty());
    }

    #[test]
    fn multi_level_path() {
        let map = map();
        let path = map.path(Type::of::<C>(), Type::of::<A>()).unwrap();
        assert_eq!(path.len(), 2);

        let object = C {
            b: B { a: A { value: 9 } },
        };
        let mut current: &dyn core::any::Any = &object;
        for edge in &path {
            current = edge.up(current).unwrap();
        }
        assert_eq!(current.downcast_ref::<A>().unwrap().value, 9);

        assert!(map.path(Type::of::<A>(), Type::of::<C>()).is_none());
        assert!(map.path(Type::of::<B>(), Type::of::<B>()).unwrap().is_empty());
    }
}
