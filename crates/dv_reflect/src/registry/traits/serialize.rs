use core::any::Any;

use serde_core::{Serialize, Serializer};

use crate::info::Typed;
use crate::registry::{FromType, TypeTrait};

/// Serializes values of a type through `serde`.
#[derive(Clone, Copy)]
pub struct TypeTraitSerialize {
    func: fn(&dyn Any) -> Option<&dyn erased_serde::Serialize>,
}

impl TypeTraitSerialize {
    /// The value as an erased serializable, `None` if it has another type.
    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn erased_serde::Serialize> {
        (self.func)(value)
    }

    /// Serializes `value`, `None` if it has another type.
    pub fn serialize<S: Serializer>(
        &self,
        value: &dyn Any,
        serializer: S,
    ) -> Option<Result<S::Ok, S::Error>> {
        self.get(value).map(|value| value.serialize(serializer))
    }
}

impl<T: Typed + erased_serde::Serialize> FromType<T> for TypeTraitSerialize {
    fn from_type() -> Self {
        Self {
            func: |value| {
                value
                    .downcast_ref::<T>()
                    .map(|value| value as &dyn erased_serde::Serialize)
            },
        }
    }
}

impl TypeTrait for TypeTraitSerialize {}
