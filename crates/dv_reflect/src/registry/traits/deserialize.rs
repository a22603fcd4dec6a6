use serde_core::{Deserialize, Deserializer};

use crate::info::Typed;
use crate::registry::{FromType, TypeTrait};
use crate::value::Any;

/// Deserializes values of a type into an [`Any`].
///
/// # Examples
///
/// ```
/// use dv_reflect::registry::{FromType, TypeTraitDeserialize};
///
/// let de = <TypeTraitDeserialize as FromType<Vec<u8>>>::from_type();
/// let mut json = serde_json::Deserializer::from_str("[1, 2]");
///
/// let value = de.deserialize(&mut json).unwrap();
/// assert_eq!(value.get::<Vec<u8>>(), Some(&vec![1, 2]));
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitDeserialize {
    func: fn(&mut dyn erased_serde::Deserializer) -> Result<Any, erased_serde::Error>,
}

impl TypeTraitDeserialize {
    pub fn deserialize<'de, D: Deserializer<'de>>(&self, deserializer: D) -> Result<Any, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.func)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

impl<T> FromType<T> for TypeTraitDeserialize
where
    T: for<'de> Deserialize<'de> + Typed + Clone + Send + Sync,
{
    fn from_type() -> Self {
        Self {
            func: |deserializer| Ok(Any::new(erased_serde::deserialize::<T>(deserializer)?)),
        }
    }
}

impl TypeTrait for TypeTraitDeserialize {}
