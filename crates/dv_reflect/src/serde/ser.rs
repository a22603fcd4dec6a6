use alloc::format;
use alloc::string::ToString;

use serde_core::ser::{Error, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use crate::info::Type;
use crate::reflection::Reflection;
use crate::registry::TypeTraitSerialize;

/// Serializes the value behind a [`Reflection`].
///
/// # Serialization Rules
///
/// 1. A value whose type has a [`TypeTraitSerialize`] uses it.
/// 2. Containers become sequences of their elements.
/// 3. Other values with a registered structure become maps keyed by field
///    name, base fields first. Read-only fields and properties are written.
///
/// Pointers are serialized as the value they point to. Values matching no
/// rule, and invalid views, fail with a custom error.
///
/// # Examples
///
/// ```
/// use dv_reflect::serde::ReflectionSerializer;
/// use dv_reflect::{Reflection, TypeDb};
/// use dv_reflect::derive::Reflected;
///
/// #[derive(Reflected, Clone)]
/// struct Slot {
///     index: u8,
///     items: Vec<String>,
/// }
///
/// let mut db = TypeDb::new();
/// db.register::<Slot>().unwrap();
///
/// let slot = Slot { index: 2, items: vec!["key".into()] };
/// let view = Reflection::create_const(&db, &slot);
///
/// let output = serde_json::to_string(&ReflectionSerializer::new(&view)).unwrap();
/// assert_eq!(output, r#"{"index":2,"items":["key"]}"#);
/// ```
pub struct ReflectionSerializer<'r, 'a> {
    reflection: &'r Reflection<'a>,
}

impl<'r, 'a> ReflectionSerializer<'r, 'a> {
    #[inline]
    pub const fn new(reflection: &'r Reflection<'a>) -> Self {
        Self { reflection }
    }
}

impl Serialize for ReflectionSerializer<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = self.reflection.deref();
        let Some(ty) = view.value_type() else {
            return Err(S::Error::custom("cannot serialize an invalid reflection"));
        };

        if let Some(trait_serialize) = view.db().get_type_trait::<TypeTraitSerialize>(ty.id()) {
            return view
                .visit_value(|value| trait_serialize.serialize(value, serializer))
                .flatten()
                .unwrap_or_else(|| Err(unavailable::<S::Error>(ty)));
        }

        let has_structure = view
            .reflected_type()
            .is_some_and(|entry| entry.structure().is_some());
        if !has_structure && !view.has_fields() {
            return Err(S::Error::custom(format!(
                "no serialization available for `{}`",
                ty.path()
            )));
        }

        let fields = view.get_fields();
        if ty.is_container() {
            let mut seq = serializer.serialize_seq(Some(fields.len()))?;
            for field in &fields {
                seq.serialize_element(&ReflectionSerializer::new(&field.reflection))?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(fields.len()))?;
            for field in &fields {
                let value = ReflectionSerializer::new(&field.reflection);
                match field.key.as_name() {
                    Some(name) => map.serialize_entry(name, &value)?,
                    None => map.serialize_entry(&field.key.to_string(), &value)?,
                }
            }
            map.end()
        }
    }
}

fn unavailable<E: Error>(ty: &Type) -> E {
    E::custom(format!("the `{}` value cannot be reached", ty.path()))
}
