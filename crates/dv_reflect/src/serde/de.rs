use alloc::format;
use alloc::string::String;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::reflection::Reflection;
use crate::registry::TypeTraitDeserialize;

/// Deserializes data onto the value behind a [`Reflection`].
///
/// This is the counterpart of [`ReflectionSerializer`]: it does not build a
/// new object but assigns the fields of an existing one.
///
/// # Deserialization Rules
///
/// 1. A value whose type has a [`TypeTraitDeserialize`] is read whole and
///    assigned.
/// 2. Containers read a sequence. Elements are assigned to existing
///    indices; extra elements are skipped.
/// 3. Other values with a registered structure read a map. Unknown keys and
///    read-only fields are skipped.
///
/// Skipped data is reported with `log::debug!` when the `debug` feature is
/// enabled.
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use dv_reflect::serde::ReflectionDeserializer;
/// use dv_reflect::{Reflection, TypeDb};
/// use dv_reflect::derive::Reflected;
///
/// #[derive(Reflected, Clone, Default)]
/// struct Light {
///     on: bool,
///     level: f32,
/// }
///
/// let mut db = TypeDb::new();
/// db.register::<Light>().unwrap();
///
/// let mut light = Light::default();
/// let view = Reflection::create(&db, &mut light);
///
/// let mut input = serde_json::Deserializer::from_str(r#"{"on":true,"level":0.5,"color":3}"#);
/// ReflectionDeserializer::new(&view).deserialize(&mut input).unwrap();
///
/// drop(view);
/// assert!(light.on);
/// assert_eq!(light.level, 0.5);
/// ```
///
/// [`ReflectionSerializer`]: crate::serde::ReflectionSerializer
pub struct ReflectionDeserializer<'r, 'a> {
    reflection: &'r Reflection<'a>,
}

impl<'r, 'a> ReflectionDeserializer<'r, 'a> {
    #[inline]
    pub const fn new(reflection: &'r Reflection<'a>) -> Self {
        Self { reflection }
    }
}

impl<'de> DeserializeSeed<'de> for ReflectionDeserializer<'_, '_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let view = self.reflection.deref();
        let Some(ty) = view.value_type() else {
            return Err(D::Error::custom("cannot deserialize into an invalid reflection"));
        };
        if view.is_read_only() {
            return Err(D::Error::custom(format!("the `{}` value is read-only", ty.path())));
        }

        if let Some(trait_deserialize) = view.db().get_type_trait::<TypeTraitDeserialize>(ty.id()) {
            let value = trait_deserialize.deserialize(deserializer)?;
            return view.set_value(value).map_err(D::Error::custom);
        }

        let has_structure = view
            .reflected_type()
            .is_some_and(|entry| entry.structure().is_some());
        if !has_structure && !view.has_fields() {
            return Err(D::Error::custom(format!(
                "no deserialization available for `{}`",
                ty.path()
            )));
        }

        if ty.is_container() {
            deserializer.deserialize_seq(FieldsVisitor { reflection: &view })
        } else {
            deserializer.deserialize_map(FieldsVisitor { reflection: &view })
        }
    }
}

// -----------------------------------------------------------------------------
// FieldsVisitor

struct FieldsVisitor<'r, 'a> {
    reflection: &'r Reflection<'a>,
}

impl<'de> Visitor<'de> for FieldsVisitor<'_, '_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let path = self.reflection.value_type().map_or("<invalid>", |ty| ty.path());
        write!(formatter, "the fields of `{path}`")
    }

    fn visit_seq<V: SeqAccess<'de>>(self, mut seq: V) -> Result<(), V::Error> {
        let mut index = 0_usize;
        loop {
            let element = self.reflection.get_field(index);
            let read = if element.is_valid() {
                seq.next_element_seed(ReflectionDeserializer::new(&element))?
            } else {
                let skipped = seq.next_element::<IgnoredAny>()?;
                if skipped.is_some() {
                    crate::cfg::debug! {
                        log::debug!("skipped element [{index}], the container is shorter");
                    }
                }
                skipped.map(|_| ())
            };
            if read.is_none() {
                return Ok(());
            }
            index += 1;
        }
    }

    fn visit_map<V: MapAccess<'de>>(self, mut map: V) -> Result<(), V::Error> {
        while let Some(key) = map.next_key::<String>()? {
            let field = self.reflection.get_field(key.as_str());
            if field.is_valid() && !field.is_read_only() {
                map.next_value_seed(ReflectionDeserializer::new(&field))?;
            } else {
                crate::cfg::debug! {
                    log::debug!(
                        "skipped `{key}`: {}",
                        if field.is_valid() { "read-only field" } else { "unknown field" }
                    );
                }
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}
