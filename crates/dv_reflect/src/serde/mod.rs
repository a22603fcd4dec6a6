//! Serialization of reflected objects by field name.
//!
//! - [`TypeTraitSerialize`] and [`TypeTraitDeserialize`] hold the `serde`
//!   implementations of a type, erased with `erased-serde`.
//! - [`ReflectionSerializer`] writes the value behind a [`Reflection`],
//!   using the type traits where present and the registered fields
//!   elsewhere.
//! - [`ReflectionDeserializer`] reads data back onto an existing object.
//!
//! Types deriving `serde` themselves can skip the field walk: register the
//! two type traits (`#[reflect(serde)]` with the derive macro) and the
//! whole value goes through `serde` at once.
//!
//! [`Reflection`]: crate::Reflection
//! [`TypeTraitSerialize`]: crate::registry::TypeTraitSerialize
//! [`TypeTraitDeserialize`]: crate::registry::TypeTraitDeserialize

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::ReflectionDeserializer;
pub use ser::ReflectionSerializer;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use serde_core::de::DeserializeSeed;

    use super::{ReflectionDeserializer, ReflectionSerializer};
    use crate::derive::{Reflected, Typed};
    use crate::meta::m;
    use crate::reflection::Reflection;
    use crate::registry::{ReflectionRegistrator, TypeDb};

    #[derive(Reflected, Clone, Default, Debug, PartialEq)]
    struct Stats {
        hp: i32,
        speed: f32,
    }

    #[derive(Typed, Clone, Default, Debug, PartialEq)]
    struct Unit {
        id: u64,
        name: String,
        stats: Box<Stats>,
        path: Vec<u16>,
    }

    fn db() -> TypeDb {
        let mut db = TypeDb::new();
        db.register::<Stats>().unwrap();
        db.register::<Vec<u16>>().unwrap();
        ReflectionRegistrator::<Unit>::begin(&mut db)
            .field("id", |u| &u.id, |u| &mut u.id)
            .meta(m::ReadOnly)
            .field("name", |u| &u.name, |u| &mut u.name)
            .field("stats", |u| &u.stats, |u| &mut u.stats)
            .field("path", |u| &u.path, |u| &mut u.path)
            .property_read_only("steps", |u| u.path.len())
            .end()
            .unwrap();
        db
    }

    #[derive(Reflected, Clone, Default, Debug, PartialEq)]
    struct Node {
        id: u32,
    }

    #[derive(Reflected, Clone, Default, Debug, PartialEq)]
    struct Branch {
        #[reflect(base)]
        node: Node,
        weight: u8,
    }

    #[derive(Reflected, Clone, Default, Debug, PartialEq)]
    struct Leaf {
        #[reflect(base)]
        node: Node,
        color: u8,
    }

    #[derive(Reflected, Clone, Default, Debug, PartialEq)]
    struct Joint {
        #[reflect(base)]
        branch: Branch,
        #[reflect(base)]
        leaf: Leaf,
    }

    fn unit() -> Unit {
        Unit {
            id: 3,
            name: "scout".to_string(),
            stats: Box::new(Stats { hp: 40, speed: 1.5 }),
            path: vec![1, 2],
        }
    }

    const JSON: &str =
        r#"{"id":3,"name":"scout","stats":{"hp":40,"speed":1.5},"path":[1,2],"steps":2}"#;

    #[test]
    fn json_output() {
        let db = db();
        let value = unit();
        let view = Reflection::create_const(&db, &value);

        let output = serde_json::to_string(&ReflectionSerializer::new(&view)).unwrap();
        assert_eq!(output, JSON);
    }

    #[test]
    fn json_round_trip() {
        let db = db();
        let mut value = Unit {
            path: vec![0; 2],
            ..Unit::default()
        };
        let view = Reflection::create(&db, &mut value);

        let mut input = serde_json::Deserializer::from_str(JSON);
        ReflectionDeserializer::new(&view)
            .deserialize(&mut input)
            .unwrap();
        drop(view);

        // `id` is read-only and `steps` computed: both are skipped.
        let expected = Unit { id: 0, ..unit() };
        assert_eq!(value, expected);
    }

    #[test]
    fn ron_round_trip() {
        let db = db();
        let source = unit();
        let view = Reflection::create_const(&db, &source);
        let text = ron::to_string(&ReflectionSerializer::new(&view)).unwrap();

        let mut target = Unit {
            id: 3,
            path: vec![0; 2],
            ..Unit::default()
        };
        let view = Reflection::create(&db, &mut target);
        let mut input = ron::Deserializer::from_str(&text).unwrap();
        ReflectionDeserializer::new(&view)
            .deserialize(&mut input)
            .unwrap();
        drop(view);

        assert_eq!(target, source);
    }

    #[test]
    fn extra_elements_and_unknown_keys_are_skipped() {
        let db = db();
        let mut value = Unit {
            path: vec![0],
            ..Unit::default()
        };
        let view = Reflection::create(&db, &mut value);

        let mut input =
            serde_json::Deserializer::from_str(r#"{"path":[7,8,9],"color":"red","name":"x"}"#);
        ReflectionDeserializer::new(&view)
            .deserialize(&mut input)
            .unwrap();
        drop(view);

        assert_eq!(value.path, [7]);
        assert_eq!(value.name, "x");
    }

    #[test]
    fn shared_base_is_written_once() {
        let mut db = TypeDb::new();
        db.register::<Joint>().unwrap();

        let value = Joint {
            branch: Branch {
                node: Node { id: 4 },
                weight: 2,
            },
            leaf: Leaf {
                node: Node { id: 9 },
                color: 5,
            },
        };
        let view = Reflection::create_const(&db, &value);
        let output = serde_json::to_string(&ReflectionSerializer::new(&view)).unwrap();
        assert_eq!(output, r#"{"id":4,"weight":2,"color":5}"#);

        let mut target = Joint::default();
        let view = Reflection::create(&db, &mut target);
        let mut input = serde_json::Deserializer::from_str(&output);
        ReflectionDeserializer::new(&view)
            .deserialize(&mut input)
            .unwrap();
        drop(view);

        assert_eq!(target.branch, value.branch);
        assert_eq!(target.leaf.color, 5);
        assert_eq!(target.leaf.node.id, 0);
    }

    #[test]
    fn errors() {
        #[derive(Typed, Clone)]
        struct Opaque;

        let mut db = db();
        db.register_type::<Opaque>();

        let value = Opaque;
        let view = Reflection::create_const(&db, &value);
        assert!(serde_json::to_string(&ReflectionSerializer::new(&view)).is_err());

        let invalid = Reflection::invalid(&db);
        assert!(serde_json::to_string(&ReflectionSerializer::new(&invalid)).is_err());

        let value = unit();
        let view = Reflection::create_const(&db, &value);
        let mut input = serde_json::Deserializer::from_str(JSON);
        assert!(ReflectionDeserializer::new(&view).deserialize(&mut input).is_err());

        let mut input = serde_json::Deserializer::from_str(r#"{"name":5}"#);
        let mut value = unit();
        let view = Reflection::create(&db, &mut value);
        assert!(ReflectionDeserializer::new(&view).deserialize(&mut input).is_err());
    }
}
