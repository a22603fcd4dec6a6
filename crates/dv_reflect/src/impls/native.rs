use core::fmt::Debug;

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeCell, concat};
use crate::info::{Type, TypeFlags, TypePath, Typed};
use crate::registry::{Reflected, ReflectionRegistrator, RegistrationError, TypeDb};
use crate::registry::{TypeTraitDeserialize, TypeTraitPrint, TypeTraitSerialize, TypeTraitValue};

// -----------------------------------------------------------------------------
// Fundamentals

fn register_fundamental<T>(db: &mut TypeDb) -> Result<(), RegistrationError>
where
    T: Typed + Clone + Default + Debug + Serialize + DeserializeOwned + Send + Sync,
{
    ReflectionRegistrator::<T>::begin(db)
        .default_constructor()
        .type_trait::<TypeTraitValue>()
        .type_trait::<TypeTraitPrint>()
        .type_trait::<TypeTraitSerialize>()
        .type_trait::<TypeTraitDeserialize>()
        .end()
}

macro_rules! impl_fundamental {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $name
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $name
            }
        }

        impl Typed for $ty {
            fn ty() -> &'static Type {
                static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
                CELL.get_or_init(|| Type::new::<Self>().with_flags(TypeFlags::FUNDAMENTAL))
            }
        }

        impl Reflected for $ty {
            fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
                register_fundamental::<Self>(db)
            }
        }
    )*};
}

impl_fundamental! {
    () => "()",
    bool => "bool",
    char => "char",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    f32 => "f32",
    f64 => "f64",
}

// -----------------------------------------------------------------------------
// str

impl TypePath for str {
    #[inline]
    fn type_path() -> &'static str {
        "str"
    }

    #[inline]
    fn type_name() -> &'static str {
        "str"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "str"
    }
}

impl Typed for str {
    fn ty() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(Type::new_unsized::<Self>)
    }
}

impl Reflected for &'static str {
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Self>::begin(db)
            .default_constructor()
            .type_trait::<TypeTraitValue>()
            .insert_type_trait(TypeTraitPrint::display::<Self>())
            .type_trait::<TypeTraitSerialize>()
            .end()?;
        db.register_type::<str>();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// &'static T

impl<T: TypePath + ?Sized> TypePath for &'static T {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["&", T::type_path()]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["&", T::type_name()]))
    }

    fn type_ident() -> &'static str {
        "&"
    }
}

impl<T: Typed + ?Sized> Typed for &'static T {
    fn ty() -> &'static Type {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| Type::new::<Self>().with_decay::<T>())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::info::{Type, TypeFlags, TypePath};
    use crate::registry::{TypeDb, TypeTraitDeserialize, TypeTraitPrint};
    use crate::value::Any;

    #[test]
    fn paths() {
        assert_eq!(<i32 as TypePath>::type_path(), "i32");
        assert_eq!(<&'static str as TypePath>::type_path(), "&str");
        assert_eq!(<&'static &'static u8 as TypePath>::type_name(), "&&u8");
        assert_eq!(Type::of::<()>().flags(), TypeFlags::FUNDAMENTAL);
    }

    #[test]
    fn fundamentals_are_complete() {
        let db = TypeDb::new();
        let entry = db.get::<f64>().unwrap();
        assert!(entry.is_complete());
        assert!(entry.has_type_trait::<TypeTraitDeserialize>());
        assert_eq!(entry.create_object(&[]).unwrap().downcast_ref::<f64>(), Some(&0.0));

        let text = db.get::<&'static str>().unwrap();
        let print = text.get_type_trait::<TypeTraitPrint>().unwrap();
        assert_eq!(print.print(&"plain").unwrap(), "plain");
        assert!(db.get::<str>().is_some());

        let value = Any::new("x");
        assert_eq!(value.cast::<String>(&db).unwrap(), "x");
    }
}
