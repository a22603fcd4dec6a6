use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeCell, concat};
use crate::info::{Type, TypePath, Typed};
use crate::registry::{Reflected, ReflectionRegistrator, RegistrationError, TypeDb};
use crate::registry::{TypeTraitDeserialize, TypeTraitPrint, TypeTraitSerialize, TypeTraitValue};
use crate::structure::VecStructure;

// -----------------------------------------------------------------------------
// String

impl TypePath for String {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    #[inline]
    fn type_name() -> &'static str {
        "String"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "String"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::string")
    }
}

impl Typed for String {
    fn ty() -> &'static Type {
        static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
        CELL.get_or_init(Type::new::<Self>)
    }
}

impl Reflected for String {
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Self>::begin(db)
            .default_constructor()
            .constructor(|text: &'static str| String::from(text))
            .method("len", String::len)
            .method("is_empty", String::is_empty)
            .method("clear", String::clear)
            .type_trait::<TypeTraitValue>()
            .insert_type_trait(TypeTraitPrint::display::<Self>())
            .type_trait::<TypeTraitSerialize>()
            .type_trait::<TypeTraitDeserialize>()
            .end()
    }
}

// -----------------------------------------------------------------------------
// Box<T>

impl<T: TypePath> TypePath for Box<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::boxed::Box<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Box<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::boxed")
    }
}

impl<T: Typed> Typed for Box<T> {
    fn ty() -> &'static Type {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        let ty = CELL.get_or_insert::<Self>(|| Type::new::<Self>().with_deref::<Self, T>());
        T::ty().link_pointer(ty);
        ty
    }
}

impl<T: Reflected + Clone> Reflected for Box<T> {
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Self>::begin(db)
            .type_trait::<TypeTraitValue>()
            .end()?;
        db.register::<T>()
    }
}

// -----------------------------------------------------------------------------
// Vec<T>

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Vec"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn ty() -> &'static Type {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| Type::new::<Self>().with_element::<T>())
    }
}

impl<T: Reflected + Clone> Reflected for Vec<T> {
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Self>::begin(db)
            .structure(VecStructure::<T>::new())
            .default_constructor()
            .method("len", Vec::<T>::len)
            .method("push", Vec::<T>::push)
            .method("clear", Vec::<T>::clear)
            .type_trait::<TypeTraitValue>()
            .end()?;
        db.register::<T>()
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

    use crate::info::{Type, TypePath};
    use crate::registry::TypeDb;
    use crate::value::Any;

    #[test]
    fn paths() {
        assert_eq!(<Vec<Box<u8>> as TypePath>::type_path(), "alloc::vec::Vec<alloc::boxed::Box<u8>>");
        assert_eq!(<Vec<Box<u8>> as TypePath>::type_name(), "Vec<Box<u8>>");
        assert_eq!(Type::of::<Vec<String>>().module_path(), Some("alloc::vec"));
    }

    #[test]
    fn containers_register_their_element() {
        let mut db = TypeDb::empty();
        db.register::<Vec<Box<i16>>>().unwrap();
        assert!(db.get::<Box<i16>>().is_some());
        assert!(db.get::<i16>().unwrap().is_complete());
    }

    #[test]
    fn builtin_methods() {
        let mut db = TypeDb::new();
        db.register::<Vec<u8>>().unwrap();
        let mut items: Vec<u8> = vec![1];

        let entry = db.get::<Vec<u8>>().unwrap();
        entry
            .method("push")
            .unwrap()
            .func()
            .invoke_mut(&mut items, &[Any::new(2_u8)])
            .unwrap();
        assert_eq!(items, [1, 2]);

        let text = db.get::<String>().unwrap().create_object(&[Any::new("abc")]).unwrap();
        assert_eq!(text.downcast_ref::<String>().unwrap(), "abc");
    }
}
