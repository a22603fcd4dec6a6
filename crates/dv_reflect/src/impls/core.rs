use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{Type, TypePath, Typed};
use crate::registry::{Reflected, ReflectionRegistrator, RegistrationError, TypeDb, TypeTraitValue};

// -----------------------------------------------------------------------------
// Option<T>

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn ty() -> &'static Type {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(Type::new::<Self>)
    }
}

impl<T: Reflected + Clone> Reflected for Option<T> {
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
        ReflectionRegistrator::<Self>::begin(db)
            .default_constructor()
            .constructor(|value: T| Some(value))
            .method("is_some", Option::<T>::is_some)
            .method("take", Option::<T>::take)
            .type_trait::<TypeTraitValue>()
            .end()?;
        db.register::<T>()
    }
}
