//! Items referenced by the code of `dv_reflect_derive`. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::impls::NonGenericTypeCell;
    use crate::info::{Type, TypePath, Typed};
    use crate::registry::{Reflected, RegistrationError, TypeDb};

    pub use inventory;

    /// A registration function submitted by `#[reflect(auto_register)]` or
    /// `impl_auto_register!`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeDb) -> Result<(), RegistrationError>);

    inventory::collect!(__AutoRegisterFunc);

    /// Names `Reflected::register_reflection` through a path that does not
    /// depend on the trait being in scope at the submission site.
    pub trait __RegisterType {
        fn __register(db: &mut TypeDb) -> Result<(), RegistrationError>;
    }

    impl<T: Reflected> __RegisterType for T {
        #[inline]
        fn __register(db: &mut TypeDb) -> Result<(), RegistrationError> {
            db.register::<T>()
        }
    }

    /// Registered by the static list itself: its presence in a database
    /// shows that the list was collected on this platform.
    pub struct __AvailFlag;

    impl TypePath for __AvailFlag {
        fn type_path() -> &'static str {
            "dv_reflect::__macro_exports::auto_register::__AvailFlag"
        }
        fn type_name() -> &'static str {
            "__AvailFlag"
        }
        fn type_ident() -> &'static str {
            "__AvailFlag"
        }
        fn module_path() -> Option<&'static str> {
            Some("dv_reflect::__macro_exports::auto_register")
        }
    }

    impl Typed for __AvailFlag {
        fn ty() -> &'static Type {
            static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
            CELL.get_or_init(Type::new::<Self>)
        }
    }

    fn register_avail_flag(db: &mut TypeDb) -> Result<(), RegistrationError> {
        db.register_type::<__AvailFlag>();
        Ok(())
    }

    inventory::submit! {
        __AutoRegisterFunc(register_avail_flag)
    }

    /// Runs every submitted registration. Failures are logged and skipped.
    pub fn __register_types(db: &mut TypeDb) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            if let Err(err) = (func.0)(db) {
                log::warn!("auto registration failed: {err}");
            }
        }
    }
}
