#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    dv_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate as `dv_reflect`, which must also resolve
// inside the crate itself and in its doc tests.
extern crate self as dv_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod impls;
pub mod info;
pub mod meta;
pub mod reflection;
pub mod registry;
pub mod serde;
pub mod structure;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use dv_reflect_derive as derive;
pub use reflection::{Reflection, ReflectionError};
pub use registry::{Reflected, ReflectionRegistrator, RegistrationError, TypeDb};
pub use value::Any;

/// Common imports.
pub mod prelude {
    pub use crate::derive::{Reflected, Typed};
    pub use crate::info::{Type, TypePath, Typed};
    pub use crate::meta::m;
    pub use crate::reflection::{Reflection, ReflectionError};
    pub use crate::registry::{Reflected, ReflectionRegistrator, TypeDb, TypeDbArc};
    pub use crate::value::Any;
}
