//! Reflection of built-in types, and helpers for manual implementations.
//!
//! - [`concat`]: joins string pieces, used to build generic type paths.
//! - [`NonGenericTypeCell`]: storage for [`Typed`] of non-generic types.
//! - [`GenericTypePathCell`]: storage for [`TypePath`] of generic types.
//! - [`GenericTypeInfoCell`]: storage for [`Typed`] of generic types.
//!
//! ## Implemented Menu
//!
//! - fundamentals: `()`, `bool`, `char`, `i8`-`i128`, `u8`-`u128`,
//!   `isize`, `usize`, `f32`, `f64`
//! - `str` (unsized, [`Typed`] only), `&'static T` ([`Typed`] only, decays to `T`)
//! - `&'static str`, `String`
//! - `Box<T>` (pointer to `T`), `Vec<T>` (indexed children), `Option<T>`
//!
//! All fundamentals, `String` and `&'static str` are registered by
//! [`TypeDb::new`].
//!
//! [`TypePath`]: crate::info::TypePath
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod alloc;
mod cell;
mod core;
mod native;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeCell};

use crate::registry::{Reflected, TypeDb};

/// Joins `arr` into one string, allocating once.
///
/// ```
/// assert_eq!(dv_reflect::impls::concat(&["Vec<", "u8", ">"]), "Vec<u8>");
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> ::alloc::string::String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = ::alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}

pub(crate) fn register_builtin(db: &mut TypeDb) {
    fn register<T: Reflected>(db: &mut TypeDb) {
        if let Err(err) = db.register::<T>() {
            log::warn!("built-in registration of `{}` failed: {err}", T::type_path());
        }
    }

    register::<()>(db);
    register::<bool>(db);
    register::<char>(db);
    register::<u8>(db);
    register::<u16>(db);
    register::<u32>(db);
    register::<u64>(db);
    register::<u128>(db);
    register::<usize>(db);
    register::<i8>(db);
    register::<i16>(db);
    register::<i32>(db);
    register::<i64>(db);
    register::<i128>(db);
    register::<isize>(db);
    register::<f32>(db);
    register::<f64>(db);
    register::<::alloc::string::String>(db);
    register::<&'static str>(db);
}
