//! See following macros:
//!
//! - [`Typed`]
//! - [`Reflected`]
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod attrs;
mod derive_data;
mod impls;
mod path;

use derive_data::ReflectInput;

// -----------------------------------------------------------------------------
// Macros

/// Implements `TypePath` and `Typed`.
///
/// The type path is `module_path!()` followed by the type name, with the
/// paths of generic arguments appended for generic types. Override it
/// with `type_path`; generics are still appended:
///
/// ```rust, ignore
/// #[derive(Typed)]
/// #[reflect(type_path = "game::units::Unit")]
/// struct Unit { /* ... */ }
/// ```
///
/// Types with lifetime parameters are rejected.
#[proc_macro_derive(Typed, attributes(reflect))]
pub fn derive_typed(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let input = match ReflectInput::from_input(&ast) {
        Ok(input) => input,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_path_impl = impls::impl_trait_type_path(&input);
    let typed_impl = impls::impl_trait_typed(&input);

    TokenStream::from(quote! {
        #type_path_impl

        #typed_impl
    })
}

/// # Full Reflection Derivation
///
/// `#[derive(Reflected)]` implements `TypePath`, `Typed` and `Reflected`.
///
/// The generated `register_reflection` registers every field of a struct
/// by name (tuple struct fields by position), then registers the field
/// types. Field types must therefore implement `Reflected` and `Clone`.
/// Enums and unit structs are registered without fields.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflected, Clone, Default, Debug, Serialize, Deserialize)]
/// #[reflect(ctor, clone, debug, serde, auto_register)]
/// #[reflect(type_path = "game::Unit", permanent_name = "Unit")]
/// #[reflect(@m::DisplayName("Unit"))]
/// struct Unit { /* ... */ }
/// ```
///
/// - `type_path = "..."`: see [`Typed`].
/// - `permanent_name = "..."`: stable name for archives.
/// - `ctor`: default constructor, needs `Default`.
/// - `clone`: `TypeTraitValue`, needs `Clone`. Lets a reflection get and
///   set the whole value.
/// - `debug`: `TypeTraitPrint` from `Debug`.
/// - `serde`: `TypeTraitSerialize` and `TypeTraitDeserialize`, needs
///   `Serialize`, `Deserialize` and `Clone`.
/// - `auto_register`: registers the type in `TypeDb::auto_register`.
///   No effect on generic types or without the `auto_register` feature.
/// - `@expr`: type meta, any expression of a meta type.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Reflected, Clone)]
/// struct Unit {
///     #[reflect(base)]
///     entity: Entity,
///     #[reflect(name = "hit_points", @m::Range::new(0.0, 100.0, 1.0))]
///     hp: f32,
///     #[reflect(read_only)]
///     id: u64,
///     #[reflect(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// - `name = "..."`: registered name instead of the identifier.
/// - `skip`: not reflected; its type needs no trait.
/// - `read_only`: registered with a getter only.
/// - `base`: the field holds a base object. Its fields appear as inherited
///   fields and the type can be cast to it.
/// - `@expr`: field meta.
#[proc_macro_derive(Reflected, attributes(reflect))]
pub fn derive_reflected(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let input = match ReflectInput::from_input(&ast) {
        Ok(input) => input,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_path_impl = impls::impl_trait_type_path(&input);
    let typed_impl = impls::impl_trait_typed(&input);
    let reflected_impl = impls::impl_trait_reflected(&input);
    let auto_register_impl = impls::get_auto_register_impl(&input);

    TokenStream::from(quote! {
        #type_path_impl

        #typed_impl

        #reflected_impl

        #auto_register_impl
    })
}

/// Registers a `Reflected` type in `TypeDb::auto_register`.
///
/// For types whose definition cannot carry `#[reflect(auto_register)]`,
/// such as concrete instantiations of generic types.
///
/// ```rust, ignore
/// impl_auto_register!(Vec<Unit>);
/// ```
///
/// Expands to nothing without the `auto_register` feature.
#[proc_macro]
pub fn impl_auto_register(input: TokenStream) -> TokenStream {
    let ty = parse_macro_input!(input as syn::Type);
    let dv_reflect = path::dv_reflect();

    TokenStream::from(impls::impl_auto_register_for(&dv_reflect, quote! { #ty }))
}
