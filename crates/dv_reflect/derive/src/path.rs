//! Paths into `dv_reflect` used by the generated code.
//!
//! The crate itself is resolved once per derive through the caller's
//! manifest, see [`dv_reflect`]. Everything else hangs off that path.

use proc_macro2::TokenStream;
use quote::quote;

/// Gets the path under which the calling crate sees `dv_reflect`.
///
/// `::dv_reflect` for a direct dependency, `::dv_core::reflect` through the
/// facade crate. Reading the manifest is not free, so callers resolve it
/// once and pass it down.
pub(crate) fn dv_reflect() -> syn::Path {
    dv_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("dv_reflect"))
}

#[inline(always)]
pub(crate) fn type_path_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::info::TypePath }
}

#[inline(always)]
pub(crate) fn typed_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::info::Typed }
}

#[inline(always)]
pub(crate) fn type_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::info::Type }
}

#[inline(always)]
pub(crate) fn non_generic_type_cell_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::impls::NonGenericTypeCell }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::impls::GenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_path_cell_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::impls::GenericTypePathCell }
}

#[inline(always)]
pub(crate) fn concat_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::impls::concat }
}

#[inline(always)]
pub(crate) fn registry_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::registry }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(dv_reflect: &syn::Path) -> TokenStream {
    quote! { #dv_reflect::__macro_exports::auto_register }
}
