use proc_macro2::TokenStream;

use crate::derive_data::ReflectInput;

/// Generate `auto_register` implementation
///
/// Generic types are skipped: the instantiations to register are unknown.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(input: &ReflectInput) -> TokenStream {
    match input.attrs.auto_register {
        Some(span) if !input.is_generic() => {
            let ident = input.ident;
            let ty = quote::quote_spanned! { span => #ident };
            impl_auto_register_for(&input.dv_reflect, ty)
        }
        _ => TokenStream::new(),
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectInput) -> TokenStream {
    TokenStream::new()
}

/// Submits `<ty as Reflected>::register_reflection` to the static list read by
/// `TypeDb::auto_register`.
#[cfg(feature = "auto_register")]
pub(crate) fn impl_auto_register_for(dv_reflect: &syn::Path, ty: TokenStream) -> TokenStream {
    let auto_register_ = crate::path::auto_register_(dv_reflect);
    quote::quote! {
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(
                <#ty as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn impl_auto_register_for(_: &syn::Path, _: TokenStream) -> TokenStream {
    TokenStream::new()
}
