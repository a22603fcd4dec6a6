use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectInput;

/// Generate implementation code for `Reflected`
///
/// The body registers `Self` through a `ReflectionRegistrator`, then the
/// type of every reflected field.
pub(crate) fn impl_trait_reflected(input: &ReflectInput) -> TokenStream {
    let dv_reflect = &input.dv_reflect;
    let registry_ = crate::path::registry_(dv_reflect);
    let attrs = &input.attrs;

    let mut calls = Vec::new();
    let mut dependencies = Vec::new();

    for field in input.active_fields() {
        let member = &field.member;
        let ty = field.ty;

        if field.attrs.base {
            calls.push(quote! {
                .base::<#ty>(|this| &this.#member, |this| &mut this.#member)
            });
        } else {
            let name = field.name();
            calls.push(if field.attrs.read_only {
                quote! { .field_read_only(#name, |this| &this.#member) }
            } else {
                quote! { .field(#name, |this| &this.#member, |this| &mut this.#member) }
            });
            let meta = &field.attrs.meta;
            calls.push(quote! { #(.meta(#meta))* });
        }
        dependencies.push(ty);
    }

    let type_meta = &attrs.meta;
    calls.push(quote! { #(.type_meta(#type_meta))* });

    if attrs.ctor {
        calls.push(quote! { .default_constructor() });
    }
    if attrs.clone {
        calls.push(quote! { .type_trait::<#registry_::TypeTraitValue>() });
    }
    if attrs.debug {
        calls.push(quote! { .type_trait::<#registry_::TypeTraitPrint>() });
    }
    if attrs.serde {
        calls.push(quote! {
            .type_trait::<#registry_::TypeTraitSerialize>()
            .type_trait::<#registry_::TypeTraitDeserialize>()
        });
    }
    if let Some(name) = &attrs.permanent_name {
        calls.push(quote! { .permanent_name(#name) });
    }

    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let reflected_ = quote! { #registry_::Reflected };
    let where_clause = input.where_clause(
        quote! { #reflected_ },
        dependencies.iter().map(|ty| quote! { #ty: #reflected_ + ::core::clone::Clone }),
    );

    quote! {
        impl #impl_generics #reflected_ for #ident #ty_generics #where_clause {
            fn register_reflection(
                db: &mut #registry_::TypeDb,
            ) -> ::core::result::Result<(), #registry_::RegistrationError> {
                #registry_::ReflectionRegistrator::<Self>::begin(db)
                    #(#calls)*
                    .end()?;
                #(db.register::<#dependencies>()?;)*
                ::core::result::Result::Ok(())
            }
        }
    }
}
