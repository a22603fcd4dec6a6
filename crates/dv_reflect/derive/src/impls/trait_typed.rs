use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectInput;

/// Generate implementation code for `Typed`
pub(crate) fn impl_trait_typed(input: &ReflectInput) -> TokenStream {
    let dv_reflect = &input.dv_reflect;
    let typed_ = crate::path::typed_(dv_reflect);
    let type_ = crate::path::type_(dv_reflect);

    let cell_tokens = if input.is_generic() {
        let info_cell_ = crate::path::generic_type_info_cell_(dv_reflect);
        quote! {
            static CELL: #info_cell_ = #info_cell_::new();
            CELL.get_or_insert::<Self>(#type_::new::<Self>)
        }
    } else {
        let info_cell_ = crate::path::non_generic_type_cell_(dv_reflect);
        quote! {
            static CELL: #info_cell_ = #info_cell_::new();
            CELL.get_or_init(#type_::new::<Self>)
        }
    };

    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = input.where_clause(typed_.clone(), []);

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn ty() -> &'static #type_ {
                #cell_tokens
            }
        }
    }
}
