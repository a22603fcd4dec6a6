use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectInput;

/// Generate implementation code for `TypePath`
pub(crate) fn impl_trait_type_path(input: &ReflectInput) -> TokenStream {
    let dv_reflect = &input.dv_reflect;
    let type_path_ = crate::path::type_path_(dv_reflect);

    let ident = input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    let where_clause = input.where_clause(type_path_.clone(), []);

    let type_path = input.type_path_expr();
    let type_name = input.type_name_expr();
    let type_ident = input.type_ident();
    let module_path = input.module_path();

    let (type_path, type_name) = if input.is_generic() {
        let path_cell_ = crate::path::generic_type_path_cell_(dv_reflect);
        (
            quote! {
                static CELL: #path_cell_ = #path_cell_::new();
                CELL.get_or_insert::<Self>(|| #type_path)
            },
            quote! {
                static CELL: #path_cell_ = #path_cell_::new();
                CELL.get_or_insert::<Self>(|| #type_name)
            },
        )
    } else {
        (type_path, type_name)
    };

    quote! {
        impl #impl_generics #type_path_ for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(#module_path)
            }
        }
    }
}
