use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Index, LitStr, Member, Type};

use crate::attrs::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// ReflectField

/// A field of a derived struct.
pub(crate) struct ReflectField<'a> {
    pub member: Member,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl ReflectField<'_> {
    /// Registered name: the `name` attribute, the identifier, or the
    /// position for tuple structs.
    pub fn name(&self) -> LitStr {
        if let Some(name) = &self.attrs.name {
            return name.clone();
        }
        match &self.member {
            Member::Named(ident) => LitStr::new(&ident.unraw().to_string(), ident.span()),
            Member::Unnamed(index) => LitStr::new(&index.index.to_string(), index.span),
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectInput

/// The parsed derive input.
pub(crate) struct ReflectInput<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<ReflectField<'a>>,
    pub dv_reflect: syn::Path,
}

impl<'a> ReflectInput<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "reflected types cannot have lifetime parameters",
            ));
        }

        let fields = match &input.data {
            Data::Struct(data) => Self::collect_fields(&data.fields)?,
            // Enums and unions are registered without fields.
            Data::Enum(_) | Data::Union(_) => Vec::new(),
        };

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            attrs: TypeAttributes::parse(&input.attrs)?,
            fields,
            dv_reflect: crate::path::dv_reflect(),
        })
    }

    fn collect_fields(fields: &'a Fields) -> syn::Result<Vec<ReflectField<'a>>> {
        fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let member = match &field.ident {
                    Some(ident) => Member::Named(ident.clone()),
                    None => Member::Unnamed(Index {
                        index: index as u32,
                        span: field.span(),
                    }),
                };
                Ok(ReflectField {
                    member,
                    ty: &field.ty,
                    attrs: FieldAttributes::parse(&field.attrs)?,
                })
            })
            .collect()
    }

    /// Checks for type parameters or const parameters.
    pub fn is_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|param| !matches!(param, GenericParam::Lifetime(_)))
    }

    /// Fields taking part in reflection.
    pub fn active_fields(&self) -> impl Iterator<Item = &ReflectField<'a>> {
        self.fields.iter().filter(|field| !field.attrs.skip)
    }

    /// A `where` clause holding the declared predicates, `#bound` on every
    /// type parameter, and `extra`.
    pub fn where_clause(
        &self,
        bound: TokenStream,
        extra: impl IntoIterator<Item = TokenStream>,
    ) -> TokenStream {
        let declared = self
            .generics
            .where_clause
            .iter()
            .flat_map(|clause| clause.predicates.iter());
        let params = self.generics.type_params().map(|param| &param.ident);
        let extra = extra.into_iter();
        quote! {
            where #(#declared,)* #(#params: #bound,)* #(#extra,)*
        }
    }

    // -------------------------------------------------------------------------
    // Names

    pub fn type_ident(&self) -> LitStr {
        let ident = match &self.attrs.type_path {
            Some(path) => path.segments.last().map_or(self.ident, |segment| &segment.ident),
            None => self.ident,
        };
        LitStr::new(&ident.to_string(), ident.span())
    }

    /// The module path as a `&'static str` expression.
    pub fn module_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(path) => {
                let module = path
                    .segments
                    .iter()
                    .take(path.segments.len().saturating_sub(1))
                    .map(|segment| segment.ident.to_string())
                    .collect::<Vec<_>>()
                    .join("::");
                LitStr::new(&module, path.span()).to_token_stream()
            }
            None => quote! { ::core::module_path!() },
        }
    }

    /// `T::type_path()` or `T::type_name()` of every type parameter, and the
    /// value of every const parameter, separated by `", "`.
    fn generic_args(&self, getter: &Ident) -> Vec<TokenStream> {
        let dv_reflect = &self.dv_reflect;
        let type_path_ = crate::path::type_path_(dv_reflect);

        let mut args = Vec::new();
        for param in &self.generics.params {
            let arg = match param {
                GenericParam::Type(param) => {
                    let ident = &param.ident;
                    quote! { <#ident as #type_path_>::#getter() }
                }
                GenericParam::Const(param) => {
                    let ident = &param.ident;
                    quote! { &::std::string::ToString::to_string(&#ident) }
                }
                GenericParam::Lifetime(_) => continue,
            };
            if !args.is_empty() {
                args.push(quote! { ", " });
            }
            args.push(arg);
        }
        args
    }

    /// Expression producing the full type path.
    pub fn type_path_expr(&self) -> TokenStream {
        let module = self.module_path();
        let ident = self.type_ident();
        if !self.is_generic() {
            return quote! { ::core::concat!(#module, "::", #ident) };
        }

        let concat_ = crate::path::concat_(&self.dv_reflect);
        let args = self.generic_args(&Ident::new("type_path", proc_macro2::Span::call_site()));
        quote! {
            #concat_(&[#module, "::", #ident, "<", #(#args,)* ">"])
        }
    }

    /// Expression producing the short type name.
    pub fn type_name_expr(&self) -> TokenStream {
        let ident = self.type_ident();
        if !self.is_generic() {
            return ident.to_token_stream();
        }

        let concat_ = crate::path::concat_(&self.dv_reflect);
        let args = self.generic_args(&Ident::new("type_name", proc_macro2::Span::call_site()));
        quote! {
            #concat_(&[#ident, "<", #(#args,)* ">"])
        }
    }
}
