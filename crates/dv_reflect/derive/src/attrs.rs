use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{Attribute, Expr, Ident, LitStr, Path, Token};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Parsed `#[reflect(...)]` attributes of a type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<Path>,
    pub permanent_name: Option<LitStr>,
    /// `Default` is available: register a default constructor.
    pub ctor: bool,
    /// `Clone` is available: register `TypeTraitValue`.
    pub clone: bool,
    /// `Debug` is available: register `TypeTraitPrint`.
    pub debug: bool,
    /// `Serialize` and `Deserialize` are available.
    pub serde: bool,
    pub auto_register: Option<Span>,
    pub meta: Vec<Expr>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_args_with(|input: ParseStream| {
                parse_list(input, &mut out.meta, |ident, input| {
                    match ident.to_string().as_str() {
                        "type_path" => {
                            let lit = parse_value(input)?;
                            out.type_path = Some(lit.parse::<Path>()?);
                        }
                        "permanent_name" => out.permanent_name = Some(parse_value(input)?),
                        "ctor" => out.ctor = true,
                        "clone" => out.clone = true,
                        "debug" => out.debug = true,
                        "serde" => out.serde = true,
                        "auto_register" => out.auto_register = Some(ident.span()),
                        _ => {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("unknown type attribute `{ident}`"),
                            ));
                        }
                    }
                    Ok(())
                })
            })?;
        }
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Parsed `#[reflect(...)]` attributes of a field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub name: Option<LitStr>,
    pub skip: bool,
    pub read_only: bool,
    /// The field holds a base object of the type.
    pub base: bool,
    pub meta: Vec<Expr>,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_args_with(|input: ParseStream| {
                parse_list(input, &mut out.meta, |ident, input| {
                    match ident.to_string().as_str() {
                        "name" => out.name = Some(parse_value(input)?),
                        "skip" => out.skip = true,
                        "read_only" => out.read_only = true,
                        "base" => out.base = true,
                        _ => {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("unknown field attribute `{ident}`"),
                            ));
                        }
                    }
                    Ok(())
                })
            })?;
        }
        if out.base && (out.skip || out.name.is_some()) {
            return Err(syn::Error::new(
                Span::call_site(),
                "a `base` field cannot be renamed or skipped",
            ));
        }
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn reflect_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME))
}

/// Parses `a, b = "..", @expr, ...`, handing identifiers to `on_ident` and
/// collecting `@expr` items into `meta`.
fn parse_list(
    input: ParseStream,
    meta: &mut Vec<Expr>,
    mut on_ident: impl FnMut(&Ident, ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    while !input.is_empty() {
        if input.peek(Token![@]) {
            input.parse::<Token![@]>()?;
            meta.push(input.parse::<Expr>()?);
        } else {
            let ident = input.call(Ident::parse_any)?;
            on_ident(&ident, input)?;
        }

        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(())
}

fn parse_value(input: ParseStream) -> syn::Result<LitStr> {
    input.parse::<Token![=]>()?;
    input.parse()
}
