//! Derive macros for floorplan
//!
//! This crate provides the `ClosedSet` derive, which turns a fieldless enum
//! into a closed string enumeration: a canonical string per variant, the
//! ordered list of accepted values, and the schema description that feeds
//! the model's format instructions.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derives `ClosedSet`, `SchemaInfo` and `Display` for a fieldless enum.
///
/// Variant strings default to the variant identifier. They can be changed
/// for the whole enum with `#[closed_set(rename_all = "lowercase")]`
/// (also `"UPPERCASE"`), or per variant with `#[closed_set(rename = "XL")]`.
///
/// # Example
///
/// ```ignore
/// use floorplan::schema::ClosedSet;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, ClosedSet)]
/// #[closed_set(rename_all = "lowercase")]
/// enum Side {
///     North,
///     South,
/// }
///
/// assert_eq!(Side::North.as_str(), "north");
/// assert_eq!(Side::from_canonical("south"), Some(Side::South));
/// ```
#[proc_macro_derive(ClosedSet, attributes(closed_set))]
pub fn derive_closed_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_closed_set(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_closed_set(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let data_enum = match &input.data {
        Data::Enum(data_enum) => data_enum,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "ClosedSet can only be derived for enums",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ClosedSet cannot be derived for generic enums",
        ));
    }

    let case = container_case(&input.attrs)?;

    let mut idents = Vec::new();
    let mut values = Vec::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "ClosedSet variants must not carry fields",
            ));
        }

        let value = match variant_rename(&variant.attrs)? {
            Some(renamed) => renamed,
            None => case.apply(&variant.ident.to_string()),
        };

        if values.contains(&value) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate closed set value `{value}`"),
            ));
        }

        idents.push(&variant.ident);
        values.push(value);
    }

    if idents.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "ClosedSet requires at least one variant",
        ));
    }

    Ok(quote! {
        impl ::floorplan::schema::ClosedSet for #name {
            const SET_NAME: &'static str = #name_str;
            const VARIANTS: &'static [Self] = &[#(Self::#idents),*];

            fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #values,)*
                }
            }

            fn from_canonical(value: &str) -> ::core::option::Option<Self> {
                match value {
                    #(#values => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::floorplan::schema::SchemaInfo for #name {
            fn schema() -> ::floorplan::schema::Schema {
                ::floorplan::schema::Schema::Enum {
                    name: #name_str.to_string(),
                    values: vec![#(#values.to_string()),*],
                }
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(::floorplan::schema::ClosedSet::as_str(self))
            }
        }
    })
}

/// Case conversion applied to variant identifiers.
#[derive(Clone, Copy)]
enum Case {
    Verbatim,
    Lower,
    Upper,
}

impl Case {
    fn apply(self, ident: &str) -> String {
        match self {
            Case::Verbatim => ident.to_string(),
            Case::Lower => ident.to_lowercase(),
            Case::Upper => ident.to_uppercase(),
        }
    }
}

fn container_case(attrs: &[Attribute]) -> syn::Result<Case> {
    let mut case = Case::Verbatim;

    for attr in attrs.iter().filter(|a| a.path().is_ident("closed_set")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                case = match lit.value().as_str() {
                    "lowercase" => Case::Lower,
                    "UPPERCASE" => Case::Upper,
                    other => {
                        return Err(meta.error(format!(
                            "unsupported rename_all value `{other}`, expected \"lowercase\" or \"UPPERCASE\""
                        )))
                    }
                };
                Ok(())
            } else {
                Err(meta.error("unsupported closed_set container attribute"))
            }
        })?;
    }

    Ok(case)
}

fn variant_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("closed_set")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported closed_set variant attribute"))
            }
        })?;
    }

    Ok(rename)
}
