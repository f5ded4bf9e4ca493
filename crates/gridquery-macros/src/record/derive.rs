//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates the `gridquery::Record` implementation (the field accessor map)
//! and field name constants for a struct with named fields.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Result, Type,
};

use super::attrs::{parse_container_attrs, parse_field_attrs, GridType};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut value_arms: Vec<TokenStream> = Vec::new();
    let mut kind_arms: Vec<TokenStream> = Vec::new();
    let mut enum_arms: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let grid_type = match attrs.grid_type {
            Some(t) => t,
            None => continue,
        };

        let query_name = attrs
            .rename
            .unwrap_or_else(|| container.rename_all.apply(&field_name.unraw().to_string()));
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for grid requests.
            pub const #const_name: &'static str = #query_name;
        });

        let (inner_ty, optional) = match option_inner(&field.ty) {
            Some(inner) => (inner, true),
            None => (&field.ty, false),
        };

        let value_expr = value_expr(grid_type);
        let value_arm = if optional {
            quote! {
                #query_name => match &self.#field_name {
                    ::core::option::Option::Some(value) => #value_expr,
                    ::core::option::Option::None => ::gridquery::Value::None,
                },
            }
        } else {
            quote! {
                #query_name => {
                    let value = &self.#field_name;
                    #value_expr
                }
            }
        };
        value_arms.push(value_arm);

        let kind_expr = match grid_type {
            GridType::Text => quote! { ::gridquery::FieldKind::Text },
            GridType::Number => quote! {
                ::gridquery::FieldKind::Number(<#inner_ty as ::gridquery::GridNumber>::KIND)
            },
            GridType::Timestamp => quote! { ::gridquery::FieldKind::Timestamp },
            GridType::Enum => quote! { ::gridquery::FieldKind::Enum },
            GridType::Bool => quote! { ::gridquery::FieldKind::Bool },
        };
        kind_arms.push(quote! {
            #query_name => ::core::option::Option::Some(#kind_expr),
        });

        if grid_type == GridType::Enum {
            enum_arms.push(quote! {
                #query_name => <#inner_ty as ::gridquery::GridEnum>::from_name(raw),
            });
        }
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::gridquery::Record for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::gridquery::Value<'_> {
                match field {
                    #(#value_arms)*
                    _ => ::gridquery::Value::None,
                }
            }

            fn field_kind(field: &str) -> ::core::option::Option<::gridquery::FieldKind> {
                match field {
                    #(#kind_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn parse_enum(field: &str, raw: &str) -> ::core::option::Option<u32> {
                match field {
                    #(#enum_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for a reference named `value` to the field's data.
fn value_expr(grid_type: GridType) -> TokenStream {
    match grid_type {
        GridType::Text => quote! {
            ::gridquery::Value::Text(::core::convert::AsRef::<str>::as_ref(value))
        },
        GridType::Number => quote! {
            ::gridquery::Value::Number(::gridquery::Number::from(*value))
        },
        GridType::Timestamp => quote! {
            ::gridquery::Value::Timestamp(::gridquery::GridTimestamp::grid_timestamp(value))
        },
        GridType::Enum => quote! {
            ::gridquery::Value::Enum(::gridquery::GridEnum::discriminant(value))
        },
        GridType::Bool => quote! { ::gridquery::Value::Bool(*value) },
    }
}

/// Returns `T` for a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("FullName"), "FULL_NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("Id"), "ID");
    }

    #[test]
    fn test_option_inner() {
        let ty: Type = syn::parse_str("Option<String>").unwrap();
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "String");

        let ty: Type = syn::parse_str("std::option::Option<u32>").unwrap();
        assert!(option_inner(&ty).is_some());

        let ty: Type = syn::parse_str("Vec<String>").unwrap();
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let input: DeriveInput = syn::parse_str("struct Pair(u32, u32);").unwrap();
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_generates_accessor_map() {
        let input: DeriveInput = syn::parse_str(
            r#"
            #[grid(rename_all = "PascalCase")]
            struct Person {
                #[grid(Text)]
                full_name: String,
                #[grid(skip)]
                secret: String,
                note: String,
            }
            "#,
        )
        .unwrap();

        let tokens = record_derive_impl(input).unwrap().to_string();
        assert!(tokens.contains("FULL_NAME"));
        assert!(tokens.contains("\"FullName\""));
        assert!(!tokens.contains("secret"));
        assert!(!tokens.contains("note"));
    }
}
