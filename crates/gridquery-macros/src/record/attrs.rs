//! Attribute parsing for the Record derive macro.
//!
//! Field attributes: `#[grid(Text)]`, `#[grid(Number, rename = "Age")]`,
//! `#[grid(ty = "enum")]`, `#[grid(skip)]`.
//! Container attributes: `#[grid(rename_all = "PascalCase")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Result, Token,
};

/// The kind of a grid field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridType {
    Text,
    Number,
    Timestamp,
    Enum,
    Bool,
}

impl GridType {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" | "String" | "string" => Ok(GridType::Text),
            "Number" | "number" => Ok(GridType::Number),
            "Timestamp" | "timestamp" => Ok(GridType::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(GridType::Enum),
            "Bool" | "bool" | "boolean" => Ok(GridType::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown grid type: '{}'. Expected one of: Text, Number, Timestamp, Enum, Bool",
                    other
                ),
            )),
        }
    }

    fn from_ident(ident: &Ident) -> Result<Self> {
        GridType::parse(&ident.to_string(), ident.span())
    }
}

/// Field-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    pub grid_type: Option<GridType>,
    pub skip: bool,
    pub rename: Option<String>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.grid_type = Some(GridType::from_ident(ident)?);
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected grid type: Text, Number, Timestamp, Enum, Bool, or skip",
                        ));
                    }
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(&nv.value, "rename")?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let ty = string_value(&nv.value, "ty")?;
                    attr.grid_type = Some(GridType::parse(&ty, nv.value.span())?);
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }
                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown grid attribute. Expected: Text, Number, Timestamp, Enum, Bool, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Naming convention applied to every field without an explicit rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameAll {
    #[default]
    None,
    Pascal,
    Camel,
    Snake,
}

impl RenameAll {
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameAll::None | RenameAll::Snake => field.to_string(),
            RenameAll::Pascal => to_pascal_case(field),
            RenameAll::Camel => {
                let pascal = to_pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

/// Container-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    pub rename_all: RenameAll,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let convention = string_value(&nv.value, "rename_all")?;
                    attr.rename_all = match convention.as_str() {
                        "PascalCase" => RenameAll::Pascal,
                        "camelCase" => RenameAll::Camel,
                        "snake_case" => RenameAll::Snake,
                        other => {
                            return Err(Error::new(
                                nv.value.span(),
                                format!(
                                    "unknown rename_all convention: '{}'. Expected one of: PascalCase, camelCase, snake_case",
                                    other
                                ),
                            ))
                        }
                    };
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown container attribute. Expected: rename_all = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

fn string_value(expr: &Expr, name: &str) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(Error::new(
            expr.span(),
            format!("{} must be a string literal", name),
        )),
    }
}

fn to_pascal_case(field: &str) -> String {
    field
        .trim_start_matches("r#")
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Extract `#[grid(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("grid") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Extract `#[grid(...)]` attributes from the struct itself.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("grid") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
