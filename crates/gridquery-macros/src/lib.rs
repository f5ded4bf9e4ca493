//! Proc macros for gridquery.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate the field accessor map for a grid record
//!
//! For working examples, see `gridquery/tests/record_derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for grid-queryable structs.
///
/// Only fields carrying a `#[grid(...)]` type attribute are visible to
/// requests; every other field resolves to an unknown field.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Text field (`String`, `&str`, anything `AsRef<str>`) |
/// | `Number` | Numeric field (any primitive integer or float) |
/// | `Timestamp` | Timestamp field - requires `GridTimestamp` impl |
/// | `Enum` | Enum field - requires `GridEnum` impl |
/// | `Bool` | Boolean field |
/// | `skip` | Exclude this field from requests |
/// | `rename = "..."` | Use a custom name in requests |
/// | `ty = "..."` | Spell the type as a string (`ty = "enum"`) |
///
/// `Option<T>` fields are supported for every type; `None` never matches a
/// clause and sorts last.
///
/// # Container Attributes
///
/// `#[grid(rename_all = "PascalCase")]` renames every field without an
/// explicit `rename`. `camelCase` and `snake_case` are also accepted.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Person::FULL_NAME`)
/// 2. `Record::field_value`, `Record::field_kind` and `Record::parse_enum`
///
/// # Example
///
/// ```ignore
/// use gridquery::{AsQueryable, DataRequest, Record, ToDataResult};
///
/// #[derive(Record)]
/// #[grid(rename_all = "PascalCase")]
/// struct Person {
///     #[grid(Number)]
///     id: u32,
///
///     #[grid(Text)]
///     full_name: String,
///
///     #[grid(skip)]
///     password_hash: String,
/// }
///
/// let people = vec![Person { id: 1, full_name: "Ann Lee".into(), password_hash: String::new() }];
/// let request = DataRequest::new(1)
///     .column(Person::ID)
///     .searchable(Person::FULL_NAME)
///     .search("ann");
///
/// let result = people.as_queryable().to_data_result(&request).unwrap();
/// assert_eq!(result.records_filtered, 1);
/// ```
#[proc_macro_derive(Record, attributes(grid))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
