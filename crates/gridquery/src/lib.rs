//! Gridquery - declarative data-grid queries over typed record sources.
//!
//! Given a [`Queryable`] source and a [`DataRequest`] (column filters, a
//! free-text search term, sort orders and a page window), gridquery
//! produces a [`DataResult`] with the total count, the filtered count and
//! the requested page, without per-field code in the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use gridquery::{
//!     AsQueryable, DataRequest, FieldKind, Number, NumberKind, Operand, Record, ToDataResult,
//!     Value,
//! };
//!
//! struct Person {
//!     id: u32,
//!     full_name: String,
//!     active: bool,
//! }
//!
//! impl Record for Person {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "Id" => Value::Number(Number::from(self.id)),
//!             "FullName" => Value::Text(&self.full_name),
//!             "Active" => Value::Bool(self.active),
//!             _ => Value::None,
//!         }
//!     }
//!
//!     fn field_kind(field: &str) -> Option<FieldKind> {
//!         match field {
//!             "Id" => Some(FieldKind::Number(NumberKind::Unsigned)),
//!             "FullName" => Some(FieldKind::Text),
//!             "Active" => Some(FieldKind::Bool),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let people = vec![
//!     Person { id: 1, full_name: "Ann Lee".into(), active: true },
//!     Person { id: 2, full_name: "Bob Ann".into(), active: true },
//!     Person { id: 3, full_name: "Cid Dan".into(), active: false },
//! ];
//!
//! let request = DataRequest::new(1)
//!     .column("Id")
//!     .searchable("FullName")
//!     .filter(Operand::Equal, "Active", "true")
//!     .search("ann")
//!     .order(0, "desc")
//!     .page(0, 10);
//!
//! let result = people.as_queryable().to_data_result(&request).unwrap();
//! assert_eq!(result.records_total, 3);
//! assert_eq!(result.records_filtered, 2);
//! assert_eq!(result.data[0].id, 2);
//! ```
//!
//! # Request Semantics
//!
//! ```text
//! rows = source
//!      ∧ (F1 ∧ F2 ∧ ...)                     explicit filters
//!      ∧ (C1 ∨ C2 ∨ ...)                     search over searchable columns
//! ```
//!
//! - Text columns are searched by case-insensitive containment, other
//!   columns by equality with the whole term.
//! - On text columns whose name contains `"Name"`, a multi-word term must
//!   match every word.
//! - `draw <= 0` returns every filtered row, unsorted and unpaged.
//! - Without sort entries the first column sorts ascending.
//!
//! # Field Types and Operands
//!
//! | Kind | Operands |
//! |------|----------|
//! | Text | all |
//! | Number | `Equal`, `NotEqual`, `GreaterThan`, `GreaterThanOrEqual`, `LessThan`, `LessThanOrEqual` |
//! | Timestamp | same as Number |
//! | Enum | `Equal`, `NotEqual` |
//! | Bool | `Equal`, `NotEqual` |

mod clause;
mod compose;
mod error;
mod operand;
mod options;
mod ordering;
mod pipeline;
mod predicate;
mod record;
mod request;
mod source;
mod value;

pub use clause::{Clause, ClauseValue};
pub use compose::{filter_predicate, search_predicate};
pub use error::{GridError, Result};
pub use operand::{Operand, UnknownOperand};
pub use options::{contains_name, GridOptions};
pub use ordering::{apply_sort, compare_by_orderings, compare_values, sort_keys, Dir, OrderBy};
pub use pipeline::{to_data_result, ToDataResult};
pub use predicate::Predicate;
pub use record::{GridEnum, GridNumber, GridTimestamp, Record};
pub use request::{Column, DataRequest, DataResult, FilterDefinition, Order, Search};
pub use source::{AsQueryable, Queryable, SliceQuery};
pub use value::{FieldKind, Number, NumberKind, Timestamp, Value};

#[cfg(feature = "derive")]
pub use gridquery_macros::Record;
