//! Request and response entities of the data-grid protocol.
//!
//! Entities arrive already deserialized; the serde derives use the
//! protocol's camelCase names so hosts can decode them straight from JSON.

use serde::{Deserialize, Serialize};

use crate::operand::Operand;

/// A grid request: columns, filters, search, ordering and a page window.
///
/// `draw` is echoed back unchanged. A `draw` of zero or less asks for every
/// filtered row, unsorted and unpaged.
///
/// ```
/// use gridquery::{DataRequest, Operand};
///
/// let request = DataRequest::new(1)
///     .searchable("Name")
///     .column("Age")
///     .filter(Operand::GreaterThan, "Age", "30")
///     .search("ann")
///     .order(1, "desc")
///     .page(0, 10);
///
/// assert_eq!(request.columns.len(), 2);
/// assert_eq!(request.search_value(), Some("ann"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataRequest {
    pub draw: i32,
    pub columns: Vec<Column>,
    pub filters: Vec<FilterDefinition>,
    pub search: Option<Search>,
    pub order: Vec<Order>,
    pub start: i64,
    pub length: i64,
}

impl DataRequest {
    /// Creates an empty request with the given draw counter.
    pub fn new(draw: i32) -> Self {
        DataRequest {
            draw,
            ..DataRequest::default()
        }
    }

    /// Adds a column that is not searchable.
    pub fn column(mut self, data: impl Into<String>) -> Self {
        self.columns.push(Column::new(data));
        self
    }

    /// Adds a searchable column.
    pub fn searchable(mut self, data: impl Into<String>) -> Self {
        self.columns.push(Column::searchable(data));
        self
    }

    /// Adds an explicit filter clause.
    pub fn filter(
        mut self,
        operand: Operand,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(FilterDefinition::new(operand, field, value));
        self
    }

    /// Sets the free-text search term.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(Search {
            value: value.into(),
        });
        self
    }

    /// Adds a sort entry by column index.
    pub fn order(mut self, column: usize, dir: impl Into<String>) -> Self {
        self.order.push(Order {
            column,
            dir: dir.into(),
        });
        self
    }

    /// Sets the page window.
    pub fn page(mut self, start: i64, length: i64) -> Self {
        self.start = start;
        self.length = length;
        self
    }

    /// Returns the search term when one was supplied and is non-empty.
    pub fn search_value(&self) -> Option<&str> {
        self.search
            .as_ref()
            .map(|search| search.value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// Returns `true` if sorting and paging apply.
    pub fn is_paged(&self) -> bool {
        self.draw > 0
    }
}

/// A column descriptor. Its position in [`DataRequest::columns`] is the index
/// sort entries refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Field name on the record type.
    pub data: String,
    #[serde(default)]
    pub searchable: bool,
}

impl Column {
    pub fn new(data: impl Into<String>) -> Self {
        Column {
            data: data.into(),
            searchable: false,
        }
    }

    pub fn searchable(data: impl Into<String>) -> Self {
        Column {
            data: data.into(),
            searchable: true,
        }
    }
}

/// Free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    #[serde(default)]
    pub value: String,
}

/// A sort entry: column index and direction token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub column: usize,
    #[serde(default)]
    pub dir: String,
}

/// A raw, string-encoded filter condition.
///
/// Explicit filters and the clauses synthesized for search share this
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    pub operand: Operand,
    pub field: String,
    #[serde(default)]
    pub value: String,
}

impl FilterDefinition {
    pub fn new(operand: Operand, field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterDefinition {
            operand,
            field: field.into(),
            value: value.into(),
        }
    }
}

/// The result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResult<R> {
    pub draw: i32,
    /// Row count of the unfiltered source.
    pub records_total: usize,
    /// Row count after filters and search, before paging.
    pub records_filtered: usize,
    pub data: Vec<R>,
}
