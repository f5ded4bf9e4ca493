//! Request execution: count, filter, search, recount, sort, page,
//! materialize.

use tracing::{debug, debug_span};

use crate::compose::{filter_predicate, search_predicate};
use crate::error::Result;
use crate::options::GridOptions;
use crate::ordering::apply_sort;
use crate::request::{DataRequest, DataResult};
use crate::source::Queryable;

/// Runs a grid request against a query.
///
/// The steps run once, in this order:
///
/// 1. `recordsTotal` and `recordsFiltered` are set to the source count.
/// 2. Explicit filters are applied as one conjunction.
/// 3. A non-empty search term is applied as a disjunction over searchable
///    columns.
/// 4. If either step narrowed the query, `recordsFiltered` is recounted.
/// 5. With `draw > 0` the query is sorted, then `start` rows are skipped and
///    `length` rows taken. A negative `start` skips nothing and a negative
///    `length` takes nothing. With `draw <= 0` neither sorting nor paging
///    happens.
/// 6. The rows are materialized.
///
/// Any error aborts the whole call.
pub fn to_data_result<Q: Queryable>(
    query: Q,
    request: &DataRequest,
    options: &GridOptions,
) -> Result<DataResult<Q::Row>> {
    let _span = debug_span!("grid_query", draw = request.draw).entered();

    let records_total = query.count();
    let mut records_filtered = records_total;
    let mut query = query;
    let mut narrowed = false;

    if !request.filters.is_empty() {
        let predicate = filter_predicate::<Q::Record>(&request.filters, options)?;
        debug!(%predicate, "applying filters");
        query = query.filter(predicate);
        narrowed = true;
    }

    if let Some(term) = request.search_value() {
        let predicate = search_predicate::<Q::Record>(&request.columns, term, options)?;
        debug!(%predicate, "applying search");
        query = query.filter(predicate);
        narrowed = true;
    }

    if narrowed {
        records_filtered = query.count();
    }

    if request.is_paged() {
        query = apply_sort(query, &request.columns, &request.order, options)?;
        query = query.skip(usize::try_from(request.start).unwrap_or(0));
        query = query.take(usize::try_from(request.length).unwrap_or(0));
    }

    let data = query.materialize();
    debug!(
        records_total,
        records_filtered,
        rows = data.len(),
        "grid query complete"
    );

    Ok(DataResult {
        draw: request.draw,
        records_total,
        records_filtered,
        data,
    })
}

/// Runs grid requests directly on a [`Queryable`].
///
/// ```
/// use gridquery::{AsQueryable, DataRequest, FieldKind, Record, ToDataResult, Value};
///
/// struct Tag(&'static str);
///
/// impl Record for Tag {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Label" => Value::Text(self.0),
///             _ => Value::None,
///         }
///     }
///
///     fn field_kind(field: &str) -> Option<FieldKind> {
///         (field == "Label").then_some(FieldKind::Text)
///     }
/// }
///
/// let tags = vec![Tag("rust"), Tag("trust"), Tag("go")];
/// let request = DataRequest::new(1).searchable("Label").search("rust").page(0, 10);
///
/// let result = tags.as_queryable().to_data_result(&request).unwrap();
/// assert_eq!(result.records_total, 3);
/// assert_eq!(result.records_filtered, 2);
/// ```
pub trait ToDataResult: Queryable {
    /// Runs `request` with default options.
    fn to_data_result(self, request: &DataRequest) -> Result<DataResult<Self::Row>> {
        to_data_result(self, request, &GridOptions::default())
    }

    /// Runs `request` with the given options.
    fn to_data_result_with(
        self,
        request: &DataRequest,
        options: &GridOptions,
    ) -> Result<DataResult<Self::Row>> {
        to_data_result(self, request, options)
    }
}

impl<Q: Queryable> ToDataResult for Q {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::ordering::OrderBy;
    use crate::predicate::Predicate;
    use crate::record::Record;
    use crate::value::{FieldKind, Number, NumberKind, Value};
    use crate::{AsQueryable, GridError, Operand, SliceQuery};

    #[derive(Debug)]
    struct Item {
        id: i64,
        label: &'static str,
    }

    impl Record for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Id" => Value::Number(Number::I64(self.id)),
                "Label" => Value::Text(self.label),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "Id" => Some(FieldKind::Number(NumberKind::Signed)),
                "Label" => Some(FieldKind::Text),
                _ => None,
            }
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 3, label: "gamma" },
            Item { id: 1, label: "alpha" },
            Item { id: 2, label: "beta" },
            Item { id: 4, label: "delta" },
        ]
    }

    fn ids(result: &DataResult<&Item>) -> Vec<i64> {
        result.data.iter().map(|item| item.id).collect()
    }

    /// Counts how often the pipeline asks for a count.
    struct Counting<'a, 'c> {
        inner: SliceQuery<'a, Item>,
        counts: &'c Cell<usize>,
    }

    impl<'a, 'c> Queryable for Counting<'a, 'c> {
        type Record = Item;
        type Row = &'a Item;

        fn count(&self) -> usize {
            self.counts.set(self.counts.get() + 1);
            self.inner.count()
        }

        fn filter(self, predicate: Predicate) -> Self {
            Counting {
                inner: self.inner.filter(predicate),
                ..self
            }
        }

        fn order_by(self, key: OrderBy) -> Self {
            Counting {
                inner: self.inner.order_by(key),
                ..self
            }
        }

        fn skip(self, n: usize) -> Self {
            Counting {
                inner: self.inner.skip(n),
                ..self
            }
        }

        fn take(self, n: usize) -> Self {
            Counting {
                inner: self.inner.take(n),
                ..self
            }
        }

        fn materialize(self) -> Vec<&'a Item> {
            self.inner.materialize()
        }
    }

    #[test]
    fn draw_zero_returns_everything_unsorted() {
        let items = items();
        let request = DataRequest::new(0).column("Id").page(1, 1);
        let result = items.as_queryable().to_data_result(&request).unwrap();

        assert_eq!(result.draw, 0);
        assert_eq!(result.records_total, 4);
        assert_eq!(result.records_filtered, 4);
        assert_eq!(ids(&result), vec![3, 1, 2, 4]);
    }

    #[test]
    fn draw_zero_skips_sort_validation() {
        let items = items();
        let request = DataRequest::new(0).order(99, "asc");
        assert!(items.as_queryable().to_data_result(&request).is_ok());
    }

    #[test]
    fn paged_request_sorts_and_windows() {
        let items = items();
        let request = DataRequest::new(7)
            .column("Id")
            .column("Label")
            .order(1, "desc")
            .page(1, 2);
        let result = items.as_queryable().to_data_result(&request).unwrap();

        assert_eq!(result.draw, 7);
        assert_eq!(ids(&result), vec![4, 2]);
        assert_eq!(result.records_filtered, 4);
    }

    #[test]
    fn negative_window_values() {
        let items = items();
        let request = DataRequest::new(1).column("Id").page(-5, 2);
        let result = items.as_queryable().to_data_result(&request).unwrap();
        assert_eq!(ids(&result), vec![1, 2]);

        let request = DataRequest::new(1).column("Id").page(0, -1);
        let result = items.as_queryable().to_data_result(&request).unwrap();
        assert!(result.data.is_empty());
        assert_eq!(result.records_filtered, 4);
    }

    #[test]
    fn recount_only_when_narrowed() {
        let items = items();
        let counts = Cell::new(0);
        let query = Counting {
            inner: items.as_queryable(),
            counts: &counts,
        };
        let request = DataRequest::new(1).column("Id").page(0, 10);
        query.to_data_result(&request).unwrap();
        assert_eq!(counts.get(), 1);

        counts.set(0);
        let query = Counting {
            inner: items.as_queryable(),
            counts: &counts,
        };
        let request = request.filter(Operand::GreaterThan, "Id", "1");
        let result = query.to_data_result(&request).unwrap();
        assert_eq!(counts.get(), 2);
        assert_eq!(result.records_filtered, 3);
    }

    #[test]
    fn filters_then_search() {
        let items = items();
        let request = DataRequest::new(1)
            .column("Id")
            .searchable("Label")
            .filter(Operand::LessThan, "Id", "4")
            .search("ta")
            .page(0, 10);
        let result = items.as_queryable().to_data_result(&request).unwrap();

        // "beta" and "delta" contain "ta"; delta is filtered out
        assert_eq!(result.records_filtered, 1);
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn errors_abort_the_call() {
        let items = items();
        let request = DataRequest::new(1)
            .column("Id")
            .filter(Operand::Contains, "Id", "1");
        let err = items.as_queryable().to_data_result(&request).unwrap_err();
        assert!(matches!(err, GridError::OperandMismatch { .. }));

        let request = DataRequest::new(1).column("Id").search("x");
        let err = items.as_queryable().to_data_result(&request).unwrap_err();
        assert!(matches!(err, GridError::NoSearchableColumns));
    }
}
