//! Sort keys derived from request column indices.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for a resolved key, and
//! [`sort_keys`] / [`apply_sort`] which turn a request's `order` entries into
//! keys on a [`Queryable`].

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{GridError, Result};
use crate::options::GridOptions;
use crate::record::Record;
use crate::request::{Column, Order};
use crate::source::Queryable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Reads a request direction token.
    ///
    /// Only the configured ascending token means [`Dir::Asc`]; every other
    /// token, typos included, means [`Dir::Desc`].
    pub fn from_token(token: &str, options: &GridOptions) -> Dir {
        if token == options.ascending() {
            Dir::Asc
        } else {
            Dir::Desc
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two records by this key.
    pub fn compare<T: Record>(&self, a: &T, b: &T) -> Ordering {
        let a = a.field_value(&self.field);
        let b = b.field_value(&self.field);
        // nulls and NaN stay last in both directions
        match (sorts_last(&a), sorts_last(&b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare_values(&a, &b)
                .map(|ordering| self.dir.apply(ordering))
                .unwrap_or(Ordering::Equal),
        }
    }
}

fn sorts_last(value: &Value<'_>) -> bool {
    match value {
        Value::None => true,
        Value::Number(n) => n.to_f64().is_nan(),
        _ => false,
    }
}

/// Compares two non-null values of the same type.
///
/// Returns `None` if the types don't match or comparison is not possible
/// (NaN). Text compares ordinally.
pub fn compare_values<'a>(a: &Value<'a>, b: &Value<'a>) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Compares two records using a list of sort keys.
///
/// The first key is the primary sort key, the second breaks ties, and so on.
pub fn compare_by_orderings<T: Record>(a: &T, b: &T, orderings: &[OrderBy]) -> Ordering {
    orderings
        .iter()
        .map(|order_by| order_by.compare(a, b))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Resolves request sort entries into sort keys for the record type `T`.
///
/// With no entries, sorts ascending by the first column. Entries become
/// keys in listed order. Every field must exist on `T`.
pub fn sort_keys<T: Record>(
    columns: &[Column],
    order: &[Order],
    options: &GridOptions,
) -> Result<Vec<OrderBy>> {
    let keys = if order.is_empty() {
        let first = columns.first().ok_or(GridError::NoColumns)?;
        vec![OrderBy::asc(&first.data)]
    } else {
        order
            .iter()
            .map(|entry| -> Result<OrderBy> {
                let column = columns.get(entry.column).ok_or(GridError::ColumnIndex {
                    index: entry.column,
                    len: columns.len(),
                })?;
                Ok(OrderBy::new(&column.data, Dir::from_token(&entry.dir, options)))
            })
            .collect::<Result<Vec<_>>>()?
    };

    if let Some(unknown) = keys.iter().find(|key| T::field_kind(&key.field).is_none()) {
        return Err(GridError::UnknownField {
            field: unknown.field.clone(),
        });
    }

    Ok(keys)
}

/// Applies the request's sort entries to a query.
pub fn apply_sort<Q: Queryable>(
    query: Q,
    columns: &[Column],
    order: &[Order],
    options: &GridOptions,
) -> Result<Q> {
    let keys = sort_keys::<Q::Record>(columns, order, options)?;
    debug!(keys = ?keys, "applying sort");
    Ok(keys.into_iter().fold(query, Q::order_by))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldKind, Number, NumberKind};

    #[derive(Debug, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
        rank: Option<i64>,
    }

    impl Record for Row {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Id" => Value::Number(Number::I64(self.id)),
                "Name" => Value::Text(self.name),
                "Rank" => self
                    .rank
                    .map_or(Value::None, |rank| Value::Number(Number::I64(rank))),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            match field {
                "Id" | "Rank" => Some(FieldKind::Number(NumberKind::Signed)),
                "Name" => Some(FieldKind::Text),
                _ => None,
            }
        }
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("Id"), Column::new("Name"), Column::new("Rank")]
    }

    fn order(column: usize, dir: &str) -> Order {
        Order {
            column,
            dir: dir.to_string(),
        }
    }

    #[test]
    fn direction_tokens() {
        let options = GridOptions::default();
        assert_eq!(Dir::from_token("asc", &options), Dir::Asc);
        assert_eq!(Dir::from_token("desc", &options), Dir::Desc);
        assert_eq!(Dir::from_token("ASC", &options), Dir::Desc);
        assert_eq!(Dir::from_token("acs", &options), Dir::Desc);
        assert_eq!(Dir::from_token("", &options), Dir::Desc);

        let options = GridOptions::new().ascending_token("up");
        assert_eq!(Dir::from_token("up", &options), Dir::Asc);
        assert_eq!(Dir::from_token("asc", &options), Dir::Desc);
    }

    struct Scored(f64);

    impl Record for Scored {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Score" => Value::Number(Number::F64(self.0)),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            (field == "Score").then_some(FieldKind::Number(NumberKind::Float))
        }
    }

    #[test]
    fn nan_sorts_last_in_both_directions() {
        let mut rows: Vec<Scored> = (0..200)
            .map(|i| {
                if i % 7 == 0 {
                    Scored(f64::NAN)
                } else {
                    Scored(f64::from((i * 37) % 101))
                }
            })
            .collect();

        for key in [OrderBy::asc("Score"), OrderBy::desc("Score")] {
            rows.sort_by(|a, b| key.compare(a, b));
            let numbers: Vec<f64> = rows.iter().map(|r| r.0).filter(|n| !n.is_nan()).collect();
            let sorted = numbers.windows(2).all(|w| match key.dir {
                Dir::Asc => w[0] <= w[1],
                Dir::Desc => w[0] >= w[1],
            });
            assert!(sorted, "{} sort is out of order", key.dir);

            let first_nan = rows.iter().position(|r| r.0.is_nan()).unwrap();
            assert_eq!(first_nan, numbers.len());
            assert!(rows[first_nan..].iter().all(|r| r.0.is_nan()));
        }
    }

    #[test]
    fn default_key_is_first_column() {
        let keys = sort_keys::<Row>(&columns(), &[], &GridOptions::default()).unwrap();
        assert_eq!(keys, vec![OrderBy::asc("Id")]);
    }

    #[test]
    fn default_key_needs_a_column() {
        let err = sort_keys::<Row>(&[], &[], &GridOptions::default()).unwrap_err();
        assert!(matches!(err, GridError::NoColumns));
        assert!(err.is_index_error());
    }

    #[test]
    fn keys_follow_listed_order() {
        let keys = sort_keys::<Row>(
            &columns(),
            &[order(1, "desc"), order(0, "asc")],
            &GridOptions::default(),
        )
        .unwrap();
        assert_eq!(keys, vec![OrderBy::desc("Name"), OrderBy::asc("Id")]);
    }

    #[test]
    fn out_of_range_column() {
        let err = sort_keys::<Row>(&columns(), &[order(99, "asc")], &GridOptions::default())
            .unwrap_err();
        assert!(matches!(err, GridError::ColumnIndex { index: 99, len: 3 }));
    }

    #[test]
    fn unknown_sort_field() {
        let columns = vec![Column::new("Nope")];
        assert!(matches!(
            sort_keys::<Row>(&columns, &[], &GridOptions::default()),
            Err(GridError::UnknownField { .. })
        ));
    }

    #[test]
    fn multi_key_comparison_with_nulls_last() {
        let mut rows = vec![
            Row { id: 1, name: "b", rank: None },
            Row { id: 2, name: "a", rank: Some(2) },
            Row { id: 3, name: "b", rank: Some(1) },
            Row { id: 4, name: "a", rank: Some(1) },
        ];
        let keys = vec![OrderBy::desc("Rank"), OrderBy::asc("Name")];
        rows.sort_by(|a, b| compare_by_orderings(a, b, &keys));

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
