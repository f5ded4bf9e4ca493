//! Queryable sources.
//!
//! [`Queryable`] is the capability set the pipeline needs from a data
//! source: lazy filter, ordering and windowing steps, plus `count` and
//! `materialize` to run them. [`SliceQuery`] implements it over borrowed
//! in-memory records; hosts implement it for their own stores.

use std::fmt;

use crate::ordering::{compare_by_orderings, OrderBy};
use crate::predicate::Predicate;
use crate::record::Record;

/// A lazily evaluated collection of records.
///
/// Every builder step consumes the query and returns the extended query;
/// nothing runs until [`Queryable::count`] or [`Queryable::materialize`].
/// Consecutive [`Queryable::order_by`] calls chain: the first is the
/// primary key, later calls break ties.
pub trait Queryable: Sized {
    /// The record shape predicates and sort keys resolve against.
    type Record: Record;
    /// The materialized row type.
    type Row;

    /// Counts the rows the query currently yields.
    fn count(&self) -> usize;

    /// Keeps rows matching `predicate`.
    fn filter(self, predicate: Predicate) -> Self;

    /// Adds the next sort key.
    fn order_by(self, key: OrderBy) -> Self;

    /// Skips the first `n` rows.
    fn skip(self, n: usize) -> Self;

    /// Keeps at most `n` rows.
    fn take(self, n: usize) -> Self;

    /// Runs the query.
    fn materialize(self) -> Vec<Self::Row>;
}

#[derive(Clone)]
enum Step {
    Filter(Predicate),
    OrderBy(OrderBy),
    Skip(usize),
    Take(usize),
}

/// A [`Queryable`] over a borrowed slice.
///
/// Steps are recorded and replayed in call order when the query runs.
/// Sorting is stable.
///
/// ```
/// use gridquery::{AsQueryable, FieldKind, OrderBy, Queryable, Record, Value};
///
/// struct City(&'static str);
///
/// impl Record for City {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Name" => Value::Text(self.0),
///             _ => Value::None,
///         }
///     }
///
///     fn field_kind(field: &str) -> Option<FieldKind> {
///         (field == "Name").then_some(FieldKind::Text)
///     }
/// }
///
/// let cities = vec![City("Oslo"), City("Bern"), City("Rome")];
/// let names: Vec<&str> = cities
///     .as_queryable()
///     .order_by(OrderBy::asc("Name"))
///     .take(2)
///     .materialize()
///     .into_iter()
///     .map(|city| city.0)
///     .collect();
///
/// assert_eq!(names, ["Bern", "Oslo"]);
/// ```
#[derive(Clone)]
pub struct SliceQuery<'a, T> {
    items: &'a [T],
    steps: Vec<Step>,
}

impl<'a, T: Record> SliceQuery<'a, T> {
    /// Creates a query yielding every item of `items`.
    pub fn new(items: &'a [T]) -> Self {
        SliceQuery {
            items,
            steps: Vec::new(),
        }
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    fn run(&self) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = self.items.iter().collect();
        let mut keys: Vec<&OrderBy> = Vec::new();

        for step in &self.steps {
            match step {
                Step::Filter(predicate) => rows.retain(|row| predicate.matches(*row)),
                Step::OrderBy(key) => keys.push(key),
                Step::Skip(n) => {
                    sort(&mut rows, &mut keys);
                    rows.drain(..(*n).min(rows.len()));
                }
                Step::Take(n) => {
                    sort(&mut rows, &mut keys);
                    rows.truncate(*n);
                }
            }
        }

        sort(&mut rows, &mut keys);
        rows
    }
}

// Sorts by the pending keys, then clears them.
fn sort<T: Record>(rows: &mut [&T], keys: &mut Vec<&OrderBy>) {
    if keys.is_empty() {
        return;
    }
    let orderings: Vec<OrderBy> = keys.drain(..).cloned().collect();
    rows.sort_by(|a, b| compare_by_orderings(*a, *b, &orderings));
}

impl<'a, T: Record> Queryable for SliceQuery<'a, T> {
    type Record = T;
    type Row = &'a T;

    fn count(&self) -> usize {
        // ordering never changes a count
        let mut count = self.items.len();
        let mut filtered: Option<Vec<&'a T>> = None;

        for step in &self.steps {
            match step {
                Step::Filter(predicate) => {
                    let rows = filtered.get_or_insert_with(|| self.items.iter().collect());
                    rows.retain(|row| predicate.matches(*row));
                    count = rows.len();
                }
                Step::OrderBy(_) => {}
                Step::Skip(_) | Step::Take(_) => return self.run().len(),
            }
        }

        count
    }

    fn filter(self, predicate: Predicate) -> Self {
        if predicate.is_trivial() {
            return self;
        }
        self.push(Step::Filter(predicate))
    }

    fn order_by(self, key: OrderBy) -> Self {
        self.push(Step::OrderBy(key))
    }

    fn skip(self, n: usize) -> Self {
        self.push(Step::Skip(n))
    }

    fn take(self, n: usize) -> Self {
        self.push(Step::Take(n))
    }

    fn materialize(self) -> Vec<&'a T> {
        self.run()
    }
}

impl<T> fmt::Debug for SliceQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Filter(p) => format!("filter {p}"),
                Step::OrderBy(key) => format!("order by {} {}", key.field, key.dir),
                Step::Skip(n) => format!("skip {n}"),
                Step::Take(n) => format!("take {n}"),
            })
            .collect();

        f.debug_struct("SliceQuery")
            .field("items", &self.items.len())
            .field("steps", &steps)
            .finish()
    }
}

/// Starts a [`SliceQuery`] from a slice or vector.
pub trait AsQueryable<T> {
    fn as_queryable(&self) -> SliceQuery<'_, T>;
}

impl<T: Record> AsQueryable<T> for [T] {
    fn as_queryable(&self) -> SliceQuery<'_, T> {
        SliceQuery::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;
    use crate::operand::Operand;
    use crate::value::{FieldKind, Number, NumberKind, Value};

    #[derive(Debug, PartialEq)]
    struct N(i64);

    impl Record for N {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "n" => Value::Number(Number::I64(self.0)),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            (field == "n").then_some(FieldKind::Number(NumberKind::Signed))
        }
    }

    fn numbers() -> Vec<N> {
        [5, 3, 8, 1, 9, 2].into_iter().map(N).collect()
    }

    fn above(n: i64) -> Predicate {
        Clause::new("n", Operand::GreaterThan, n).into()
    }

    fn values(rows: Vec<&N>) -> Vec<i64> {
        rows.into_iter().map(|n| n.0).collect()
    }

    #[test]
    fn unmodified_query_yields_everything() {
        let items = numbers();
        let query = items.as_queryable();
        assert_eq!(query.count(), 6);
        assert_eq!(values(query.materialize()), vec![5, 3, 8, 1, 9, 2]);
    }

    #[test]
    fn filters_stack() {
        let items = numbers();
        let query = items
            .as_queryable()
            .filter(above(2))
            .filter(Clause::new("n", Operand::LessThan, 9i64).into());
        assert_eq!(query.count(), 3);
        assert_eq!(values(query.materialize()), vec![5, 3, 8]);
    }

    #[test]
    fn order_then_window() {
        let items = numbers();
        let query = items
            .as_queryable()
            .order_by(OrderBy::desc("n"))
            .skip(1)
            .take(3);
        assert_eq!(query.count(), 3);
        assert_eq!(values(query.materialize()), vec![8, 5, 3]);
    }

    #[test]
    fn window_past_the_end() {
        let items = numbers();
        let query = items.as_queryable().skip(10).take(3);
        assert_eq!(query.count(), 0);
        assert!(query.materialize().is_empty());
    }

    #[test]
    fn steps_replay_in_call_order() {
        let items = numbers();
        // take the first three, then filter within them
        let query = items.as_queryable().take(3).filter(above(4));
        assert_eq!(query.count(), 2);
        assert_eq!(values(query.materialize()), vec![5, 8]);
    }

    #[test]
    fn trivial_filter_is_dropped() {
        let items = numbers();
        let query = items.as_queryable().filter(Predicate::Always);
        assert!(format!("{query:?}").contains("steps: []"));
    }

    #[test]
    fn source_is_not_mutated() {
        let items = numbers();
        let _ = items
            .as_queryable()
            .order_by(OrderBy::asc("n"))
            .materialize();
        assert_eq!(items, numbers());
    }
}
