//! Composition of request filters and free-text search into predicates.
//!
//! Two independent passes:
//!
//! ```text
//! filters = F1 AND F2 AND ...                      (Always when empty)
//! search  = C1 OR C2 OR ...  over searchable columns
//!   Ci    = field <op> term                        (op from the catalog)
//!         | (field ∋ w1 AND field ∋ w2 AND ...)    (multi-word, name-like text)
//! ```

use tracing::debug;

use crate::clause::Clause;
use crate::error::{GridError, Result};
use crate::operand::Operand;
use crate::options::GridOptions;
use crate::predicate::Predicate;
use crate::record::Record;
use crate::request::{Column, FilterDefinition};

/// Builds the conjunction of the explicit filters.
///
/// Returns [`Predicate::Always`] when `filters` is empty.
pub fn filter_predicate<T: Record>(
    filters: &[FilterDefinition],
    options: &GridOptions,
) -> Result<Predicate> {
    let clauses = filters
        .iter()
        .map(|definition| Clause::from_definition::<T>(definition, options).map(Predicate::from))
        .collect::<Result<Vec<_>>>()?;

    Ok(Predicate::all(clauses))
}

/// Builds the disjunction of the search term over searchable columns.
///
/// Callers only invoke this for a non-empty term. Every searchable column
/// contributes exactly one disjunct.
pub fn search_predicate<T: Record>(
    columns: &[Column],
    term: &str,
    options: &GridOptions,
) -> Result<Predicate> {
    let searchable: Vec<&Column> = columns.iter().filter(|c| c.searchable).collect();
    if searchable.is_empty() {
        return Err(GridError::NoSearchableColumns);
    }

    let words: Vec<&str> = term.split_whitespace().collect();
    debug!(
        columns = searchable.len(),
        words = words.len(),
        "composing search predicate"
    );

    let disjuncts = searchable
        .iter()
        .map(|column| column_predicate::<T>(&column.data, term, &words, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(Predicate::any(disjuncts))
}

fn column_predicate<T: Record>(
    field: &str,
    term: &str,
    words: &[&str],
    options: &GridOptions,
) -> Result<Predicate> {
    let kind = T::field_kind(field).ok_or_else(|| GridError::UnknownField {
        field: field.to_string(),
    })?;
    let operand = Operand::for_search(kind);

    let compiled = if kind.is_text() && words.len() > 1 && options.is_name_like(field) {
        words
            .iter()
            .map(|word| Clause::compile::<T>(field, operand, word, options).map(Predicate::from))
            .collect::<Result<Vec<_>>>()
            .map(Predicate::all)
    } else {
        Clause::compile::<T>(field, operand, term, options).map(Predicate::from)
    };

    match compiled {
        Err(GridError::Coercion { .. }) if options.is_lenient_search() => {
            debug!(field, "search term does not apply to column");
            Ok(Predicate::Never)
        }
        other => other,
    }
}
