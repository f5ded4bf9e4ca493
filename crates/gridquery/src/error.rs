//! Error types for the gridquery crate.

use thiserror::Error;

use crate::operand::Operand;
use crate::value::FieldKind;

/// Errors that abort a grid query.
///
/// None of these are recovered inside the pipeline: a bad filter, sort entry
/// or search configuration fails the whole call.
#[derive(Debug, Error)]
pub enum GridError {
    /// The record type has no field with this name.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// A raw request value could not be converted to the field's type.
    #[error("cannot convert '{value}' to {expected} for field '{field}'")]
    Coercion {
        field: String,
        expected: &'static str,
        value: String,
    },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Operand is not valid for the field's type.
    #[error("operand '{operand}' is not valid for {kind} field '{field}'")]
    OperandMismatch {
        operand: Operand,
        field: String,
        kind: FieldKind,
    },

    /// A sort entry references a column outside the column list.
    #[error("column index {index} is out of range for {len} columns")]
    ColumnIndex { index: usize, len: usize },

    /// Default sorting needs at least one column.
    #[error("cannot apply default sort: request has no columns")]
    NoColumns,

    /// A search term was supplied but no column is searchable.
    #[error("search term supplied but no column is searchable")]
    NoSearchableColumns,
}

impl GridError {
    /// Returns `true` for column index errors (out of range or no columns).
    pub fn is_index_error(&self) -> bool {
        matches!(self, GridError::ColumnIndex { .. } | GridError::NoColumns)
    }

    pub(crate) fn coercion(field: &str, expected: &'static str, value: &str) -> Self {
        GridError::Coercion {
            field: field.to_string(),
            expected,
            value: value.to_string(),
        }
    }
}

/// Result type for gridquery operations.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_grouping() {
        assert!(GridError::NoColumns.is_index_error());
        assert!(GridError::ColumnIndex { index: 9, len: 3 }.is_index_error());
        assert!(!GridError::NoSearchableColumns.is_index_error());
    }

    #[test]
    fn messages() {
        let err = GridError::coercion("Age", "signed integer", "abc");
        assert_eq!(
            err.to_string(),
            "cannot convert 'abc' to signed integer for field 'Age'"
        );

        let err = GridError::OperandMismatch {
            operand: Operand::Contains,
            field: "Age".into(),
            kind: FieldKind::Bool,
        };
        assert_eq!(
            err.to_string(),
            "operand 'Contains' is not valid for bool field 'Age'"
        );
    }
}
