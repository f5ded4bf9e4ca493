//! Compilation of raw filter conditions into typed clauses.
//!
//! A [`Clause`] is a single-field test: a field name, an operand and a value
//! already converted to the field's native type. Clauses are compiled
//! against a [`Record`] type, so a clause that compiles can only fail to
//! match, never fail to evaluate.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::trace;

use crate::error::{GridError, Result};
use crate::operand::Operand;
use crate::options::GridOptions;
use crate::record::{GridTimestamp, Record};
use crate::request::FilterDefinition;
use crate::value::{FieldKind, Number, NumberKind, Timestamp, Value};

/// A compiled single-field predicate.
///
/// # Example
///
/// ```
/// use gridquery::{Clause, Operand, Value};
///
/// let clause = Clause::new("Name", Operand::StartsWith, "An");
/// assert!(clause.matches(&Value::Text("Ann")));
/// assert!(!clause.matches(&Value::Text("Dan")));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operand.
    pub operand: Operand,
    /// The value to compare against.
    pub value: ClauseValue,
    case_sensitive: bool,
}

impl Clause {
    /// Creates a clause from an already typed value.
    ///
    /// No field resolution or operand check happens here; text matching is
    /// case-sensitive.
    pub fn new(field: impl Into<String>, operand: Operand, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            operand,
            value: value.into(),
            case_sensitive: true,
        }
    }

    /// Compiles a raw condition against the record type `T`.
    ///
    /// Resolves `field`, checks that `operand` applies to its type and
    /// converts `raw` into that type.
    pub fn compile<T: Record>(
        field: &str,
        operand: Operand,
        raw: &str,
        options: &GridOptions,
    ) -> Result<Clause> {
        let kind = T::field_kind(field).ok_or_else(|| GridError::UnknownField {
            field: field.to_string(),
        })?;

        if !operand.supports(kind) {
            return Err(GridError::OperandMismatch {
                operand,
                field: field.to_string(),
                kind,
            });
        }

        let case_sensitive = options.is_case_sensitive();
        let value = coerce::<T>(field, kind, operand, raw, case_sensitive)?;
        trace!(field, %operand, ?value, "compiled clause");

        Ok(Clause {
            field: field.to_string(),
            operand,
            value,
            case_sensitive,
        })
    }

    /// Compiles a [`FilterDefinition`] against the record type `T`.
    pub fn from_definition<T: Record>(
        definition: &FilterDefinition,
        options: &GridOptions,
    ) -> Result<Clause> {
        Clause::compile::<T>(
            &definition.field,
            definition.operand,
            &definition.value,
            options,
        )
    }

    /// Returns `true` if text matching respects case.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Evaluates this clause against a field value.
    ///
    /// Null values and values of another type never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::Text(pattern), Value::Text(s)) => self.match_text(s, pattern),
            (ClauseValue::Regex(regex), Value::Text(s)) => regex.is_match(s),
            (ClauseValue::Number(clause), Value::Number(field)) => field
                .compare(*clause)
                .is_some_and(|ordering| self.operand.eval_ordering(ordering)),
            (ClauseValue::Timestamp(clause), Value::Timestamp(field)) => {
                self.operand.eval_ordering(field.cmp(clause))
            }
            (ClauseValue::Enum(clause), Value::Enum(field)) => {
                self.operand.eval_ordering(field.cmp(clause))
            }
            (ClauseValue::Bool(clause), Value::Bool(field)) => {
                self.operand.eval_ordering(field.cmp(clause))
            }
            _ => false,
        }
    }

    /// Evaluates this clause against a record.
    pub fn matches_record<T: Record>(&self, record: &T) -> bool {
        self.matches(&record.field_value(&self.field))
    }

    // `pattern` is already folded when matching ignores case.
    fn match_text(&self, field: &str, pattern: &str) -> bool {
        let folded;
        let field = if self.case_sensitive {
            field
        } else {
            folded = field.to_lowercase();
            folded.as_str()
        };

        match self.operand {
            Operand::Equal => field == pattern,
            Operand::NotEqual => field != pattern,
            Operand::Contains => field.contains(pattern),
            Operand::StartsWith => field.starts_with(pattern),
            Operand::EndsWith => field.ends_with(pattern),
            op => op.eval_ordering(field.cmp(pattern)),
        }
    }
}

/// Owned, typed value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// Text pattern, already lowercased for case-insensitive clauses.
    Text(String),
    /// Number in the field's representation.
    Number(Number),
    /// Timestamp in milliseconds.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Compiled pattern for the `Regex` operand.
    Regex(Regex),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::Text(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::Text(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::I64(n))
    }
}

impl From<u64> for ClauseValue {
    fn from(n: u64) -> Self {
        ClauseValue::Number(Number::U64(n))
    }
}

impl From<f64> for ClauseValue {
    fn from(n: f64) -> Self {
        ClauseValue::Number(Number::F64(n))
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

fn coerce<T: Record>(
    field: &str,
    kind: FieldKind,
    operand: Operand,
    raw: &str,
    case_sensitive: bool,
) -> Result<ClauseValue> {
    let fail = || GridError::coercion(field, kind.as_str(), raw);
    let trimmed = raw.trim();

    let value = match kind {
        FieldKind::Text if operand == Operand::Regex => ClauseValue::Regex(Regex::new(raw)?),
        FieldKind::Text if case_sensitive => ClauseValue::Text(raw.to_string()),
        FieldKind::Text => ClauseValue::Text(raw.to_lowercase()),
        FieldKind::Number(NumberKind::Signed) => {
            ClauseValue::Number(Number::I64(trimmed.parse().map_err(|_| fail())?))
        }
        FieldKind::Number(NumberKind::Unsigned) => {
            ClauseValue::Number(Number::U64(trimmed.parse().map_err(|_| fail())?))
        }
        FieldKind::Number(NumberKind::Float) => {
            ClauseValue::Number(Number::F64(trimmed.parse().map_err(|_| fail())?))
        }
        FieldKind::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                ClauseValue::Bool(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                ClauseValue::Bool(false)
            } else {
                return Err(fail());
            }
        }
        FieldKind::Timestamp => ClauseValue::Timestamp(parse_timestamp(trimmed).ok_or_else(fail)?),
        FieldKind::Enum => ClauseValue::Enum(
            T::parse_enum(field, trimmed)
                .or_else(|| trimmed.parse().ok())
                .ok_or_else(fail)?,
        ),
    };

    Ok(value)
}

/// Parses RFC 3339, naive date-times (taken as UTC), plain dates (midnight
/// UTC) and integer milliseconds.
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.grid_timestamp());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.grid_timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.grid_timestamp());
    }
    raw.parse().ok().map(Timestamp::from_millis)
}
