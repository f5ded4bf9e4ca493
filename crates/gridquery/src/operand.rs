//! Comparison operands and their applicability to field types.
//!
//! The [`Operand`] enum is closed. Not every operand is valid for every
//! field kind; [`Operand::supports`] is the single place that decides.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::FieldKind;

/// Comparison kind of a filter clause.
///
/// Operands are grouped by the field kinds they support:
/// - **Universal**: `Equal`, `NotEqual`
/// - **Ordering**: `GreaterThan`, `GreaterThanOrEqual`, `LessThan`,
///   `LessThanOrEqual` (text, numbers, timestamps)
/// - **Text only**: `Contains`, `StartsWith`, `EndsWith`, `Regex`
///
/// On the wire an operand is its integer code (declaration order) or its
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    // Universal operands
    /// Equal. Valid for all kinds.
    Equal,
    /// Not equal. Valid for all kinds.
    NotEqual,

    // Ordering operands
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,

    // Text operands
    /// Text contains substring.
    Contains,
    /// Text starts with prefix.
    StartsWith,
    /// Text ends with suffix.
    EndsWith,
    /// Text matches regular expression. Always case-sensitive.
    Regex,
}

impl Operand {
    /// All operands in code order.
    pub const ALL: [Operand; 10] = [
        Operand::Equal,
        Operand::NotEqual,
        Operand::GreaterThan,
        Operand::GreaterThanOrEqual,
        Operand::LessThan,
        Operand::LessThanOrEqual,
        Operand::Contains,
        Operand::StartsWith,
        Operand::EndsWith,
        Operand::Regex,
    ];

    /// Looks up an operand by its integer code.
    pub fn from_code(code: u8) -> Option<Operand> {
        Operand::ALL.get(code as usize).copied()
    }

    /// Returns the integer code of this operand.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if this operand only makes sense on text.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            Operand::Contains | Operand::StartsWith | Operand::EndsWith | Operand::Regex
        )
    }

    /// Returns `true` if this operand compares by ordering.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operand::GreaterThan
                | Operand::GreaterThanOrEqual
                | Operand::LessThan
                | Operand::LessThanOrEqual
        )
    }

    /// Returns `true` if this operand may be applied to a field of `kind`.
    pub fn supports(self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Text => true,
            FieldKind::Number(_) | FieldKind::Timestamp => !self.is_text_only(),
            FieldKind::Enum | FieldKind::Bool => {
                matches!(self, Operand::Equal | Operand::NotEqual)
            }
        }
    }

    /// The operand free-text search uses for a field of `kind`.
    ///
    /// Text fields are searched by containment, every other kind by
    /// equality with the whole search term.
    pub fn for_search(kind: FieldKind) -> Operand {
        if kind.is_text() {
            Operand::Contains
        } else {
            Operand::Equal
        }
    }

    /// Evaluates an ordering-based comparison.
    ///
    /// `ordering` is the field value compared to the clause value.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operand::Equal => ordering == Ordering::Equal,
            Operand::NotEqual => ordering != Ordering::Equal,
            Operand::GreaterThan => ordering == Ordering::Greater,
            Operand::GreaterThanOrEqual => ordering != Ordering::Less,
            Operand::LessThan => ordering == Ordering::Less,
            Operand::LessThanOrEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operand.
    pub fn as_str(self) -> &'static str {
        match self {
            Operand::Equal => "Equal",
            Operand::NotEqual => "NotEqual",
            Operand::GreaterThan => "GreaterThan",
            Operand::GreaterThanOrEqual => "GreaterThanOrEqual",
            Operand::LessThan => "LessThan",
            Operand::LessThanOrEqual => "LessThanOrEqual",
            Operand::Contains => "Contains",
            Operand::StartsWith => "StartsWith",
            Operand::EndsWith => "EndsWith",
            Operand::Regex => "Regex",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operand name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperand(pub String);

impl fmt::Display for UnknownOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operand '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperand {}

impl FromStr for Operand {
    type Err = UnknownOperand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operand::ALL
            .iter()
            .copied()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOperand(s.to_string()))
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OperandRepr {
    Code(u8),
    Name(String),
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match OperandRepr::deserialize(deserializer)? {
            OperandRepr::Code(code) => Operand::from_code(code).ok_or_else(|| {
                serde::de::Error::custom(format!("unknown operand code {code}"))
            }),
            OperandRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
