//! Boolean predicate trees over compiled clauses.
//!
//! A [`Predicate`] is plain data, so a [`Queryable`](crate::Queryable)
//! backend can either evaluate it row by row with [`Predicate::matches`] or
//! translate it into its own filter language.
//!
//! Groups are built by folding from an explicit identity: `Always` for
//! conjunction and `Never` for disjunction.

use std::fmt;

use crate::clause::{Clause, ClauseValue};
use crate::record::Record;

/// A predicate over a single record.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Matches every record. Identity of [`Predicate::and`].
    Always,
    /// Matches no record. Identity of [`Predicate::or`].
    Never,
    /// A single-field test.
    Clause(Clause),
    /// Every member must match.
    All(Vec<Predicate>),
    /// At least one member must match.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction of a sequence of predicates, `Always` when empty.
    pub fn all<I>(predicates: I) -> Predicate
    where
        I: IntoIterator<Item = Predicate>,
    {
        predicates.into_iter().fold(Predicate::Always, Predicate::and)
    }

    /// Disjunction of a sequence of predicates, `Never` when empty.
    pub fn any<I>(predicates: I) -> Predicate
    where
        I: IntoIterator<Item = Predicate>,
    {
        predicates.into_iter().fold(Predicate::Never, Predicate::or)
    }

    /// Logical AND. Nested conjunctions are flattened.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::Never, _) | (_, Predicate::Never) => Predicate::Never,
            (Predicate::All(mut left), Predicate::All(right)) => {
                left.extend(right);
                Predicate::All(left)
            }
            (Predicate::All(mut left), p) => {
                left.push(p);
                Predicate::All(left)
            }
            (p, Predicate::All(mut right)) => {
                right.insert(0, p);
                Predicate::All(right)
            }
            (left, right) => Predicate::All(vec![left, right]),
        }
    }

    /// Logical OR. Nested disjunctions are flattened.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Never, p) | (p, Predicate::Never) => p,
            (Predicate::Always, _) | (_, Predicate::Always) => Predicate::Always,
            (Predicate::Any(mut left), Predicate::Any(right)) => {
                left.extend(right);
                Predicate::Any(left)
            }
            (Predicate::Any(mut left), p) => {
                left.push(p);
                Predicate::Any(left)
            }
            (p, Predicate::Any(mut right)) => {
                right.insert(0, p);
                Predicate::Any(right)
            }
            (left, right) => Predicate::Any(vec![left, right]),
        }
    }

    /// Returns `true` if this predicate matches everything.
    pub fn is_trivial(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    /// Evaluates the predicate against a record.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Never => false,
            Predicate::Clause(clause) => clause.matches_record(record),
            Predicate::All(members) => members.iter().all(|p| p.matches(record)),
            Predicate::Any(members) => members.iter().any(|p| p.matches(record)),
        }
    }

    /// Visits every clause in the tree, depth first.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Predicate::Clause(clause) => out.push(clause),
            Predicate::All(members) | Predicate::Any(members) => {
                for member in members {
                    member.collect_clauses(out);
                }
            }
            Predicate::Always | Predicate::Never => {}
        }
    }
}

impl From<Clause> for Predicate {
    fn from(clause: Clause) -> Self {
        Predicate::Clause(clause)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => f.write_str("true"),
            Predicate::Never => f.write_str("false"),
            Predicate::Clause(clause) => {
                write!(f, "{} {} ", clause.field, clause.operand)?;
                match &clause.value {
                    ClauseValue::Text(s) => write!(f, "{s:?}"),
                    ClauseValue::Regex(r) => write!(f, "/{}/", r.as_str()),
                    ClauseValue::Number(n) => write!(f, "{}", n.to_f64()),
                    ClauseValue::Timestamp(t) => write!(f, "@{}", t.as_millis()),
                    ClauseValue::Enum(d) => write!(f, "#{d}"),
                    ClauseValue::Bool(b) => write!(f, "{b}"),
                }
            }
            Predicate::All(members) => join(f, members, " AND "),
            Predicate::Any(members) => join(f, members, " OR "),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, members: &[Predicate], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{member}")?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::Operand;
    use crate::value::{FieldKind, Value};

    struct Word(&'static str);

    impl Record for Word {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "w" => Value::Text(self.0),
                _ => Value::None,
            }
        }

        fn field_kind(field: &str) -> Option<FieldKind> {
            (field == "w").then_some(FieldKind::Text)
        }
    }

    fn has(s: &str) -> Predicate {
        Clause::new("w", Operand::Contains, s).into()
    }

    #[test]
    fn identities() {
        assert!(Predicate::all(Vec::new()).is_trivial());
        assert!(matches!(Predicate::any(Vec::new()), Predicate::Never));
        assert!(matches!(Predicate::Always.and(has("a")), Predicate::Clause(_)));
        assert!(matches!(has("a").or(Predicate::Never), Predicate::Clause(_)));
        assert!(matches!(has("a").and(Predicate::Never), Predicate::Never));
        assert!(matches!(has("a").or(Predicate::Always), Predicate::Always));
    }

    #[test]
    fn groups_flatten() {
        let p = has("a").and(has("b")).and(has("c").and(has("d")));
        assert!(matches!(&p, Predicate::All(m) if m.len() == 4));

        let p = Predicate::any([has("a"), has("b"), has("c")]);
        assert!(matches!(&p, Predicate::Any(m) if m.len() == 3));
        assert_eq!(p.clauses().len(), 3);
    }

    #[test]
    fn mixed_nesting_keeps_precedence() {
        // (a AND b) OR c
        let p = has("a").and(has("b")).or(has("c"));
        assert!(p.matches(&Word("ab")));
        assert!(p.matches(&Word("c")));
        assert!(!p.matches(&Word("a")));
        assert_eq!(p.to_string(), r#"((w Contains "a" AND w Contains "b") OR w Contains "c")"#);
    }

    #[test]
    fn evaluation() {
        assert!(Predicate::Always.matches(&Word("x")));
        assert!(!Predicate::Never.matches(&Word("x")));
        let both = Predicate::all([has("x"), has("y")]);
        assert!(both.matches(&Word("xy")));
        assert!(!both.matches(&Word("x")));
    }
}
