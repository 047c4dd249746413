//! Filter predicate language for reads.
//!
//! # Responsibility
//! - Define the comparison operators and per-field constraints applied to
//!   row entries during a read.
//! - Parse the textual `field<op>value` form used by callers holding
//!   filter expressions as strings.
//!
//! # Invariants
//! - Constraints on one read combine conjunctively; order of application
//!   never changes the result.
//! - A constraint on a field the row does not carry matches nothing, as
//!   does a comparison between incomparable cell kinds.

use crate::model::record::Entry;
use crate::model::value::Cell;
use crate::store::{StoreError, StoreResult};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// `name<op>value`, e.g. `age<=30` or `name==Ada`. Whitespace around the
/// operator is tolerated.
static TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(<=|>=|==|<|>)\s*(.*?)\s*$")
        .expect("term pattern is a valid regex")
});

/// Comparison operator of a filter constraint.
///
/// The set is closed; anything else is rejected at the parsing boundary and
/// never reaches evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Op {
    /// Parses an operator token. Unknown tokens are an `InvalidConstraint`
    /// error, not a silent no-match.
    pub fn parse(token: &str) -> StoreResult<Self> {
        match token {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "==" => Ok(Self::Eq),
            ">=" => Ok(Self::Ge),
            ">" => Ok(Self::Gt),
            other => Err(StoreError::InvalidConstraint {
                operator: other.to_string(),
            }),
        }
    }

    /// The token form, for messages and logs.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ge => ordering != Ordering::Less,
            Self::Gt => ordering == Ordering::Greater,
        }
    }
}

/// One per-field predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub op: Op,
    pub value: Cell,
}

impl Constraint {
    pub fn new(op: Op, value: impl Into<Cell>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }

    /// Whether `cell` satisfies this constraint. Incomparable operands
    /// never satisfy anything.
    pub fn matches(&self, cell: &Cell) -> bool {
        cell.compare(&self.value)
            .is_some_and(|ordering| self.op.accepts(ordering))
    }
}

/// Conjunction of per-field constraints applied to a read.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    constraints: Vec<(String, Constraint)>,
}

impl Filters {
    /// No constraints; every row matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bare-value equality constraint.
    pub fn field(mut self, name: &str, value: impl Into<Cell>) -> Self {
        self.constraints
            .push((name.to_string(), Constraint::new(Op::Eq, value)));
        self
    }

    /// Adds an explicit operator constraint.
    pub fn field_op(mut self, name: &str, op: Op, value: impl Into<Cell>) -> Self {
        self.constraints
            .push((name.to_string(), Constraint::new(op, value)));
        self
    }

    /// Adds a constraint parsed from `field<op>value` text.
    ///
    /// The value parses as int, then float, then RFC 3339 timestamp, then
    /// falls back to text. Malformed terms and unknown operators are
    /// `InvalidConstraint` errors.
    pub fn term(mut self, term: &str) -> StoreResult<Self> {
        let captures = TERM_PATTERN
            .captures(term)
            .ok_or_else(|| StoreError::InvalidConstraint {
                operator: term.to_string(),
            })?;
        let name = &captures[1];
        let op = Op::parse(&captures[2])?;
        let value = parse_term_value(&captures[3]);
        self.constraints
            .push((name.to_string(), Constraint::new(op, value)));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether `entry` satisfies every constraint.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.constraints.iter().all(|(name, constraint)| {
            entry
                .get(name)
                .is_some_and(|cell| constraint.matches(cell))
        })
    }
}

fn parse_term_value(text: &str) -> Cell {
    if let Ok(int) = text.parse::<i64>() {
        return Cell::Int(int);
    }
    if let Ok(float) = text.parse::<f64>() {
        return Cell::Float(float);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Cell::Timestamp(timestamp.to_utc());
    }
    Cell::from(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(age: i64) -> Entry {
        Entry::from_row(
            &["name".to_string(), "age".to_string()],
            &[Cell::from("Ada"), Cell::Int(age)],
        )
    }

    #[test]
    fn operator_tokens_parse_exhaustively() {
        assert_eq!(Op::parse("<").unwrap(), Op::Lt);
        assert_eq!(Op::parse("<=").unwrap(), Op::Le);
        assert_eq!(Op::parse("==").unwrap(), Op::Eq);
        assert_eq!(Op::parse(">=").unwrap(), Op::Ge);
        assert_eq!(Op::parse(">").unwrap(), Op::Gt);
    }

    #[test]
    fn unknown_operator_is_invalid_constraint() {
        let err = Op::parse("!=").unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidConstraint { operator } if operator == "!="
        ));
    }

    #[test]
    fn constraints_combine_conjunctively() {
        let filters = Filters::new()
            .field("name", "Ada")
            .field_op("age", Op::Le, 30i64);
        assert!(filters.matches(&entry(28)));
        assert!(!filters.matches(&entry(32)));
    }

    #[test]
    fn missing_field_matches_nothing() {
        let filters = Filters::new().field("height", 170i64);
        assert!(!filters.matches(&entry(28)));
    }

    #[test]
    fn incomparable_kinds_match_nothing() {
        let filters = Filters::new().field("age", "28");
        assert!(!filters.matches(&entry(28)));
    }

    #[test]
    fn term_parses_name_operator_and_typed_value() {
        let filters = Filters::new().term("age <= 30").unwrap();
        assert!(filters.matches(&entry(30)));
        assert!(!filters.matches(&entry(31)));

        let filters = Filters::new().term("name==Ada").unwrap();
        assert!(filters.matches(&entry(28)));
    }

    #[test]
    fn malformed_term_is_invalid_constraint() {
        assert!(matches!(
            Filters::new().term("age ~ 30"),
            Err(StoreError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            Filters::new().term("no operator here"),
            Err(StoreError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn term_value_fallback_order_is_int_float_timestamp_text() {
        assert_eq!(parse_term_value("42"), Cell::Int(42));
        assert_eq!(parse_term_value("42.5"), Cell::Float(42.5));
        assert!(matches!(
            parse_term_value("2024-06-01T00:00:00Z"),
            Cell::Timestamp(_)
        ));
        assert_eq!(parse_term_value("Ada"), Cell::from("Ada"));
    }
}
