//! Cell scalar values.
//!
//! # Responsibility
//! - Define the scalar kinds a workbook cell can hold.
//! - Provide the cross-kind comparison used by filter constraints.
//!
//! # Invariants
//! - `Int` and `Float` compare numerically with each other.
//! - All other cross-kind comparisons are undefined and return `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One workbook cell.
///
/// The grid store never interprets cells; kinds only matter to the record
/// mapper when serializing fields and evaluating filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// A blank cell. Produced when a row is shorter than its header or a
    /// grid write skips positions.
    Empty,
    /// UTF-8 text.
    Text(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric value, promoting `Int` to `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Kind name for diagnostics and `InvalidData` messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Compares two cells for filtering purposes.
    ///
    /// Same-kind cells compare by their natural order. `Int` and `Float`
    /// compare numerically across kinds. Every other pairing has no defined
    /// order and yields `None`, which constraint evaluation treats as
    /// "does not match".
    pub fn compare(&self, other: &Cell) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Float(_) | Self::Int(_), Self::Float(_) | Self::Int(_)) => {
                // NaN never matches any constraint, including equality.
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        // Ids are assigned by linear probe from zero and stay far below
        // i64::MAX in practice; saturate instead of wrapping on the margin.
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}
