//! Record mapper and session layer.
//!
//! # Responsibility
//! - Define the session object (`DataStore`) and its semantic errors.
//! - Keep grid-store details out of caller-facing signatures.
//!
//! # Invariants
//! - Errors abort the current operation; nothing is rolled back.
//! - The mapper returns semantic errors (`TableNotFound`, `DuplicateMeta`)
//!   in addition to grid transport errors.

use crate::grid::GridError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod data_store;
pub mod filter;

pub use data_store::{table_name, DataStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Semantic error for mapper and session operations.
#[derive(Debug)]
pub enum StoreError {
    /// A model declares one of the reserved meta column names among its own
    /// fields, so storing it would attach metadata twice.
    DuplicateMeta {
        model: &'static str,
        field: &'static str,
    },
    /// A read targeted a table that was never created, or a sheet whose
    /// header row is absent.
    TableNotFound { table: String },
    /// A table header carries no `_id` column, so ids cannot be assigned.
    MissingIdColumn { table: String },
    /// A filter operator token outside `<`, `<=`, `==`, `>=`, `>`.
    InvalidConstraint { operator: String },
    /// Persisted state that cannot be interpreted (wrong cell kind in a
    /// meta column, non-text header cell).
    InvalidData(String),
    /// The operation is declared but not available in this version.
    Unsupported { operation: &'static str },
    /// I/O or serialization failure in the grid store.
    Grid(GridError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMeta { model, field } => write!(
                f,
                "model `{model}` declares reserved meta field `{field}`"
            ),
            Self::TableNotFound { table } => write!(f, "table `{table}` does not exist"),
            Self::MissingIdColumn { table } => {
                write!(f, "table `{table}` has no `_id` column in its header")
            }
            Self::InvalidConstraint { operator } => write!(
                f,
                "unsupported filter operator `{operator}`; expected <, <=, ==, >= or >"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Unsupported { operation } => {
                write!(f, "operation `{operation}` is not supported in this version")
            }
            Self::Grid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for StoreError {
    fn from(value: GridError) -> Self {
        Self::Grid(value)
    }
}
