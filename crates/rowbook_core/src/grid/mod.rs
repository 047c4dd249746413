//! Workbook grid store.
//!
//! # Responsibility
//! - Hold the in-memory workbook: named sheets of cell grids.
//! - Load and save the workbook as a single JSON document on disk.
//!
//! # Invariants
//! - The grid store never interprets cell contents; header conventions and
//!   row semantics belong to the record mapper.
//! - Disk I/O happens only in `load_workbook`/`save_workbook`; everything
//!   else mutates memory.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod workbook;

pub use open::{load_workbook, save_workbook};
pub use workbook::{Sheet, Workbook};

pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug)]
pub enum GridError {
    Io(std::io::Error),
    Format(serde_json::Error),
    DuplicateSheet(String),
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "workbook document is not valid: {err}"),
            Self::DuplicateSheet(name) => write!(f, "sheet `{name}` already exists"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::DuplicateSheet(_) => None,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(value: serde_json::Error) -> Self {
        Self::Format(value)
    }
}
