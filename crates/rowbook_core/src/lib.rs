//! rowbook: records persisted as rows of a workbook file.
//!
//! One sheet per record type, one row per instance, no server and no
//! schema tooling — a workbook document on disk is the whole store. This
//! crate is the single source of truth for the mapping rules: implicit
//! metadata columns, id assignment, header layout and the filter language.

pub mod grid;
pub mod logging;
pub mod model;
pub mod store;

pub use grid::{GridError, GridResult, Sheet, Workbook};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::meta::{Meta, META_FIELDS};
pub use model::record::{Entry, Model, Stored};
pub use model::value::Cell;
pub use store::filter::{Constraint, Filters, Op};
pub use store::{table_name, DataStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
