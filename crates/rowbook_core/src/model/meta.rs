//! Bookkeeping metadata attached to every stored record.
//!
//! # Responsibility
//! - Define the implicit field set (`_id`, `_created_at`, `_modified_at`)
//!   that leads every table header.
//! - Provide the reserved-name check guarding against models that collide
//!   with those columns.
//!
//! # Invariants
//! - `META_FIELDS` order is the on-disk header order and never changes.
//! - A fresh `Meta` carries the placeholder id 0 until the mapper assigns
//!   the real one.

use crate::model::value::Cell;
use chrono::{DateTime, Utc};

/// Column name of the per-table record identifier.
pub const ID_FIELD: &str = "_id";
/// Column name of the creation timestamp.
pub const CREATED_AT_FIELD: &str = "_created_at";
/// Column name of the last-modification timestamp.
pub const MODIFIED_AT_FIELD: &str = "_modified_at";

/// Meta column names in header order. These always form the leading columns
/// of every table, ahead of the model's own fields.
pub const META_FIELDS: [&str; 3] = [ID_FIELD, CREATED_AT_FIELD, MODIFIED_AT_FIELD];

/// Bookkeeping fields stored alongside every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    /// Non-negative identifier, unique within the record's table. Assigned
    /// by the mapper on create; 0 is the unassigned placeholder.
    pub id: u64,
    /// Set once when the record is first stored.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until an update operation exists to bump it.
    pub modified_at: DateTime<Utc>,
}

impl Meta {
    /// New metadata with placeholder id and both timestamps set to now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            modified_at: now,
        }
    }

    /// Whether `field` is one of the implicit meta column names.
    ///
    /// Models must not declare reserved names among their own fields; the
    /// mapper rejects such models before writing anything.
    pub fn is_reserved(field: &str) -> bool {
        META_FIELDS.contains(&field)
    }

    /// Cells in `META_FIELDS` order.
    pub(crate) fn to_cells(&self) -> [Cell; 3] {
        [
            Cell::from(self.id),
            Cell::Timestamp(self.created_at),
            Cell::Timestamp(self.modified_at),
        ]
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meta_starts_unassigned_with_equal_timestamps() {
        let meta = Meta::new();
        assert_eq!(meta.id, 0);
        assert_eq!(meta.created_at, meta.modified_at);
    }

    #[test]
    fn reserved_names_cover_exactly_the_meta_columns() {
        assert!(Meta::is_reserved("_id"));
        assert!(Meta::is_reserved("_created_at"));
        assert!(Meta::is_reserved("_modified_at"));
        assert!(!Meta::is_reserved("id"));
        assert!(!Meta::is_reserved("name"));
    }

    #[test]
    fn cells_follow_header_order() {
        let meta = Meta::new();
        let cells = meta.to_cells();
        assert_eq!(cells[0], Cell::Int(0));
        assert_eq!(cells[1], Cell::Timestamp(meta.created_at));
        assert_eq!(cells[2], Cell::Timestamp(meta.modified_at));
    }
}
