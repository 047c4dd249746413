//! Record-type contract and row projections.
//!
//! # Responsibility
//! - Define the `Model` trait implemented by storable record types.
//! - Define `Entry`, the ordered field-name/cell mapping read from a row.
//! - Define `Stored<T>`, the attached state carrying metadata plus payload.
//!
//! # Invariants
//! - `Model::to_cells` yields exactly one cell per declared field, in
//!   declaration order.
//! - A bare `T: Model` is always the unattached state; attachment exists
//!   only as `Stored<T>` and is produced by the mapper alone.

use crate::model::meta::Meta;
use crate::model::value::Cell;

/// Contract for types storable in a workbook table.
///
/// Deserialization is structural: `from_entry` reads whatever the row
/// carries, defaulting fields the header lacks and ignoring fields the type
/// does not declare. Drifted schemas are accepted as-is, not corrected.
pub trait Model {
    /// Type name, singular. The table name is derived from it by the naive
    /// pluralization rule.
    const MODEL_NAME: &'static str;

    /// Declared field names, in declaration order. Must not contain any
    /// reserved meta column name.
    fn field_names() -> &'static [&'static str];

    /// Field values as cells, one per entry of `field_names`, same order.
    fn to_cells(&self) -> Vec<Cell>;

    /// Rebuilds a value from a row entry.
    fn from_entry(entry: &Entry) -> Self;
}

/// One table row projected through its header: an ordered mapping from
/// field name to cell value.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    fields: Vec<(String, Cell)>,
}

impl Entry {
    /// Zips a header with one data row. Rows shorter than the header yield
    /// `Empty` cells for the missing tail; surplus cells beyond the header
    /// are dropped.
    pub fn from_row(header: &[String], row: &[Cell]) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(ndx, name)| {
                let cell = row.get(ndx).cloned().unwrap_or(Cell::Empty);
                (name.clone(), cell)
            })
            .collect();
        Self { fields }
    }

    /// Cell stored under `name`, if the header carries that field.
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, cell)| cell)
    }

    /// Field name/cell pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record together with its assigned metadata.
///
/// This is the attached state: it only comes out of the mapper, so a value
/// of this type always corresponds to a stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub meta: Meta,
    pub record: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_defaults_missing_tail_cells_to_empty() {
        let header = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let entry = Entry::from_row(&header, &[Cell::Int(1)]);
        assert_eq!(entry.get("a"), Some(&Cell::Int(1)));
        assert_eq!(entry.get("b"), Some(&Cell::Empty));
        assert_eq!(entry.get("c"), Some(&Cell::Empty));
    }

    #[test]
    fn entry_drops_cells_beyond_the_header() {
        let header = vec!["only".to_string()];
        let entry = Entry::from_row(&header, &[Cell::Int(1), Cell::Int(2)]);
        assert_eq!(entry.len(), 1);
        assert_eq!(entry.get("only"), Some(&Cell::Int(1)));
    }

    #[test]
    fn entry_lookup_misses_undeclared_fields() {
        let entry = Entry::from_row(&["a".to_string()], &[Cell::Int(1)]);
        assert!(entry.get("b").is_none());
    }
}
