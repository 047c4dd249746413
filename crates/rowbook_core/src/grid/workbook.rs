//! In-memory workbook and sheet grids.
//!
//! # Responsibility
//! - Provide sheet lookup/creation and cell-level grid access.
//!
//! # Invariants
//! - Sheet names are unique within a workbook.
//! - `set_cell` grows the grid with `Empty` cells; it never truncates.

use crate::grid::{GridError, GridResult};
use crate::model::value::Cell;
use serde::{Deserialize, Serialize};

/// A workbook: ordered named sheets. Insertion order is preserved so the
/// on-disk document stays stable across rewrites.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    /// Appends a new empty sheet and returns it.
    pub fn add_sheet(&mut self, name: &str) -> GridResult<&mut Sheet> {
        if self.has_sheet(name) {
            return Err(GridError::DuplicateSheet(name.to_string()));
        }
        self.sheets.push(Sheet::new(name));
        Ok(self.sheets.last_mut().expect("sheet was just pushed"))
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str())
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }
}

/// One named cell grid. Row 0 is the header row by mapper convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header row, when the sheet has one.
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header, in position order.
    pub fn data_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// Total row count, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, ndx: usize) -> Option<&[Cell]> {
        self.rows.get(ndx).map(Vec::as_slice)
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Writes one cell at an arbitrary grid position, growing rows and
    /// columns with `Empty` as needed.
    pub fn set_cell(&mut self, row_ndx: usize, col_ndx: usize, cell: Cell) {
        if self.rows.len() <= row_ndx {
            self.rows.resize_with(row_ndx + 1, Vec::new);
        }
        let row = &mut self.rows[row_ndx];
        if row.len() <= col_ndx {
            row.resize(col_ndx + 1, Cell::Empty);
        }
        row[col_ndx] = cell;
    }

    pub fn cell(&self, row_ndx: usize, col_ndx: usize) -> Option<&Cell> {
        self.rows.get(row_ndx).and_then(|row| row.get(col_ndx))
    }
}
