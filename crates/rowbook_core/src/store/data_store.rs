//! Workbook-backed record store session.
//!
//! # Responsibility
//! - Own the in-memory workbook between open and commit.
//! - Map typed records to rows on create and rows to typed records on read.
//!
//! # Invariants
//! - Ids are the smallest unused non-negative integers per table; row
//!   position always appends, so id and position diverge once ids are ever
//!   freed.
//! - The backing file is touched only at open and commit.
//! - Concurrent sessions on one file are unsupported and unguarded; a
//!   second process writing the same path silently diverges.

use crate::grid::{load_workbook, save_workbook, Workbook};
use crate::model::meta::{Meta, CREATED_AT_FIELD, ID_FIELD, META_FIELDS, MODIFIED_AT_FIELD};
use crate::model::record::{Entry, Model, Stored};
use crate::model::value::Cell;
use crate::store::filter::Filters;
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Derives a table name from a model name.
///
/// The rule is deliberately naive and preserved exactly: append `"es"` when
/// the name already ends in `s`, otherwise append `"s"`. Existing workbooks
/// were written under this mapping, so no linguistic pluralization is ever
/// applied.
pub fn table_name(model_name: &str) -> String {
    if model_name.ends_with('s') {
        format!("{model_name}es")
    } else {
        format!("{model_name}s")
    }
}

/// One open workbook session.
///
/// Opening loads the whole file into memory (or starts empty when the file
/// does not exist); `create` mutates only the in-memory grid; `commit`
/// rewrites the file. Dropping the session commits implicitly, so a scoped
/// session persists its changes on every exit path.
#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    workbook: Workbook,
    dirty: bool,
}

impl DataStore {
    /// Opens the workbook at `path`, or starts an empty in-memory workbook
    /// when no file exists there yet. Nothing is written until commit.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let started_at = Instant::now();

        let workbook = if path.is_file() {
            load_workbook(&path)?
        } else {
            Workbook::new()
        };

        info!(
            "event=store_open module=store status=ok path={} tables={} duration_ms={}",
            path.display(),
            workbook.sheet_names().count(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            path,
            workbook,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether uncommitted changes exist in this session.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read access to the underlying workbook.
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Grid-level access for callers that maintain sheets outside the
    /// mapper, e.g. tooling that repairs drifted tables.
    pub fn workbook_mut(&mut self) -> &mut Workbook {
        self.dirty = true;
        &mut self.workbook
    }

    /// Persists the in-memory workbook to the session path, replacing the
    /// previous file contents. Safe to call repeatedly.
    pub fn commit(&mut self) -> StoreResult<()> {
        save_workbook(&self.path, &self.workbook)?;
        self.dirty = false;
        info!(
            "event=store_commit module=store status=ok path={}",
            self.path.display()
        );
        Ok(())
    }

    /// Stores `record` as a new row of its model's table.
    ///
    /// The table is created lazily on first use, with the meta columns
    /// leading the header followed by the model's fields in declaration
    /// order. The assigned id is the smallest non-negative integer not
    /// currently present in the `_id` column; the row itself always appends
    /// after the last existing row.
    pub fn create<T: Model>(&mut self, record: T) -> StoreResult<Stored<T>> {
        // Reject models whose own fields collide with the implicit meta
        // columns before touching any sheet.
        if let Some(field) = T::field_names()
            .iter()
            .copied()
            .find(|name| Meta::is_reserved(name))
        {
            return Err(StoreError::DuplicateMeta {
                model: T::MODEL_NAME,
                field,
            });
        }

        let table = table_name(T::MODEL_NAME);
        if !self.workbook.has_sheet(&table) {
            let sheet = self.workbook.add_sheet(&table)?;
            let header = META_FIELDS
                .iter()
                .chain(T::field_names())
                .map(|name| Cell::from(*name))
                .collect();
            sheet.push_row(header);
            debug!("event=table_create module=store table={table}");
        }

        let sheet = self
            .workbook
            .sheet(&table)
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.clone(),
            })?;
        let header = header_names(sheet.header().unwrap_or_default());
        let id_col = column_of(&header, ID_FIELD).ok_or_else(|| StoreError::MissingIdColumn {
            table: table.clone(),
        })?;

        let used: HashSet<u64> = sheet
            .data_rows()
            .filter_map(|row| row.get(id_col))
            // Cells of other kinds can never collide with an integer probe.
            .filter_map(|cell| cell.as_int())
            .filter_map(|id| u64::try_from(id).ok())
            .collect();
        let mut id = 0u64;
        while used.contains(&id) {
            id += 1;
        }

        // Append position, independent of the assigned id.
        let row_ndx = sheet.row_count();

        let mut meta = Meta::new();
        meta.id = id;

        let named_cells = META_FIELDS
            .iter()
            .copied()
            .zip(meta.to_cells())
            .chain(T::field_names().iter().copied().zip(record.to_cells()));
        let mut writes = Vec::with_capacity(header.len());
        for (name, cell) in named_cells {
            let col = column_of(&header, name).ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "field `{name}` is not a column of table `{table}`"
                ))
            })?;
            writes.push((col, cell));
        }

        let sheet = self
            .workbook
            .sheet_mut(&table)
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.clone(),
            })?;
        for (col, cell) in writes {
            sheet.set_cell(row_ndx, col, cell);
        }
        self.dirty = true;

        debug!(
            "event=create module=store table={table} id={id} row={row_ndx} status=ok"
        );
        Ok(Stored { meta, record })
    }

    /// Reads every record of `T`'s table that satisfies `filters`, in row
    /// order.
    ///
    /// Reading a type that was never created is an error, not an empty
    /// result. Rows are projected through the stored header, so schemas
    /// that drifted from the model's declared fields are returned as-is.
    pub fn read<T: Model>(&self, filters: &Filters) -> StoreResult<Vec<Stored<T>>> {
        let table = table_name(T::MODEL_NAME);
        let sheet = self
            .workbook
            .sheet(&table)
            .ok_or_else(|| StoreError::TableNotFound {
                table: table.clone(),
            })?;
        let header_row = sheet.header().ok_or_else(|| StoreError::TableNotFound {
            table: table.clone(),
        })?;

        let mut header = Vec::with_capacity(header_row.len());
        for cell in header_row {
            let name = cell.as_str().ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "non-text header cell of kind `{}` in table `{table}`",
                    cell.kind()
                ))
            })?;
            header.push(name.to_string());
        }
        if !header.iter().any(|name| name == ID_FIELD) {
            return Err(StoreError::MissingIdColumn { table });
        }

        let mut records = Vec::new();
        for row in sheet.data_rows() {
            let entry = Entry::from_row(&header, row);
            if !filters.matches(&entry) {
                continue;
            }
            let meta = meta_from_entry(&entry, &table)?;
            records.push(Stored {
                meta,
                record: T::from_entry(&entry),
            });
        }

        debug!(
            "event=read module=store table={table} filters={} matched={} status=ok",
            filters.len(),
            records.len()
        );
        Ok(records)
    }

    /// Declared for interface stability; not available in this version.
    ///
    /// A conforming implementation must locate the row by `meta.id` within
    /// the record's table, overwrite its field cells and bump
    /// `_modified_at`.
    pub fn update<T: Model>(&mut self, _entry: &Stored<T>) -> StoreResult<()> {
        Err(StoreError::Unsupported {
            operation: "update",
        })
    }

    /// Declared for interface stability; not available in this version.
    ///
    /// A conforming implementation must remove (or tombstone) the row
    /// without disturbing the ids of other rows.
    pub fn delete<T: Model>(&mut self, _entry: &Stored<T>) -> StoreResult<()> {
        Err(StoreError::Unsupported {
            operation: "delete",
        })
    }
}

impl Drop for DataStore {
    /// Scope exit commits, mirroring the scoped-session contract: normal
    /// and error paths both persist. Failures cannot propagate from drop
    /// glue, so they are logged and swallowed.
    fn drop(&mut self) {
        if let Err(err) = self.commit() {
            error!(
                "event=store_commit module=store status=error path={} error={}",
                self.path.display(),
                err
            );
        }
    }
}

fn header_names(header: &[Cell]) -> Vec<Option<String>> {
    header
        .iter()
        .map(|cell| cell.as_str().map(str::to_string))
        .collect()
}

fn column_of(header: &[Option<String>], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|column| column.as_deref() == Some(name))
}

/// Rebuilds metadata from a persisted entry, rejecting corrupt state
/// instead of masking it.
fn meta_from_entry(entry: &Entry, table: &str) -> StoreResult<Meta> {
    let id_cell = entry
        .get(ID_FIELD)
        .ok_or_else(|| invalid_meta_cell(table, ID_FIELD, "missing"))?;
    let id = id_cell
        .as_int()
        .and_then(|id| u64::try_from(id).ok())
        .ok_or_else(|| invalid_meta_cell(table, ID_FIELD, id_cell.kind()))?;

    let created_cell = entry
        .get(CREATED_AT_FIELD)
        .ok_or_else(|| invalid_meta_cell(table, CREATED_AT_FIELD, "missing"))?;
    let created_at = created_cell
        .as_timestamp()
        .ok_or_else(|| invalid_meta_cell(table, CREATED_AT_FIELD, created_cell.kind()))?;

    let modified_cell = entry
        .get(MODIFIED_AT_FIELD)
        .ok_or_else(|| invalid_meta_cell(table, MODIFIED_AT_FIELD, "missing"))?;
    let modified_at = modified_cell
        .as_timestamp()
        .ok_or_else(|| invalid_meta_cell(table, MODIFIED_AT_FIELD, modified_cell.kind()))?;

    Ok(Meta {
        id,
        created_at,
        modified_at,
    })
}

fn invalid_meta_cell(table: &str, field: &str, found: &str) -> StoreError {
    StoreError::InvalidData(format!(
        "meta column `{field}` of table `{table}` holds `{found}` instead of a usable value"
    ))
}

#[cfg(test)]
mod tests {
    use super::table_name;

    #[test]
    fn pluralization_appends_s() {
        assert_eq!(table_name("Person"), "Persons");
        assert_eq!(table_name("Entry"), "Entrys");
    }

    #[test]
    fn names_ending_in_s_append_es() {
        assert_eq!(table_name("Boss"), "Bosses");
        assert_eq!(table_name("Glass"), "Glasses");
    }
}
