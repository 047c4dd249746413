//! Workbook inspection entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to look inside a workbook file: each
//!   table with its stored row count.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Reads through the grid layer rather than a `DataStore` session: a
//! session commits on drop, and an inspector must never rewrite the file
//! it is looking at.

use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: rowbook_cli <workbook.json>");
            return ExitCode::FAILURE;
        }
    };

    let workbook = match rowbook_core::grid::load_workbook(&path) {
        Ok(workbook) => workbook,
        Err(err) => {
            eprintln!("failed to open `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("rowbook_core version={}", rowbook_core::core_version());
    println!("workbook path={path}");
    for sheet in workbook.sheets() {
        // The header row is not a record.
        let rows = sheet.row_count().saturating_sub(1);
        println!("table={} rows={rows}", sheet.name());
    }
    ExitCode::SUCCESS
}
