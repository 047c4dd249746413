//! Workbook file I/O.
//!
//! # Responsibility
//! - Deserialize a workbook document from disk.
//! - Rewrite the document on save.
//!
//! # Invariants
//! - Saves rewrite the whole file; there is no partial or incremental write.
//! - Emits `workbook_load`/`workbook_save` events with duration and status.

use crate::grid::{GridResult, Workbook};
use log::{error, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Reads a workbook document from `path`.
pub fn load_workbook(path: impl AsRef<Path>) -> GridResult<Workbook> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=workbook_load module=grid status=start path={}", path.display());

    let result = File::open(path)
        .map_err(Into::into)
        .and_then(|file| serde_json::from_reader(BufReader::new(file)).map_err(Into::into));

    match &result {
        Ok(_) => info!(
            "event=workbook_load module=grid status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=workbook_load module=grid status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Writes the workbook document to `path`, replacing any previous contents.
pub fn save_workbook(path: impl AsRef<Path>, workbook: &Workbook) -> GridResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=workbook_save module=grid status=start path={}", path.display());

    let result = File::create(path).map_err(Into::into).and_then(|file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, workbook)?;
        writer.flush().map_err(Into::into)
    });

    match &result {
        Ok(()) => info!(
            "event=workbook_save module=grid status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=workbook_save module=grid status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
