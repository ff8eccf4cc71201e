//! CSV loading for netlog.
//!
//! Reads the raw per-connection metrics export into a [`RawTable`] of
//! optional string cells. No field is interpreted here; cleaning and type
//! coercion happen in [`crate::cleaner`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use netlog_core::error::{NetlogError, Result};
use netlog_core::models::RawTable;
use netlog_core::normalize::is_missing;
use tracing::{debug, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the CSV at `path` into a [`RawTable`].
///
/// Header names are trimmed. Empty cells and the usual NA spellings become
/// `None`; rows shorter than the header are padded with `None`.
pub fn load_raw_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| NetlogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_raw_table(file, path)?;

    info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV from any reader. `source` is only used in error messages.
pub fn read_raw_table<R: Read>(reader: R, source: &Path) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(NetlogError::MissingHeader(source.to_path_buf()));
    }

    let mut table = RawTable::new(headers);
    let mut short_rows = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let width = table.headers.len();
        if record.len() > width {
            return Err(NetlogError::MalformedRow {
                row: idx + 1,
                expected: width,
                found: record.len(),
            });
        }
        if record.len() < width {
            short_rows += 1;
        }

        let cells = record
            .iter()
            .map(|cell| {
                if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        table.push_row(cells);
    }

    if short_rows > 0 {
        debug!("{} short rows padded with missing cells", short_rows);
    }

    Ok(table)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
