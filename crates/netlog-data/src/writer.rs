//! Persistence of the aggregated table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use netlog_core::error::{NetlogError, Result};
use netlog_core::models::{processed_headers, AggregatedRecord};
use tracing::info;

/// Write `records` to `path` as CSV, replacing any existing file.
///
/// The header is always written, even for an empty table. Parent
/// directories are not created.
pub fn write_processed_csv(path: &Path, records: &[AggregatedRecord]) -> Result<()> {
    let file = File::create(path).map_err(|source| NetlogError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    write_records(file, records)?;

    info!("Wrote {} aggregated rows to {}", records.len(), path.display());
    Ok(())
}

/// Serialize `records` as CSV into any writer.
pub fn write_records<W: Write>(writer: W, records: &[AggregatedRecord]) -> Result<()> {
    // Headers come from `processed_headers` so they exist for empty tables too.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(processed_headers())?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
