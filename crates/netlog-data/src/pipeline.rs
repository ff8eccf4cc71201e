//! Main processing pipeline for netlog.
//!
//! Loads the raw metrics CSV, cleans it, aggregates it per second and writes
//! the processed table, returning a [`PipelineResult`] for the chart stage.

use std::path::Path;
use std::time::Instant;

use netlog_core::error::Result;
use netlog_core::models::AggregatedRecord;
use tracing::{debug, info};

use crate::aggregator::MetricsAggregator;
use crate::cleaner::clean_table;
use crate::reader::load_raw_table;
use crate::writer::write_processed_csv;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters and timings collected while running the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineMetadata {
    /// Data rows read from the input file.
    pub rows_loaded: usize,
    /// Missing cells replaced with `0`.
    pub cells_filled: usize,
    /// Distinct seconds in the aggregated table.
    pub groups_aggregated: usize,
    /// Wall-clock seconds spent reading the input file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent cleaning and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of [`process_metrics`].
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Per-second means, ascending by timestamp.
    pub records: Vec<AggregatedRecord>,
    pub metadata: PipelineMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the processing pipeline.
///
/// 1. Load the raw table from `input`.
/// 2. Fill missing cells, drop identifier columns, normalize fields.
/// 3. Aggregate per second.
/// 4. Write the aggregated table to `output`.
///
/// Any failure aborts the run before later stages execute.
pub fn process_metrics(input: &Path, output: &Path) -> Result<PipelineResult> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = Instant::now();
    let table = load_raw_table(input)?;
    let rows_loaded = table.len();
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2 + 3: Clean and aggregate ───────────────────────────────────────
    let transform_start = Instant::now();
    let (clean, cells_filled) = clean_table(table)?;
    let records = MetricsAggregator::aggregate_by_second(&clean);
    let transform_time = transform_start.elapsed().as_secs_f64();

    info!(
        "Aggregated {} rows into {} one-second groups",
        rows_loaded,
        records.len()
    );
    debug!(
        "load {:.3}s, transform {:.3}s",
        load_time, transform_time
    );

    // ── Step 4: Persist ───────────────────────────────────────────────────────
    write_processed_csv(output, &records)?;

    let metadata = PipelineMetadata {
        rows_loaded,
        cells_filled,
        groups_aggregated: records.len(),
        load_time_seconds: load_time,
        transform_time_seconds: transform_time,
    };

    Ok(PipelineResult { records, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
