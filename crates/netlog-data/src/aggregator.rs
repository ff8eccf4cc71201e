//! Per-second aggregation of clean records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use netlog_core::models::{AggregatedRecord, CleanRecord, Metric};

// ── MetricSums ────────────────────────────────────────────────────────────────

/// Running per-metric sums for one group of records.
#[derive(Debug, Clone, Default)]
pub struct MetricSums {
    pub sums: [f64; Metric::COUNT],
    pub count: u32,
}

impl MetricSums {
    /// Add a single record's values to the running totals.
    pub fn add_record(&mut self, record: &CleanRecord) {
        for metric in Metric::ALL {
            self.sums[metric.index()] += record.value(metric);
        }
        self.count += 1;
    }

    /// Arithmetic mean of each metric. All zeros for an empty group.
    pub fn means(&self) -> [f64; Metric::COUNT] {
        if self.count == 0 {
            return [0.0; Metric::COUNT];
        }
        let n = f64::from(self.count);
        self.sums.map(|sum| sum / n)
    }
}

// ── MetricsAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups clean records by timestamp.
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// One [`AggregatedRecord`] per distinct (already floored) timestamp,
    /// holding the mean of every metric, sorted ascending by timestamp.
    ///
    /// The result does not depend on the order of `records`.
    pub fn aggregate_by_second(records: &[CleanRecord]) -> Vec<AggregatedRecord> {
        // BTreeMap keeps the groups sorted by timestamp.
        let mut groups: BTreeMap<NaiveDateTime, MetricSums> = BTreeMap::new();

        for record in records {
            groups
                .entry(record.timestamp)
                .or_default()
                .add_record(record);
        }

        groups
            .into_iter()
            .map(|(ts, sums)| AggregatedRecord::from_values(ts, sums.means()))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
