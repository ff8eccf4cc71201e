use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{NetlogError, Result};
use crate::time_utils::TIMESTAMP_FORMAT;

/// Name of the timestamp column in both the input and the processed table.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Per-connection identifier columns dropped before analysis.
pub const IDENTIFIER_COLUMNS: [&str; 3] = ["PID", "PORT", "IP"];

// ── Metric ────────────────────────────────────────────────────────────────────

/// One of the eight per-connection metrics tracked over time.
///
/// Declaration order is the column order of the processed table and the
/// order in which charts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Retransmission timeout.
    Rto,
    /// Smoothed round-trip time.
    Rtt,
    /// Round-trip time variance.
    RttVar,
    /// Delayed-ACK timeout.
    Ato,
    /// Receiver-side RTT estimate.
    RcvRtt,
    /// Send rate, in Mbps.
    Send,
    /// Pacing rate, in Mbps.
    PacingRate,
    /// Delivery rate, in Mbps.
    DeliveryRate,
}

impl Metric {
    /// Number of tracked metrics.
    pub const COUNT: usize = 8;

    /// All metrics in column order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Rto,
        Metric::Rtt,
        Metric::RttVar,
        Metric::Ato,
        Metric::RcvRtt,
        Metric::Send,
        Metric::PacingRate,
        Metric::DeliveryRate,
    ];

    /// Column name used in both CSV files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Rto => "rto",
            Metric::Rtt => "rtt",
            Metric::RttVar => "rtt_var",
            Metric::Ato => "ato",
            Metric::RcvRtt => "rcv_rtt",
            Metric::Send => "send",
            Metric::PacingRate => "pacing_rate",
            Metric::DeliveryRate => "delivery_rate",
        }
    }

    /// Position of this metric within [`Metric::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the raw column carries a `mbps`/`kbps` unit suffix.
    pub fn is_bandwidth(self) -> bool {
        matches!(
            self,
            Metric::Send | Metric::PacingRate | Metric::DeliveryRate
        )
    }

    /// File name of the chart rendered for this metric.
    pub fn plot_file_name(self) -> String {
        format!("{}_plot.png", self.column())
    }

    /// Chart caption, e.g. `"RTT_VAR over Time"`.
    pub fn chart_title(self) -> String {
        format!("{} over Time", self.column().to_uppercase())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ── RawTable ──────────────────────────────────────────────────────────────────

/// The input CSV as loaded: a header plus rows of optional string cells.
///
/// `None` marks a missing cell. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with missing cells.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.headers.len(), None);
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`RawTable::column_index`], but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| NetlogError::MissingColumn(name.to_string()))
    }

    /// Cell at (`row`, `col`), or `None` when missing or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Remove the named columns.
    ///
    /// All names are checked before anything is removed, so on error the
    /// table is unchanged.
    pub fn remove_columns(&mut self, names: &[&str]) -> Result<()> {
        let mut indices = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<usize>>>()?;

        // Remove from the right so earlier indices stay valid.
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for idx in indices {
            self.headers.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
        Ok(())
    }
}

// ── CleanRecord ───────────────────────────────────────────────────────────────

/// One input row after cleaning: second-resolution timestamp and numeric
/// metrics with bandwidths in Mbps.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub timestamp: NaiveDateTime,
    pub rto: f64,
    pub rtt: f64,
    pub rtt_var: f64,
    pub ato: f64,
    pub rcv_rtt: f64,
    pub send: f64,
    pub pacing_rate: f64,
    pub delivery_rate: f64,
}

impl CleanRecord {
    /// Build a record from values laid out in [`Metric::ALL`] order.
    pub fn from_values(timestamp: NaiveDateTime, values: [f64; Metric::COUNT]) -> Self {
        let [rto, rtt, rtt_var, ato, rcv_rtt, send, pacing_rate, delivery_rate] = values;
        Self {
            timestamp,
            rto,
            rtt,
            rtt_var,
            ato,
            rcv_rtt,
            send,
            pacing_rate,
            delivery_rate,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rto => self.rto,
            Metric::Rtt => self.rtt,
            Metric::RttVar => self.rtt_var,
            Metric::Ato => self.ato,
            Metric::RcvRtt => self.rcv_rtt,
            Metric::Send => self.send,
            Metric::PacingRate => self.pacing_rate,
            Metric::DeliveryRate => self.delivery_rate,
        }
    }
}

// ── AggregatedRecord ──────────────────────────────────────────────────────────

/// Per-second means of all clean records sharing a timestamp.
///
/// Serializes to one row of `net_log_processed.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    #[serde(rename = "Timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub rto: f64,
    pub rtt: f64,
    pub rtt_var: f64,
    pub ato: f64,
    pub rcv_rtt: f64,
    pub send: f64,
    pub pacing_rate: f64,
    pub delivery_rate: f64,
}

impl AggregatedRecord {
    /// Build a record from means laid out in [`Metric::ALL`] order.
    pub fn from_values(timestamp: NaiveDateTime, values: [f64; Metric::COUNT]) -> Self {
        let [rto, rtt, rtt_var, ato, rcv_rtt, send, pacing_rate, delivery_rate] = values;
        Self {
            timestamp,
            rto,
            rtt,
            rtt_var,
            ato,
            rcv_rtt,
            send,
            pacing_rate,
            delivery_rate,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rto => self.rto,
            Metric::Rtt => self.rtt,
            Metric::RttVar => self.rtt_var,
            Metric::Ato => self.ato,
            Metric::RcvRtt => self.rcv_rtt,
            Metric::Send => self.send,
            Metric::PacingRate => self.pacing_rate,
            Metric::DeliveryRate => self.delivery_rate,
        }
    }

    /// Timestamp rendered the way it appears in the processed CSV.
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// Header row of the processed CSV.
pub fn processed_headers() -> Vec<&'static str> {
    std::iter::once(TIMESTAMP_COLUMN)
        .chain(Metric::ALL.iter().map(|m| m.column()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn table() -> RawTable {
        let mut t = RawTable::new(
            ["PID", "PORT", "IP", "Timestamp", "rtt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        t.push_row(vec![
            Some("42".to_string()),
            Some("443".to_string()),
            Some("10.0.0.1".to_string()),
            Some("2024-01-01 10:00:00".to_string()),
            Some("10/2".to_string()),
        ]);
        t
    }

    // ── Metric ────────────────────────────────────────────────────────────────

    #[test]
    fn test_metric_columns_in_order() {
        let cols: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        assert_eq!(
            cols,
            vec![
                "rto",
                "rtt",
                "rtt_var",
                "ato",
                "rcv_rtt",
                "send",
                "pacing_rate",
                "delivery_rate"
            ]
        );
        for (i, m) in Metric::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn test_metric_bandwidth_flags() {
        let bw: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|m| m.is_bandwidth())
            .collect();
        assert_eq!(
            bw,
            vec![Metric::Send, Metric::PacingRate, Metric::DeliveryRate]
        );
    }

    #[test]
    fn test_metric_titles_and_files() {
        assert_eq!(Metric::RttVar.chart_title(), "RTT_VAR over Time");
        assert_eq!(Metric::PacingRate.plot_file_name(), "pacing_rate_plot.png");
    }

    // ── RawTable ──────────────────────────────────────────────────────────────

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut t = RawTable::new(vec!["a".to_string(), "b".to_string()]);
        t.push_row(vec![Some("1".to_string())]);
        assert_eq!(t.rows[0], vec![Some("1".to_string()), None]);
        assert_eq!(t.cell(0, 0), Some("1"));
        assert_eq!(t.cell(0, 1), None);
    }

    #[test]
    fn test_remove_columns() {
        let mut t = table();
        t.remove_columns(&IDENTIFIER_COLUMNS).unwrap();
        assert_eq!(t.headers, vec!["Timestamp", "rtt"]);
        assert_eq!(t.cell(0, 1), Some("10/2"));
    }

    #[test]
    fn test_remove_columns_missing_leaves_table_untouched() {
        let mut t = table();
        let before = t.clone();
        let err = t.remove_columns(&["PID", "SOCKET"]).unwrap_err();
        assert!(matches!(err, NetlogError::MissingColumn(ref c) if c == "SOCKET"));
        assert_eq!(t, before);
    }

    // ── Records ───────────────────────────────────────────────────────────────

    #[test]
    fn test_record_value_accessors() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let clean = CleanRecord::from_values(ts(10, 0, 0), values);
        let agg = AggregatedRecord::from_values(ts(10, 0, 0), values);
        for m in Metric::ALL {
            assert_eq!(clean.value(m), values[m.index()]);
            assert_eq!(agg.value(m), values[m.index()]);
        }
    }

    #[test]
    fn test_timestamp_label() {
        let agg = AggregatedRecord::from_values(ts(9, 5, 7), [0.0; Metric::COUNT]);
        assert_eq!(agg.timestamp_label(), "2024-01-01 09:05:07");
    }

    #[test]
    fn test_processed_headers() {
        assert_eq!(
            processed_headers().join(","),
            "Timestamp,rto,rtt,rtt_var,ato,rcv_rtt,send,pacing_rate,delivery_rate"
        );
    }
}
