//! Table cleaning stages: fill, prune, and per-field normalization.
//!
//! The first two stages mutate the [`RawTable`] in place; [`clean_records`]
//! then turns each row into a typed [`CleanRecord`].

use netlog_core::error::{NetlogError, Result};
use netlog_core::models::{CleanRecord, Metric, RawTable, IDENTIFIER_COLUMNS, TIMESTAMP_COLUMN};
use netlog_core::normalize::{coerce_f64, split_rtt, to_mbps, FILL_VALUE};
use netlog_core::time_utils::{floor_to_second, parse_timestamp};
use tracing::debug;

/// Metrics read directly from an input column. `rtt_var` is derived from
/// the `rtt` cell instead.
const SOURCE_METRICS: [Metric; 7] = [
    Metric::Rto,
    Metric::Rtt,
    Metric::Ato,
    Metric::RcvRtt,
    Metric::Send,
    Metric::PacingRate,
    Metric::DeliveryRate,
];

// ── Stages ────────────────────────────────────────────────────────────────────

/// Replace every missing cell with `"0"`. Returns the number of cells filled.
pub fn fill_missing(table: &mut RawTable) -> usize {
    let mut filled = 0usize;
    for cell in table.rows.iter_mut().flat_map(|row| row.iter_mut()) {
        if cell.is_none() {
            *cell = Some(FILL_VALUE.to_string());
            filled += 1;
        }
    }
    debug!("Filled {} missing cells", filled);
    filled
}

/// Remove the `PID`, `PORT` and `IP` columns.
///
/// Fails with [`NetlogError::MissingColumn`] if any of them is absent, in
/// which case the table is left as it was.
pub fn drop_identifier_columns(table: &mut RawTable) -> Result<()> {
    table.remove_columns(&IDENTIFIER_COLUMNS)
}

/// Convert every row into a [`CleanRecord`].
///
/// * `Timestamp` is parsed and floored to whole seconds; an unparseable
///   value aborts with [`NetlogError::TimestampParse`].
/// * `rtt` is split into `rtt` and `rtt_var`.
/// * `send`, `pacing_rate` and `delivery_rate` are normalized to Mbps.
/// * The remaining metrics are coerced to numbers, bad values becoming `0.0`.
pub fn clean_records(table: &RawTable) -> Result<Vec<CleanRecord>> {
    let ts_col = table.require_column(TIMESTAMP_COLUMN)?;
    let metric_cols = SOURCE_METRICS
        .iter()
        .map(|m| table.require_column(m.column()).map(|col| (*m, col)))
        .collect::<Result<Vec<(Metric, usize)>>>()?;

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let cell = |col: usize| table.cell(row, col).unwrap_or(FILL_VALUE);

        let raw_ts = cell(ts_col);
        let timestamp = parse_timestamp(raw_ts)
            .map(floor_to_second)
            .ok_or_else(|| NetlogError::TimestampParse {
                row: row + 1,
                value: raw_ts.to_string(),
            })?;

        let mut values = [0.0; Metric::COUNT];
        for &(metric, col) in &metric_cols {
            let raw = cell(col);
            match metric {
                Metric::Rtt => {
                    let (rtt, rtt_var) = split_rtt(raw);
                    values[Metric::Rtt.index()] = rtt;
                    values[Metric::RttVar.index()] = rtt_var;
                }
                m if m.is_bandwidth() => values[m.index()] = to_mbps(raw),
                m => values[m.index()] = coerce_f64(raw),
            }
        }

        records.push(CleanRecord::from_values(timestamp, values));
    }

    Ok(records)
}

/// Run all cleaning stages on a loaded table.
///
/// Returns the clean records and the number of cells that were filled.
pub fn clean_table(mut table: RawTable) -> Result<(Vec<CleanRecord>, usize)> {
    let filled = fill_missing(&mut table);
    drop_identifier_columns(&mut table)?;
    let records = clean_records(&table)?;
    Ok((records, filled))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: [&str; 11] = [
        "PID",
        "PORT",
        "IP",
        "Timestamp",
        "rto",
        "rtt",
        "ato",
        "rcv_rtt",
        "send",
        "pacing_rate",
        "delivery_rate",
    ];

    fn make_table(rows: &[[&str; 11]]) -> RawTable {
        let mut table = RawTable::new(HEADER.iter().map(|s| s.to_string()).collect());
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|c| {
                        if c.is_empty() {
                            None
                        } else {
                            Some(c.to_string())
                        }
                    })
                    .collect(),
            );
        }
        table
    }

    fn row<'a>(ts: &'a str, rtt: &'a str, send: &'a str) -> [&'a str; 11] {
        [
            "1234", "443", "10.0.0.5", ts, "204", rtt, "40", "12", send, "3mbps", "900kbps",
        ]
    }

    // ── fill_missing ──────────────────────────────────────────────────────────

    #[test]
    fn test_fill_missing_counts_and_fills() {
        let mut table = make_table(&[row("2024-01-01 10:00:00", "", "")]);
        let filled = fill_missing(&mut table);
        assert_eq!(filled, 2);
        assert!(table.rows[0].iter().all(|c| c.is_some()));
        assert_eq!(table.cell(0, 5), Some("0"));
    }

    #[test]
    fn test_fill_missing_noop_on_complete_table() {
        let mut table = make_table(&[row("2024-01-01 10:00:00", "10/2", "1mbps")]);
        assert_eq!(fill_missing(&mut table), 0);
    }

    // ── drop_identifier_columns ───────────────────────────────────────────────

    #[test]
    fn test_drop_identifier_columns() {
        let mut table = make_table(&[row("2024-01-01 10:00:00", "10/2", "1mbps")]);
        drop_identifier_columns(&mut table).unwrap();
        for id in IDENTIFIER_COLUMNS {
            assert!(table.column_index(id).is_none());
        }
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.headers[0], "Timestamp");
    }

    #[test]
    fn test_drop_identifier_columns_missing_is_schema_error() {
        let mut table = RawTable::new(vec!["PID".to_string(), "Timestamp".to_string()]);
        let err = drop_identifier_columns(&mut table).unwrap_err();
        assert!(matches!(err, NetlogError::MissingColumn(ref c) if c == "PORT"));
        assert_eq!(table.headers.len(), 2);
    }

    // ── clean_records ─────────────────────────────────────────────────────────

    #[test]
    fn test_clean_records_normalizes_fields() {
        let mut table = make_table(&[row("2024-01-01 10:00:00.987", "12.5/3.2", "500kbps")]);
        drop_identifier_columns(&mut table).unwrap();
        let records = clean_records(&table).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(
            r.timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(r.rto, 204.0);
        assert_eq!(r.rtt, 12.5);
        assert_eq!(r.rtt_var, 3.2);
        assert_eq!(r.ato, 40.0);
        assert_eq!(r.rcv_rtt, 12.0);
        assert!((r.send - 0.5).abs() < 1e-9);
        assert!((r.pacing_rate - 3.0).abs() < 1e-9);
        assert!((r.delivery_rate - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_clean_records_bad_cells_become_zero() {
        let mut table = make_table(&[[
            "1",
            "2",
            "3",
            "2024-01-01 10:00:00",
            "n/a-ish",
            "garbage",
            "",
            "x",
            "fast",
            "",
            "12gbps",
        ]]);
        fill_missing(&mut table);
        drop_identifier_columns(&mut table).unwrap();
        let r = &clean_records(&table).unwrap()[0];
        for m in Metric::ALL {
            assert_eq!(r.value(m), 0.0, "{} should be zero", m);
        }
    }

    #[test]
    fn test_clean_records_bad_timestamp_fails_fast() {
        let mut table = make_table(&[
            row("2024-01-01 10:00:00", "10/2", "1mbps"),
            row("yesterday", "10/2", "1mbps"),
        ]);
        drop_identifier_columns(&mut table).unwrap();
        let err = clean_records(&table).unwrap_err();
        match err {
            NetlogError::TimestampParse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_records_filled_timestamp_fails() {
        let mut table = make_table(&[row("", "10/2", "1mbps")]);
        fill_missing(&mut table);
        drop_identifier_columns(&mut table).unwrap();
        let err = clean_records(&table).unwrap_err();
        assert!(matches!(err, NetlogError::TimestampParse { ref value, .. } if value == "0"));
    }

    #[test]
    fn test_clean_records_requires_metric_columns() {
        let mut table = RawTable::new(vec!["Timestamp".to_string(), "rto".to_string()]);
        table.push_row(vec![Some("2024-01-01 10:00:00".to_string()), None]);
        let err = clean_records(&table).unwrap_err();
        assert!(matches!(err, NetlogError::MissingColumn(ref c) if c == "rtt"));
    }

    // ── clean_table ───────────────────────────────────────────────────────────

    #[test]
    fn test_clean_table_runs_all_stages() {
        let table = make_table(&[
            row("2024-01-01 10:00:00.123", "10/2", "1.5mbps"),
            row("2024-01-01 10:00:01.500", "", ""),
        ]);
        let (records, filled) = clean_table(table).unwrap();
        assert_eq!(filled, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].rtt, 0.0);
        assert_eq!(records[1].rtt_var, 0.0);
        assert_eq!(records[1].send, 0.0);
    }
}
