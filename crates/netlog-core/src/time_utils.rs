use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use tracing::debug;

/// Format of timestamps written to the processed CSV and used as chart labels.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the run-specific suffix in `plots_<suffix>` directory names.
pub const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse a timestamp cell into a naive date-time.
///
/// Handles RFC 3339 (including the `Z` suffix), RFC 2822 and ISO 8601 with a
/// colon-free offset, all converted to UTC, plus a handful of offset-free
/// patterns (ISO, slash-separated year-first and month-first) taken as-is.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc).naive_utc());
        }
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    // Date-only values land on midnight.
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    debug!("could not parse timestamp string \"{}\"", s);
    None
}

/// Drop the sub-second part of `ts`.
///
/// The nanosecond field is never negative, so this is a floor even for
/// instants before the epoch.
pub fn floor_to_second(ts: NaiveDateTime) -> NaiveDateTime {
    ts.trunc_subsecs(0)
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of wall-clock time, injected wherever the current time matters.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Name of the chart directory for a run started at `now`,
/// e.g. `plots_20240101_100000`.
pub fn plots_dir_name(now: NaiveDateTime) -> String {
    format!("plots_{}", now.format(RUN_STAMP_FORMAT))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
