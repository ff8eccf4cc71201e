//! Total, per-cell field normalizers.
//!
//! Every function here maps any input string to a finite `f64`. Values that
//! cannot be understood become `0.0`; none of them return an error.

use regex::Regex;
use std::sync::OnceLock;

/// Literal that missing cells are filled with before coercion.
pub const FILL_VALUE: &str = "0";

/// Cell contents treated as missing when loading the input table.
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell should be treated as missing.
pub fn is_missing(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

// ── Decimal coercion ──────────────────────────────────────────────────────────

/// Parse a trimmed decimal literal, rejecting `nan` and infinities.
pub fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a numeric cell to `f64`, falling back to `0.0`.
pub fn coerce_f64(s: &str) -> f64 {
    parse_decimal(s).unwrap_or(0.0)
}

// ── RTT ───────────────────────────────────────────────────────────────────────

fn rtt_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\d.]+)/([\d.]+)").expect("regex is valid"))
}

/// Split an `ss`-style `"<rtt>/<rtt_var>"` cell into its two numbers.
///
/// The first `number/number` match anywhere in the string wins. Returns
/// `(0.0, 0.0)` when there is no match or either side is not a decimal,
/// e.g. `"1.2.3/4"`.
pub fn split_rtt(s: &str) -> (f64, f64) {
    let Some(caps) = rtt_pattern().captures(s) else {
        return (0.0, 0.0);
    };
    match (parse_decimal(&caps[1]), parse_decimal(&caps[2])) {
        (Some(rtt), Some(rtt_var)) => (rtt, rtt_var),
        _ => (0.0, 0.0),
    }
}

// ── Bandwidth ─────────────────────────────────────────────────────────────────

/// Normalize a bandwidth cell to Mbps.
///
/// * `"<n>mbps"` → `n`
/// * `"<n>kbps"` → `n / 1000`
/// * `"0"` or empty → `0.0`
/// * anything else is parsed as an already-clean number
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn to_mbps(s: &str) -> f64 {
    let value = s.trim().to_lowercase();

    if let Some(prefix) = value.strip_suffix("mbps") {
        coerce_f64(prefix)
    } else if let Some(prefix) = value.strip_suffix("kbps") {
        coerce_f64(prefix) / 1000.0
    } else if value.is_empty() || value == FILL_VALUE {
        0.0
    } else {
        coerce_f64(&value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
