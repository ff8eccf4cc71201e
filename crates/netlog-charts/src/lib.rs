//! Chart output for netlog.
//!
//! Creates the per-run plots directory and renders one PNG line chart per
//! aggregated metric.

pub mod charts;
pub mod output_dir;

pub use netlog_core as core;
