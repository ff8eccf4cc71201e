//! Shared building blocks for netlog.
//!
//! Error type, record models, per-cell field normalizers, time utilities and
//! command-line settings used by the data, chart and binary crates.

pub mod error;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod time_utils;
