//! Data processing layer for netlog.
//!
//! Responsible for loading the raw metrics CSV, cleaning and normalizing its
//! fields, aggregating per second, persisting the processed table and running
//! the whole sequence as one pipeline.

pub mod aggregator;
pub mod cleaner;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use netlog_core as core;
