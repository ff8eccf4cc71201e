use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of fatal pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unreadable input, malformed CSV, unparseable timestamp.
    Input,
    /// An expected column is absent from the table.
    Schema,
    /// An output file or directory could not be written.
    Output,
}

/// All errors produced by the netlog pipeline.
#[derive(Error, Debug)]
pub enum NetlogError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a well-formed CSV document.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The input has no header row.
    #[error("Input has no header row: {0}")]
    MissingHeader(PathBuf),

    /// A data row has more fields than the header.
    #[error("Row {row} has {found} fields, expected at most {expected}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A timestamp cell did not match any recognised date-time format.
    #[error("Invalid timestamp format in row {row}: {value:?}")]
    TimestampParse { row: usize, value: String },

    /// A column required by a pipeline stage is not present.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plotting backend failed to draw or encode a chart.
    #[error("Failed to render chart {path}: {message}")]
    Chart { path: PathBuf, message: String },

    /// An I/O error without a path, e.g. flushing a CSV writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NetlogError {
    /// Classify the error into one of the three fatal kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetlogError::FileRead { .. }
            | NetlogError::CsvParse(_)
            | NetlogError::MissingHeader(_)
            | NetlogError::MalformedRow { .. }
            | NetlogError::TimestampParse { .. } => ErrorKind::Input,
            NetlogError::MissingColumn(_) => ErrorKind::Schema,
            NetlogError::FileWrite { .. }
            | NetlogError::CreateDir { .. }
            | NetlogError::Chart { .. }
            | NetlogError::Io(_) => ErrorKind::Output,
        }
    }
}

/// Convenience alias used throughout the netlog crates.
pub type Result<T> = std::result::Result<T, NetlogError>;
