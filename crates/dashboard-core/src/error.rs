use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the commerce dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be parsed at the syntax level.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The dataset header is missing a required column.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A timestamp cell did not match any recognised format.
    ///
    /// `row` is the 1-based data-row number (excluding the header).
    #[error("Invalid timestamp in row {row}, column {column}: {value:?}")]
    TimestampParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A numeric cell could not be parsed.
    #[error("Invalid number in row {row}, column {column}: {value:?}")]
    NumberParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// No dataset file was supplied and none was found at a default location.
    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
