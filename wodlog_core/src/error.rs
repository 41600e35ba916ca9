//! Error types for the wodlog_core library.

use crate::types::ImportResult;
use chrono::NaiveDate;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wodlog_core operations
///
/// Data-quality problems in an export never show up here; they are reported
/// as [`RowError`](crate::types::RowError) entries instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error (only raised for unreadable input streams)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog or session storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// A confirm run stopped part way through.
    ///
    /// `applied` tallies everything committed before the failure.
    /// `rolled_back` is false when the failed day's session could not be
    /// discarded and may still be in the store.
    #[error("failed to import workout for {date}: {source}")]
    ImportAborted {
        date: NaiveDate,
        applied: ImportResult,
        rolled_back: bool,
        #[source]
        source: Box<Error>,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
