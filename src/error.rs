//! Error types for minjoin.

use thiserror::Error;

/// Errors that can occur while planning, building, or querying a join.
#[derive(Debug, Error)]
pub enum JoinError {
    /// A parameter is out of range or inconsistent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error while reading or writing a corpus file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line-delimited JSON in a corpus file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JoinError>;
