//! Error types
//!
//! One error enum for the whole pipeline: loading, filtering, charting and PDF output.

use thiserror::Error;

/// Report generation error types
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ReportError::InvalidInput(msg.into())
    }

    pub fn chart(msg: impl ToString) -> Self {
        ReportError::Chart(msg.to_string())
    }
}
