//! Error types for the sales dashboard.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the sales dashboard.
#[derive(Error, Debug)]
pub enum Error {
    /// The dataset has no records.
    #[error("Empty input: the dataset contains no sales records")]
    EmptyInput,

    /// A required column is absent after header normalization.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Total sales are zero, so percentage shares are undefined.
    #[error("Degenerate totals: total sales are zero, ABC classification is undefined")]
    DegenerateTotals,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid or missing cell values).
    #[error("Data error: {0}")]
    Data(String),

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a missing column error.
    pub fn missing_column(name: impl Into<String>) -> Self {
        Error::MissingColumn(name.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Whether this error only invalidates a single dashboard section
    /// rather than the whole dataset.
    pub fn is_section_local(&self) -> bool {
        matches!(self, Error::DegenerateTotals | Error::EmptyInput)
    }
}
