//! Error types for exploratory analysis
//!
//! Provides a unified error type for all eda crates.

use thiserror::Error;

/// Core error type for table and statistical operations
#[derive(Error, Debug)]
pub enum Error {
    /// A column required by an operation is not present in the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column exists but holds the wrong kind of data
    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Polars error from reading or transforming a frame
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a size mismatch between two inputs
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create a type mismatch error for a column
    pub fn type_mismatch(column: &str, expected: &str, got: impl ToString) -> Self {
        Self::TypeMismatch {
            column: column.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// True if this error reports a missing column
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_) | Self::Polars(polars::error::PolarsError::ColumnNotFound(_))
        )
    }
}
