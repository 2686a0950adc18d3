//! Error types shared by the snow animation crates.

use thiserror::Error;

/// Result type alias using SnowError.
pub type SnowResult<T> = Result<T, SnowError>;

/// Primary error type for dataset and grid handling.
#[derive(Debug, Error)]
pub enum SnowError {
    // === Time Errors ===
    #[error("Invalid time units: {0}")]
    InvalidTimeUnits(String),

    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    // === Grid Errors ===
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Grid shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
}

impl SnowError {
    /// Create a ShapeMismatch error from two `ny x nx` descriptions.
    pub fn shape_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
