//! Error types for grid processing.

use thiserror::Error;

/// Result type for grid processing operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridError {
    /// Data length does not match the declared grid dimensions.
    #[error("grid of {width}x{height} needs {expected} values, got {actual}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// A processing parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl GridError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(width: usize, height: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            width,
            height,
            expected: width * height,
            actual,
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
