//! Error types for NetCDF dataset loading.

use snow_common::SnowError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF dataset loading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by the NetCDF/HDF5 library
    #[error("NetCDF error in {path}: {message}")]
    Library { path: String, message: String },

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Files of one dataset disagree on their grid
    #[error("Grid mismatch: {0}")]
    GridMismatch(String),

    /// A time step index past the end of the dataset
    #[error("Time index {index} out of range for {len} time steps")]
    IndexOutOfRange { index: usize, len: usize },

    /// Invalid file discovery pattern
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),

    /// Time or grid decoding error
    #[error(transparent)]
    Common(#[from] SnowError),
}

impl NetCdfError {
    /// Wrap a library error with the path it occurred in.
    pub fn library(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        Self::Library {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Create a MissingData error.
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }
}
