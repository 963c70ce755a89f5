//! # Heightfield Errors
//!
//! Error types for grid construction and preparation.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while building or preparing a grid.
#[derive(Debug, Error, PartialEq)]
pub enum HeightFieldError {
    /// A row has a different length from the first row.
    #[error("Ragged grid: row {row} has {got} samples (expected {expected})")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// Flat sample buffer does not match `width * height`.
    #[error("Sample count mismatch: {got} samples (expected {expected})")]
    SampleCount {
        /// `width * height`.
        expected: usize,
        /// Buffer length supplied.
        got: usize,
    },

    /// Decimation divisor must be at least 1.
    #[error("Invalid decimation divisor: {0}")]
    InvalidDivisor(usize),

    /// Realise configuration rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for heightfield operations.
pub type HeightFieldResult<T> = Result<T, HeightFieldError>;
