//! # Mesh Errors
//!
//! Error types for meshing and STL encoding.

use heightfield::HeightFieldError;
use thiserror::Error;

/// Errors that can occur while realising or reading a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The height field could not be prepared
    #[error("Height field error: {0}")]
    HeightField(#[from] HeightFieldError),

    /// The sink or source failed; passed through untouched
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The face count does not fit the 32-bit header field
    #[error("Too many facets: {count} (max: {max})")]
    TooManyFacets {
        /// Faces in the mesh.
        count: usize,
        /// Largest count the header can hold.
        max: usize,
    },

    /// Input ended before the 84-byte header was complete
    #[error("Invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Header length in bytes.
        expected: usize,
        /// Bytes actually read.
        got: usize,
    },

    /// Slice points must be finite and strictly increasing
    #[error("Invalid slice point {value} at index {index}: slice points must be finite and increasing")]
    InvalidSlice {
        /// Position in the slice list.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Input ended before every announced facet was read
    #[error("Truncated STL: header announces {expected} facets, found {got}")]
    TruncatedFacets {
        /// Count stored in the header.
        expected: u32,
        /// Complete records read.
        got: u32,
    },
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
