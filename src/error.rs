//! Error types for the resampling kernel
//!
//! Every failure here is a caller contract violation. They are detected
//! once, before any output is written.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    /// The curved detector has no columns to sample from
    #[error("curved detector must have at least one column")]
    EmptyDetector,

    #[error("volume extent overflows: {projections} x {rows} x {columns}")]
    ShapeOverflow {
        projections: usize,
        rows: usize,
        columns: usize,
    },

    #[error("curved volume length mismatch: expected {expected}, got {actual}")]
    CurvedLengthMismatch { expected: usize, actual: usize },

    #[error("flat volume length mismatch: expected {expected}, got {actual}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    #[error("volume length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
