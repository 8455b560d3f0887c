//! Error types for color operations

use thiserror::Error;

/// Errors that can occur during color processing operations
#[derive(Error, Debug)]
pub enum ColorError {
    /// Error from core bitmap operations
    #[error("Core error: {0}")]
    Core(#[from] rasterdsp_core::Error),

    /// Unsupported bit depth for this operation
    #[error("Unsupported depth: expected {expected}, got {actual} bpp")]
    UnsupportedDepth {
        expected: &'static str,
        actual: u32,
    },

    /// Invalid operation parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Contrast mask does not match the image it guards
    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    /// No pixels contributed to the histogram
    #[error("Histogram is empty")]
    EmptyHistogram,

    /// Operation requires a non-empty selection
    #[error("Selection is empty")]
    EmptySelection,
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
