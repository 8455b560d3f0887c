//! Error types for rasterdsp-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Rasterdsp core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid pixel depth
    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// Palette required but not present
    #[error("palette required but not present")]
    PaletteRequired,

    /// Palette not allowed for this depth
    #[error("palette not allowed for depth {0} bpp")]
    PaletteNotAllowed(u32),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Null or empty input
    #[error("null or empty input: {0}")]
    NullInput(&'static str),

    /// Unsupported pixel format for this operation
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for rasterdsp core operations
pub type Result<T> = std::result::Result<T, Error>;
