//! Error types for filter operations

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Error, Debug)]
pub enum FilterError {
    /// Error from core bitmap operations
    #[error("Core error: {0}")]
    Core(#[from] rasterdsp_core::Error),

    /// Kernel geometry or coefficients are unusable
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid operation parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Operation requires a non-empty selection
    #[error("Selection is empty")]
    EmptySelection,
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
