//! Error types for region operations

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Error, Debug)]
pub enum RegionError {
    /// Error from core bitmap operations
    #[error("Core error: {0}")]
    Core(#[from] rasterdsp_core::Error),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
