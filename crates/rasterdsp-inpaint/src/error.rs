//! Error types for repair operations

use thiserror::Error;

/// Errors that can occur during repair operations
#[derive(Error, Debug)]
pub enum InpaintError {
    /// Error from core bitmap operations
    #[error("Core error: {0}")]
    Core(#[from] rasterdsp_core::Error),

    /// Error from channel splitting or recombination
    #[error("Color error: {0}")]
    Color(#[from] rasterdsp_color::ColorError),
}

/// Result type for repair operations
pub type InpaintResult<T> = Result<T, InpaintError>;
