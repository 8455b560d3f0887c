//! Error types for frequency-domain operations

use thiserror::Error;

/// Errors that can occur during Fourier transforms
#[derive(Error, Debug)]
pub enum FrequencyError {
    /// Error from core bitmap operations
    #[error("Core error: {0}")]
    Core(#[from] rasterdsp_core::Error),

    /// Neither a real nor an imaginary source plane was supplied
    #[error("At least one source plane is required")]
    MissingSource,

    /// The radix-2 transform needs a power-of-two line length
    #[error("Line length {0} is not a power of two")]
    NotPowerOfTwo(usize),
}

/// Result type for frequency-domain operations
pub type FrequencyResult<T> = Result<T, FrequencyError>;
