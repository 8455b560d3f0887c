//! Rasterdsp Frequency - Fourier transforms for raster images
//!
//! This crate provides the frequency-domain side of the library:
//!
//! - **Complex arithmetic** ([`complex`]): A double-precision complex value type
//! - **Sample grids** ([`grid`]): The owned 2D complex working grid
//! - **Transforms** ([`transform`]): Radix-2 FFT, direct DFT fallback, and the [`fft2`] image driver

pub mod complex;
mod error;
pub mod grid;
pub mod transform;

// Re-export core types
pub use rasterdsp_core;

pub use complex::Complex;
pub use error::{FrequencyError, FrequencyResult};
pub use grid::FourierGrid;

// Re-export commonly used functions
pub use transform::{Direction, dft, fft, fft2};
