//! Rasterdsp Inpaint - Defect repair for raster images
//!
//! This crate provides the channel-wise repair transform:
//!
//! - **Repair** ([`repair()`]): Iterative anisotropic smoothing over the planes of a chosen color space

mod error;
pub mod repair;

// Re-export core types
pub use rasterdsp_core;

pub use error::{InpaintError, InpaintResult};

// The color space the planes are taken in comes from the color crate
pub use rasterdsp_color::ColorSpace;

// Re-export commonly used functions
pub use repair::repair;
