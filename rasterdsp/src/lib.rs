//! Rasterdsp - Raster image processing transforms for Rust
//!
//! # Overview
//!
//! Rasterdsp provides in-memory transforms over 1, 8 and 24 bit
//! bitmaps, including:
//!
//! - Color space conversion, channel splitting and tone adjustment
//! - Histogram thresholding and adaptive binarization
//! - Convolution, morphology, rank and blur filters
//! - 2D Fourier transforms
//! - Flood fill and boundary tracing
//! - Iterative defect repair
//!
//! # Example
//!
//! ```
//! use rasterdsp::{BitDepth, Bitmap};
//!
//! // Create a new 8-bit grayscale image
//! let bmp = Bitmap::new(640, 480, BitDepth::Bit8).unwrap();
//! assert_eq!(bmp.width(), 640);
//! assert_eq!(bmp.height(), 480);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use rasterdsp_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use rasterdsp_color as color;
pub use rasterdsp_filter as filter;
pub use rasterdsp_frequency as frequency;
pub use rasterdsp_inpaint as inpaint;
pub use rasterdsp_region as region;
