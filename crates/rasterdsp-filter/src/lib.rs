//! Rasterdsp Filter - Spatial filtering for raster images
//!
//! This crate provides the neighborhood transforms:
//!
//! - **Convolution** ([`convolve`]): Arbitrary square kernels with per-call factor and bias, plus the fixed mean filter
//! - **Window extrema** ([`edge`]): Erosion, dilation, edge and contour detection
//! - **Rank filtering** ([`rank`]): Median filter for speckle removal
//! - **Blur family** ([`blur`]): Separable gaussian blur, unsharp masking, edge-preserving selective blur
//! - **Noise** ([`noise`]): Additive uniform noise and pixel jitter from a caller-supplied generator

pub mod blur;
pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod noise;
pub mod rank;

// Re-export core types
pub use rasterdsp_core;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use blur::{gaussian_blur, selective_blur, unsharp_mask};
pub use convolve::{filter, mean};
pub use edge::{contour, dilate, edge, erode};
pub use noise::{jitter, noise};
pub use rank::median;
