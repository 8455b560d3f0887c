//! Rasterdsp Color - Color processing for raster images
//!
//! This crate provides color manipulation and measurement functions:
//!
//! - **Color space conversion** ([`colorspace`]): RGB <-> HSL, YUV, YIQ, XYZ, per pixel or whole image
//! - **Channel splitting** ([`channel`]): Split into planes of any supported space, CMYK, alpha; recombine
//! - **Thresholding** ([`threshold`]): Binary conversion, histogram-based optimal levels, adaptive local thresholding
//! - **Tone adjustment** ([`enhance`]): Look-up tables, brightness/contrast, gamma, saturation, solarize, colorize, red-eye removal

pub mod channel;
pub mod colorspace;
pub mod enhance;
pub mod error;
pub mod threshold;

// Re-export core types
pub use rasterdsp_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export color space types and functions
pub use colorspace::{
    // Types
    ColorSpace,
    ColorTriple,
    // Constants
    HSL_UNDEFINED,
    // Pixel-level conversions
    hsl_to_rgb,
    rgb_to_hsl,
    rgb_to_xyz,
    rgb_to_yiq,
    rgb_to_yuv,
    xyz_to_rgb,
    yiq_to_rgb,
    yuv_to_rgb,
    // Image-level conversion
    convert_color_space,
};

// Re-export channel functions
pub use channel::{combine, split, split_alpha, split_cmyk};

// Re-export threshold functions
pub use threshold::{
    // Types
    AdaptiveThresholdOptions,
    ThresholdMethod,
    // Functions
    adaptive_threshold,
    optimal_threshold,
    threshold,
    threshold2,
    threshold_mask,
};

// Re-export tone adjustment functions
pub use enhance::{
    // Types
    Lut,
    SaturationMode,
    // Functions
    apply_lut,
    apply_lut_rgb,
    colorize,
    gamma,
    gamma_rgb,
    light,
    mean_lightness,
    red_eye_remove,
    saturate,
    shift_rgb,
    solarize,
};
