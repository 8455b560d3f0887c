//! rasterdsp-core - Core bitmap container for the rasterdsp image
//! processing library
//!
//! This crate provides the data structures every other rasterdsp crate
//! builds on:
//!
//! - [`Bitmap`] / [`BitmapMut`]: the in-memory image. Pixel data lives in
//!   packed 32-bit words at 1, 8, or 24 bits per pixel; rows are word
//!   aligned. 24 bpp pixels are stored as `0xRRGGBBAA`
//! - [`Palette`]: color table for 1 and 8 bpp indexed images
//! - [`Selection`]: per-pixel region of interest that transforms honor
//! - [`Rect`]: integer rectangle with exclusive right and bottom edges
//! - [`OperationContext`]: cooperative cancellation and progress
//!   reporting for long-running transforms
//!
//! # Examples
//!
//! ```
//! use rasterdsp_core::{BitDepth, Bitmap, Rgba};
//!
//! let bmp = Bitmap::new(64, 64, BitDepth::Bit24)?;
//! let mut bmp = bmp.try_into_mut().unwrap();
//! bmp.set_pixel_color(10, 10, Rgba::rgb(255, 128, 0), false)?;
//!
//! let bmp: Bitmap = bmp.into();
//! assert_eq!(bmp.pixel_color(10, 10), Some(Rgba::rgb(255, 128, 0)));
//! # Ok::<(), rasterdsp_core::Error>(())
//! ```

pub mod bitmap;
pub mod context;
pub mod error;
pub mod palette;
pub mod rect;
pub mod selection;

pub use bitmap::{
    get_data_bit, get_data_byte, set_data_bit, set_data_byte, BitDepth, Bitmap, BitmapMut, MixOp,
    ResampleMode,
};
pub use context::{OperationContext, ProgressFn};
pub use error::{Error, Result};
pub use palette::{Palette, Rgba, luma};
pub use rect::Rect;
pub use selection::Selection;

/// Packed 24 bpp pixel word manipulation
///
/// A 24 bpp pixel occupies one 32-bit word laid out as `0xRRGGBBAA`.
/// The low byte holds the alpha sample; it is meaningful only when the
/// image's alpha channel is enabled.
pub mod rgb {
    use crate::palette::Rgba;

    /// Bit position of the red sample
    pub const RED_SHIFT: u32 = 24;
    /// Bit position of the green sample
    pub const GREEN_SHIFT: u32 = 16;
    /// Bit position of the blue sample
    pub const BLUE_SHIFT: u32 = 8;
    /// Bit position of the alpha sample
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract the red sample from a pixel word.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract the green sample from a pixel word.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract the blue sample from a pixel word.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract the alpha sample from a pixel word.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a pixel word from RGB samples with opaque alpha.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a pixel word from RGBA samples.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        (u32::from(r) << RED_SHIFT)
            | (u32::from(g) << GREEN_SHIFT)
            | (u32::from(b) << BLUE_SHIFT)
            | (u32::from(a) << ALPHA_SHIFT)
    }

    /// Replace the RGB samples of a pixel word, keeping its alpha byte.
    #[inline]
    pub fn with_rgb(pixel: u32, r: u8, g: u8, b: u8) -> u32 {
        (pixel & 0xff)
            | (u32::from(r) << RED_SHIFT)
            | (u32::from(g) << GREEN_SHIFT)
            | (u32::from(b) << BLUE_SHIFT)
    }

    /// Extract (red, green, blue) from a pixel word.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract (red, green, blue, alpha) from a pixel word.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Compose a pixel word from an [`Rgba`] color.
    #[inline]
    pub fn pack(color: Rgba) -> u32 {
        compose_rgba(color.red, color.green, color.blue, color.alpha)
    }

    /// Split a pixel word into an [`Rgba`] color.
    #[inline]
    pub fn unpack(pixel: u32) -> Rgba {
        Rgba::new(red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }
}
