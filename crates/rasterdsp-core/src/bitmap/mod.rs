//! Bitmap - the in-memory image container
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words; every row starts on a word
//!   boundary
//! - 1 bpp packs 32 pixels per word, MSB first
//! - 8 bpp packs 4 pixels per word, MSB first
//! - 24 bpp stores one pixel per word as `0xRRGGBBAA`; the low byte is the
//!   alpha sample, meaningful only when the alpha channel is enabled
//!
//! # Ownership model
//!
//! `Bitmap` uses `Arc` for efficient cloning (shared ownership). To modify
//! pixel data, convert to [`BitmapMut`] via [`Bitmap::try_into_mut`] or
//! [`Bitmap::to_mut`], then convert back with `Into<Bitmap>`. A freshly
//! created bitmap has a single owner, so `try_into_mut` on it cannot fail.

mod access;
pub mod blend;
mod convert;
mod crop;
mod resample;

pub use access::{get_data_bit, get_data_byte, set_data_bit, set_data_byte};
pub use blend::MixOp;
pub use resample::ResampleMode;

use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::rect::Rect;
use crate::selection::Selection;
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BitDepth {
    /// 1-bit binary or two-entry indexed image
    Bit1 = 1,
    /// 8-bit grayscale or indexed color
    Bit8 = 8,
    /// 24-bit RGB with optional alpha
    Bit24 = 24,
}

impl BitDepth {
    /// Create `BitDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 8, or 24.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(BitDepth::Bit1),
            8 => Ok(BitDepth::Bit8),
            24 => Ok(BitDepth::Bit24),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Bits each pixel occupies in the packed word storage. 24 bpp pixels
    /// occupy a full word.
    pub(crate) fn storage_bits(self) -> u32 {
        match self {
            BitDepth::Bit1 => 1,
            BitDepth::Bit8 => 8,
            BitDepth::Bit24 => 32,
        }
    }

    /// Check if a palette is allowed for this depth.
    pub fn palette_allowed(self) -> bool {
        matches!(self, BitDepth::Bit1 | BitDepth::Bit8)
    }

    /// Maximum raw pixel value at this depth (palette index range for
    /// indexed depths).
    pub fn max_index(self) -> u32 {
        match self {
            BitDepth::Bit1 => 1,
            BitDepth::Bit8 => 255,
            BitDepth::Bit24 => u32::MAX,
        }
    }
}

/// Internal bitmap data
#[derive(Debug)]
struct BitmapData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: BitDepth,
    /// 32-bit words per row
    wpr: u32,
    /// Whether the alpha samples of a 24 bpp image are meaningful
    has_alpha: bool,
    /// Optional color table for 1 and 8 bpp images
    palette: Option<Palette>,
    /// Optional region of interest
    selection: Option<Selection>,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

impl BitmapData {
    fn duplicate(&self) -> Self {
        BitmapData {
            width: self.width,
            height: self.height,
            depth: self.depth,
            wpr: self.wpr,
            has_alpha: self.has_alpha,
            palette: self.palette.clone(),
            selection: self.selection.clone(),
            data: self.data.clone(),
        }
    }
}

/// The in-memory image container (shared, immutable)
///
/// # Examples
///
/// ```
/// use rasterdsp_core::{Bitmap, BitDepth};
///
/// let bmp = Bitmap::new(640, 480, BitDepth::Bit8).unwrap();
/// assert_eq!(bmp.width(), 640);
/// assert_eq!(bmp.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Bitmap {
    inner: Arc<BitmapData>,
}

impl Bitmap {
    /// Create a new bitmap with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero, with no palette, no selection
    /// and no alpha channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: BitDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpr = Self::compute_wpr(width, depth);
        let data_size = (wpr as usize) * (height as usize);

        let inner = BitmapData {
            width,
            height,
            depth,
            wpr,
            has_alpha: false,
            palette: None,
            selection: None,
            data: vec![0u32; data_size],
        };

        Ok(Bitmap {
            inner: Arc::new(inner),
        })
    }

    /// Compute words per row for given width and depth.
    ///
    /// Uses u64 arithmetic to prevent overflow for large widths.
    ///
    /// # Panics
    ///
    /// Panics if the result would exceed `u32::MAX`.
    #[inline]
    fn compute_wpr(width: u32, depth: BitDepth) -> u32 {
        let bits_per_row = u64::from(width) * u64::from(depth.storage_bits());
        let wpr = bits_per_row.div_ceil(32);
        u32::try_from(wpr).unwrap_or_else(|_| {
            panic!(
                "image row too large: width={} depth={:?} requires {} words",
                width, depth, wpr
            )
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.inner.depth
    }

    /// Get the words per row.
    #[inline]
    pub fn wpr(&self) -> u32 {
        self.inner.wpr
    }

    /// Whether the alpha samples of this 24 bpp image are meaningful.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.inner.has_alpha
    }

    /// Check whether this image has a palette attached.
    #[inline]
    pub fn has_palette(&self) -> bool {
        self.inner.palette.is_some()
    }

    /// Get a reference to the image's palette, if present.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.inner.palette.as_ref()
    }

    /// An indexed image resolves pixel values through its palette.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.inner.depth.palette_allowed() && self.inner.palette.is_some()
    }

    /// True for 1 and 8 bpp images whose colors are all gray: either no
    /// palette (implicit ramp) or a palette with r == g == b everywhere.
    pub fn is_grayscale(&self) -> bool {
        match self.inner.depth {
            BitDepth::Bit24 => false,
            _ => self
                .inner
                .palette
                .as_ref()
                .is_none_or(|p| p.is_grayscale()),
        }
    }

    /// Get the image's selection, if present.
    #[inline]
    pub fn selection(&self) -> Option<&Selection> {
        self.inner.selection.as_ref()
    }

    /// Check whether (x, y) is in scope: true when there is no selection,
    /// otherwise true when the selection level at (x, y) is nonzero.
    /// Out-of-range coordinates are in scope only without a selection.
    #[inline]
    pub fn is_inside_selection(&self, x: i32, y: i32) -> bool {
        match self.inner.selection {
            None => true,
            Some(ref s) => s.is_inside(x, y),
        }
    }

    /// Bounding rectangle of the selection, or `None` when there is no
    /// selection.
    pub fn selection_box(&self) -> Option<Rect> {
        self.inner.selection.as_ref().map(|s| s.bounds())
    }

    /// The full-image rectangle (0, 0, width, height).
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new_unchecked(0, 0, self.inner.width as i32, self.inner.height as i32)
    }

    /// Check whether (x, y) lies inside the image.
    #[inline]
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.inner.width as i32 && y < self.inner.height as i32
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the words of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpr) as usize;
        let end = start + self.inner.wpr as usize;
        &self.inner.data[start..end]
    }

    /// Check if two bitmaps have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Bitmap) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Create a new bitmap with the same dimensions and metadata as this
    /// one.
    ///
    /// The image data is initialized to zero. Palette, alpha flag and
    /// selection are copied from the source.
    pub fn create_template(&self) -> Self {
        let data_size = (self.inner.wpr as usize) * (self.inner.height as usize);
        let inner = BitmapData {
            width: self.inner.width,
            height: self.inner.height,
            depth: self.inner.depth,
            wpr: self.inner.wpr,
            has_alpha: self.inner.has_alpha,
            palette: self.inner.palette.clone(),
            selection: self.inner.selection.clone(),
            data: vec![0u32; data_size],
        };
        Bitmap {
            inner: Arc::new(inner),
        }
    }

    /// Create a deep copy of this bitmap.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates a
    /// completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Bitmap {
            inner: Arc::new(self.inner.duplicate()),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<BitmapMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(BitmapMut { inner: data }),
            Err(arc) => Err(Bitmap { inner: arc }),
        }
    }

    /// Create a mutable copy of this bitmap.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> BitmapMut {
        BitmapMut {
            inner: self.inner.duplicate(),
        }
    }
}

/// Mutable bitmap
///
/// Allows modification of image data. Convert back to an immutable
/// [`Bitmap`] using `Into<Bitmap>`. Exclusive access is enforced at
/// compile time.
#[derive(Debug)]
pub struct BitmapMut {
    inner: BitmapData,
}

impl BitmapMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.inner.depth
    }

    /// Get the words per row.
    #[inline]
    pub fn wpr(&self) -> u32 {
        self.inner.wpr
    }

    /// Whether the alpha samples of this 24 bpp image are meaningful.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.inner.has_alpha
    }

    /// Check whether this image has a palette attached.
    #[inline]
    pub fn has_palette(&self) -> bool {
        self.inner.palette.is_some()
    }

    /// Get a reference to the image's palette, if present.
    #[inline]
    pub fn palette(&self) -> Option<&Palette> {
        self.inner.palette.as_ref()
    }

    /// Get mutable access to the image's palette, if present.
    #[inline]
    pub fn palette_mut(&mut self) -> Option<&mut Palette> {
        self.inner.palette.as_mut()
    }

    /// An indexed image resolves pixel values through its palette.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.inner.depth.palette_allowed() && self.inner.palette.is_some()
    }

    /// True for 1 and 8 bpp images whose colors are all gray.
    pub fn is_grayscale(&self) -> bool {
        match self.inner.depth {
            BitDepth::Bit24 => false,
            _ => self
                .inner
                .palette
                .as_ref()
                .is_none_or(|p| p.is_grayscale()),
        }
    }

    /// Set or remove the palette.
    ///
    /// Palettes are only valid for 1 and 8 bpp images.
    pub fn set_palette(&mut self, palette: Option<Palette>) -> Result<()> {
        if palette.is_some() && !self.inner.depth.palette_allowed() {
            return Err(Error::PaletteNotAllowed(self.inner.depth.bits()));
        }
        self.inner.palette = palette;
        Ok(())
    }

    /// Set one palette entry.
    ///
    /// # Errors
    ///
    /// Fails when there is no palette or the index is out of range.
    pub fn set_palette_color(&mut self, index: usize, color: crate::Rgba) -> Result<()> {
        match self.inner.palette {
            Some(ref mut p) => p.set(index, color),
            None => Err(Error::PaletteRequired),
        }
    }

    /// Enable the alpha channel (24 bpp only), initializing every alpha
    /// sample to opaque.
    pub fn enable_alpha(&mut self) -> Result<()> {
        if self.inner.depth != BitDepth::Bit24 {
            return Err(Error::UnsupportedDepth(self.inner.depth.bits()));
        }
        if !self.inner.has_alpha {
            for word in self.inner.data.iter_mut() {
                *word |= 0xff;
            }
            self.inner.has_alpha = true;
        }
        Ok(())
    }

    /// Disable the alpha channel. The alpha bytes are left in place but no
    /// longer meaningful.
    pub fn disable_alpha(&mut self) {
        self.inner.has_alpha = false;
    }

    /// Get the image's selection, if present.
    #[inline]
    pub fn selection(&self) -> Option<&Selection> {
        self.inner.selection.as_ref()
    }

    /// Get mutable access to the image's selection, if present.
    #[inline]
    pub fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.inner.selection.as_mut()
    }

    /// Replace the selection plane. Its dimensions must match the image.
    pub fn set_selection(&mut self, selection: Option<Selection>) -> Result<()> {
        if let Some(ref s) = selection
            && (s.width() != self.inner.width || s.height() != self.inner.height)
        {
            return Err(Error::DimensionMismatch {
                expected: (self.inner.width, self.inner.height),
                actual: (s.width(), s.height()),
            });
        }
        self.inner.selection = selection;
        Ok(())
    }

    /// Select a rectangle at the given level, creating the selection plane
    /// if needed.
    pub fn select_rect(&mut self, rect: Rect, level: u8) {
        let selection = self
            .inner
            .selection
            .get_or_insert_with(|| Selection::new(self.inner.width, self.inner.height));
        selection.select_rect(rect, level);
    }

    /// Drop the selection; the whole image is in scope again.
    pub fn clear_selection(&mut self) {
        self.inner.selection = None;
    }

    /// Check whether (x, y) is in scope of the selection.
    #[inline]
    pub fn is_inside_selection(&self, x: i32, y: i32) -> bool {
        match self.inner.selection {
            None => true,
            Some(ref s) => s.is_inside(x, y),
        }
    }

    /// Bounding rectangle of the selection, or `None` when there is no
    /// selection.
    pub fn selection_box(&self) -> Option<Rect> {
        self.inner.selection.as_ref().map(|s| s.bounds())
    }

    /// The full-image rectangle (0, 0, width, height).
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new_unchecked(0, 0, self.inner.width as i32, self.inner.height as i32)
    }

    /// Check whether (x, y) lies inside the image.
    #[inline]
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.inner.width as i32 && y < self.inner.height as i32
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get the words of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpr) as usize;
        let end = start + self.inner.wpr as usize;
        &self.inner.data[start..end]
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.inner.wpr) as usize;
        let end = start + self.inner.wpr as usize;
        &mut self.inner.data[start..end]
    }

    /// Clear all pixels to zero.
    pub fn clear(&mut self) {
        self.inner.data.fill(0);
    }

    /// Get a read-only view of this bitmap for passing to transforms that
    /// take `&Bitmap`-style parameters.
    pub fn as_bitmap(&self) -> Bitmap {
        Bitmap {
            inner: Arc::new(self.inner.duplicate()),
        }
    }
}

impl From<BitmapMut> for Bitmap {
    fn from(bitmap_mut: BitmapMut) -> Self {
        Bitmap {
            inner: Arc::new(bitmap_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth() {
        assert_eq!(BitDepth::from_bits(1).unwrap(), BitDepth::Bit1);
        assert_eq!(BitDepth::from_bits(8).unwrap(), BitDepth::Bit8);
        assert_eq!(BitDepth::from_bits(24).unwrap(), BitDepth::Bit24);
        assert!(BitDepth::from_bits(16).is_err());

        assert_eq!(BitDepth::Bit24.bits(), 24);
        assert!(BitDepth::Bit8.palette_allowed());
        assert!(!BitDepth::Bit24.palette_allowed());
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Bitmap::new(0, 10, BitDepth::Bit8),
            Err(Error::InvalidDimension {
                width: 0,
                height: 10
            })
        ));
        assert!(Bitmap::new(10, 0, BitDepth::Bit8).is_err());
    }

    #[test]
    fn test_words_per_row() {
        assert_eq!(Bitmap::new(64, 1, BitDepth::Bit1).unwrap().wpr(), 2);
        assert_eq!(Bitmap::new(65, 1, BitDepth::Bit1).unwrap().wpr(), 3);
        assert_eq!(Bitmap::new(7, 1, BitDepth::Bit8).unwrap().wpr(), 2);
        assert_eq!(Bitmap::new(8, 1, BitDepth::Bit8).unwrap().wpr(), 2);
        assert_eq!(Bitmap::new(5, 1, BitDepth::Bit24).unwrap().wpr(), 5);
    }

    #[test]
    fn test_try_into_mut_on_fresh_bitmap() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        assert!(bmp.try_into_mut().is_ok());
    }

    #[test]
    fn test_try_into_mut_fails_when_shared() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        let shared = bmp.clone();
        let result = bmp.try_into_mut();
        assert!(result.is_err());
        drop(shared);
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        let copy = bmp.deep_clone();
        let mut copy_mut = copy.try_into_mut().unwrap();
        copy_mut.set_pixel_unchecked(0, 0, 99);
        let copy: Bitmap = copy_mut.into();
        assert_eq!(copy.get_pixel_unchecked(0, 0), 99);
        assert_eq!(bmp.get_pixel_unchecked(0, 0), 0);
    }

    #[test]
    fn test_create_template_copies_metadata() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut
            .set_palette(Some(Palette::grayscale(256).unwrap()))
            .unwrap();
        bmp_mut.set_pixel_unchecked(1, 1, 42);
        let bmp: Bitmap = bmp_mut.into();

        let template = bmp.create_template();
        assert!(template.has_palette());
        assert_eq!(template.get_pixel_unchecked(1, 1), 0);
    }

    #[test]
    fn test_palette_rejected_for_24bpp() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit24).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        assert!(
            bmp_mut
                .set_palette(Some(Palette::grayscale(2).unwrap()))
                .is_err()
        );
    }

    #[test]
    fn test_enable_alpha_sets_opaque() {
        let bmp = Bitmap::new(2, 2, BitDepth::Bit24).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        assert!(!bmp_mut.has_alpha());
        bmp_mut.enable_alpha().unwrap();
        assert!(bmp_mut.has_alpha());
        let bmp: Bitmap = bmp_mut.into();
        assert_eq!(bmp.pixel_color_unchecked(0, 0).alpha, 255);
    }

    #[test]
    fn test_enable_alpha_rejected_below_24bpp() {
        let bmp = Bitmap::new(2, 2, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        assert!(bmp_mut.enable_alpha().is_err());
    }

    #[test]
    fn test_selection_scope() {
        let bmp = Bitmap::new(8, 8, BitDepth::Bit8).unwrap();
        assert!(bmp.is_inside_selection(3, 3));
        assert!(bmp.selection_box().is_none());

        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut.select_rect(Rect::new_unchecked(2, 2, 3, 3), 255);
        let bmp: Bitmap = bmp_mut.into();
        assert!(bmp.is_inside_selection(2, 2));
        assert!(!bmp.is_inside_selection(0, 0));
        assert_eq!(bmp.selection_box().unwrap(), Rect::new_unchecked(2, 2, 3, 3));
    }

    #[test]
    fn test_grayscale_classification() {
        let gray = Bitmap::new(2, 2, BitDepth::Bit8).unwrap();
        assert!(gray.is_grayscale());
        assert!(!gray.is_indexed());

        let mut indexed = Bitmap::new(2, 2, BitDepth::Bit8).unwrap().to_mut();
        indexed
            .set_palette(Some(
                Palette::from_colors(&[crate::Rgba::rgb(255, 0, 0), crate::Rgba::rgb(0, 0, 255)])
                    .unwrap(),
            ))
            .unwrap();
        let indexed: Bitmap = indexed.into();
        assert!(!indexed.is_grayscale());
        assert!(indexed.is_indexed());

        let rgb = Bitmap::new(2, 2, BitDepth::Bit24).unwrap();
        assert!(!rgb.is_grayscale());
    }
}
