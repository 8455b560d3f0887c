//! Palette - color table for indexed images
//!
//! A palette maps pixel indices of 1 and 8 bpp images to RGBA colors.
//! 8 bpp images without a palette are treated as implicit-ramp grayscale
//! (index i renders as gray level i).

use crate::error::{Error, Result};

/// An RGBA color value.
///
/// Also serves as the palette entry type. Alpha defaults to 255 (opaque)
/// and is only meaningful for 24 bpp images with an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 255,
        }
    }
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an RGB color (alpha = 255).
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Create a grayscale color.
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Integer BT.601 luma: (299*R + 587*G + 114*B) / 1000.
    #[inline]
    pub fn luma(&self) -> u8 {
        luma(self.red, self.green, self.blue)
    }
}

/// Integer BT.601 luma of separate channels.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Color table for indexed images
///
/// Holds up to 256 entries. The number of entries is fixed at creation
/// (2 for 1 bpp, 256 for 8 bpp images).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette with `entries` black entries.
    ///
    /// # Errors
    ///
    /// Returns an error if `entries` is 0 or exceeds 256.
    pub fn new(entries: usize) -> Result<Self> {
        if entries == 0 || entries > 256 {
            return Err(Error::InvalidParameter(format!(
                "palette must have 1..=256 entries, got {}",
                entries
            )));
        }
        Ok(Self {
            colors: vec![Rgba::rgb(0, 0, 0); entries],
        })
    }

    /// Create a linear grayscale ramp.
    ///
    /// Entry i is the gray level `i * 255 / (entries - 1)`, so a 2-entry
    /// palette is black/white and a 256-entry palette is the identity ramp.
    pub fn grayscale(entries: usize) -> Result<Self> {
        let mut palette = Self::new(entries)?;
        let last = (entries - 1).max(1);
        for (i, entry) in palette.colors.iter_mut().enumerate() {
            *entry = Rgba::gray((i * 255 / last) as u8);
        }
        Ok(palette)
    }

    /// Create a palette from a slice of colors.
    pub fn from_colors(colors: &[Rgba]) -> Result<Self> {
        if colors.is_empty() || colors.len() > 256 {
            return Err(Error::InvalidParameter(format!(
                "palette must have 1..=256 entries, got {}",
                colors.len()
            )));
        }
        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if empty. Always false for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get a color by index.
    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.colors.get(index).copied()
    }

    /// Get a mutable color by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Rgba> {
        self.colors.get_mut(index)
    }

    /// Set a color at a specific index.
    pub fn set(&mut self, index: usize, color: Rgba) -> Result<()> {
        let len = self.colors.len();
        match self.colors.get_mut(index) {
            Some(entry) => {
                *entry = color;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { index, len }),
        }
    }

    /// Find the entry closest to (r, g, b) by absolute channel distance.
    pub fn find_nearest(&self, r: u8, g: u8, b: u8) -> usize {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let dist = (c.red as i32 - r as i32).unsigned_abs()
                + (c.green as i32 - g as i32).unsigned_abs()
                + (c.blue as i32 - b as i32).unsigned_abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
                if dist == 0 {
                    break;
                }
            }
        }
        best
    }

    /// Check if every entry is gray (r == g == b).
    pub fn is_grayscale(&self) -> bool {
        self.colors
            .iter()
            .all(|c| c.red == c.green && c.green == c.blue)
    }

    /// Get all colors as a slice.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Get mutable access to all colors.
    pub fn colors_mut(&mut self) -> &mut [Rgba] {
        &mut self.colors
    }
}
