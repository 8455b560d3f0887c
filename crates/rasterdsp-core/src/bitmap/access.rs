//! Pixel access for [`Bitmap`] and [`BitmapMut`]
//!
//! Two levels are provided. The raw level (`get_pixel` / `set_pixel`)
//! deals in stored values: a bit for 1 bpp, a byte for 8 bpp, a packed
//! `0xRRGGBBAA` word for 24 bpp. The color level (`pixel_color` /
//! `set_pixel_color`) deals in [`Rgba`] and resolves the palette, the
//! implicit grayscale ramp, and the alpha flag.

use super::{BitDepth, Bitmap, BitmapMut};
use crate::error::{Error, Result};
use crate::palette::Rgba;
use crate::rgb;

/// Get the bit at index `i` in a packed row (MSB first).
#[inline]
pub fn get_data_bit(row: &[u32], i: usize) -> u32 {
    (row[i / 32] >> (31 - (i & 31))) & 1
}

/// Set the bit at index `i` in a packed row (MSB first).
#[inline]
pub fn set_data_bit(row: &mut [u32], i: usize, value: u32) {
    let shift = 31 - (i & 31);
    let word = &mut row[i / 32];
    *word = (*word & !(1 << shift)) | ((value & 1) << shift);
}

/// Get the byte at index `i` in a packed row (MSB first).
#[inline]
pub fn get_data_byte(row: &[u32], i: usize) -> u8 {
    ((row[i / 4] >> (24 - 8 * (i & 3))) & 0xff) as u8
}

/// Set the byte at index `i` in a packed row (MSB first).
#[inline]
pub fn set_data_byte(row: &mut [u32], i: usize, value: u8) {
    let shift = 24 - 8 * (i & 3);
    let word = &mut row[i / 4];
    *word = (*word & !(0xff << shift)) | (u32::from(value) << shift);
}

#[inline]
fn read_raw(row: &[u32], depth: BitDepth, x: u32) -> u32 {
    match depth {
        BitDepth::Bit1 => get_data_bit(row, x as usize),
        BitDepth::Bit8 => u32::from(get_data_byte(row, x as usize)),
        BitDepth::Bit24 => row[x as usize],
    }
}

#[inline]
fn write_raw(row: &mut [u32], depth: BitDepth, x: u32, value: u32) {
    match depth {
        BitDepth::Bit1 => set_data_bit(row, x as usize, value),
        BitDepth::Bit8 => set_data_byte(row, x as usize, (value & 0xff) as u8),
        BitDepth::Bit24 => row[x as usize] = value,
    }
}

fn resolve_color(
    raw: u32,
    depth: BitDepth,
    has_alpha: bool,
    palette: Option<&crate::Palette>,
) -> Rgba {
    match depth {
        BitDepth::Bit24 => {
            let mut color = rgb::unpack(raw);
            if !has_alpha {
                color.alpha = 255;
            }
            color
        }
        _ => match palette {
            Some(p) => p.get(raw as usize).unwrap_or_default(),
            None => {
                let gray = if depth == BitDepth::Bit1 {
                    (raw * 255) as u8
                } else {
                    raw as u8
                };
                Rgba::gray(gray)
            }
        },
    }
}

fn color_to_index(color: Rgba, depth: BitDepth, palette: Option<&crate::Palette>) -> u32 {
    match palette {
        Some(p) => p.find_nearest(color.red, color.green, color.blue) as u32,
        None => {
            let gray = color.luma();
            if depth == BitDepth::Bit1 {
                u32::from(gray >= 128)
            } else {
                u32::from(gray)
            }
        }
    }
}

impl Bitmap {
    /// Get the raw pixel value at (x, y), or `None` when out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(read_raw(self.row_data(y), self.inner.depth, x))
    }

    /// Get the raw pixel value at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_raw(self.row_data(y), self.inner.depth, x)
    }

    /// Get the resolved color at (x, y), or `None` when out of range.
    pub fn pixel_color(&self, x: u32, y: u32) -> Option<Rgba> {
        let raw = self.get_pixel(x, y)?;
        Some(resolve_color(
            raw,
            self.inner.depth,
            self.inner.has_alpha,
            self.inner.palette.as_ref(),
        ))
    }

    /// Get the resolved color at (x, y).
    ///
    /// Indexed pixels go through the palette; 8 bpp images without a
    /// palette resolve as a grayscale ramp. A 24 bpp image without alpha
    /// reports every pixel as opaque.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    pub fn pixel_color_unchecked(&self, x: u32, y: u32) -> Rgba {
        resolve_color(
            self.get_pixel_unchecked(x, y),
            self.inner.depth,
            self.inner.has_alpha,
            self.inner.palette.as_ref(),
        )
    }

    /// Get the palette index at (x, y) for 1 and 8 bpp images.
    ///
    /// Returns `None` for out-of-range coordinates or 24 bpp images.
    pub fn pixel_index(&self, x: u32, y: u32) -> Option<u8> {
        if self.inner.depth == BitDepth::Bit24 {
            return None;
        }
        self.get_pixel(x, y).map(|v| v as u8)
    }
}

impl BitmapMut {
    /// Get the raw pixel value at (x, y), or `None` when out of range.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(read_raw(self.row_data(y), self.inner.depth, x))
    }

    /// Get the raw pixel value at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_raw(self.row_data(y), self.inner.depth, x)
    }

    /// Get the resolved color at (x, y), or `None` when out of range.
    pub fn pixel_color(&self, x: u32, y: u32) -> Option<Rgba> {
        let raw = self.get_pixel(x, y)?;
        Some(resolve_color(
            raw,
            self.inner.depth,
            self.inner.has_alpha,
            self.inner.palette.as_ref(),
        ))
    }

    /// Get the resolved color at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    pub fn pixel_color_unchecked(&self, x: u32, y: u32) -> Rgba {
        resolve_color(
            self.get_pixel_unchecked(x, y),
            self.inner.depth,
            self.inner.has_alpha,
            self.inner.palette.as_ref(),
        )
    }

    /// Get the palette index at (x, y) for 1 and 8 bpp images.
    pub fn pixel_index(&self, x: u32, y: u32) -> Option<u8> {
        if self.inner.depth == BitDepth::Bit24 {
            return None;
        }
        self.get_pixel(x, y).map(|v| v as u8)
    }

    /// Set the raw pixel value at (x, y).
    ///
    /// Values wider than the depth are masked down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when (x, y) is out of range.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.inner.width as usize) + x as usize,
                len: (self.inner.width as usize) * (self.inner.height as usize),
            });
        }
        self.set_pixel_unchecked(x, y, value);
        Ok(())
    }

    /// Set the raw pixel value at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: u32) {
        let depth = self.inner.depth;
        write_raw(self.row_data_mut(y), depth, x, value);
    }

    /// Set the color at (x, y).
    ///
    /// Indexed images store the nearest palette entry; palette-less 1 and
    /// 8 bpp images store the luma. For 24 bpp the alpha sample is written
    /// only when `edit_alpha` is set and the alpha channel is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when (x, y) is out of range.
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Rgba, edit_alpha: bool) -> Result<()> {
        if x >= self.inner.width || y >= self.inner.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.inner.width as usize) + x as usize,
                len: (self.inner.width as usize) * (self.inner.height as usize),
            });
        }
        self.set_pixel_color_unchecked(x, y, color, edit_alpha);
        Ok(())
    }

    /// Set the color at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    pub fn set_pixel_color_unchecked(&mut self, x: u32, y: u32, color: Rgba, edit_alpha: bool) {
        match self.inner.depth {
            BitDepth::Bit24 => {
                let keep_alpha = !(edit_alpha && self.inner.has_alpha);
                let row = self.row_data_mut(y);
                let alpha = if keep_alpha {
                    rgb::alpha(row[x as usize])
                } else {
                    color.alpha
                };
                row[x as usize] = rgb::compose_rgba(color.red, color.green, color.blue, alpha);
            }
            depth => {
                let index = color_to_index(color, depth, self.inner.palette.as_ref());
                write_raw(self.row_data_mut(y), depth, x, index);
            }
        }
    }

    /// Set the palette index at (x, y) for 1 and 8 bpp images.
    ///
    /// # Errors
    ///
    /// Fails for 24 bpp images, out-of-range coordinates, or an index
    /// beyond the depth's range.
    pub fn set_pixel_index(&mut self, x: u32, y: u32, index: u8) -> Result<()> {
        if self.inner.depth == BitDepth::Bit24 {
            return Err(Error::UnsupportedDepth(24));
        }
        if u32::from(index) > self.inner.depth.max_index() {
            return Err(Error::IndexOutOfBounds {
                index: index as usize,
                len: self.inner.depth.max_index() as usize + 1,
            });
        }
        self.set_pixel(x, y, u32::from(index))
    }

    /// Write only the alpha sample at (x, y) of a 24 bpp image with alpha
    /// enabled. Does nothing when the alpha channel is absent.
    pub fn set_pixel_alpha(&mut self, x: u32, y: u32, alpha: u8) {
        if self.inner.depth != BitDepth::Bit24 || !self.inner.has_alpha {
            return;
        }
        if x >= self.inner.width || y >= self.inner.height {
            return;
        }
        let row = self.row_data_mut(y);
        let word = &mut row[x as usize];
        *word = (*word & !0xff) | u32::from(alpha);
    }
}
