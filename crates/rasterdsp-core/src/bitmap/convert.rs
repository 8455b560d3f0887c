//! Depth conversion

use super::{BitDepth, Bitmap};
use crate::error::Result;
use crate::palette::{Palette, luma};
use crate::rgb;

impl Bitmap {
    /// Convert to an 8 bpp grayscale image with a 256-entry ramp palette.
    ///
    /// Color pixels reduce to luma, `(299 R + 587 G + 114 B) / 1000`.
    /// Indexed pixels are mapped through a palette-luma table, 1 bpp
    /// images promote to 8 bpp. The selection is carried over; a gray
    /// value survives the round trip unchanged.
    pub fn to_grayscale(&self) -> Result<Bitmap> {
        let out = Bitmap::new(self.width(), self.height(), BitDepth::Bit8)?;
        let mut out_mut = out.try_into_mut().unwrap();
        out_mut.set_palette(Some(Palette::grayscale(256)?))?;
        out_mut.set_selection(self.selection().cloned())?;

        match self.depth() {
            BitDepth::Bit24 => {
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        let word = self.get_pixel_unchecked(x, y);
                        let gray = luma(rgb::red(word), rgb::green(word), rgb::blue(word));
                        out_mut.set_pixel_unchecked(x, y, u32::from(gray));
                    }
                }
            }
            depth => {
                let entries = depth.max_index() as usize + 1;
                let mut lut = [0u8; 256];
                for (i, entry) in lut.iter_mut().enumerate().take(entries) {
                    let color = match self.palette() {
                        Some(p) => p.get(i).unwrap_or_default(),
                        None => {
                            let gray = if depth == BitDepth::Bit1 {
                                (i * 255) as u8
                            } else {
                                i as u8
                            };
                            crate::Rgba::gray(gray)
                        }
                    };
                    *entry = luma(color.red, color.green, color.blue);
                }
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        let index = self.get_pixel_unchecked(x, y) as usize;
                        out_mut.set_pixel_unchecked(x, y, u32::from(lut[index]));
                    }
                }
            }
        }

        Ok(out_mut.into())
    }

    /// Convert to a 24 bpp RGB image.
    ///
    /// Indexed pixels resolve through the palette. A 24 bpp source is
    /// copied as is, keeping its alpha channel. The selection is carried
    /// over.
    pub fn to_rgb24(&self) -> Result<Bitmap> {
        if self.depth() == BitDepth::Bit24 {
            return Ok(self.deep_clone());
        }

        let out = Bitmap::new(self.width(), self.height(), BitDepth::Bit24)?;
        let mut out_mut = out.try_into_mut().unwrap();
        out_mut.set_selection(self.selection().cloned())?;

        for y in 0..self.height() {
            for x in 0..self.width() {
                let color = self.pixel_color_unchecked(x, y);
                out_mut
                    .set_pixel_unchecked(x, y, rgb::compose_rgb(color.red, color.green, color.blue));
            }
        }

        Ok(out_mut.into())
    }
}
