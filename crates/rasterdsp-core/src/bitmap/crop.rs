//! Rectangular cropping

use super::Bitmap;
use crate::error::{Error, Result};
use crate::rect::Rect;

impl Bitmap {
    /// Extract the part of the image covered by `rect`.
    ///
    /// The rectangle is clipped to the image bounds first. The result
    /// keeps depth, palette, and alpha flag; the selection is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when the clipped rectangle is
    /// empty.
    pub fn crop(&self, rect: Rect) -> Result<Bitmap> {
        let clipped = rect
            .clip(self.width(), self.height())
            .ok_or_else(|| Error::InvalidParameter("crop rectangle outside image".into()))?;

        let out = Bitmap::new(clipped.width as u32, clipped.height as u32, self.depth())?;
        let mut out_mut = out.try_into_mut().unwrap();
        out_mut.set_palette(self.palette().cloned())?;
        if self.has_alpha() {
            out_mut.enable_alpha()?;
        }

        for y in 0..clipped.height as u32 {
            let sy = clipped.y as u32 + y;
            for x in 0..clipped.width as u32 {
                let sx = clipped.x as u32 + x;
                out_mut.set_pixel_unchecked(x, y, self.get_pixel_unchecked(sx, sy));
            }
        }

        Ok(out_mut.into())
    }
}
