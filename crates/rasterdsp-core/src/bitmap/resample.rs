//! Geometric resampling

use super::{BitDepth, Bitmap};
use crate::error::{Error, Result};
use crate::palette::Rgba;
use crate::rgb;

/// Interpolation used by [`Bitmap::resample`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleMode {
    /// Copies the nearest source value. Keeps palette indexes and raw
    /// words exact, so it is safe for masks and index planes.
    NearestNeighbor,
    /// Blends the four surrounding source pixels. Indexed targets snap
    /// the blend back to the nearest palette entry.
    Bilinear,
}

#[inline]
fn split_coord(pos: f64, limit: u32) -> (u32, u32, f64) {
    let i0 = (pos.floor() as i64).clamp(0, i64::from(limit) - 1) as u32;
    let i1 = (i0 + 1).min(limit - 1);
    (i0, i1, pos - f64::from(i0))
}

#[inline]
fn blend_channel(c00: u8, c10: u8, c01: u8, c11: u8, dx: f64, dy: f64) -> u8 {
    let top = f64::from(c00) * (1.0 - dx) + f64::from(c10) * dx;
    let bottom = f64::from(c01) * (1.0 - dx) + f64::from(c11) * dx;
    (top * (1.0 - dy) + bottom * dy).round().clamp(0.0, 255.0) as u8
}

fn blend4(c00: Rgba, c10: Rgba, c01: Rgba, c11: Rgba, dx: f64, dy: f64) -> Rgba {
    Rgba::new(
        blend_channel(c00.red, c10.red, c01.red, c11.red, dx, dy),
        blend_channel(c00.green, c10.green, c01.green, c11.green, dx, dy),
        blend_channel(c00.blue, c10.blue, c01.blue, c11.blue, dx, dy),
        blend_channel(c00.alpha, c10.alpha, c01.alpha, c11.alpha, dx, dy),
    )
}

impl Bitmap {
    /// Resample to a new size.
    ///
    /// The result keeps the source depth, palette, and alpha flag. The
    /// selection is dropped because its geometry no longer applies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either target dimension
    /// is 0.
    pub fn resample(&self, new_width: u32, new_height: u32, mode: ResampleMode) -> Result<Bitmap> {
        if new_width == 0 || new_height == 0 {
            return Err(Error::InvalidDimension {
                width: new_width,
                height: new_height,
            });
        }
        if new_width == self.width() && new_height == self.height() {
            return Ok(self.deep_clone());
        }

        let out = Bitmap::new(new_width, new_height, self.depth())?;
        let mut out_mut = out.try_into_mut().unwrap();
        out_mut.set_palette(self.palette().cloned())?;
        if self.has_alpha() {
            out_mut.enable_alpha()?;
        }

        match mode {
            ResampleMode::NearestNeighbor => {
                for y in 0..new_height {
                    let sy = (u64::from(y) * u64::from(self.height()) / u64::from(new_height)) as u32;
                    for x in 0..new_width {
                        let sx =
                            (u64::from(x) * u64::from(self.width()) / u64::from(new_width)) as u32;
                        out_mut.set_pixel_unchecked(x, y, self.get_pixel_unchecked(sx, sy));
                    }
                }
            }
            ResampleMode::Bilinear => {
                let x_ratio = f64::from(self.width()) / f64::from(new_width);
                let y_ratio = f64::from(self.height()) / f64::from(new_height);
                let grayscale = self.is_grayscale();

                for y in 0..new_height {
                    let (y0, y1, dy) = split_coord(f64::from(y) * y_ratio, self.height());
                    for x in 0..new_width {
                        let (x0, x1, dx) = split_coord(f64::from(x) * x_ratio, self.width());
                        let blended = blend4(
                            self.pixel_color_unchecked(x0, y0),
                            self.pixel_color_unchecked(x1, y0),
                            self.pixel_color_unchecked(x0, y1),
                            self.pixel_color_unchecked(x1, y1),
                            dx,
                            dy,
                        );
                        match self.depth() {
                            BitDepth::Bit24 => {
                                let word = if self.has_alpha() {
                                    rgb::pack(blended)
                                } else {
                                    rgb::compose_rgb(blended.red, blended.green, blended.blue)
                                };
                                out_mut.set_pixel_unchecked(x, y, word);
                            }
                            BitDepth::Bit8 if grayscale => {
                                out_mut.set_pixel_unchecked(x, y, u32::from(blended.luma()));
                            }
                            BitDepth::Bit1 if grayscale => {
                                out_mut
                                    .set_pixel_unchecked(x, y, u32::from(blended.luma() >= 128));
                            }
                            _ => {
                                // indexed color snaps back to the table
                                out_mut.set_pixel_color_unchecked(x, y, blended, false);
                            }
                        }
                    }
                }
            }
        }

        Ok(out_mut.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_rejects_zero_target() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        assert!(bmp.resample(0, 4, ResampleMode::NearestNeighbor).is_err());
    }

    #[test]
    fn test_nearest_downscale_picks_source_values() {
        let bmp = Bitmap::new(4, 4, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        for y in 0..4 {
            for x in 0..4 {
                bmp_mut.set_pixel_unchecked(x, y, y * 4 + x);
            }
        }
        let bmp: Bitmap = bmp_mut.into();

        let half = bmp.resample(2, 2, ResampleMode::NearestNeighbor).unwrap();
        assert_eq!(half.get_pixel_unchecked(0, 0), 0);
        assert_eq!(half.get_pixel_unchecked(1, 0), 2);
        assert_eq!(half.get_pixel_unchecked(0, 1), 8);
        assert_eq!(half.get_pixel_unchecked(1, 1), 10);
    }

    #[test]
    fn test_bilinear_upscale_interpolates_gray() {
        let bmp = Bitmap::new(2, 1, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut.set_pixel_unchecked(1, 0, 100);
        let bmp: Bitmap = bmp_mut.into();

        let wide = bmp.resample(4, 1, ResampleMode::Bilinear).unwrap();
        assert_eq!(wide.get_pixel_unchecked(0, 0), 0);
        assert_eq!(wide.get_pixel_unchecked(1, 0), 50);
        assert_eq!(wide.get_pixel_unchecked(2, 0), 100);
        assert_eq!(wide.get_pixel_unchecked(3, 0), 100);
    }

    #[test]
    fn test_bilinear_rgb_channels_blend_independently() {
        let bmp = Bitmap::new(2, 1, BitDepth::Bit24).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut.set_pixel_unchecked(0, 0, rgb::compose_rgb(200, 0, 40));
        bmp_mut.set_pixel_unchecked(1, 0, rgb::compose_rgb(0, 100, 40));
        let bmp: Bitmap = bmp_mut.into();

        let wide = bmp.resample(4, 1, ResampleMode::Bilinear).unwrap();
        let mid = wide.pixel_color_unchecked(1, 0);
        assert_eq!((mid.red, mid.green, mid.blue), (100, 50, 40));
    }

    #[test]
    fn test_resample_keeps_palette_and_snaps_indexes() {
        let bmp = Bitmap::new(2, 2, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut
            .set_palette(Some(
                crate::Palette::from_colors(&[
                    crate::Rgba::rgb(255, 0, 0),
                    crate::Rgba::rgb(0, 0, 255),
                ])
                .unwrap(),
            ))
            .unwrap();
        bmp_mut.set_pixel_unchecked(1, 0, 1);
        bmp_mut.set_pixel_unchecked(1, 1, 1);
        let bmp: Bitmap = bmp_mut.into();

        let scaled = bmp.resample(4, 4, ResampleMode::Bilinear).unwrap();
        assert!(scaled.has_palette());
        assert!(scaled.get_pixel_unchecked(0, 0) <= 1);
        assert_eq!(scaled.get_pixel_unchecked(3, 0), 1);
    }

    #[test]
    fn test_identity_resample_is_copy() {
        let bmp = Bitmap::new(3, 3, BitDepth::Bit8).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        bmp_mut.set_pixel_unchecked(2, 2, 77);
        let bmp: Bitmap = bmp_mut.into();

        let same = bmp.resample(3, 3, ResampleMode::Bilinear).unwrap();
        assert_eq!(same.get_pixel_unchecked(2, 2), 77);
    }
}
