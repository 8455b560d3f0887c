//! Tone and color adjustments
//!
//! Look-up-table driven brightness, contrast and gamma correction,
//! channel shifting, saturation, solarization, colorizing, red-eye
//! removal and mean lightness measurement. Everything operates in place.
//!
//! Per-pixel operations honor the selection; operations that rewrite a
//! palette act on the whole image since the palette is shared by every
//! pixel.

use rasterdsp_core::{BitDepth, Bitmap, BitmapMut, Palette, Rect, Rgba, luma};

use crate::colorspace::{ColorTriple, hsl_to_rgb, rgb_to_hsl, rgb_to_yuv, yuv_to_rgb};
use crate::error::{ColorError, ColorResult};

/// 256-entry channel look-up table.
pub type Lut = [u8; 256];

/// Color space a saturation adjustment works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaturationMode {
    /// Scale the S component of HSL.
    #[default]
    Hsl,
    /// Scale the U and V components of YUV.
    Yuv,
}

/// Selection bounding box, or the whole image without a selection.
/// An empty box is returned as-is; loops over it simply do nothing.
fn work_area(bitmap: &BitmapMut) -> Rect {
    bitmap.selection_box().unwrap_or_else(|| bitmap.bounds())
}

/// Like [`work_area`] but an empty selection box is an error, for
/// operations that need at least one pixel to make sense.
fn nonempty_work_area(bitmap: &BitmapMut) -> ColorResult<Rect> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Err(ColorError::EmptySelection);
    }
    Ok(area)
}

/// Gray value a raw index stands for, through the palette or the
/// implicit ramp.
fn index_luma(bitmap: &BitmapMut, index: u8) -> u8 {
    match bitmap.palette() {
        Some(pal) => pal.get(index as usize).map(|c| c.luma()).unwrap_or(0),
        None => match bitmap.depth() {
            BitDepth::Bit1 => {
                if index == 0 {
                    0
                } else {
                    255
                }
            }
            _ => index,
        },
    }
}

/// Rewrites every palette entry through `f`, materializing the implicit
/// palette of palette-less indexed images first.
fn map_palette_entries(bitmap: &mut BitmapMut, f: impl Fn(Rgba) -> Rgba) -> ColorResult<()> {
    if bitmap.palette().is_none() {
        let implicit = match bitmap.depth() {
            BitDepth::Bit1 => {
                Palette::from_colors(&[Rgba::rgb(0, 0, 0), Rgba::rgb(255, 255, 255)])?
            }
            _ => Palette::grayscale(256)?,
        };
        bitmap.set_palette(Some(implicit))?;
    }
    if let Some(pal) = bitmap.palette_mut() {
        for c in pal.colors_mut() {
            *c = f(*c);
        }
    }
    Ok(())
}

/// Remaps every raw index through `table` and normalizes the palette to
/// the linear gray ramp, keeping indices meaningful as gray values.
fn regray_indices(bitmap: &mut BitmapMut, table: &Lut) -> ColorResult<()> {
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let i = bitmap.get_pixel_unchecked(x, y) as usize;
            bitmap.set_pixel_unchecked(x, y, u32::from(table[i]));
        }
    }
    if bitmap.palette().is_some() {
        bitmap.set_palette(Some(Palette::grayscale(256)?))?;
    }
    Ok(())
}

/// Maps pixel values through a single look-up table.
///
/// 24-bit images map each RGB channel per pixel within the selection,
/// which must not be empty when present. 8-bit grayscale images with a
/// selection map raw indices inside it; without a selection the mapping
/// is composed with the palette and the image renormalized to the linear
/// gray ramp. Other palette images map their palette entries, ignoring
/// any selection.
pub fn apply_lut(bitmap: &mut BitmapMut, lut: &Lut) -> ColorResult<()> {
    if bitmap.depth() == BitDepth::Bit24 {
        let area = nonempty_work_area(bitmap)?;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let c = bitmap.pixel_color_unchecked(ux, uy);
                let mapped = Rgba::new(
                    lut[c.red as usize],
                    lut[c.green as usize],
                    lut[c.blue as usize],
                    c.alpha,
                );
                bitmap.set_pixel_color_unchecked(ux, uy, mapped, false);
            }
        }
        return Ok(());
    }

    if bitmap.depth() == BitDepth::Bit8 && bitmap.is_grayscale() {
        if bitmap.selection_box().is_some() {
            let area = nonempty_work_area(bitmap)?;
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    if !bitmap.is_inside_selection(x, y) {
                        continue;
                    }
                    let (ux, uy) = (x as u32, y as u32);
                    let i = bitmap.get_pixel_unchecked(ux, uy) as usize;
                    bitmap.set_pixel_unchecked(ux, uy, u32::from(lut[i]));
                }
            }
            return Ok(());
        }
        let mut table = [0u8; 256];
        for (i, e) in table.iter_mut().enumerate() {
            *e = lut[index_luma(bitmap, i as u8) as usize];
        }
        return regray_indices(bitmap, &table);
    }

    map_palette_entries(bitmap, |c| {
        Rgba::new(
            lut[c.red as usize],
            lut[c.green as usize],
            lut[c.blue as usize],
            c.alpha,
        )
    })
}

/// Maps each channel through its own look-up table, with an optional
/// alpha table.
///
/// 24-bit images work per pixel within the selection; the alpha table is
/// applied only when the image has an alpha channel. Grayscale indexed
/// images are renormalized to the gray ramp of the mapped lightness, and
/// other palette images map their entries, ignoring any selection.
pub fn apply_lut_rgb(
    bitmap: &mut BitmapMut,
    lut_r: &Lut,
    lut_g: &Lut,
    lut_b: &Lut,
    lut_a: Option<&Lut>,
) -> ColorResult<()> {
    if bitmap.depth() == BitDepth::Bit24 {
        let area = nonempty_work_area(bitmap)?;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let c = bitmap.pixel_color_unchecked(ux, uy);
                let alpha = match lut_a {
                    Some(t) => t[c.alpha as usize],
                    None => c.alpha,
                };
                let mapped = Rgba::new(
                    lut_r[c.red as usize],
                    lut_g[c.green as usize],
                    lut_b[c.blue as usize],
                    alpha,
                );
                bitmap.set_pixel_color_unchecked(ux, uy, mapped, true);
            }
        }
        return Ok(());
    }

    if bitmap.depth() == BitDepth::Bit8 && bitmap.is_grayscale() {
        let mut table = [0u8; 256];
        for (i, e) in table.iter_mut().enumerate() {
            let g = match bitmap.palette() {
                Some(pal) => pal.get(i).unwrap_or(Rgba::rgb(i as u8, i as u8, i as u8)),
                None => Rgba::rgb(i as u8, i as u8, i as u8),
            };
            *e = luma(
                lut_r[g.red as usize],
                lut_g[g.green as usize],
                lut_b[g.blue as usize],
            );
        }
        return regray_indices(bitmap, &table);
    }

    map_palette_entries(bitmap, |c| {
        Rgba::new(
            lut_r[c.red as usize],
            lut_g[c.green as usize],
            lut_b[c.blue as usize],
            c.alpha,
        )
    })
}

/// Adjusts brightness and contrast in one pass.
///
/// `brightness` ranges over -255..=255, `contrast` over -100..=100. The
/// mapping is `(v - 128) * (100 + contrast) / 100 + brightness + 128`,
/// rounded and clamped.
pub fn light(bitmap: &mut BitmapMut, brightness: i32, contrast: i32) -> ColorResult<()> {
    let c = (100 + contrast) as f32 / 100.0;
    let b = (brightness + 128) as f32;
    let mut lut = [0u8; 256];
    for (i, e) in lut.iter_mut().enumerate() {
        *e = (((i as i32 - 128) as f32 * c + b + 0.5) as i32).clamp(0, 255) as u8;
    }
    apply_lut(bitmap, &lut)
}

fn gamma_lut(g: f32) -> Lut {
    let inv = 1.0 / f64::from(g);
    let d_max = 255.0f64.powf(inv) / 255.0;
    let mut lut = [0u8; 256];
    for (i, e) in lut.iter_mut().enumerate() {
        *e = (((i as f64).powf(inv) / d_max) as i32).clamp(0, 255) as u8;
    }
    lut
}

/// Gamma correction with the same exponent on all channels.
///
/// `gamma` must be positive; 1.0 is the identity, values above 1
/// brighten the midtones.
pub fn gamma(bitmap: &mut BitmapMut, gamma: f32) -> ColorResult<()> {
    if gamma <= 0.0 {
        return Err(ColorError::InvalidParameters(
            "gamma must be positive".into(),
        ));
    }
    apply_lut(bitmap, &gamma_lut(gamma))
}

/// Gamma correction with an independent exponent per channel.
pub fn gamma_rgb(
    bitmap: &mut BitmapMut,
    gamma_r: f32,
    gamma_g: f32,
    gamma_b: f32,
) -> ColorResult<()> {
    if gamma_r <= 0.0 || gamma_g <= 0.0 || gamma_b <= 0.0 {
        return Err(ColorError::InvalidParameters(
            "gamma must be positive".into(),
        ));
    }
    apply_lut_rgb(
        bitmap,
        &gamma_lut(gamma_r),
        &gamma_lut(gamma_g),
        &gamma_lut(gamma_b),
        None,
    )
}

/// Adds a signed offset to each channel, clamping to 0..=255.
///
/// 24-bit images shift per pixel within the selection; palette images
/// shift every palette entry instead.
pub fn shift_rgb(bitmap: &mut BitmapMut, dr: i32, dg: i32, db: i32) -> ColorResult<()> {
    let shift = |v: u8, d: i32| (i32::from(v) + d).clamp(0, 255) as u8;

    if bitmap.depth() == BitDepth::Bit24 {
        let area = work_area(bitmap);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let c = bitmap.pixel_color_unchecked(ux, uy);
                let shifted = Rgba::new(
                    shift(c.red, dr),
                    shift(c.green, dg),
                    shift(c.blue, db),
                    c.alpha,
                );
                bitmap.set_pixel_color_unchecked(ux, uy, shifted, false);
            }
        }
        return Ok(());
    }

    map_palette_entries(bitmap, |c| {
        Rgba::new(shift(c.red, dr), shift(c.green, dg), shift(c.blue, db), c.alpha)
    })
}

/// Changes the saturation of the image.
///
/// `saturation` ranges over -100..=100; positive values saturate. In
/// [`SaturationMode::Hsl`] the offset is added to S directly; in
/// [`SaturationMode::Yuv`] the chroma components are scaled around their
/// neutral value 128. Works per pixel and honors the selection, which
/// must not be empty when present.
pub fn saturate(bitmap: &mut BitmapMut, saturation: i32, mode: SaturationMode) -> ColorResult<()> {
    let area = nonempty_work_area(bitmap)?;

    let mut table = [0u8; 256];
    match mode {
        SaturationMode::Hsl => {
            for (i, e) in table.iter_mut().enumerate() {
                *e = (i as i32 + saturation).clamp(0, 255) as u8;
            }
        }
        SaturationMode::Yuv => {
            for (i, e) in table.iter_mut().enumerate() {
                let v = ((i as i32 - 128) as f32 * (100 + saturation) as f32 / 100.0 + 128.5)
                    as i32;
                *e = v.clamp(0, 255) as u8;
            }
        }
    }

    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let (ux, uy) = (x as u32, y as u32);
            let c = bitmap.pixel_color_unchecked(ux, uy);
            let (r, g, b) = match mode {
                SaturationMode::Hsl => {
                    let mut hsl = rgb_to_hsl(c.red, c.green, c.blue);
                    hsl.c2 = table[hsl.c2 as usize];
                    hsl_to_rgb(hsl)
                }
                SaturationMode::Yuv => {
                    let mut yuv = rgb_to_yuv(c.red, c.green, c.blue);
                    yuv.c2 = table[yuv.c2 as usize];
                    yuv.c3 = table[yuv.c3 as usize];
                    yuv_to_rgb(yuv)
                }
            };
            bitmap.set_pixel_color_unchecked(ux, uy, Rgba::new(r, g, b, c.alpha), false);
        }
    }
    Ok(())
}

/// Inverts all values above a lightness level.
///
/// With `linked` true a pixel is inverted as a whole when its luminance
/// exceeds `level`, preserving hue relationships; with false each channel
/// is compared and inverted independently. Grayscale images invert the
/// index; other palette images invert their palette entries (whole
/// image), while grayscale and 24-bit images honor the selection.
pub fn solarize(bitmap: &mut BitmapMut, level: u8, linked: bool) -> ColorResult<()> {
    if bitmap.depth() != BitDepth::Bit24 {
        if bitmap.is_grayscale() {
            let area = work_area(bitmap);
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    if !bitmap.is_inside_selection(x, y) {
                        continue;
                    }
                    let (ux, uy) = (x as u32, y as u32);
                    let index = bitmap.get_pixel_unchecked(ux, uy) as u8;
                    if index_luma(bitmap, index) > level {
                        bitmap.set_pixel_unchecked(ux, uy, u32::from(255 - index));
                    }
                }
            }
            return Ok(());
        }
        return map_palette_entries(bitmap, |c| {
            if linked {
                if c.luma() > level {
                    Rgba::new(255 - c.red, 255 - c.green, 255 - c.blue, c.alpha)
                } else {
                    c
                }
            } else {
                Rgba::new(
                    if c.red > level { 255 - c.red } else { c.red },
                    if c.green > level { 255 - c.green } else { c.green },
                    if c.blue > level { 255 - c.blue } else { c.blue },
                    c.alpha,
                )
            }
        });
    }

    let area = work_area(bitmap);
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let (ux, uy) = (x as u32, y as u32);
            let c = bitmap.pixel_color_unchecked(ux, uy);
            let out = if linked {
                if c.luma() > level {
                    Rgba::new(255 - c.red, 255 - c.green, 255 - c.blue, c.alpha)
                } else {
                    c
                }
            } else {
                Rgba::new(
                    if c.red > level { 255 - c.red } else { c.red },
                    if c.green > level { 255 - c.green } else { c.green },
                    if c.blue > level { 255 - c.blue } else { c.blue },
                    c.alpha,
                )
            };
            bitmap.set_pixel_color_unchecked(ux, uy, out, false);
        }
    }
    Ok(())
}

/// Tints the image toward a fixed hue and saturation, keeping lightness.
///
/// `blend` ranges over 0.0..=1.0 and is clamped; above 0.999 the hue and
/// saturation are overwritten outright, otherwise the tinted color is
/// mixed with the original in `blend` proportion. 24-bit images work per
/// pixel within the selection; palette images tint their entries.
pub fn colorize(bitmap: &mut BitmapMut, hue: u8, sat: u8, blend: f32) -> ColorResult<()> {
    let blend = blend.clamp(0.0, 1.0);
    let a0 = (256.0 * blend) as i32;
    let a1 = 256 - a0;
    let full_blend = blend > 0.999;

    let mix = |target: u8, original: u8| ((i32::from(target) * a0 + i32::from(original) * a1) >> 8) as u8;

    if bitmap.depth() == BitDepth::Bit24 {
        let area = work_area(bitmap);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let c = bitmap.pixel_color_unchecked(ux, uy);
                let (r, g, b) = if full_blend {
                    let mut hsl = rgb_to_hsl(c.red, c.green, c.blue);
                    hsl.c1 = hue;
                    hsl.c2 = sat;
                    hsl_to_rgb(hsl)
                } else {
                    let target = hsl_to_rgb(ColorTriple::new(hue, sat, c.luma()));
                    (mix(target.0, c.red), mix(target.1, c.green), mix(target.2, c.blue))
                };
                bitmap.set_pixel_color_unchecked(ux, uy, Rgba::new(r, g, b, c.alpha), false);
            }
        }
        return Ok(());
    }

    map_palette_entries(bitmap, |c| {
        let (r, g, b) = if full_blend {
            let mut hsl = rgb_to_hsl(c.red, c.green, c.blue);
            hsl.c1 = hue;
            hsl.c2 = sat;
            hsl_to_rgb(hsl)
        } else {
            let t = hsl_to_rgb(ColorTriple::new(hue, sat, c.luma()));
            (
                (f32::from(t.0) * blend + f32::from(c.red) * (1.0 - blend)) as u8,
                (f32::from(t.1) * blend + f32::from(c.green) * (1.0 - blend)) as u8,
                (f32::from(t.2) * blend + f32::from(c.blue) * (1.0 - blend)) as u8,
            )
        };
        Rgba::new(r, g, b, c.alpha)
    })
}

/// Softens the red channel over the selected region with a radial
/// falloff, for retouching red-eye artifacts in photographs.
///
/// Select the eye region first; the effect is strongest at the region's
/// center and fades to nothing at its border. Within the falloff the red
/// channel is pulled toward `min(green, blue)`.
pub fn red_eye_remove(bitmap: &mut BitmapMut) -> ColorResult<()> {
    let area = nonempty_work_area(bitmap)?;
    let cx = 0.5 * (area.x + area.right()) as f32;
    let cy = 0.5 * (area.y + area.bottom()) as f32;
    let span = (area.width * area.height) as f32;

    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let mut a = 1.0 - 5.0 * (dx * dx + dy * dy) / span;
            if a < 0.0 {
                a = 0.0;
            }
            let (ux, uy) = (x as u32, y as u32);
            let c = bitmap.pixel_color_unchecked(ux, uy);
            let red = (a * f32::from(c.green.min(c.blue)) + (1.0 - a) * f32::from(c.red)) as u8;
            bitmap.set_pixel_color_unchecked(ux, uy, Rgba::new(red, c.green, c.blue, c.alpha), false);
        }
    }
    Ok(())
}

/// Mean lightness over the selection box, in 0.0..=255.0.
///
/// The average is taken over the whole bounding box of the selection
/// (the box of the image without one); an empty box yields 0.0.
pub fn mean_lightness(bitmap: &Bitmap) -> ColorResult<f32> {
    let gray = bitmap.to_grayscale()?;
    let area = bitmap.selection_box().unwrap_or_else(|| bitmap.bounds());
    if area.is_empty() {
        return Ok(0.0);
    }

    let mut sum = 0.0f32;
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            sum += f32::from(gray.get_pixel_unchecked(x as u32, y as u32) as u8);
        }
    }
    Ok(sum / area.area() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invert_lut() -> Lut {
        let mut lut = [0u8; 256];
        for (i, e) in lut.iter_mut().enumerate() {
            *e = 255 - i as u8;
        }
        lut
    }

    fn rgb_pixel(r: u8, g: u8, b: u8) -> BitmapMut {
        let mut m = Bitmap::new(1, 1, BitDepth::Bit24)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_color_unchecked(0, 0, Rgba::new(r, g, b, 255), false);
        m
    }

    #[test]
    fn test_apply_lut_rgb24() {
        let mut m = rgb_pixel(10, 128, 250);
        apply_lut(&mut m, &invert_lut()).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(245, 127, 5, 255));
    }

    #[test]
    fn test_apply_lut_respects_selection() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit24)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_color_unchecked(0, 0, Rgba::new(10, 10, 10, 255), false);
        m.set_pixel_color_unchecked(1, 0, Rgba::new(10, 10, 10, 255), false);
        m.select_rect(Rect::new_unchecked(0, 0, 1, 1), 255);
        apply_lut(&mut m, &invert_lut()).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0).red, 245);
        assert_eq!(m.pixel_color_unchecked(1, 0).red, 10);
    }

    #[test]
    fn test_apply_lut_gray_indices() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 0);
        m.set_pixel_unchecked(1, 0, 200);
        apply_lut(&mut m, &invert_lut()).unwrap();
        assert_eq!(m.get_pixel_unchecked(0, 0), 255);
        assert_eq!(m.get_pixel_unchecked(1, 0), 55);
    }

    #[test]
    fn test_apply_lut_gray_palette_renormalized() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_palette(Some(Palette::grayscale(256).unwrap())).unwrap();
        m.set_pixel_unchecked(0, 0, 40);
        apply_lut(&mut m, &invert_lut()).unwrap();
        assert_eq!(m.get_pixel_unchecked(0, 0), 215);
        assert!(m.palette().unwrap().is_grayscale());
        assert_eq!(m.palette().unwrap().get(7).unwrap().red, 7);
    }

    #[test]
    fn test_apply_lut_color_palette_entries() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        let mut colors = vec![Rgba::rgb(0, 0, 0); 256];
        colors[3] = Rgba::rgb(200, 30, 90);
        m.set_palette(Some(Palette::from_colors(&colors).unwrap()))
            .unwrap();
        m.set_pixel_unchecked(0, 0, 3);
        apply_lut(&mut m, &invert_lut()).unwrap();
        // index untouched, entry inverted
        assert_eq!(m.get_pixel_unchecked(0, 0), 3);
        assert_eq!(m.palette().unwrap().get(3).unwrap(), Rgba::rgb(55, 225, 165));
    }

    #[test]
    fn test_apply_lut_one_bit_materializes_palette() {
        let mut m = Bitmap::new(8, 1, BitDepth::Bit1)
            .unwrap()
            .try_into_mut()
            .unwrap();
        apply_lut(&mut m, &invert_lut()).unwrap();
        let pal = m.palette().unwrap();
        assert_eq!(pal.get(0).unwrap().red, 255);
        assert_eq!(pal.get(1).unwrap().red, 0);
    }

    #[test]
    fn test_apply_lut_rgb_alpha_table() {
        let mut m = rgb_pixel(100, 100, 100);
        m.enable_alpha().unwrap();
        m.set_pixel_alpha(0, 0, 200);
        let identity: Lut = std::array::from_fn(|i| i as u8);
        let halve: Lut = std::array::from_fn(|i| (i / 2) as u8);
        apply_lut_rgb(&mut m, &identity, &identity, &identity, Some(&halve)).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0).alpha, 100);
        assert_eq!(m.pixel_color_unchecked(0, 0).red, 100);
    }

    #[test]
    fn test_light_brightness() {
        let mut m = rgb_pixel(100, 150, 250);
        light(&mut m, 10, 0).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(110, 160, 255, 255));
    }

    #[test]
    fn test_light_flat_contrast() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 30);
        m.set_pixel_unchecked(1, 0, 220);
        light(&mut m, 0, -100).unwrap();
        // zero contrast collapses everything to the brightness level
        assert_eq!(m.get_pixel_unchecked(0, 0), 128);
        assert_eq!(m.get_pixel_unchecked(1, 0), 128);
    }

    #[test]
    fn test_gamma_identity_and_midtones() {
        let mut m = Bitmap::new(1, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 64);
        gamma(&mut m, 1.0).unwrap();
        assert_eq!(m.get_pixel_unchecked(0, 0), 64);
        gamma(&mut m, 2.2).unwrap();
        assert_eq!(m.get_pixel_unchecked(0, 0), 136);
    }

    #[test]
    fn test_gamma_rejects_nonpositive() {
        let mut m = rgb_pixel(0, 0, 0);
        assert!(matches!(
            gamma(&mut m, 0.0),
            Err(ColorError::InvalidParameters(_))
        ));
        assert!(matches!(
            gamma_rgb(&mut m, 1.0, -2.0, 1.0),
            Err(ColorError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_gamma_rgb_single_channel() {
        let mut m = rgb_pixel(64, 64, 64);
        gamma_rgb(&mut m, 1.0, 1.0, 2.2).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(64, 64, 136, 255));
    }

    #[test]
    fn test_shift_rgb_clamps() {
        let mut m = rgb_pixel(250, 100, 5);
        shift_rgb(&mut m, 20, -20, -20).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(255, 80, 0, 255));
    }

    #[test]
    fn test_shift_rgb_palette() {
        let mut m = Bitmap::new(1, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 100);
        shift_rgb(&mut m, 50, 0, 0).unwrap();
        // implicit ramp materialized and tinted toward red
        assert_eq!(m.get_pixel_unchecked(0, 0), 100);
        assert_eq!(m.palette().unwrap().get(100).unwrap(), Rgba::rgb(150, 100, 100));
    }

    #[test]
    fn test_saturate_hsl_boosts_color() {
        let mut m = rgb_pixel(200, 100, 100);
        saturate(&mut m, 50, SaturationMode::Hsl).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(220, 79, 79, 255));
    }

    #[test]
    fn test_saturate_yuv_neutral_on_gray() {
        let mut m = rgb_pixel(128, 128, 128);
        saturate(&mut m, 80, SaturationMode::Yuv).unwrap();
        let c = m.pixel_color_unchecked(0, 0);
        assert_eq!(c.red, c.green);
        assert_eq!(c.green, c.blue);
    }

    #[test]
    fn test_solarize_gray_inverts_above_level() {
        let mut m = Bitmap::new(2, 1, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 100);
        m.set_pixel_unchecked(1, 0, 200);
        solarize(&mut m, 128, true).unwrap();
        assert_eq!(m.get_pixel_unchecked(0, 0), 100);
        assert_eq!(m.get_pixel_unchecked(1, 0), 55);
    }

    #[test]
    fn test_solarize_rgb_linked_and_unlinked() {
        let mut m = rgb_pixel(240, 240, 240);
        solarize(&mut m, 128, true).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(15, 15, 15, 255));

        let mut m = rgb_pixel(200, 10, 240);
        solarize(&mut m, 128, false).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(55, 10, 15, 255));

        // linked: low luminance leaves saturated channels alone
        let mut m = rgb_pixel(200, 10, 10);
        solarize(&mut m, 128, true).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(200, 10, 10, 255));
    }

    #[test]
    fn test_colorize_full_blend() {
        let mut m = rgb_pixel(100, 100, 100);
        colorize(&mut m, 0, 255, 1.0).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(200, 0, 0, 255));
    }

    #[test]
    fn test_colorize_partial_blend() {
        let mut m = rgb_pixel(100, 100, 100);
        colorize(&mut m, 0, 255, 0.5).unwrap();
        assert_eq!(m.pixel_color_unchecked(0, 0), Rgba::new(150, 50, 50, 255));
    }

    #[test]
    fn test_red_eye_remove_center_and_falloff() {
        let mut m = Bitmap::new(10, 10, BitDepth::Bit24)
            .unwrap()
            .try_into_mut()
            .unwrap();
        for y in 0..10 {
            for x in 0..10 {
                m.set_pixel_color_unchecked(x, y, Rgba::new(200, 50, 80, 255), false);
            }
        }
        m.select_rect(Rect::new_unchecked(2, 2, 6, 6), 255);
        red_eye_remove(&mut m).unwrap();
        // full effect at the center
        assert_eq!(m.pixel_color_unchecked(5, 5), Rgba::new(50, 50, 80, 255));
        // no effect at the region corner or outside
        assert_eq!(m.pixel_color_unchecked(2, 2).red, 200);
        assert_eq!(m.pixel_color_unchecked(1, 1).red, 200);
    }

    #[test]
    fn test_mean_lightness() {
        let mut m = Bitmap::new(2, 2, BitDepth::Bit8)
            .unwrap()
            .try_into_mut()
            .unwrap();
        m.set_pixel_unchecked(0, 0, 10);
        m.set_pixel_unchecked(1, 0, 20);
        m.set_pixel_unchecked(0, 1, 30);
        m.set_pixel_unchecked(1, 1, 40);
        let img: Bitmap = m.into();
        let mean = mean_lightness(&img).unwrap();
        assert!((mean - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_mean_lightness_rgb_and_empty_selection() {
        let mut m = Bitmap::new(3, 3, BitDepth::Bit24)
            .unwrap()
            .try_into_mut()
            .unwrap();
        for y in 0..3 {
            for x in 0..3 {
                m.set_pixel_color_unchecked(x, y, Rgba::new(50, 100, 150, 255), false);
            }
        }
        let img: Bitmap = m.into();
        let mean = mean_lightness(&img).unwrap();
        assert!((mean - 90.0).abs() < 1e-6);

        let mut m = img.try_into_mut().unwrap();
        m.set_selection(Some(rasterdsp_core::Selection::new(3, 3)))
            .unwrap();
        let img: Bitmap = m.into();
        assert_eq!(mean_lightness(&img).unwrap(), 0.0);
    }
}
