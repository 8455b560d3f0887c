//! Pixel noise
//!
//! Additive uniform noise and positional jitter. Both take the random
//! source as an argument, so a run can be reproduced with a seeded
//! generator.

use rand::{Rng, RngExt};
use rasterdsp_core::{BitmapMut, Rect, Rgba};

use crate::error::FilterResult;

/// Selection bounding box, or the whole image without a selection.
fn work_area(bitmap: &BitmapMut) -> Rect {
    bitmap.selection_box().unwrap_or_else(|| bitmap.bounds())
}

/// Add uniform noise to every selected pixel.
///
/// Each channel moves independently by a fresh draw from
/// `(-level/2, level/2)`, truncated toward zero and clamped to the
/// sample range. Level 0 leaves the image untouched, as does any level
/// below 2 after truncation. Alpha is not disturbed.
pub fn noise(bitmap: &mut BitmapMut, level: i32, rng: &mut impl Rng) -> FilterResult<()> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Ok(());
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let (ux, uy) = (x as u32, y as u32);
            let c = bitmap.pixel_color_unchecked(ux, uy);
            let mut draw = |v: u8| {
                let n = ((rng.random::<f32>() - 0.5) * level as f32) as i32;
                (i32::from(v) + n).clamp(0, 255) as u8
            };
            let out = Rgba::rgb(draw(c.red), draw(c.green), draw(c.blue));
            bitmap.set_pixel_color_unchecked(ux, uy, out, false);
        }
    }
    Ok(())
}

/// Scatter pixels within a square neighborhood.
///
/// Every selected pixel is replaced by the pixel at a random offset of
/// up to `radius` in each axis, or kept when the draw lands outside the
/// buffer. Raw values are moved, so palette indices and the alpha
/// sample travel together with the color.
pub fn jitter(bitmap: &mut BitmapMut, radius: i32, rng: &mut impl Rng) -> FilterResult<()> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Ok(());
    }
    let src = bitmap.as_bitmap();
    let span = (radius * 2) as f32;
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let mut nx = x + ((rng.random::<f32>() - 0.5) * span) as i32;
            let mut ny = y + ((rng.random::<f32>() - 0.5) * span) as i32;
            if !src.is_inside(nx, ny) {
                nx = x;
                ny = y;
            }
            let v = src.get_pixel_unchecked(nx as u32, ny as u32);
            bitmap.set_pixel_unchecked(x as u32, y as u32, v);
        }
    }
    Ok(())
}
