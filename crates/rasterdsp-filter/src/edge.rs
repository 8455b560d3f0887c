//! Window extrema filters
//!
//! Morphological erosion and dilation, plus the edge and contour
//! detectors built on the same channel min/max scan. All four run in
//! place, honor the selection, and leave alpha untouched.

use rasterdsp_core::{BitmapMut, Rect, Rgba};

use crate::error::{FilterError, FilterResult};

/// Selection bounding box, or the whole image without a selection.
fn work_area(bitmap: &BitmapMut) -> Rect {
    bitmap.selection_box().unwrap_or_else(|| bitmap.bounds())
}

/// Scan the window extrema per channel and merge them into the output
/// sample with `merge(min, max)`.
///
/// The window spans offsets `-size/2 .. size - size/2`, so an even
/// `size` gives an asymmetric window biased up-left. Out-of-bounds
/// samples are skipped; the center sample is always in the window, so
/// both extrema are defined.
fn extrema_filter(
    bitmap: &mut BitmapMut,
    size: u32,
    merge: impl Fn(u8, u8) -> u8,
) -> FilterResult<()> {
    if size == 0 {
        return Err(FilterError::InvalidParameters(
            "window size must be at least 1".into(),
        ));
    }
    let area = work_area(bitmap);
    if area.is_empty() {
        return Ok(());
    }
    let k2 = (size / 2) as i32;
    let kmax = size as i32 - k2;
    let src = bitmap.as_bitmap();

    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let mut lo = Rgba::rgb(255, 255, 255);
            let mut hi = Rgba::rgb(0, 0, 0);
            for k in -k2..kmax {
                for j in -k2..kmax {
                    if !src.is_inside(x + j, y + k) {
                        continue;
                    }
                    let c = src.pixel_color_unchecked((x + j) as u32, (y + k) as u32);
                    lo.red = lo.red.min(c.red);
                    lo.green = lo.green.min(c.green);
                    lo.blue = lo.blue.min(c.blue);
                    hi.red = hi.red.max(c.red);
                    hi.green = hi.green.max(c.green);
                    hi.blue = hi.blue.max(c.blue);
                }
            }
            let out = Rgba::rgb(
                merge(lo.red, hi.red),
                merge(lo.green, hi.green),
                merge(lo.blue, hi.blue),
            );
            bitmap.set_pixel_color_unchecked(x as u32, y as u32, out, false);
        }
    }
    Ok(())
}

/// Erode the image: every pixel takes the channel minimum of its window.
///
/// Dark structures grow by roughly `size / 2` pixels per call.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] when `size` is 0.
pub fn erode(bitmap: &mut BitmapMut, size: u32) -> FilterResult<()> {
    extrema_filter(bitmap, size, |lo, _| lo)
}

/// Dilate the image: every pixel takes the channel maximum of its window.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] when `size` is 0.
pub fn dilate(bitmap: &mut BitmapMut, size: u32) -> FilterResult<()> {
    extrema_filter(bitmap, size, |_, hi| hi)
}

/// Detect edges as the local channel range, inverted.
///
/// Every pixel becomes `255 - (max - min)` over its window: flat regions
/// turn white, edges dark.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] when `size` is 0.
pub fn edge(bitmap: &mut BitmapMut, size: u32) -> FilterResult<()> {
    extrema_filter(bitmap, size, |lo, hi| 255 - (hi - lo))
}

/// Trace contours with a fixed 3x3 window.
///
/// Per channel, the output is `255 - rise` where rise is the largest
/// neighbor-minus-center difference in the window (never below 0). Only
/// pixels darker than a neighbor respond, so each contour is marked once
/// on its dark side instead of twice as with [`edge`].
pub fn contour(bitmap: &mut BitmapMut) -> FilterResult<()> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Ok(());
    }
    let src = bitmap.as_bitmap();

    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let center = src.pixel_color_unchecked(x as u32, y as u32);
            let mut rise_r = 0i32;
            let mut rise_g = 0i32;
            let mut rise_b = 0i32;
            for k in -1..=1 {
                for j in -1..=1 {
                    if !src.is_inside(x + j, y + k) {
                        continue;
                    }
                    let c = src.pixel_color_unchecked((x + j) as u32, (y + k) as u32);
                    rise_r = rise_r.max(i32::from(c.red) - i32::from(center.red));
                    rise_g = rise_g.max(i32::from(c.green) - i32::from(center.green));
                    rise_b = rise_b.max(i32::from(c.blue) - i32::from(center.blue));
                }
            }
            let out = Rgba::rgb(
                (255 - rise_r) as u8,
                (255 - rise_g) as u8,
                (255 - rise_b) as u8,
            );
            bitmap.set_pixel_color_unchecked(x as u32, y as u32, out, false);
        }
    }
    Ok(())
}
