//! Seeded flood fill
//!
//! This module grows a region outward from a seed pixel over 4-connected
//! neighbors whose value lies within a tolerance band around the seed,
//! painting the region with a fill color at a given opacity. The filled
//! region can optionally be recorded in the image's selection plane,
//! which makes the fill double as a magic-wand selector.

use std::collections::VecDeque;

use rasterdsp_core::{BitDepth, BitmapMut, Rgba, Selection};

use crate::error::RegionResult;

/// 4-connected neighbor offsets, probed in this order
const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Options for [`flood_fill`]
#[derive(Debug, Clone)]
pub struct FloodFillOptions {
    /// Accepted deviation from the seed value, per channel on true color
    /// images and on the palette index for indexed ones
    pub tolerance: u8,
    /// 255 replaces matching pixels outright, 0 paints nothing (the
    /// region is still walked and tracked), anything in between blends
    pub opacity: u8,
    /// Record every visited pixel in the selection plane
    pub track_selection: bool,
    /// Selection level written when `track_selection` is set
    pub selection_level: u8,
}

impl Default for FloodFillOptions {
    fn default() -> Self {
        Self {
            tolerance: 0,
            opacity: 255,
            track_selection: false,
            selection_level: 255,
        }
    }
}

impl FloodFillOptions {
    /// Create options for an exact-match, fully opaque fill
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerance band half-width
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the paint opacity
    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    /// Track the filled region in the selection plane at `level`
    pub fn with_selection(mut self, level: u8) -> Self {
        self.track_selection = true;
        self.selection_level = level;
        self
    }
}

/// How candidate pixels are compared against the seed.
///
/// The mode is chosen once per call from the image depth: indexed images
/// compare raw palette indices, true color images compare each RGB
/// channel independently. Band edges saturate at the byte range.
enum MatchRange {
    Indexed { min: u8, max: u8 },
    TrueColor { min: [u8; 3], max: [u8; 3] },
}

fn channel_band(value: u8, tolerance: i32) -> (u8, u8) {
    let v = i32::from(value);
    (
        (v - tolerance).clamp(0, 255) as u8,
        (v + tolerance).clamp(0, 255) as u8,
    )
}

fn in_range(bitmap: &BitmapMut, x: u32, y: u32, range: &MatchRange) -> bool {
    match *range {
        MatchRange::Indexed { min, max } => {
            let index = bitmap.get_pixel_unchecked(x, y) as u8;
            min <= index && index <= max
        }
        MatchRange::TrueColor { min, max } => {
            let color = bitmap.pixel_color_unchecked(x, y);
            min[0] <= color.red
                && color.red <= max[0]
                && min[1] <= color.green
                && color.green <= max[1]
                && min[2] <= color.blue
                && color.blue <= max[2]
        }
    }
}

fn blend(fill: u8, current: u8, opacity: u8) -> u8 {
    let op = u32::from(opacity);
    ((u32::from(fill) * op + u32::from(current) * (255 - op)) >> 8) as u8
}

fn paint(bitmap: &mut BitmapMut, x: u32, y: u32, fill: Rgba, opacity: u8) {
    if opacity == 0 {
        return;
    }
    if bitmap.depth() != BitDepth::Bit24 || opacity == 255 {
        // Indexed targets always take the quantized fill outright; the
        // palette has no room for a per-pixel blend.
        bitmap.set_pixel_color_unchecked(x, y, fill, false);
        return;
    }
    let current = bitmap.pixel_color_unchecked(x, y);
    let mixed = Rgba::rgb(
        blend(fill.red, current.red, opacity),
        blend(fill.green, current.green, opacity),
        blend(fill.blue, current.blue, opacity),
    );
    bitmap.set_pixel_color_unchecked(x, y, mixed, false);
}

/// Flood fill starting from a seed point
///
/// Grows a 4-connected region from `(seed_x, seed_y)` over pixels whose
/// value lies within `options.tolerance` of the seed value, and paints
/// the region with `fill_color` at `options.opacity`. On indexed images
/// the comparison runs on raw palette indices and any nonzero opacity
/// replaces the pixel; on true color images each channel is compared
/// and blended independently. The fill never crosses the active
/// selection boundary.
///
/// With `options.track_selection`, every visited pixel is additionally
/// marked in the selection plane at `options.selection_level` and the
/// selection bounding box is rebuilt. Combined with zero opacity this
/// selects a region without touching any pixel.
///
/// # Arguments
///
/// * `bitmap` - Image to fill in place
/// * `seed_x` - X coordinate of the seed point
/// * `seed_y` - Y coordinate of the seed point
/// * `fill_color` - Color painted over the matching region
/// * `options` - Tolerance, opacity and selection tracking switches
///
/// # Returns
///
/// Success even when nothing is filled: a seed outside the image or
/// outside the active selection leaves the image untouched.
pub fn flood_fill(
    bitmap: &mut BitmapMut,
    seed_x: i32,
    seed_y: i32,
    fill_color: Rgba,
    options: &FloodFillOptions,
) -> RegionResult<()> {
    if !bitmap.is_inside(seed_x, seed_y) || !bitmap.is_inside_selection(seed_x, seed_y) {
        return Ok(());
    }

    let width = bitmap.width();
    let height = bitmap.height();
    let (sx, sy) = (seed_x as u32, seed_y as u32);

    let tolerance = i32::from(options.tolerance);
    let range = if bitmap.depth() == BitDepth::Bit24 {
        let seed = bitmap.pixel_color_unchecked(sx, sy);
        let red = channel_band(seed.red, tolerance);
        let green = channel_band(seed.green, tolerance);
        let blue = channel_band(seed.blue, tolerance);
        MatchRange::TrueColor {
            min: [red.0, green.0, blue.0],
            max: [red.1, green.1, blue.1],
        }
    } else {
        let seed = bitmap.get_pixel_unchecked(sx, sy) as u8;
        let (min, max) = channel_band(seed, tolerance);
        MatchRange::Indexed { min, max }
    };

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    queue.push_back((seed_x, seed_y));

    while let Some((px, py)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS {
            let x = px + dx;
            let y = py + dy;
            if !bitmap.is_inside(x, y) || !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let slot = (y as u32 * width + x as u32) as usize;
            if visited[slot] || !in_range(bitmap, x as u32, y as u32, &range) {
                continue;
            }
            paint(bitmap, x as u32, y as u32, fill_color, options.opacity);
            visited[slot] = true;
            queue.push_back((x, y));
        }
    }

    // The seed joins the region only when the walk loops back over it,
    // so paint it here unless that already happened.
    let seed_slot = (sy * width + sx) as usize;
    if !visited[seed_slot] {
        paint(bitmap, sx, sy, fill_color, options.opacity);
    }
    visited[seed_slot] = true;

    if options.track_selection {
        let mut selection = match bitmap.selection() {
            Some(existing) => existing.clone(),
            None => Selection::new(width, height),
        };
        for y in 0..height {
            for x in 0..width {
                if visited[(y * width + x) as usize] {
                    selection.mark(x as i32, y as i32, options.selection_level);
                }
            }
        }
        selection.rebuild_bounds();
        bitmap.set_selection(Some(selection))?;
    }

    Ok(())
}
