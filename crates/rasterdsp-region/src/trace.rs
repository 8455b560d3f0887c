//! Moore boundary tracing

use rasterdsp_core::{BitDepth, Bitmap, OperationContext, Rgba, rgb};

use crate::error::RegionResult;

/// Probe offsets around the current point, visited counterclockwise in
/// raster coordinates starting due east
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn matches_target(src: &Bitmap, x: i32, y: i32, target: Rgba) -> bool {
    let color = src.pixel_color_unchecked(x as u32, y as u32);
    color.red == target.red && color.green == target.green && color.blue == target.blue
}

/// Trace the boundary of the first region matching a color
///
/// Scans the image bottom-to-top, left-to-right, for the first pixel
/// whose RGB value equals `target_color` exactly (alpha is ignored),
/// then walks the region boundary with a Moore neighbor trace: after
/// each step the probe direction rewinds by two, and after each miss it
/// advances by one. The walk ends when it returns to the start pixel or
/// after a full rotation of misses.
///
/// # Arguments
///
/// * `src` - Image to search
/// * `target_color` - Exact color of the region whose outline is wanted
/// * `trace_color` - Color the outline is drawn with
/// * `ctx` - Cancellation and progress reporting for the scan
///
/// # Returns
///
/// A fresh white 24-bit bitmap of the same size containing only the
/// traced outline. When no pixel matches, or the scan is cancelled, the
/// blank white bitmap is returned as success.
pub fn trace(
    src: &Bitmap,
    target_color: Rgba,
    trace_color: Rgba,
    ctx: &OperationContext,
) -> RegionResult<Bitmap> {
    let width = src.width();
    let height = src.height();

    let canvas = Bitmap::new(width, height, BitDepth::Bit24)?;
    let mut canvas = canvas.try_into_mut().unwrap();
    canvas.data_mut().fill(rgb::compose_rgb(255, 255, 255));

    let mut start = None;
    'scan: for y in (0..height as i32).rev() {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_row(height - 1 - y as u32, height);
        for x in 0..width as i32 {
            if matches_target(src, x, y, target_color) {
                start = Some((x, y));
                break 'scan;
            }
        }
    }
    let Some((start_x, start_y)) = start else {
        return Ok(canvas.into());
    };

    let (mut cx, mut cy) = (start_x, start_y);
    let mut direction: usize = 0;
    let mut misses = 0;
    while misses < 9 {
        let (dx, dy) = DIRECTIONS[direction];
        let x = cx + dx;
        let y = cy + dy;
        if src.is_inside(x, y) && matches_target(src, x, y, target_color) {
            cx = x;
            cy = y;
            misses = 0;
            canvas.set_pixel_color_unchecked(x as u32, y as u32, trace_color, false);
            if x == start_x && y == start_y {
                break;
            }
            // Rewind so the probe re-checks the flank we came from
            direction = (direction + 6) % 8;
        } else {
            direction = (direction + 1) % 8;
            misses += 1;
        }
    }

    Ok(canvas.into())
}
