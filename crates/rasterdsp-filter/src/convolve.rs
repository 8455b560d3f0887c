//! Spatial convolution
//!
//! Applies a [`Kernel`] to an image in place. The window is evaluated per
//! channel; samples falling outside the buffer are dropped from both the
//! sum and the normalization weight, so clipped windows are renormalized
//! rather than padded.

use rasterdsp_core::{BitDepth, BitmapMut, OperationContext, Rect, Rgba};

use crate::error::FilterResult;
use crate::kernel::Kernel;

/// Selection bounding box, or the whole image without a selection.
/// An empty box is returned as-is; loops over it simply do nothing.
fn work_area(bitmap: &BitmapMut) -> Rect {
    bitmap.selection_box().unwrap_or_else(|| bitmap.bounds())
}

/// Scale a windowed sum into a sample value.
///
/// `weight` is the summed coefficient weight of the in-bounds window
/// samples, `total` the weight of the whole kernel. A clipped window is
/// rescaled by `total / weight` so edge pixels keep the kernel's nominal
/// brightness. Division truncates toward zero; `factor` 0 skips division
/// entirely. The bias is added after division, before clamping.
fn normalize(sum: i64, weight: i64, total: i64, factor: i32, bias: i32) -> u8 {
    let scaled = if factor == 0 || weight == 0 {
        sum
    } else if weight == total {
        sum / i64::from(factor)
    } else {
        (sum * total) / (weight * i64::from(factor))
    };
    (scaled + i64::from(bias)).clamp(0, 255) as u8
}

/// Convolve the image with a kernel in place.
///
/// Every selected pixel is replaced by its windowed sum divided by
/// `factor` and offset by `bias`, clamped to [0, 255] per channel. The
/// window may read unselected (but in-bounds) neighbors. The alpha
/// channel is never modified; indexed images store the nearest palette
/// entry of the convolved color.
///
/// 8 bpp palette-less buffers run on raw bytes instead of resolved
/// colors; the result is identical, the palette lookups are not.
///
/// Progress is reported per row of the selection box. A cancelled
/// context stops between rows, leaving the remaining rows untouched.
///
/// # Arguments
///
/// * `bitmap` - Image to convolve, any depth
/// * `kernel` - Coefficient matrix
/// * `factor` - Divisor for each windowed sum, 0 to skip division
/// * `bias` - Offset added to each sample after division
/// * `ctx` - Cancellation and progress reporting
pub fn filter(
    bitmap: &mut BitmapMut,
    kernel: &Kernel,
    factor: i32,
    bias: i32,
    ctx: &OperationContext,
) -> FilterResult<()> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Ok(());
    }
    let k2 = (kernel.size() / 2) as i32;
    let total = kernel.sum();
    let src = bitmap.as_bitmap();

    if bitmap.depth() == BitDepth::Bit8 && bitmap.palette().is_none() {
        for y in area.y..area.bottom() {
            if ctx.is_cancelled() {
                break;
            }
            ctx.report_row((y - area.y) as u32, area.height as u32);
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let mut sum = 0i64;
                let mut weight = 0i64;
                for k in -k2..=k2 {
                    for j in -k2..=k2 {
                        if !src.is_inside(x + j, y + k) {
                            continue;
                        }
                        let coef = i64::from(kernel.coef((j + k2) as u32, (k + k2) as u32));
                        sum += coef
                            * i64::from(src.get_pixel_unchecked((x + j) as u32, (y + k) as u32));
                        weight += coef;
                    }
                }
                let v = normalize(sum, weight, total, factor, bias);
                bitmap.set_pixel_unchecked(x as u32, y as u32, u32::from(v));
            }
        }
        return Ok(());
    }

    for y in area.y..area.bottom() {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_row((y - area.y) as u32, area.height as u32);
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let mut sum_r = 0i64;
            let mut sum_g = 0i64;
            let mut sum_b = 0i64;
            let mut weight = 0i64;
            for k in -k2..=k2 {
                for j in -k2..=k2 {
                    if !src.is_inside(x + j, y + k) {
                        continue;
                    }
                    let c = src.pixel_color_unchecked((x + j) as u32, (y + k) as u32);
                    let coef = i64::from(kernel.coef((j + k2) as u32, (k + k2) as u32));
                    sum_r += coef * i64::from(c.red);
                    sum_g += coef * i64::from(c.green);
                    sum_b += coef * i64::from(c.blue);
                    weight += coef;
                }
            }
            let out = Rgba::rgb(
                normalize(sum_r, weight, total, factor, bias),
                normalize(sum_g, weight, total, factor, bias),
                normalize(sum_b, weight, total, factor, bias),
            );
            bitmap.set_pixel_color_unchecked(x as u32, y as u32, out, false);
        }
    }
    Ok(())
}

/// Soften the image with the fixed 3x3 mean kernel.
///
/// Half of each output sample comes from the pixel itself and half from
/// the averaged 8-neighborhood. Uniform regions come through exactly,
/// including at the buffer edge.
pub fn mean(bitmap: &mut BitmapMut) -> FilterResult<()> {
    filter(bitmap, &Kernel::soften(), 16, 0, &OperationContext::new())
}
