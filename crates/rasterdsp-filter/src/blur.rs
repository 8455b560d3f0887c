//! Gaussian blur and its derived filters
//!
//! A separable two-pass blur: a 1-D matrix built by numeric integration
//! is applied to every row, then to every column. Unsharp masking and
//! the edge-preserving selective blur are driven off the same passes.
//!
//! The passes need samples that behave linearly, so they run on 24 bpp
//! rows or on 8 bpp indices under a gray ramp; other images round-trip
//! through a 24 bpp copy and are quantized back afterwards.

use rasterdsp_core::{
    rgb, BitDepth, BitmapMut, OperationContext, Palette, Rect, Rgba, Selection,
};

use crate::convolve::filter;
use crate::error::{FilterError, FilterResult};
use crate::kernel::Kernel;

/// Selection bounding box, or the whole image without a selection.
fn work_area(bitmap: &BitmapMut) -> Rect {
    bitmap.selection_box().unwrap_or_else(|| bitmap.bounds())
}

/// Build the 1-D convolution matrix for one blur pass.
///
/// The radius sets the standard deviation to `|radius| / 2 + 0.25`; the
/// matrix reaches out two standard deviations, giving a length of
/// `2 * ceil(2 * sigma - 0.5) + 1` (always odd, at least 1). Every tap
/// integrates the gaussian numerically with 50 samples per pixel, 51
/// for the center tap, and the result is normalized to unit weight.
/// Radius 0 collapses to a single tap, making the blur an identity.
fn convolve_matrix(radius: f32) -> Vec<f32> {
    let std_dev = f64::from((0.5 * radius).abs() + 0.25);
    let reach = 2.0 * std_dev;
    let len = ((2.0 * (reach - 0.5).ceil() + 1.0) as i32).max(1) as usize;
    let mid = len / 2;
    let mut matrix = vec![0.0f32; len];

    let gauss = |x: f64| (-(x * x) / (2.0 * std_dev * std_dev)).exp();

    // integrate one half, mirror it onto the other
    for i in mid + 1..len {
        let base = i as f64 - mid as f64 - 0.5;
        let mut sum = 0.0f32;
        for j in 1..=50 {
            let x = base + 0.02 * f64::from(j);
            if x <= reach {
                sum += gauss(x) as f32;
            }
        }
        matrix[i] = sum / 50.0;
    }
    for i in 0..=mid {
        matrix[i] = matrix[len - 1 - i];
    }

    // the center tap gets an odd number of samples of its own
    let mut sum = 0.0f32;
    for j in 0..=50 {
        sum += gauss(0.5 + 0.02 * f64::from(j)) as f32;
    }
    matrix[mid] = sum / 51.0;

    let total: f32 = matrix.iter().sum();
    for v in &mut matrix {
        *v /= total;
    }
    matrix
}

/// Product table for the full-window case: entry `i * 256 + v` holds
/// `cmatrix[i] * v`.
fn lookup_table(cmatrix: &[f32]) -> Vec<f32> {
    let mut table = Vec::with_capacity(cmatrix.len() * 256);
    for &c in cmatrix {
        for v in 0..256u32 {
            table.push(c * v as f32);
        }
    }
    table
}

/// Blur one line of interleaved samples with the precomputed matrix.
///
/// `cur` and `dest` hold `bytes` samples per pixel. Lines shorter than
/// the matrix fall back to a whole-line weighted sum; otherwise the two
/// ends use truncated windows rescaled to unit weight and the middle
/// runs full windows through the product table.
fn blur_line(ctable: &[f32], cmatrix: &[f32], cur: &[u8], dest: &mut [u8], bytes: usize) {
    let len = cmatrix.len();
    let mid = len / 2;
    let pixels = cur.len() / bytes;

    if len > pixels {
        for row in 0..pixels {
            let mut scale = 0.0f32;
            for j in 0..pixels {
                let t = j as i32 + mid as i32 - row as i32;
                if t >= 0 && t < len as i32 {
                    scale += cmatrix[t as usize];
                }
            }
            for i in 0..bytes {
                let mut sum = 0.0f32;
                for j in 0..pixels {
                    if j as i32 >= row as i32 - mid as i32 && j as i32 <= row as i32 + mid as i32 {
                        sum += f32::from(cur[j * bytes + i]) * cmatrix[j];
                    }
                }
                dest[row * bytes + i] = (0.5 + sum / scale) as u8;
            }
        }
        return;
    }

    // leading edge, truncated window rescaled to unit weight
    for row in 0..mid {
        let mut scale = 0.0f32;
        for j in mid - row..len {
            scale += cmatrix[j];
        }
        for i in 0..bytes {
            let mut sum = 0.0f32;
            for j in mid - row..len {
                sum += f32::from(cur[(row + j - mid) * bytes + i]) * cmatrix[j];
            }
            dest[row * bytes + i] = (0.5 + sum / scale) as u8;
        }
    }

    // full windows through the table
    for row in mid..pixels - mid {
        let start = row - mid;
        for i in 0..bytes {
            let mut sum = 0.0f32;
            for (t, table) in ctable.chunks_exact(256).enumerate() {
                sum += table[usize::from(cur[(start + t) * bytes + i])];
            }
            dest[row * bytes + i] = (0.5 + sum) as u8;
        }
    }

    // trailing edge
    for row in pixels - mid..pixels {
        let reach = pixels - row + mid;
        let mut scale = 0.0f32;
        for j in 0..reach {
            scale += cmatrix[j];
        }
        for i in 0..bytes {
            let mut sum = 0.0f32;
            for j in 0..reach {
                sum += f32::from(cur[(row + j - mid) * bytes + i]) * cmatrix[j];
            }
            dest[row * bytes + i] = (0.5 + sum / scale) as u8;
        }
    }
}

/// Entry `i` is exactly `(i, i, i)`. Raw 8 bpp indices behave as gray
/// levels only under such a palette.
fn is_identity_ramp(palette: &Palette) -> bool {
    palette
        .colors()
        .iter()
        .enumerate()
        .all(|(i, c)| usize::from(c.red) == i && c.red == c.green && c.green == c.blue)
}

/// Depths the blur passes can run on directly.
fn blurs_in_place(bitmap: &BitmapMut) -> bool {
    match bitmap.depth() {
        BitDepth::Bit24 => true,
        BitDepth::Bit8 => bitmap.palette().is_none_or(is_identity_ramp),
        BitDepth::Bit1 => false,
    }
}

fn load_line(bitmap: &BitmapMut, fixed: u32, vertical: bool, bytes: usize, buf: &mut [u8]) {
    let n = if vertical {
        bitmap.height()
    } else {
        bitmap.width()
    };
    for t in 0..n {
        let (x, y) = if vertical { (fixed, t) } else { (t, fixed) };
        let px = bitmap.get_pixel_unchecked(x, y);
        let o = t as usize * bytes;
        if bytes == 3 {
            buf[o] = rgb::red(px);
            buf[o + 1] = rgb::green(px);
            buf[o + 2] = rgb::blue(px);
        } else {
            buf[o] = px as u8;
        }
    }
}

fn store_line(bitmap: &mut BitmapMut, fixed: u32, vertical: bool, bytes: usize, buf: &[u8]) {
    let n = if vertical {
        bitmap.height()
    } else {
        bitmap.width()
    };
    for t in 0..n {
        let (x, y) = if vertical { (fixed, t) } else { (t, fixed) };
        let o = t as usize * bytes;
        if bytes == 3 {
            let px = bitmap.get_pixel_unchecked(x, y);
            bitmap.set_pixel_unchecked(x, y, rgb::with_rgb(px, buf[o], buf[o + 1], buf[o + 2]));
        } else {
            bitmap.set_pixel_unchecked(x, y, u32::from(buf[o]));
        }
    }
}

/// Run both blur passes over the image. Requires [`blurs_in_place`].
///
/// Rows first, then columns; each line depends only on its own input
/// line, so the passes can write straight back into the image. With a
/// selection, unselected pixels are restored from a snapshot at the
/// end. Progress runs 0..50 and 50..100 for the two passes.
fn blur_in_place(bitmap: &mut BitmapMut, radius: f32, ctx: &OperationContext) {
    let cmatrix = convolve_matrix(radius);
    let ctable = lookup_table(&cmatrix);
    let bytes = if bitmap.depth() == BitDepth::Bit24 {
        3
    } else {
        1
    };
    let (w, h) = (bitmap.width(), bitmap.height());
    let snapshot = bitmap.selection().is_some().then(|| bitmap.as_bitmap());

    let mut cur = vec![0u8; w.max(h) as usize * bytes];
    let mut dst = vec![0u8; w.max(h) as usize * bytes];

    let row_len = w as usize * bytes;
    for y in 0..h {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_progress((y * 50 / h) as u8);
        load_line(bitmap, y, false, bytes, &mut cur[..row_len]);
        blur_line(&ctable, &cmatrix, &cur[..row_len], &mut dst[..row_len], bytes);
        store_line(bitmap, y, false, bytes, &dst[..row_len]);
    }

    let col_len = h as usize * bytes;
    for x in 0..w {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_progress((50 + x * 50 / w) as u8);
        load_line(bitmap, x, true, bytes, &mut cur[..col_len]);
        blur_line(&ctable, &cmatrix, &cur[..col_len], &mut dst[..col_len], bytes);
        store_line(bitmap, x, true, bytes, &dst[..col_len]);
    }

    if let Some(snap) = &snapshot {
        for y in 0..h {
            for x in 0..w {
                if !bitmap.is_inside_selection(x as i32, y as i32) {
                    bitmap.set_pixel_unchecked(x, y, snap.get_pixel_unchecked(x, y));
                }
            }
        }
    }
}

/// Blur the image with a separable two-pass gaussian.
///
/// The standard deviation is `|radius| / 2 + 0.25` and the kernel
/// reaches two standard deviations out; radius 0 degenerates to an
/// exact identity. With a selection, pixels outside it come through
/// unchanged (selected pixels still read unselected neighbors through
/// the window). Alpha is never modified.
///
/// Progress runs 0..50 for the row pass and 50..100 for the column
/// pass. A cancelled context stops between lines: lines already blurred
/// keep their new values, the rest keep the original ones.
///
/// # Errors
///
/// Propagates core errors from the 24 bpp round trip of indexed images.
pub fn gaussian_blur(
    bitmap: &mut BitmapMut,
    radius: f32,
    ctx: &OperationContext,
) -> FilterResult<()> {
    if blurs_in_place(bitmap) {
        blur_in_place(bitmap, radius, ctx);
        return Ok(());
    }
    // run at 24 bpp, then quantize back through the palette
    let mut work = bitmap.as_bitmap().to_rgb24()?.try_into_mut().unwrap();
    blur_in_place(&mut work, radius, ctx);
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            bitmap.set_pixel_color_unchecked(x, y, work.pixel_color_unchecked(x, y), false);
        }
    }
    Ok(())
}

/// Merge the image against an in-place blurred copy of itself.
fn sharpen_in_place(
    bitmap: &mut BitmapMut,
    radius: f32,
    amount: f32,
    threshold: u8,
) -> FilterResult<()> {
    let area = work_area(bitmap);
    if area.is_empty() {
        return Err(FilterError::EmptySelection);
    }
    let src = bitmap.as_bitmap();
    blur_in_place(bitmap, radius, &OperationContext::new());

    let threshold = i32::from(threshold);
    let sharpen = |sv: u8, bv: u8| -> u8 {
        let diff = i32::from(sv) - i32::from(bv);
        if diff.abs() < threshold {
            sv
        } else {
            ((f32::from(sv) + amount * diff as f32) as i32).clamp(0, 255) as u8
        }
    };

    if bitmap.depth() == BitDepth::Bit24 {
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let s = src.pixel_color_unchecked(ux, uy);
                let b = bitmap.pixel_color_unchecked(ux, uy);
                let out = Rgba::rgb(
                    sharpen(s.red, b.red),
                    sharpen(s.green, b.green),
                    sharpen(s.blue, b.blue),
                );
                bitmap.set_pixel_color_unchecked(ux, uy, out, false);
            }
        }
    } else {
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if !bitmap.is_inside_selection(x, y) {
                    continue;
                }
                let (ux, uy) = (x as u32, y as u32);
                let sv = src.get_pixel_unchecked(ux, uy) as u8;
                let bv = bitmap.get_pixel_unchecked(ux, uy) as u8;
                bitmap.set_pixel_unchecked(ux, uy, u32::from(sharpen(sv, bv)));
            }
        }
    }
    Ok(())
}

/// Sharpen the image by pushing each sample away from its blurred value.
///
/// Samples whose blur difference stays below `threshold` are left
/// alone; the rest move by `amount` times the difference, so amount 0
/// is the identity and 1 doubles the local contrast. Uniform regions
/// come through untouched at any setting. The blur and the merge honor
/// the selection.
///
/// # Errors
///
/// Returns [`FilterError::EmptySelection`] when a selection exists but
/// covers no pixels; the check runs before anything is modified.
pub fn unsharp_mask(
    bitmap: &mut BitmapMut,
    radius: f32,
    amount: f32,
    threshold: u8,
) -> FilterResult<()> {
    if blurs_in_place(bitmap) {
        return sharpen_in_place(bitmap, radius, amount, threshold);
    }
    let mut work = bitmap.as_bitmap().to_rgb24()?.try_into_mut().unwrap();
    sharpen_in_place(&mut work, radius, amount, threshold)?;
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            bitmap.set_pixel_color_unchecked(x, y, work.pixel_color_unchecked(x, y), false);
        }
    }
    Ok(())
}

/// Blur only the low-contrast neighborhoods of the image.
///
/// A 3x3 high-pass (center 801, neighbors -100, factor 800, bias 128)
/// measures local contrast: a perfectly uniform neighborhood responds
/// with exactly 128. Pixels whose response leaves `128 ± threshold` on
/// any channel are protected, the rest get a gaussian blur of the given
/// radius. Threshold 255 protects nothing and equals a plain
/// [`gaussian_blur`]; small thresholds keep edges and fine detail
/// crisp while flat areas smooth out.
///
/// The image's own selection restricts the candidate pixels and is
/// never modified.
pub fn selective_blur(
    bitmap: &mut BitmapMut,
    radius: f32,
    threshold: u8,
    ctx: &OperationContext,
) -> FilterResult<()> {
    let thresh_dw = 128u8.saturating_sub(threshold);
    let thresh_up = 128u8.saturating_add(threshold);

    let needs_convert = !blurs_in_place(bitmap);
    let base = if needs_convert {
        bitmap.as_bitmap().to_rgb24()?
    } else {
        bitmap.as_bitmap()
    };

    // high-pass response marks the detail to protect
    let mut mask = base.to_mut();
    let kernel = Kernel::from_slice(3, &[-100, -100, -100, -100, 801, -100, -100, -100, -100])?;
    filter(&mut mask, &kernel, 800, 128, &ctx.child())?;

    let mut sel = match bitmap.selection() {
        Some(s) => s.clone(),
        None => {
            let mut s = Selection::new(bitmap.width(), bitmap.height());
            s.select_rect(bitmap.bounds(), 255);
            s
        }
    };

    let area = sel.bounds();
    for y in area.y..area.bottom() {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_row((y - area.y) as u32, area.height as u32);
        for x in area.x..area.right() {
            if !sel.is_inside(x, y) {
                continue;
            }
            let c = mask.pixel_color_unchecked(x as u32, y as u32);
            if c.red < thresh_dw
                || c.red > thresh_up
                || c.green < thresh_dw
                || c.green > thresh_up
                || c.blue < thresh_dw
                || c.blue > thresh_up
            {
                sel.set_level(x, y, 0);
            }
        }
    }

    let mut work = base.to_mut();
    work.set_selection(Some(sel))?;
    gaussian_blur(&mut work, radius, &ctx.child())?;

    if needs_convert {
        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                bitmap.set_pixel_color_unchecked(x, y, work.pixel_color_unchecked(x, y), false);
            }
        }
    } else {
        bitmap.data_mut().copy_from_slice(work.data());
    }
    Ok(())
}
