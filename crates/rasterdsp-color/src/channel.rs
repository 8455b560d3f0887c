//! Channel splitting and recombination
//!
//! Splits an image into per-component 8-bit grayscale planes for any
//! supported [`ColorSpace`], plus a CMYK split and an alpha plane
//! extractor. [`combine`] rebuilds a 24-bit image from three planes,
//! resampling the green/blue/alpha planes to the red plane's size when
//! they disagree.

use rasterdsp_core::{BitDepth, Bitmap, BitmapMut, Palette, ResampleMode, luma, rgb};

use crate::colorspace::{ColorSpace, ColorTriple};
use crate::error::{ColorError, ColorResult};

/// Fresh 8-bit grayscale plane with a linear palette.
fn channel_image(width: u32, height: u32) -> ColorResult<BitmapMut> {
    let mut ch = Bitmap::new(width, height, BitDepth::Bit8)?
        .try_into_mut()
        .unwrap();
    ch.set_palette(Some(Palette::grayscale(256)?))?;
    Ok(ch)
}

fn require_plane(ch: &Bitmap) -> ColorResult<()> {
    if ch.depth() == BitDepth::Bit24 {
        return Err(ColorError::UnsupportedDepth {
            expected: "1 or 8",
            actual: ch.depth().bits(),
        });
    }
    Ok(())
}

/// Splits `bitmap` into three grayscale planes holding the components of
/// `space` in declaration order.
///
/// The whole image is processed; the selection is ignored. For
/// `ColorSpace::Rgb` the planes are the raw red, green and blue channels.
pub fn split(bitmap: &Bitmap, space: ColorSpace) -> ColorResult<(Bitmap, Bitmap, Bitmap)> {
    let (w, h) = (bitmap.width(), bitmap.height());
    let mut p1 = channel_image(w, h)?;
    let mut p2 = channel_image(w, h)?;
    let mut p3 = channel_image(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let c = bitmap.pixel_color_unchecked(x, y);
            let t = space.from_rgb(c.red, c.green, c.blue);
            p1.set_pixel_unchecked(x, y, u32::from(t.c1));
            p2.set_pixel_unchecked(x, y, u32::from(t.c2));
            p3.set_pixel_unchecked(x, y, u32::from(t.c3));
        }
    }
    Ok((p1.into(), p2.into(), p3.into()))
}

/// Splits `bitmap` into cyan, magenta, yellow and key planes.
///
/// C/M/Y are the complements of R/G/B and K is the luminance, so this is
/// a display approximation rather than a print separation.
pub fn split_cmyk(bitmap: &Bitmap) -> ColorResult<(Bitmap, Bitmap, Bitmap, Bitmap)> {
    let (w, h) = (bitmap.width(), bitmap.height());
    let mut pc = channel_image(w, h)?;
    let mut pm = channel_image(w, h)?;
    let mut py = channel_image(w, h)?;
    let mut pk = channel_image(w, h)?;

    for y in 0..h {
        for x in 0..w {
            let c = bitmap.pixel_color_unchecked(x, y);
            pc.set_pixel_unchecked(x, y, u32::from(255 - c.red));
            pm.set_pixel_unchecked(x, y, u32::from(255 - c.green));
            py.set_pixel_unchecked(x, y, u32::from(255 - c.blue));
            pk.set_pixel_unchecked(x, y, u32::from(luma(c.red, c.green, c.blue)));
        }
    }
    Ok((pc.into(), pm.into(), py.into(), pk.into()))
}

/// Extracts the alpha samples of a 24-bit image as a grayscale plane.
pub fn split_alpha(bitmap: &Bitmap) -> ColorResult<Bitmap> {
    if !bitmap.has_alpha() {
        return Err(ColorError::InvalidParameters(
            "image has no alpha channel".into(),
        ));
    }
    let (w, h) = (bitmap.width(), bitmap.height());
    let mut plane = channel_image(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let a = bitmap.pixel_color_unchecked(x, y).alpha;
            plane.set_pixel_unchecked(x, y, u32::from(a));
        }
    }
    Ok(plane.into())
}

fn fit_plane(ch: &Bitmap, width: u32, height: u32) -> ColorResult<Bitmap> {
    if ch.width() == width && ch.height() == height {
        Ok(ch.clone())
    } else {
        Ok(ch.resample(width, height, ResampleMode::Bilinear)?)
    }
}

/// Rebuilds a 24-bit image from three component planes.
///
/// The output size comes from `r`; `g`, `b` and `a` are bilinearly
/// resampled to fit when their sizes differ. Plane values are read as raw
/// indices, mapped through `space` back to RGB. When `a` is given the
/// output gets an alpha channel filled from it.
pub fn combine(
    r: &Bitmap,
    g: &Bitmap,
    b: &Bitmap,
    a: Option<&Bitmap>,
    space: ColorSpace,
) -> ColorResult<Bitmap> {
    require_plane(r)?;
    require_plane(g)?;
    require_plane(b)?;
    if let Some(a) = a {
        require_plane(a)?;
    }

    let (w, h) = (r.width(), r.height());
    let g = fit_plane(g, w, h)?;
    let b = fit_plane(b, w, h)?;
    let a = match a {
        Some(a) => Some(fit_plane(a, w, h)?),
        None => None,
    };

    let mut out = Bitmap::new(w, h, BitDepth::Bit24)?.try_into_mut().unwrap();
    if a.is_some() {
        out.enable_alpha()?;
    }

    for y in 0..h {
        for x in 0..w {
            let t = ColorTriple::new(
                r.get_pixel_unchecked(x, y) as u8,
                g.get_pixel_unchecked(x, y) as u8,
                b.get_pixel_unchecked(x, y) as u8,
            );
            let (cr, cg, cb) = space.to_rgb(t);
            out.set_pixel_unchecked(x, y, rgb::compose_rgb(cr, cg, cb));
            if let Some(ref a) = a {
                out.set_pixel_alpha(x, y, a.get_pixel_unchecked(x, y) as u8);
            }
        }
    }
    Ok(out.into())
}
