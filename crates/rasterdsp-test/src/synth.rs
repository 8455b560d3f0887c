//! Synthetic test images
//!
//! Deterministic builders used across the regression tests instead of
//! image files on disk.

use rasterdsp_core::{BitDepth, Bitmap, rgb};

/// Build an image filled with one raw pixel value.
///
/// # Panics
///
/// Panics if either dimension is 0.
pub fn uniform(width: u32, height: u32, depth: BitDepth, value: u32) -> Bitmap {
    let bmp = Bitmap::new(width, height, depth).unwrap();
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            bmp_mut.set_pixel_unchecked(x, y, value);
        }
    }
    bmp_mut.into()
}

/// Build an 8 bpp image with a horizontal ramp from 0 to 255.
///
/// # Panics
///
/// Panics if either dimension is 0.
pub fn gray_gradient(width: u32, height: u32) -> Bitmap {
    let bmp = Bitmap::new(width, height, BitDepth::Bit8).unwrap();
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    let span = width.max(2) - 1;
    for y in 0..height {
        for x in 0..width {
            bmp_mut.set_pixel_unchecked(x, y, x * 255 / span);
        }
    }
    bmp_mut.into()
}

/// Build a 24 bpp image with red ramping along x, green along y, and a
/// constant blue of 128.
///
/// # Panics
///
/// Panics if either dimension is 0.
pub fn rgb_gradient(width: u32, height: u32) -> Bitmap {
    let bmp = Bitmap::new(width, height, BitDepth::Bit24).unwrap();
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    let x_span = width.max(2) - 1;
    let y_span = height.max(2) - 1;
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / x_span) as u8;
            let g = (y * 255 / y_span) as u8;
            bmp_mut.set_pixel_unchecked(x, y, rgb::compose_rgb(r, g, 128));
        }
    }
    bmp_mut.into()
}

/// Build an 8 bpp checkerboard with square cells.
///
/// # Panics
///
/// Panics if either dimension or the cell size is 0.
pub fn checkerboard(width: u32, height: u32, cell: u32, low: u32, high: u32) -> Bitmap {
    assert!(cell > 0, "cell size must be positive");
    let bmp = Bitmap::new(width, height, BitDepth::Bit8).unwrap();
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            let value = if ((x / cell) + (y / cell)) % 2 == 0 {
                low
            } else {
                high
            };
            bmp_mut.set_pixel_unchecked(x, y, value);
        }
    }
    bmp_mut.into()
}

/// Build an 8 bpp image whose left half is `low` and right half `high`.
/// Useful for histogram and threshold tests.
///
/// # Panics
///
/// Panics if either dimension is 0.
pub fn bimodal(width: u32, height: u32, low: u32, high: u32) -> Bitmap {
    let bmp = Bitmap::new(width, height, BitDepth::Bit8).unwrap();
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            let value = if x < width / 2 { low } else { high };
            bmp_mut.set_pixel_unchecked(x, y, value);
        }
    }
    bmp_mut.into()
}

/// Build an 8 bpp uniform image with a single differing pixel.
///
/// # Panics
///
/// Panics if either dimension is 0 or (x, y) is out of range.
pub fn spike(width: u32, height: u32, background: u32, x: u32, y: u32, value: u32) -> Bitmap {
    let bmp = uniform(width, height, BitDepth::Bit8, background);
    let mut bmp_mut = bmp.try_into_mut().unwrap();
    assert!(x < width && y < height, "spike out of range");
    bmp_mut.set_pixel_unchecked(x, y, value);
    bmp_mut.into()
}
