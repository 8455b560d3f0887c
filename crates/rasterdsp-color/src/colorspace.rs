//! Color space conversions
//!
//! Pixel-level conversions between RGB and the supported working spaces,
//! plus an in-place whole-image conversion. Components of non-RGB spaces
//! are stored in the red/green/blue slots of a pixel in declaration order
//! (for HSL: hue in red, saturation in green, lightness in blue).
//!
//! Hue is encoded on the 0..=255 circle (85 per 120 degrees), saturation
//! and lightness on 0..=255. YUV, YIQ and XYZ components are biased and
//! scaled to fit 0..=255 as well, so every space round-trips through the
//! same 8-bit storage.

use rasterdsp_core::{BitmapMut, Rgba};

use crate::error::{ColorError, ColorResult};

const HSL_MAX: i32 = 255;
const RGB_MAX: i32 = 255;
/// Hue reported for achromatic colors, 2/3 of the hue circle.
pub const HSL_UNDEFINED: u8 = 170;

/// Three 8-bit components of a color in some working space.
///
/// `c1`/`c2`/`c3` hold the components in the order the space declares
/// them: H/S/L, Y/U/V, Y/I/Q or X/Y/Z. For RGB they are simply R/G/B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTriple {
    pub c1: u8,
    pub c2: u8,
    pub c3: u8,
}

impl ColorTriple {
    pub fn new(c1: u8, c2: u8, c3: u8) -> Self {
        Self { c1, c2, c3 }
    }

    /// Takes the RGB slots of a pixel, ignoring alpha.
    pub fn from_rgba(color: Rgba) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

/// Working color spaces for conversion, channel splitting and repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Rgb,
    Hsl,
    Yuv,
    Yiq,
    Xyz,
}

impl ColorSpace {
    /// Converts a triple in this space to RGB.
    pub fn to_rgb(self, t: ColorTriple) -> (u8, u8, u8) {
        match self {
            ColorSpace::Rgb => (t.c1, t.c2, t.c3),
            ColorSpace::Hsl => hsl_to_rgb(t),
            ColorSpace::Yuv => yuv_to_rgb(t),
            ColorSpace::Yiq => yiq_to_rgb(t),
            ColorSpace::Xyz => xyz_to_rgb(t),
        }
    }

    /// Converts RGB components to a triple in this space.
    pub fn from_rgb(self, r: u8, g: u8, b: u8) -> ColorTriple {
        match self {
            ColorSpace::Rgb => ColorTriple::new(r, g, b),
            ColorSpace::Hsl => rgb_to_hsl(r, g, b),
            ColorSpace::Yuv => rgb_to_yuv(r, g, b),
            ColorSpace::Yiq => rgb_to_yiq(r, g, b),
            ColorSpace::Xyz => rgb_to_xyz(r, g, b),
        }
    }
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Converts RGB to HSL using integer arithmetic.
///
/// Achromatic colors get saturation 0 and the undefined hue 170. The hue
/// circle is 0..=255, so complementary colors differ by 128.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> ColorTriple {
    let c_max = i32::from(r.max(g).max(b));
    let c_min = i32::from(r.min(g).min(b));
    let l = ((c_max + c_min) * HSL_MAX + RGB_MAX) / (2 * RGB_MAX);

    if c_max == c_min {
        return ColorTriple::new(HSL_UNDEFINED, 0, l as u8);
    }

    let spread = c_max - c_min;
    let s = if l <= HSL_MAX / 2 {
        (spread * HSL_MAX + (c_max + c_min) / 2) / (c_max + c_min)
    } else {
        let d = 2 * RGB_MAX - c_max - c_min;
        (spread * HSL_MAX + d / 2) / d
    };

    // Distance of each channel from the maximum, in sixths of the circle.
    let sixth = HSL_MAX / 6;
    let r_delta = ((c_max - i32::from(r)) * sixth + spread / 2) / spread;
    let g_delta = ((c_max - i32::from(g)) * sixth + spread / 2) / spread;
    let b_delta = ((c_max - i32::from(b)) * sixth + spread / 2) / spread;

    let h = if i32::from(r) == c_max {
        b_delta - g_delta
    } else if i32::from(g) == c_max {
        HSL_MAX / 3 + r_delta - b_delta
    } else {
        2 * HSL_MAX / 3 + g_delta - r_delta
    };

    ColorTriple::new(h.rem_euclid(256) as u8, s as u8, l as u8)
}

/// Converts an HSL triple back to RGB.
pub fn hsl_to_rgb(hsl: ColorTriple) -> (u8, u8, u8) {
    let h = f32::from(hsl.c1) * 360.0 / 255.0;
    let s = f32::from(hsl.c2) / 255.0;
    let l = f32::from(hsl.c3) / 255.0;

    if hsl.c2 == 0 {
        let v = (l * 255.0) as u8;
        return (v, v, v);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        (hue_to_rgb(m1, m2, h + 120.0) * 255.0) as u8,
        (hue_to_rgb(m1, m2, h) * 255.0) as u8,
        (hue_to_rgb(m1, m2, h - 120.0) * 255.0) as u8,
    )
}

fn hue_to_rgb(n1: f32, n2: f32, mut hue: f32) -> f32 {
    if hue > 360.0 {
        hue -= 360.0;
    } else if hue < 0.0 {
        hue += 360.0;
    }
    if hue < 60.0 {
        n1 + (n2 - n1) * hue / 60.0
    } else if hue < 180.0 {
        n2
    } else if hue < 240.0 {
        n1 + (n2 - n1) * (240.0 - hue) / 60.0
    } else {
        n1
    }
}

/// Converts RGB to YUV with U and V biased by 128.
pub fn rgb_to_yuv(r: u8, g: u8, b: u8) -> ColorTriple {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let y = (0.299 * rf + 0.587 * gf + 0.114 * bf) as i32;
    let u = ((i32::from(b) - y) as f32 * 0.565 + 128.0) as i32;
    let v = ((i32::from(r) - y) as f32 * 0.713 + 128.0) as i32;
    ColorTriple::new(clamp_u8(y), clamp_u8(u), clamp_u8(v))
}

/// Converts a biased YUV triple back to RGB.
pub fn yuv_to_rgb(yuv: ColorTriple) -> (u8, u8, u8) {
    let y = f32::from(yuv.c1);
    let u = (i32::from(yuv.c2) - 128) as f32;
    let v = (i32::from(yuv.c3) - 128) as f32;
    let r = (y + 1.403 * v) as i32;
    let g = (y - 0.344 * u - 0.714 * v) as i32;
    let b = (y + 1.770 * u) as i32;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

/// Converts RGB to YIQ with I and Q biased by 128.
pub fn rgb_to_yiq(r: u8, g: u8, b: u8) -> ColorTriple {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let y = (0.2992 * rf + 0.5868 * gf + 0.1140 * bf) as i32;
    let i = (0.5960 * rf - 0.2742 * gf - 0.3219 * bf + 128.0) as i32;
    let q = (0.2109 * rf - 0.5229 * gf + 0.3120 * bf + 128.0) as i32;
    ColorTriple::new(clamp_u8(y), clamp_u8(i), clamp_u8(q))
}

/// Converts a biased YIQ triple back to RGB.
pub fn yiq_to_rgb(yiq: ColorTriple) -> (u8, u8, u8) {
    let y = f32::from(yiq.c1);
    let i = (i32::from(yiq.c2) - 128) as f32;
    let q = (i32::from(yiq.c3) - 128) as f32;
    let r = (y + 0.9560 * i + 0.6210 * q) as i32;
    let g = (y - 0.2730 * i - 0.6470 * q) as i32;
    let b = (y - 1.1040 * i + 1.7010 * q) as i32;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

/// Converts RGB to CIE XYZ, with Z rescaled so white maps near 255.
pub fn rgb_to_xyz(r: u8, g: u8, b: u8) -> ColorTriple {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let x = (0.412_453 * rf + 0.357_580 * gf + 0.180_423 * bf) as i32;
    let y = (0.212_671 * rf + 0.715_160 * gf + 0.072_169 * bf) as i32;
    let z = ((0.019_334 * rf + 0.119_193 * gf + 0.950_227 * bf) * 0.918_483_657) as i32;
    ColorTriple::new(clamp_u8(x), clamp_u8(y), clamp_u8(z))
}

/// Converts an XYZ triple back to RGB, undoing the Z rescale.
pub fn xyz_to_rgb(xyz: ColorTriple) -> (u8, u8, u8) {
    let x = f64::from(xyz.c1);
    let y = f64::from(xyz.c2);
    let z = f64::from(xyz.c3);
    let k = 1.088_751;
    let r = (3.240_479 * x - 1.537_150 * y - 0.498_535 * z * k) as i32;
    let g = (-0.969_256 * x + 1.875_992 * y + 0.041_556 * z * k) as i32;
    let b = (0.055_648 * x - 0.204_043 * y + 1.057_311 * z * k) as i32;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

/// Reinterprets every pixel of `bitmap` from `src` space to `dst` space.
///
/// The stored component slots are rewritten in place over the whole image;
/// the selection is not consulted. Alpha samples are left untouched. When
/// `dst == src` the image is returned unchanged.
pub fn convert_color_space(
    bitmap: &mut BitmapMut,
    dst: ColorSpace,
    src: ColorSpace,
) -> ColorResult<()> {
    if dst == src {
        return Ok(());
    }
    if bitmap.is_indexed() {
        return Err(ColorError::UnsupportedDepth {
            expected: "non-indexed",
            actual: bitmap.depth().bits(),
        });
    }

    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let c = bitmap.pixel_color_unchecked(x, y);
            let (r, g, b) = src.to_rgb(ColorTriple::from_rgba(c));
            let t = dst.from_rgb(r, g, b);
            bitmap.set_pixel_color_unchecked(x, y, Rgba::new(t.c1, t.c2, t.c3, c.alpha), false);
        }
    }
    Ok(())
}
