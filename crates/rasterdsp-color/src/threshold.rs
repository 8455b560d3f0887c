//! Image binarization
//!
//! Fixed-level and mask-driven binarization, selective background
//! replacement, and automatic level estimation. [`optimal_threshold`]
//! implements four classic estimators over the region histogram;
//! [`adaptive_threshold`] tiles the image, estimates a level per tile and
//! blends it with the global one.

use rasterdsp_core::{
    BitDepth, Bitmap, BitmapMut, OperationContext, Palette, Rect, ResampleMode, Rgba,
    get_data_byte,
};

use crate::error::{ColorError, ColorResult};

/// Threshold selection strategy for [`optimal_threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMethod {
    /// Average of every estimator that produced a level.
    #[default]
    Average,
    /// Otsu's between-class variance.
    Otsu,
    /// Kittler and Illingworth minimum error.
    KittlerIllingworth,
    /// Maximum entropy partitioning.
    MaxEntropy,
    /// Potential difference, after the electrostatic binarization method
    /// of Acharya and Sreechakra.
    PotentialDifference,
}

/// Options for [`adaptive_threshold`].
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdOptions {
    /// Level estimator run globally and per tile.
    pub method: ThresholdMethod,
    /// Tile side in pixels; values below 8 are raised to 8.
    pub box_size: u32,
    /// Constant added to every blended level.
    pub bias: i32,
    /// Weight of the global level against the local one, clamped to
    /// `0.0..=1.0`. 0 is fully local, 1 reproduces a global threshold.
    pub balance: f32,
}

impl Default for AdaptiveThresholdOptions {
    fn default() -> Self {
        Self {
            method: ThresholdMethod::Average,
            box_size: 64,
            bias: 0,
            balance: 0.5,
        }
    }
}

impl AdaptiveThresholdOptions {
    /// Set the level estimator.
    pub fn with_method(mut self, method: ThresholdMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the tile side.
    pub fn with_box_size(mut self, box_size: u32) -> Self {
        self.box_size = box_size;
        self
    }

    /// Set the level bias.
    pub fn with_bias(mut self, bias: i32) -> Self {
        self.bias = bias;
        self
    }

    /// Set the global/local blend weight.
    pub fn with_balance(mut self, balance: f32) -> Self {
        self.balance = balance;
        self
    }
}

fn black_white_palette() -> ColorResult<Palette> {
    Ok(Palette::from_colors(&[
        Rgba::new(0, 0, 0, 0),
        Rgba::new(255, 255, 255, 0),
    ])?)
}

/// Builds the 1-bit output for a grayscale source. `is_white` decides
/// each pixel from its coordinates and gray index.
fn binarize(gray: &Bitmap, is_white: impl Fn(u32, u32, u8) -> bool) -> ColorResult<Bitmap> {
    let (w, h) = (gray.width(), gray.height());
    let mut out = Bitmap::new(w, h, BitDepth::Bit1)?.try_into_mut().unwrap();
    out.set_palette(Some(black_white_palette()?))?;

    for y in 0..h {
        let row = gray.row_data(y);
        for x in 0..w {
            if is_white(x, y, get_data_byte(row, x as usize)) {
                out.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    Ok(out.into())
}

/// Binarizes against a fixed lightness level.
///
/// The image is converted to grayscale first; indices strictly above
/// `level` become white, the rest black. A 1-bit input is returned
/// unchanged. The selection is ignored.
pub fn threshold(bitmap: &Bitmap, level: u8) -> ColorResult<Bitmap> {
    if bitmap.depth() == BitDepth::Bit1 {
        return Ok(bitmap.deep_clone());
    }
    let gray = bitmap.to_grayscale()?;
    binarize(&gray, |_, _, index| index > level)
}

/// Binarizes against a per-pixel lightness mask.
///
/// `mask` must be grayscale with the same dimensions; a pixel becomes
/// white when its gray index is strictly above the mask index at the same
/// position.
pub fn threshold_mask(bitmap: &Bitmap, mask: &Bitmap) -> ColorResult<Bitmap> {
    if bitmap.depth() == BitDepth::Bit1 {
        return Ok(bitmap.deep_clone());
    }
    if !mask.is_grayscale()
        || mask.width() != bitmap.width()
        || mask.height() != bitmap.height()
    {
        return Err(ColorError::InvalidMask(
            "threshold mask must be grayscale with matching dimensions".into(),
        ));
    }
    let gray = bitmap.to_grayscale()?;
    binarize(&gray, |x, y, index| {
        index > mask.get_pixel_unchecked(x, y) as u8
    })
}

/// Replaces pixels on one side of a lightness level with `background`,
/// keeping the colors of the others.
///
/// With `direction` false the dark side is replaced (`lightness < level`),
/// with true the light side (`lightness >= level`). When `set_alpha` is
/// true and the image has an alpha channel, `background.alpha` is written
/// too. Honors the selection. 1-bit images are left untouched.
pub fn threshold2(
    bitmap: &mut BitmapMut,
    level: u8,
    direction: bool,
    background: Rgba,
    set_alpha: bool,
) -> ColorResult<()> {
    if bitmap.depth() == BitDepth::Bit1 {
        return Ok(());
    }
    let gray = bitmap.as_bitmap().to_grayscale()?;
    let area = bitmap.selection_box().unwrap_or_else(|| bitmap.bounds());

    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if !bitmap.is_inside_selection(x, y) {
                continue;
            }
            let (ux, uy) = (x as u32, y as u32);
            let i = get_data_byte(gray.row_data(uy), ux as usize);
            if (!direction && i < level) || (direction && i >= level) {
                bitmap.set_pixel_color_unchecked(ux, uy, background, set_alpha);
            }
        }
    }
    Ok(())
}

/// A contrast mask for level estimation must be an 8-bit grayscale image
/// of the same size; its rows are read directly alongside the image rows.
fn validate_contrast_mask(bitmap: &Bitmap, mask: &Bitmap) -> ColorResult<()> {
    if mask.depth() != BitDepth::Bit8
        || !mask.is_grayscale()
        || mask.width() != bitmap.width()
        || mask.height() != bitmap.height()
    {
        return Err(ColorError::InvalidMask(
            "contrast mask must be 8 bit grayscale with matching dimensions".into(),
        ));
    }
    Ok(())
}

/// Objective-function sweep shared by all estimators. Returns the best
/// split index per estimator, -1 where an estimator never produced one.
fn estimate_thresholds(p: &[f64; 256], gray_min: usize, gray_max: usize) -> [i32; 4] {
    let mut w_tot = 0.0;
    let mut m_tot = 0.0;
    let mut q_tot = 0.0;
    for i in gray_min..=gray_max {
        let g = i as f64;
        w_tot += p[i];
        m_tot += g * p[i];
        q_tot += g * g * p[i];
    }

    let mut l_max = [0.0f64; 4];
    let mut th = [-1i32; 4];

    let (mut w1, mut m1, mut q1) = (0.0, 0.0, 0.0);
    for i in gray_min..gray_max {
        let g = i as f64;
        w1 += p[i];
        let w2 = w_tot - w1;
        m1 += g * p[i];
        let m2 = m_tot - m1;
        q1 += g * g * p[i];
        let q2 = q_tot - q1;
        let s1 = q1 / w1 - m1 * m1 / w1 / w1;
        let s2 = q2 / w2 - m2 * m2 / w2 / w2;

        // Otsu, implemented as the defining within-class variance
        let l = -(s1 * w1 + s2 * w2);
        if l_max[0] < l || th[0] < 0 {
            l_max[0] = l;
            th[0] = i as i32;
        }

        // Kittler and Illingworth, defined only while both classes
        // have spread
        if s1 > 0.0 && s2 > 0.0 {
            let l = w1 * (w1 / s1.sqrt()).ln() + w2 * (w2 / s2.sqrt()).ln();
            if l_max[1] < l || th[1] < 0 {
                l_max[1] = l;
                th[1] = i as i32;
            }
        }

        // maximum entropy
        let mut l = 0.0;
        for &v in &p[gray_min..=i] {
            if v > 0.0 {
                l -= v * (v / w1).ln() / w1;
            }
        }
        for &v in &p[(i + 1)..=gray_max] {
            if v > 0.0 {
                l -= v * (v / w2).ln() / w2;
            }
        }
        if l_max[2] < l || th[2] < 0 {
            l_max[2] = l;
            th[2] = i as i32;
        }

        // potential difference between the two classes
        let mut vdiff = 0.0;
        for k in gray_min..=i {
            let d = (i - k) as f64;
            vdiff += p[k] * d * d;
        }
        let mut vsum = vdiff;
        for k in (i + 1)..=gray_max {
            let d = (k - i) as f64;
            let dv = p[k] * d * d;
            vdiff -= dv;
            vsum += dv;
        }
        let l = if vsum > 0.0 { -(vdiff / vsum).abs() } else { 0.0 };
        if l_max[3] < l || th[3] < 0 {
            l_max[3] = l;
            th[3] = i as i32;
        }
    }
    th
}

/// Estimates the optimal binarization level for an 8-bit image.
///
/// The histogram is built over `region` (clipped to the image, whole
/// image when `None`), optionally restricted to pixels where
/// `contrast_mask` is non-zero. The level is chosen by `method`;
/// [`ThresholdMethod::Average`] averages every estimator that produced
/// one. A level that collapses to either histogram end is replaced by the
/// midpoint of the occupied gray range.
///
/// Cancellation through `ctx` stops the histogram scan early and
/// estimates from the rows seen so far.
pub fn optimal_threshold(
    bitmap: &Bitmap,
    method: ThresholdMethod,
    region: Option<Rect>,
    contrast_mask: Option<&Bitmap>,
    ctx: &OperationContext,
) -> ColorResult<u8> {
    if bitmap.depth() != BitDepth::Bit8 {
        return Err(ColorError::UnsupportedDepth {
            expected: "8",
            actual: bitmap.depth().bits(),
        });
    }
    if let Some(mask) = contrast_mask {
        validate_contrast_mask(bitmap, mask)?;
    }
    let area = match region {
        Some(r) => r
            .clip(bitmap.width(), bitmap.height())
            .ok_or(ColorError::EmptyHistogram)?,
        None => bitmap.bounds(),
    };

    let mut p = [0.0f64; 256];
    for y in area.y..area.bottom() {
        if ctx.is_cancelled() {
            break;
        }
        let uy = y as u32;
        let row = bitmap.row_data(uy);
        let mask_row = contrast_mask.map(|m| m.row_data(uy));
        for x in area.x..area.right() {
            let n = get_data_byte(row, x as usize) as usize;
            match mask_row {
                Some(mrow) => {
                    if get_data_byte(mrow, x as usize) != 0 {
                        p[n] += 1.0;
                    }
                }
                None => p[n] += 1.0,
            }
        }
    }

    let mut gray_min = 0usize;
    while gray_min < 255 && p[gray_min] == 0.0 {
        gray_min += 1;
    }
    let mut gray_max = 255usize;
    while gray_max > 0 && p[gray_max] == 0.0 {
        gray_max -= 1;
    }
    if gray_min > gray_max {
        return Err(ColorError::EmptyHistogram);
    }
    if gray_min == gray_max {
        if gray_min == 0 {
            return Ok(0);
        }
        return Ok((gray_max - 1) as u8);
    }

    let th = estimate_thresholds(&p, gray_min, gray_max);
    let mut level = match method {
        ThresholdMethod::Otsu => th[0],
        ThresholdMethod::KittlerIllingworth => th[1],
        ThresholdMethod::MaxEntropy => th[2],
        ThresholdMethod::PotentialDifference => th[3],
        ThresholdMethod::Average => {
            let valid: Vec<i32> = th.iter().copied().filter(|&t| t >= 0).collect();
            if valid.is_empty() {
                (gray_min as i32 + gray_max as i32) / 2
            } else {
                valid.iter().sum::<i32>() / valid.len() as i32
            }
        }
    };
    if level <= gray_min as i32 || level >= gray_max as i32 {
        level = (gray_min as i32 + gray_max as i32) / 2;
    }
    Ok(level as u8)
}

fn cell_level(bias: i32, balance: f32, local: u8, global: u8) -> u8 {
    let v = bias as f32 + ((1.0 - balance) * f32::from(local) + balance * f32::from(global));
    v.clamp(0.0, 255.0) as u8
}

/// Binarizes with a locally adapted level.
///
/// The image is tiled into `box_size` squares (minimum 8). Each tile gets
/// `bias + ((1 - balance) * local + balance * global)` where `local` is
/// the tile's estimated level and `global` the whole-image one. Tiles
/// whose histogram is empty under the contrast mask fall back to the
/// global level. The per-tile levels are expanded to a full-size mask and
/// applied with [`threshold_mask`].
///
/// Progress is reported per tile; on cancellation the remaining tiles
/// keep the global level.
pub fn adaptive_threshold(
    bitmap: &Bitmap,
    options: &AdaptiveThresholdOptions,
    contrast_mask: Option<&Bitmap>,
    ctx: &OperationContext,
) -> ColorResult<Bitmap> {
    if let Some(mask) = contrast_mask {
        validate_contrast_mask(bitmap, mask)?;
    }
    let method = options.method;
    let (bias, box_size) = (options.bias, options.box_size.max(8));
    let balance = options.balance.clamp(0.0, 1.0);

    let mw = bitmap.width().div_ceil(box_size);
    let mh = bitmap.height().div_ceil(box_size);

    let gray = bitmap.to_grayscale()?;
    let child = ctx.child();
    let global = match optimal_threshold(&gray, method, None, contrast_mask, &child) {
        Ok(t) => t,
        // a cancelled scan can leave the histogram empty
        Err(ColorError::EmptyHistogram) if ctx.is_cancelled() => 128,
        Err(e) => return Err(e),
    };

    let mut cells = Bitmap::new(mw, mh, BitDepth::Bit8)?.try_into_mut().unwrap();
    cells.set_palette(Some(Palette::grayscale(256)?))?;
    let seed = cell_level(bias, balance, global, global);
    for y in 0..mh {
        for x in 0..mw {
            cells.set_pixel_unchecked(x, y, u32::from(seed));
        }
    }

    'cells: for y in 0..mh {
        for x in 0..mw {
            ctx.report_progress((100 * (x + y * mw) / (mw * mh)) as u8);
            if ctx.is_cancelled() {
                break 'cells;
            }
            let r = Rect::new_unchecked(
                (x * box_size) as i32,
                (y * box_size) as i32,
                box_size as i32,
                box_size as i32,
            );
            let local = match optimal_threshold(&gray, method, Some(r), contrast_mask, &child) {
                Ok(t) => t,
                Err(ColorError::EmptyHistogram) => global,
                Err(e) => return Err(e),
            };
            cells.set_pixel_unchecked(x, y, u32::from(cell_level(bias, balance, local, global)));
        }
    }

    let mask: Bitmap = cells.into();
    let mask = mask.resample(mw * box_size, mh * box_size, ResampleMode::NearestNeighbor)?;
    let mask = mask.crop(bitmap.bounds())?;
    threshold_mask(&gray, &mask)
}
