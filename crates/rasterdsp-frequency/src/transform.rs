//! Line transforms and the 2D driver

use std::f64::consts::PI;

use rasterdsp_core::{BitDepth, Bitmap, OperationContext, Palette, ResampleMode};

use crate::complex::Complex;
use crate::error::{FrequencyError, FrequencyResult};
use crate::grid::FourierGrid;

/// Transform direction, selecting the twiddle sign and which side
/// carries the 1/N normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Image to spectrum; each axis pass divides by its length.
    Forward,
    /// Spectrum to image; no normalization.
    Inverse,
}

impl Direction {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// In-place radix-2 transform of a power-of-two line.
pub fn fft(line: &mut [Complex], direction: Direction) -> FrequencyResult<()> {
    if !line.len().is_power_of_two() {
        return Err(FrequencyError::NotPowerOfTwo(line.len()));
    }
    fft_in_place(line, direction);
    Ok(())
}

/// Direct O(n^2) transform for lengths the radix-2 kernel cannot take.
pub fn dft(line: &mut [Complex], direction: Direction) {
    let mut scratch = vec![Complex::default(); line.len()];
    dft_into(line, &mut scratch, direction);
}

fn fft_in_place(line: &mut [Complex], direction: Direction) {
    let n = line.len();
    if n <= 1 {
        return;
    }

    // bit-reversal permutation
    let mut j = 0;
    for i in 0..n - 1 {
        if i < j {
            line.swap(i, j);
        }
        let mut k = n >> 1;
        while k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    // butterfly stages; the forward direction rotates clockwise
    let sign = -direction.sign();
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let wn = Complex::from_polar(1.0, sign * 2.0 * PI / len as f64);
        for base in (0..n).step_by(len) {
            let mut w = Complex::new(1.0, 0.0);
            for k in 0..half {
                let t = line[base + k + half] * w;
                let u = line[base + k];
                line[base + k] = u + t;
                line[base + k + half] = u - t;
                w = w * wn;
            }
        }
        len <<= 1;
    }

    if direction == Direction::Forward {
        let inv = 1.0 / n as f64;
        for value in line.iter_mut() {
            *value = *value * inv;
        }
    }
}

fn dft_into(line: &mut [Complex], scratch: &mut [Complex], direction: Direction) {
    let m = line.len();
    debug_assert_eq!(scratch.len(), m);
    let step = -direction.sign() * 2.0 * PI / m as f64;
    for (i, out) in scratch.iter_mut().enumerate() {
        let arg = step * i as f64;
        let mut sum = Complex::default();
        for (k, value) in line.iter().enumerate() {
            sum = sum + *value * Complex::from_polar(1.0, k as f64 * arg);
        }
        *out = sum;
    }

    if direction == Direction::Forward {
        let inv = 1.0 / m as f64;
        for (dst, src) in line.iter_mut().zip(scratch.iter()) {
            *dst = *src * inv;
        }
    } else {
        line.copy_from_slice(scratch);
    }
}

/// Grayscale-convert `src` and bring it to `width` x `height`.
fn gray_plane(src: &Bitmap, width: u32, height: u32) -> FrequencyResult<Bitmap> {
    let gray = src.to_grayscale()?;
    if gray.width() == width && gray.height() == height {
        return Ok(gray);
    }
    Ok(gray.resample(width, height, ResampleMode::NearestNeighbor)?)
}

/// 2D Fourier transform between a pair of gray planes and their spectrum.
///
/// At least one source plane must be given; a missing plane contributes
/// zero samples. Sources are converted to grayscale and the working grid
/// is loaded with `gray - 128`. With `force_pow2` both dimensions are
/// rounded up to powers of two (resampling the planes); otherwise each
/// axis independently uses the radix-2 kernel when its length allows it
/// and the direct transform when not. The imaginary plane is resampled
/// to the real plane's size when they disagree.
///
/// The eight-bit outputs compress the dynamics by `max(w, h)/16`
/// (inverted for [`Direction::Inverse`], quadrupled in magnitude mode).
/// Plain mode writes `128 + component * gain`; magnitude mode writes
/// `gain * (3 + ln |z|)` and `128 + atan(im/re) * gain`. Both returned
/// planes carry grayscale palettes.
pub fn fft2(
    src_real: Option<&Bitmap>,
    src_imag: Option<&Bitmap>,
    direction: Direction,
    force_pow2: bool,
    magnitude: bool,
    ctx: &OperationContext,
) -> FrequencyResult<(Bitmap, Bitmap)> {
    let size_source = src_real.or(src_imag).ok_or(FrequencyError::MissingSource)?;
    let mut width = size_source.width();
    let mut height = size_source.height();
    if force_pow2 {
        width = width.next_power_of_two();
        height = height.next_power_of_two();
    }

    let real_plane = src_real.map(|s| gray_plane(s, width, height)).transpose()?;
    let imag_plane = src_imag.map(|s| gray_plane(s, width, height)).transpose()?;

    let mut grid = FourierGrid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let re = real_plane
                .as_ref()
                .map_or(0.0, |p| f64::from(p.get_pixel_unchecked(x, y)) - 128.0);
            let im = imag_plane
                .as_ref()
                .map_or(0.0, |p| f64::from(p.get_pixel_unchecked(x, y)) - 128.0);
            grid.set(x, y, Complex::new(re, im));
        }
    }

    let mut scratch = vec![Complex::default(); width.max(height) as usize];

    let rows_pow2 = width.is_power_of_two();
    for y in 0..height {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_progress((y * 50 / height) as u8);
        let line = grid.row_mut(y);
        if rows_pow2 {
            fft_in_place(line, direction);
        } else {
            dft_into(line, &mut scratch[..width as usize], direction);
        }
    }

    let cols_pow2 = height.is_power_of_two();
    let mut column = vec![Complex::default(); height as usize];
    for x in 0..width {
        if ctx.is_cancelled() {
            break;
        }
        ctx.report_progress((50 + x * 50 / width) as u8);
        grid.load_column(x, &mut column);
        if cols_pow2 {
            fft_in_place(&mut column, direction);
        } else {
            dft_into(&mut column, &mut scratch[..height as usize], direction);
        }
        grid.store_column(x, &column);
    }

    // 2^(log2(max) - 4): eight bits cannot hold the dynamics of the
    // spectrum, this gain trades clipping against quantization
    let mut gain = f64::from(width.max(height)) / 16.0;
    if direction == Direction::Inverse {
        gain = 1.0 / gain;
    }
    if magnitude {
        gain *= 4.0;
    }

    let mut real_out = Bitmap::new(width, height, BitDepth::Bit8)?
        .try_into_mut()
        .unwrap();
    real_out.set_palette(Some(Palette::grayscale(256)?))?;
    let mut imag_out = Bitmap::new(width, height, BitDepth::Bit8)?
        .try_into_mut()
        .unwrap();
    imag_out.set_palette(Some(Palette::grayscale(256)?))?;

    for y in 0..height {
        for x in 0..width {
            let z = grid.at(x, y);
            let (a, b) = if magnitude {
                let ratio = if z.re == 0.0 { z.im / 1e-10 } else { z.im / z.re };
                (gain * (3.0 + z.mag().ln()), 128.0 + ratio.atan() * gain)
            } else {
                (128.0 + z.re * gain, 128.0 + z.im * gain)
            };
            real_out.set_pixel_unchecked(x, y, a.clamp(0.0, 255.0) as u32);
            imag_out.set_pixel_unchecked(x, y, b.clamp(0.0, 255.0) as u32);
        }
    }

    Ok((real_out.into(), imag_out.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Complex, b: Complex) {
        assert!(
            (a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_fft_rejects_odd_lengths() {
        let mut line = vec![Complex::default(); 3];
        assert!(matches!(
            fft(&mut line, Direction::Forward),
            Err(FrequencyError::NotPowerOfTwo(3))
        ));
    }

    #[test]
    fn test_forward_dc_is_the_mean() {
        let mut line: Vec<Complex> = (1..=4).map(|v| Complex::new(f64::from(v), 0.0)).collect();
        fft(&mut line, Direction::Forward).unwrap();
        assert_close(line[0], Complex::new(2.5, 0.0));
    }

    #[test]
    fn test_forward_then_inverse_round_trips() {
        let original: Vec<Complex> = [3.0, -1.0, 4.0, 1.0, -5.0, 9.0, 2.0, -6.0]
            .iter()
            .map(|&v| Complex::new(v, v * 0.5))
            .collect();

        let mut line = original.clone();
        fft(&mut line, Direction::Forward).unwrap();
        fft(&mut line, Direction::Inverse).unwrap();
        for (got, want) in line.iter().zip(original.iter()) {
            assert_close(*got, *want);
        }
    }

    #[test]
    fn test_single_tone_lands_in_one_bin_pair() {
        let n = 8;
        let mut line: Vec<Complex> = (0..n)
            .map(|k| Complex::new((2.0 * PI * k as f64 / n as f64).cos(), 0.0))
            .collect();
        fft(&mut line, Direction::Forward).unwrap();

        assert_close(line[1], Complex::new(0.5, 0.0));
        assert_close(line[7], Complex::new(0.5, 0.0));
        assert_close(line[0], Complex::default());
        assert_close(line[4], Complex::default());
    }

    #[test]
    fn test_dft_matches_fft_on_a_power_of_two() {
        let original: Vec<Complex> = [7.0, 0.0, -3.0, 2.0]
            .iter()
            .map(|&v| Complex::new(v, 1.0 - v))
            .collect();

        let mut a = original.clone();
        fft(&mut a, Direction::Forward).unwrap();
        let mut b = original;
        dft(&mut b, Direction::Forward);

        for (got, want) in b.iter().zip(a.iter()) {
            assert_close(*got, *want);
        }
    }

    #[test]
    fn test_inverse_dft_is_unnormalized() {
        let mut line = vec![Complex::default(); 5];
        line[0] = Complex::new(1.0, 0.0);
        dft(&mut line, Direction::Inverse);
        for value in &line {
            assert_close(*value, Complex::new(1.0, 0.0));
        }
    }
}
