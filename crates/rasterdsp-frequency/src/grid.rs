//! Owned 2D complex grid

use crate::complex::Complex;

/// A width x height grid of complex samples, one per pixel, stored in
/// row-major order. This is the working buffer of [`crate::fft2`].
#[derive(Debug, Clone)]
pub struct FourierGrid {
    width: u32,
    height: u32,
    data: Vec<Complex>,
}

impl FourierGrid {
    /// Create a zero-filled grid.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Complex::default(); width as usize * height as usize],
        }
    }

    /// Grid width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the sample at (x, y).
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> Complex {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Overwrite the sample at (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: Complex) {
        self.data[y as usize * self.width as usize + x as usize] = value;
    }

    /// A whole row as a mutable slice, for in-place line transforms.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Complex] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.data[start..start + w]
    }

    /// Copy column `x` into `line` (which must hold `height` samples).
    pub(crate) fn load_column(&self, x: u32, line: &mut [Complex]) {
        for (y, slot) in line.iter_mut().enumerate() {
            *slot = self.data[y * self.width as usize + x as usize];
        }
    }

    /// Copy `line` back into column `x`.
    pub(crate) fn store_column(&mut self, x: u32, line: &[Complex]) {
        for (y, value) in line.iter().enumerate() {
            self.data[y * self.width as usize + x as usize] = *value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut grid = FourierGrid::new(3, 2);
        assert_eq!(grid.at(2, 1), Complex::default());

        grid.set(2, 1, Complex::new(1.5, -2.5));
        assert_eq!(grid.at(2, 1), Complex::new(1.5, -2.5));
        assert_eq!(grid.at(1, 1), Complex::default());
    }

    #[test]
    fn test_row_and_column_access() {
        let mut grid = FourierGrid::new(2, 3);
        grid.row_mut(1)[0] = Complex::new(4.0, 0.0);
        assert_eq!(grid.at(0, 1), Complex::new(4.0, 0.0));

        let mut line = vec![Complex::default(); 3];
        grid.load_column(0, &mut line);
        assert_eq!(line[1], Complex::new(4.0, 0.0));

        line[2] = Complex::new(0.0, 7.0);
        grid.store_column(0, &line);
        assert_eq!(grid.at(0, 2), Complex::new(0.0, 7.0));
    }
}
