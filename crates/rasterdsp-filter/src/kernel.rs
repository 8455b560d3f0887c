//! Convolution kernels
//!
//! A kernel is a square matrix of signed integer coefficients with odd side
//! length. Normalization is not stored with the matrix; the divisor and bias
//! travel with each [`filter`](crate::convolve::filter) call so one matrix
//! can be reused with different scalings.

use crate::error::{FilterError, FilterResult};

/// Square convolution matrix with odd side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    size: u32,
    data: Vec<i32>,
}

impl Kernel {
    /// Build a kernel from row-major coefficients.
    ///
    /// # Arguments
    ///
    /// * `size` - Side length, must be odd and at least 1
    /// * `data` - Row-major coefficients, `size * size` entries
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] when the side length is even
    /// or zero, or when the coefficient count does not match.
    pub fn from_slice(size: u32, data: &[i32]) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "side length must be odd, got {}",
                size
            )));
        }
        let expected = size as usize * size as usize;
        if data.len() != expected {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} coefficients for a {}x{} kernel, got {}",
                expected,
                size,
                size,
                data.len()
            )));
        }
        Ok(Self {
            size,
            data: data.to_vec(),
        })
    }

    /// 3x3 softening kernel (center 8, neighbors 1). Used with factor 16
    /// this averages half the center value with half the neighborhood.
    pub fn soften() -> Self {
        Self {
            size: 3,
            data: vec![1, 1, 1, 1, 8, 1, 1, 1, 1],
        }
    }

    /// Side length of the matrix.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major coefficients.
    #[inline]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Coefficient at (col, row).
    #[inline]
    pub fn coef(&self, col: u32, row: u32) -> i32 {
        self.data[row as usize * self.size as usize + col as usize]
    }

    /// Sum of all coefficients, widened to avoid overflow.
    pub fn sum(&self) -> i64 {
        self.data.iter().map(|&c| c as i64).sum()
    }
}
