//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use rasterdsp_core::Bitmap;
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable.
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, current index,
/// mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "threshold")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters.
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode.
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Compare two floating-point values within `delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Compare two bitmaps for exact equality of dimensions, depth, and
    /// raw pixel values.
    pub fn compare_bitmaps(&mut self, bmp1: &Bitmap, bmp2: &Bitmap) -> bool {
        self.index += 1;

        if !bmp1.sizes_equal(bmp2) {
            let msg = format!(
                "Failure in {}_reg: bitmap comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            return false;
        }

        for y in 0..bmp1.height() {
            for x in 0..bmp1.width() {
                if bmp1.get_pixel_unchecked(x, y) != bmp2.get_pixel_unchecked(x, y) {
                    let msg = format!(
                        "Failure in {}_reg: bitmap comparison for index {} - pixel mismatch at ({}, {})",
                        self.test_name, self.index, x, y
                    );
                    eprintln!("{}", msg);
                    self.failures.push(msg);
                    self.success = false;
                    return false;
                }
            }
        }

        true
    }

    /// Compare two bitmaps allowing each resolved color sample to differ
    /// by at most `tolerance`.
    pub fn compare_bitmaps_within(&mut self, bmp1: &Bitmap, bmp2: &Bitmap, tolerance: u8) -> bool {
        self.index += 1;

        if !bmp1.sizes_equal(bmp2) {
            let msg = format!(
                "Failure in {}_reg: bitmap comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            return false;
        }

        for y in 0..bmp1.height() {
            for x in 0..bmp1.width() {
                let c1 = bmp1.pixel_color_unchecked(x, y);
                let c2 = bmp2.pixel_color_unchecked(x, y);
                let worst = [
                    c1.red.abs_diff(c2.red),
                    c1.green.abs_diff(c2.green),
                    c1.blue.abs_diff(c2.blue),
                    c1.alpha.abs_diff(c2.alpha),
                ]
                .into_iter()
                .max()
                .unwrap_or(0);
                if worst > tolerance {
                    let msg = format!(
                        "Failure in {}_reg: bitmap comparison for index {} - \
                         sample off by {} at ({}, {}), tolerance {}",
                        self.test_name, self.index, worst, x, y, tolerance
                    );
                    eprintln!("{}", msg);
                    self.failures.push(msg);
                    self.success = false;
                    return false;
                }
            }
        }

        true
    }

    /// Dump a bitmap to the regression output directory and check it
    /// against its golden counterpart.
    pub fn write_bitmap_and_check(&mut self, bmp: &Bitmap) -> TestResult<()> {
        self.index += 1;

        let local_path = format!("{}/{}.{:02}.rdump", regout_dir(), self.test_name, self.index);
        fs::write(&local_path, bitmap_to_bytes(bmp)).map_err(|e| TestError::BitmapWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;

        self.check_file(&local_path)
    }

    /// Write raw data to file and check against the golden file.
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart.
    ///
    /// In generate mode, copies the file to golden. In compare mode,
    /// compares with the golden file. In display mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    let msg = format!(
                        "Failure in {}_reg: golden file not found: {}",
                        self.test_name, golden_path
                    );
                    eprintln!("{}", msg);
                    self.failures.push(msg);
                    self.success = false;
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data {
                    let msg = format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    );
                    eprintln!("{}", msg);
                    self.failures.push(msg);
                    self.success = false;
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Compare two binary data arrays.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            let msg = format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            );
            eprintln!("{}", msg);
            self.failures.push(msg);
            self.success = false;
            false
        } else {
            true
        }
    }

    /// Clean up and report results.
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Serialize a bitmap into a deterministic byte dump: a fixed header,
/// the palette entries, and the packed pixel words in little-endian
/// order. Used for golden-file comparison; not an interchange format.
fn bitmap_to_bytes(bmp: &Bitmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + bmp.data().len() * 4);
    out.extend_from_slice(b"RDMP");
    out.extend_from_slice(&bmp.width().to_le_bytes());
    out.extend_from_slice(&bmp.height().to_le_bytes());
    out.extend_from_slice(&bmp.depth().bits().to_le_bytes());
    out.push(u8::from(bmp.has_alpha()));

    match bmp.palette() {
        Some(palette) => {
            out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
            for color in palette.colors() {
                out.extend_from_slice(&[color.red, color.green, color.blue, color.alpha]);
            }
        }
        None => out.extend_from_slice(&0u32.to_le_bytes()),
    }

    for word in bmp.data() {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}
