//! rasterdsp-test - Regression test framework for rasterdsp
//!
//! This crate provides a regression test harness with three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison
//!
//! Golden files are deterministic raw dumps of bitmap contents; the
//! [`synth`] module builds the synthetic input images the tests run on.
//!
//! # Usage
//!
//! ```ignore
//! use rasterdsp_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("threshold");
//! let bmp = synth::bimodal(64, 64, 50, 200);
//! rp.compare_values(125.0, level as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // rasterdsp-test is at crates/rasterdsp-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
