//! Rasterdsp Region - Region operations for raster images
//!
//! This crate provides the seeded region transforms:
//!
//! - **Flood fill** ([`fill`]): Tolerance-banded BFS fill with opacity blending and optional selection tracking
//! - **Boundary tracing** ([`trace()`]): Moore neighbor walk extracting a region outline onto a fresh canvas

mod error;
pub mod fill;
pub mod trace;

// Re-export core types
pub use rasterdsp_core;

pub use error::{RegionError, RegionResult};

// Re-export commonly used functions
pub use fill::{FloodFillOptions, flood_fill};
pub use trace::trace;
