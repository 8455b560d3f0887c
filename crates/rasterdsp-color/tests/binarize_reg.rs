//! Test binary conversion and histogram-based threshold selection

use rasterdsp_color::{
    AdaptiveThresholdOptions, ColorError, ThresholdMethod, adaptive_threshold, optimal_threshold,
    threshold, threshold2, threshold_mask,
};
use rasterdsp_core::{BitDepth, Bitmap, OperationContext, Rect, Rgba};
use rasterdsp_test::{RegParams, synth};

// ============================================================================
// Fixed-level threshold
// ============================================================================

#[test]
fn test_threshold_splits_bimodal() {
    let img = synth::bimodal(32, 8, 40, 210);
    let bin = threshold(&img, 128).unwrap();

    assert_eq!(bin.depth(), BitDepth::Bit1);
    for y in 0..8 {
        assert_eq!(bin.get_pixel_unchecked(0, y), 0);
        assert_eq!(bin.get_pixel_unchecked(31, y), 1);
    }
}

#[test]
fn test_threshold_level_is_strict() {
    let img = synth::uniform(4, 4, BitDepth::Bit8, 128);
    let at_level = threshold(&img, 128).unwrap();
    let below = threshold(&img, 127).unwrap();

    // strictly-greater comparison: equal values stay black
    assert_eq!(at_level.get_pixel_unchecked(2, 2), 0);
    assert_eq!(below.get_pixel_unchecked(2, 2), 1);
}

#[test]
fn test_threshold_mask_varies_per_pixel() {
    let img = synth::uniform(32, 4, BitDepth::Bit8, 128);
    let mask = synth::bimodal(32, 4, 60, 200);
    let bin = threshold_mask(&img, &mask).unwrap();

    // 128 clears the low mask level and fails the high one
    assert_eq!(bin.get_pixel_unchecked(0, 0), 1);
    assert_eq!(bin.get_pixel_unchecked(31, 0), 0);
}

#[test]
fn test_threshold2_paints_low_side() {
    let mut work = synth::rgb_gradient(32, 8).to_mut();
    threshold2(&mut work, 128, false, Rgba::rgb(255, 0, 255), false).unwrap();
    let out: Bitmap = work.into();

    // dark left edge replaced, bright right edge kept
    assert_eq!(out.pixel_color_unchecked(0, 0), Rgba::rgb(255, 0, 255));
    let right = out.pixel_color_unchecked(31, 7);
    assert_eq!(right.red, 255);
    assert_eq!(right.green, 255);
}

// ============================================================================
// Optimal threshold
// ============================================================================

#[test]
fn test_optimal_threshold_methods_on_bimodal() {
    let img = synth::bimodal(64, 32, 50, 200);
    let ctx = OperationContext::new();

    let mut rp = RegParams::new("binarize_optimal");
    let otsu = optimal_threshold(&img, ThresholdMethod::Otsu, None, None, &ctx).unwrap();
    rp.compare_values(125.0, f64::from(otsu), 0.0);

    let kittler =
        optimal_threshold(&img, ThresholdMethod::KittlerIllingworth, None, None, &ctx).unwrap();
    rp.compare_values(125.0, f64::from(kittler), 0.0);

    let pot =
        optimal_threshold(&img, ThresholdMethod::PotentialDifference, None, None, &ctx).unwrap();
    rp.compare_values(125.0, f64::from(pot), 0.0);
    assert!(rp.cleanup());
}

#[test]
fn test_optimal_threshold_gradient_lands_midrange() {
    let img = synth::gray_gradient(256, 4);
    let ctx = OperationContext::new();
    let level = optimal_threshold(&img, ThresholdMethod::Otsu, None, None, &ctx).unwrap();
    assert!(
        (100..=156).contains(&level),
        "threshold {} outside midrange",
        level
    );
}

#[test]
fn test_optimal_threshold_region_limits_histogram() {
    let img = synth::bimodal(64, 16, 50, 200);
    let ctx = OperationContext::new();

    // only the dark half contributes
    let level = optimal_threshold(
        &img,
        ThresholdMethod::Otsu,
        Some(Rect::new_unchecked(0, 0, 32, 16)),
        None,
        &ctx,
    )
    .unwrap();
    assert_eq!(level, 49);

    let empty = optimal_threshold(
        &img,
        ThresholdMethod::Otsu,
        Some(Rect::new_unchecked(100, 0, 8, 8)),
        None,
        &ctx,
    );
    assert!(matches!(empty, Err(ColorError::EmptyHistogram)));
}

// ============================================================================
// Adaptive threshold
// ============================================================================

#[test]
fn test_adaptive_threshold_finds_local_spots() {
    let base = synth::uniform(64, 32, BitDepth::Bit8, 180);
    let mut work = base.to_mut();
    work.set_pixel_unchecked(16, 8, 60);
    work.set_pixel_unchecked(48, 24, 60);
    let img: Bitmap = work.into();

    let ctx = OperationContext::new();
    let options = AdaptiveThresholdOptions::default()
        .with_method(ThresholdMethod::Otsu)
        .with_box_size(16)
        .with_balance(0.0);
    let bin = adaptive_threshold(&img, &options, None, &ctx).unwrap();

    assert_eq!(bin.depth(), BitDepth::Bit1);
    assert_eq!(bin.width(), 64);
    assert_eq!(bin.height(), 32);
    assert_eq!(bin.get_pixel_unchecked(16, 8), 0);
    assert_eq!(bin.get_pixel_unchecked(48, 24), 0);
    // the uniform background clears its local level everywhere
    assert_eq!(bin.get_pixel_unchecked(0, 0), 1);
    assert_eq!(bin.get_pixel_unchecked(17, 8), 1);
    assert_eq!(bin.get_pixel_unchecked(63, 31), 1);
}

#[test]
fn test_adaptive_threshold_full_balance_matches_global() {
    let img = synth::bimodal(64, 32, 50, 200);
    let ctx = OperationContext::new();

    let global = optimal_threshold(&img, ThresholdMethod::Otsu, None, None, &ctx).unwrap();
    let options = AdaptiveThresholdOptions::default()
        .with_method(ThresholdMethod::Otsu)
        .with_box_size(16)
        .with_balance(1.0);
    let bin = adaptive_threshold(&img, &options, None, &ctx).unwrap();
    let reference = threshold(&img, global).unwrap();

    let mut rp = RegParams::new("binarize_adaptive_global");
    rp.compare_bitmaps(&reference, &bin);
    assert!(rp.cleanup());
}

#[test]
fn test_adaptive_threshold_cancel_stops_early() {
    let img = synth::bimodal(64, 32, 50, 200);
    let ctx = OperationContext::new();
    ctx.cancel_flag().store(true, std::sync::atomic::Ordering::Relaxed);

    // cancelled runs still produce a full-size binary image
    let options = AdaptiveThresholdOptions::default().with_box_size(16);
    let bin = adaptive_threshold(&img, &options, None, &ctx).unwrap();
    assert_eq!(bin.width(), 64);
    assert_eq!(bin.height(), 32);
}
