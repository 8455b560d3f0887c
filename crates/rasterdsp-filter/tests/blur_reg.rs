//! Test Gaussian blur and the operations layered on it

use rasterdsp_core::{BitDepth, Bitmap, OperationContext, Rect, Selection, rgb};
use rasterdsp_filter::{FilterError, gaussian_blur, selective_blur, unsharp_mask};
use rasterdsp_test::{RegParams, synth};

// ============================================================================
// Gaussian blur
// ============================================================================

#[test]
fn test_radius_zero_is_identity() {
    let original = synth::rgb_gradient(16, 16);

    let mut work = original.to_mut();
    gaussian_blur(&mut work, 0.0, &OperationContext::new()).unwrap();
    let back: Bitmap = work.into();

    let mut rp = RegParams::new("blur_identity");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

#[test]
fn test_spike_spreads_symmetrically() {
    let original = synth::spike(9, 9, 0, 4, 4, 255);

    let mut work = original.to_mut();
    gaussian_blur(&mut work, 1.0, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    let px = |x: u32, y: u32| out.get_pixel_unchecked(x, y);

    // separable passes keep the response mirror symmetric about the spike
    for d in 1..=2 {
        assert_eq!(px(4 - d, 4), px(4 + d, 4));
        assert_eq!(px(4, 4 - d), px(4, 4 + d));
        assert_eq!(px(4 - d, 4 - d), px(4 + d, 4 + d));
    }
    // row and column order may differ by one count of rounding
    assert!(i64::from(px(3, 4)).abs_diff(i64::from(px(4, 3))) <= 1);

    // a three tap matrix reaches one pixel out
    assert!(px(3, 4) > 0);
    assert!(px(4, 4) >= px(3, 4));
    assert_eq!(px(2, 4), 0);

    // energy is conserved up to rounding
    let mut sum = 0i64;
    for y in 0..9 {
        for x in 0..9 {
            sum += i64::from(px(x, y));
        }
    }
    assert!((sum - 255).abs() <= 10, "energy drifted: {sum}");
}

#[test]
fn test_blur_changes_only_the_selection() {
    let original = synth::checkerboard(16, 16, 2, 60, 200);

    let mut work = original.to_mut();
    work.select_rect(Rect::new_unchecked(4, 4, 8, 8), 255);
    gaussian_blur(&mut work, 1.5, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    let left = Rect::new_unchecked(0, 0, 4, 16);
    let right = Rect::new_unchecked(12, 0, 4, 16);
    let mut rp = RegParams::new("blur_selection");
    rp.compare_bitmaps(&original.crop(left).unwrap(), &out.crop(left).unwrap());
    rp.compare_bitmaps(&original.crop(right).unwrap(), &out.crop(right).unwrap());
    assert!(rp.cleanup());

    // inside, the checkerboard smears towards its mean
    assert_ne!(out.get_pixel_unchecked(8, 8), original.get_pixel_unchecked(8, 8));
}

#[test]
fn test_one_bit_blur_round_trips_through_conversion() {
    let bmp = Bitmap::new(8, 8, BitDepth::Bit1).unwrap();
    let mut work = bmp.try_into_mut().unwrap();
    for y in 0..8 {
        for x in 0..4 {
            work.set_pixel_unchecked(x, y, 1);
        }
    }
    let original = work.as_bitmap();

    gaussian_blur(&mut work, 0.0, &OperationContext::new()).unwrap();
    let back: Bitmap = work.into();

    // 1 bpp runs at 24 bpp internally and quantizes back to the two levels
    let mut rp = RegParams::new("blur_one_bit");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

// ============================================================================
// Unsharp mask
// ============================================================================

#[test]
fn test_unsharp_amount_zero_is_identity() {
    let original = synth::rgb_gradient(16, 16);

    let mut work = original.to_mut();
    unsharp_mask(&mut work, 1.5, 0.0, 0).unwrap();
    let back: Bitmap = work.into();

    let mut rp = RegParams::new("unsharp_amount_zero");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

#[test]
fn test_unsharp_leaves_a_flat_field_alone() {
    let original = synth::uniform(12, 12, BitDepth::Bit8, 128);

    let mut work = original.to_mut();
    unsharp_mask(&mut work, 2.0, 2.0, 4).unwrap();
    let back: Bitmap = work.into();

    let mut rp = RegParams::new("unsharp_flat");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

#[test]
fn test_unsharp_steepens_a_step() {
    let original = synth::bimodal(16, 8, 100, 200);

    let mut work = original.to_mut();
    unsharp_mask(&mut work, 2.0, 0.8, 0).unwrap();
    let out: Bitmap = work.into();

    // overshoot on both sides of the step
    assert!(out.get_pixel_unchecked(7, 4) < 100);
    assert!(out.get_pixel_unchecked(8, 4) > 200);

    // a wide threshold masks the difference entirely
    let mut work = original.to_mut();
    unsharp_mask(&mut work, 2.0, 5.0, 200).unwrap();
    let back: Bitmap = work.into();
    let mut rp = RegParams::new("unsharp_threshold");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

#[test]
fn test_unsharp_rejects_an_empty_selection() {
    let original = synth::uniform(8, 8, BitDepth::Bit24, rgb::compose_rgb(128, 128, 128));

    let mut work = original.to_mut();
    work.set_selection(Some(Selection::new(8, 8))).unwrap();
    let result = unsharp_mask(&mut work, 1.5, 0.5, 0);
    assert!(matches!(result, Err(FilterError::EmptySelection)));

    // the image was not touched on the error path
    let back: Bitmap = work.into();
    let mut rp = RegParams::new("unsharp_empty_selection");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

// ============================================================================
// Selective blur
// ============================================================================

#[test]
fn test_selective_matches_gaussian_when_wide_open() {
    let original = synth::gray_gradient(16, 16);

    let mut plain = original.to_mut();
    gaussian_blur(&mut plain, 1.5, &OperationContext::new()).unwrap();
    let blurred: Bitmap = plain.into();

    let mut work = original.to_mut();
    selective_blur(&mut work, 1.5, 255, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    // a threshold of 255 keeps every pixel selected
    let mut rp = RegParams::new("selective_wide_open");
    rp.compare_bitmaps(&blurred, &out);
    assert!(rp.cleanup());
}

#[test]
fn test_selective_protects_busy_areas() {
    let original = synth::checkerboard(8, 8, 1, 50, 200);

    let mut work = original.to_mut();
    selective_blur(&mut work, 2.0, 10, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    // every interior pixel sits on a strong edge and is carved out of the
    // selection; the border responses fall back towards 128 and still blur
    let interior = Rect::new_unchecked(1, 1, 6, 6);
    let mut rp = RegParams::new("selective_busy");
    rp.compare_bitmaps(
        &original.crop(interior).unwrap(),
        &out.crop(interior).unwrap(),
    );
    assert!(rp.cleanup());

    assert_ne!(out.get_pixel_unchecked(0, 0), original.get_pixel_unchecked(0, 0));
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_cancelled_context_keeps_the_image() {
    let original = synth::rgb_gradient(16, 16);

    let ctx = OperationContext::new();
    ctx.request_cancel();

    let mut work = original.to_mut();
    gaussian_blur(&mut work, 2.0, &ctx).unwrap();
    let after_gaussian: Bitmap = work.into();

    let mut work = original.to_mut();
    selective_blur(&mut work, 2.0, 255, &ctx).unwrap();
    let after_selective: Bitmap = work.into();

    let mut rp = RegParams::new("blur_cancelled");
    rp.compare_bitmaps(&original, &after_gaussian);
    rp.compare_bitmaps(&original, &after_selective);
    assert!(rp.cleanup());
}
