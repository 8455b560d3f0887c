//! Test spatial convolution

use rasterdsp_core::{BitDepth, Bitmap, OperationContext, Rect, rgb};
use rasterdsp_filter::{Kernel, filter, mean};
use rasterdsp_test::{RegParams, synth};

// ============================================================================
// Exact results
// ============================================================================

#[test]
fn test_identity_kernel_round_trip() {
    let original = synth::rgb_gradient(16, 16);

    let mut work = original.to_mut();
    let identity = Kernel::from_slice(3, &[0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
    filter(&mut work, &identity, 1, 0, &OperationContext::new()).unwrap();
    let back: Bitmap = work.into();

    // off-image taps have zero coefficients, so even the border survives
    let mut rp = RegParams::new("convolve_identity");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}

#[test]
fn test_box_kernel_rescales_at_the_border() {
    let original = synth::uniform(12, 10, BitDepth::Bit24, rgb::compose_rgb(90, 90, 90));
    let expected = synth::uniform(12, 10, BitDepth::Bit24, rgb::compose_rgb(100, 100, 100));

    let mut work = original.to_mut();
    let boxcar = Kernel::from_slice(3, &[1; 9]).unwrap();
    filter(&mut work, &boxcar, 9, 10, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    // interior windows divide by the factor, clipped windows rescale by the
    // in-image weight, so a flat field only picks up the bias
    let mut rp = RegParams::new("convolve_box_bias");
    rp.compare_bitmaps(&expected, &out);
    assert!(rp.cleanup());
}

#[test]
fn test_mean_smooths_checkerboard() {
    let original = synth::checkerboard(8, 8, 1, 50, 200);

    let mut work = original.to_mut();
    mean(&mut work).unwrap();
    let out: Bitmap = work.into();

    // interior low cell: (8*50 + 4*200 + 4*50) / 16
    assert_eq!(out.get_pixel_unchecked(3, 3), 87);
    // interior high cell: (8*200 + 4*50 + 4*200) / 16
    assert_eq!(out.get_pixel_unchecked(3, 4), 162);
}

// ============================================================================
// Selection and cancellation
// ============================================================================

#[test]
fn test_filter_respects_selection() {
    let original = synth::gray_gradient(32, 32);

    let mut work = original.to_mut();
    work.select_rect(Rect::new_unchecked(8, 8, 16, 16), 255);
    let identity = Kernel::from_slice(3, &[0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
    filter(&mut work, &identity, 1, 50, &OperationContext::new()).unwrap();
    let out: Bitmap = work.into();

    let strip = Rect::new_unchecked(0, 0, 8, 32);
    let mut rp = RegParams::new("convolve_selection");
    rp.compare_bitmaps(
        &original.crop(strip).unwrap(),
        &out.crop(strip).unwrap(),
    );
    assert!(rp.cleanup());

    // inside the selection the bias was applied
    assert_ne!(
        out.pixel_color_unchecked(16, 16),
        original.pixel_color_unchecked(16, 16)
    );
}

#[test]
fn test_cancelled_context_is_a_no_op() {
    let original = synth::rgb_gradient(16, 16);

    let mut work = original.to_mut();
    let ctx = OperationContext::new();
    ctx.request_cancel();
    filter(&mut work, &Kernel::soften(), 16, 0, &ctx).unwrap();
    let back: Bitmap = work.into();

    let mut rp = RegParams::new("convolve_cancelled");
    rp.compare_bitmaps(&original, &back);
    assert!(rp.cleanup());
}
