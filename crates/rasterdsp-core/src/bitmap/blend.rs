//! Pixel-wise combination of two images
//!
//! [`BitmapMut::mix`] combines a source image into the destination over
//! their overlap, honoring the selections of both images.
//! [`BitmapMut::paste_from`] is a plain bounds-checked paste.

use super::{BitDepth, Bitmap, BitmapMut};
use crate::error::Result;
use crate::palette::Rgba;

/// Per-pixel operator for [`BitmapMut::mix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixOp {
    /// Channel-wise average of the two pixels
    Average,
    /// Channel-wise sum, clamped to 255
    Add,
    /// Channel-wise difference (destination minus source), clamped to 0
    Subtract,
    /// Bitwise AND of the channels
    And,
    /// Bitwise OR of the channels
    Or,
    /// Bitwise XOR of the channels
    Xor,
    /// Pure black source pixels knock the destination to black, any
    /// other source pixel leaves it unchanged
    Mask,
    /// Composites the source over the destination using both alpha
    /// channels
    AlphaBlend,
}

fn apply_op(op: MixOp, dst: Rgba, src: Rgba) -> Rgba {
    match op {
        MixOp::Average => Rgba::new(
            ((u16::from(dst.red) + u16::from(src.red)) / 2) as u8,
            ((u16::from(dst.green) + u16::from(src.green)) / 2) as u8,
            ((u16::from(dst.blue) + u16::from(src.blue)) / 2) as u8,
            ((u16::from(dst.alpha) + u16::from(src.alpha)) / 2) as u8,
        ),
        MixOp::Add => Rgba::new(
            dst.red.saturating_add(src.red),
            dst.green.saturating_add(src.green),
            dst.blue.saturating_add(src.blue),
            dst.alpha.saturating_add(src.alpha),
        ),
        MixOp::Subtract => Rgba::new(
            dst.red.saturating_sub(src.red),
            dst.green.saturating_sub(src.green),
            dst.blue.saturating_sub(src.blue),
            dst.alpha.saturating_sub(src.alpha),
        ),
        MixOp::And => Rgba::new(
            dst.red & src.red,
            dst.green & src.green,
            dst.blue & src.blue,
            dst.alpha & src.alpha,
        ),
        MixOp::Or => Rgba::new(
            dst.red | src.red,
            dst.green | src.green,
            dst.blue | src.blue,
            dst.alpha | src.alpha,
        ),
        MixOp::Xor => Rgba::new(
            dst.red ^ src.red,
            dst.green ^ src.green,
            dst.blue ^ src.blue,
            dst.alpha ^ src.alpha,
        ),
        MixOp::Mask => {
            if src.red == 0 && src.green == 0 && src.blue == 0 {
                Rgba::new(0, 0, 0, 0)
            } else {
                dst
            }
        }
        MixOp::AlphaBlend => {
            if src.alpha == 0 {
                return Rgba::new(dst.red, dst.green, dst.blue, 0);
            }
            if dst.alpha < 5 || src.alpha > 250 {
                return src;
            }
            let a2 = i32::from(src.alpha);
            let a1 = (i32::from(dst.alpha) * (255 - a2)) >> 8;
            let a0 = a2 + a1;
            Rgba::new(
                ((i32::from(src.red) * a2 + a1 * i32::from(dst.red)) / a0) as u8,
                ((i32::from(src.green) * a2 + a1 * i32::from(dst.green)) / a0) as u8,
                ((i32::from(src.blue) * a2 + a1 * i32::from(dst.blue)) / a0) as u8,
                a0 as u8,
            )
        }
    }
}

impl BitmapMut {
    /// Combine `src` into this image with the given operator.
    ///
    /// Each destination pixel (x, y) pairs with the source pixel
    /// (x + x_offset, y + y_offset); pairs outside the source are left
    /// untouched, as are pixels outside either image's selection.
    ///
    /// Alpha samples take part only when `mix_alpha` is set and the
    /// source has an alpha channel; a 24 bpp destination gets an alpha
    /// channel created on demand in that case.
    pub fn mix(
        &mut self,
        src: &Bitmap,
        op: MixOp,
        x_offset: i32,
        y_offset: i32,
        mix_alpha: bool,
    ) -> Result<()> {
        let edit_alpha = src.has_alpha() && mix_alpha && self.depth() == BitDepth::Bit24;
        if edit_alpha && !self.has_alpha() {
            self.enable_alpha()?;
        }

        for y in 0..self.height() {
            for x in 0..self.width() {
                let sx = x as i32 + x_offset;
                let sy = y as i32 + y_offset;
                if !src.is_inside(sx, sy) {
                    continue;
                }
                if !self.is_inside_selection(x as i32, y as i32)
                    || !src.is_inside_selection(sx, sy)
                {
                    continue;
                }
                let dst_color = self.pixel_color_unchecked(x, y);
                let src_color = src.pixel_color_unchecked(sx as u32, sy as u32);
                let result = apply_op(op, dst_color, src_color);
                self.set_pixel_color_unchecked(x, y, result, edit_alpha);
            }
        }
        Ok(())
    }

    /// Paste `src` into this image with its top-left corner at
    /// (x_offset, y_offset). Parts falling outside the destination are
    /// dropped; alpha samples are not transferred.
    pub fn paste_from(&mut self, src: &Bitmap, x_offset: i32, y_offset: i32) {
        for y in 0..src.height() {
            for x in 0..src.width() {
                let dx = x as i32 + x_offset;
                let dy = y as i32 + y_offset;
                if !self.is_inside(dx, dy) {
                    continue;
                }
                let color = src.pixel_color_unchecked(x, y);
                self.set_pixel_color_unchecked(dx as u32, dy as u32, color, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rgb;

    fn solid(width: u32, height: u32, color: Rgba) -> Bitmap {
        let bmp = Bitmap::new(width, height, BitDepth::Bit24).unwrap();
        let mut bmp_mut = bmp.try_into_mut().unwrap();
        for y in 0..height {
            for x in 0..width {
                bmp_mut.set_pixel_color_unchecked(x, y, color, false);
            }
        }
        bmp_mut.into()
    }

    #[test]
    fn test_mix_average() {
        let mut dst = solid(2, 2, Rgba::rgb(10, 20, 30)).try_into_mut().unwrap();
        let src = solid(2, 2, Rgba::rgb(30, 40, 50));
        dst.mix(&src, MixOp::Average, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(20, 30, 40));
    }

    #[test]
    fn test_mix_add_and_subtract_clamp() {
        let mut dst = solid(1, 1, Rgba::rgb(200, 10, 100)).try_into_mut().unwrap();
        let src = solid(1, 1, Rgba::rgb(100, 30, 20));
        dst.mix(&src, MixOp::Add, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(255, 40, 120));

        dst.mix(&src, MixOp::Subtract, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(155, 10, 100));
    }

    #[test]
    fn test_mix_xor() {
        let mut dst = solid(1, 1, Rgba::rgb(0b1100, 0xff, 0)).try_into_mut().unwrap();
        let src = solid(1, 1, Rgba::rgb(0b1010, 0x0f, 0));
        dst.mix(&src, MixOp::Xor, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(0b0110, 0xf0, 0));
    }

    #[test]
    fn test_mix_mask() {
        let mut dst = solid(2, 1, Rgba::rgb(9, 9, 9)).try_into_mut().unwrap();
        let mask = Bitmap::new(2, 1, BitDepth::Bit24).unwrap();
        let mut mask_mut = mask.try_into_mut().unwrap();
        mask_mut.set_pixel_color_unchecked(1, 0, Rgba::rgb(255, 255, 255), false);
        let mask: Bitmap = mask_mut.into();

        dst.mix(&mask, MixOp::Mask, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(0, 0, 0));
        assert_eq!(dst.pixel_color_unchecked(1, 0), Rgba::rgb(9, 9, 9));
    }

    #[test]
    fn test_mix_alpha_blend_general_case() {
        let dst = Bitmap::new(1, 1, BitDepth::Bit24).unwrap();
        let mut dst = dst.try_into_mut().unwrap();
        dst.enable_alpha().unwrap();
        dst.set_pixel_unchecked(0, 0, rgb::compose_rgba(100, 50, 200, 200));

        let src = Bitmap::new(1, 1, BitDepth::Bit24).unwrap();
        let mut src_mut = src.try_into_mut().unwrap();
        src_mut.enable_alpha().unwrap();
        src_mut.set_pixel_unchecked(0, 0, rgb::compose_rgba(20, 30, 40, 100));
        let src: Bitmap = src_mut.into();

        dst.mix(&src, MixOp::AlphaBlend, 0, 0, true).unwrap();
        // a2 = 100, a1 = (200 * 155) >> 8 = 121, a0 = 221
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::new(63, 40, 127, 221));
    }

    #[test]
    fn test_mix_alpha_blend_extremes() {
        let dst = Bitmap::new(2, 1, BitDepth::Bit24).unwrap();
        let mut dst = dst.try_into_mut().unwrap();
        dst.enable_alpha().unwrap();
        dst.set_pixel_unchecked(0, 0, rgb::compose_rgba(1, 2, 3, 200));
        dst.set_pixel_unchecked(1, 0, rgb::compose_rgba(1, 2, 3, 200));

        let src = Bitmap::new(2, 1, BitDepth::Bit24).unwrap();
        let mut src_mut = src.try_into_mut().unwrap();
        src_mut.enable_alpha().unwrap();
        // fully transparent source keeps the channels, clears alpha
        src_mut.set_pixel_unchecked(0, 0, rgb::compose_rgba(90, 90, 90, 0));
        // nearly opaque source replaces the pixel
        src_mut.set_pixel_unchecked(1, 0, rgb::compose_rgba(90, 91, 92, 255));
        let src: Bitmap = src_mut.into();

        dst.mix(&src, MixOp::AlphaBlend, 0, 0, true).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::new(1, 2, 3, 0));
        assert_eq!(dst.pixel_color_unchecked(1, 0), Rgba::new(90, 91, 92, 255));
    }

    #[test]
    fn test_mix_offset_limits_overlap() {
        let mut dst = solid(3, 1, Rgba::rgb(0, 0, 0)).try_into_mut().unwrap();
        let src = solid(2, 1, Rgba::rgb(100, 100, 100));
        dst.mix(&src, MixOp::Add, 1, 0, false).unwrap();
        // dst x pairs with src x+1: only x=0 overlaps src x=1
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(100, 100, 100));
        assert_eq!(dst.pixel_color_unchecked(1, 0), Rgba::rgb(0, 0, 0));
        assert_eq!(dst.pixel_color_unchecked(2, 0), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn test_mix_respects_destination_selection() {
        let mut dst = solid(4, 1, Rgba::rgb(0, 0, 0)).try_into_mut().unwrap();
        dst.select_rect(crate::Rect::new_unchecked(2, 0, 2, 1), 255);
        let src = solid(4, 1, Rgba::rgb(50, 50, 50));
        dst.mix(&src, MixOp::Add, 0, 0, false).unwrap();
        assert_eq!(dst.pixel_color_unchecked(0, 0), Rgba::rgb(0, 0, 0));
        assert_eq!(dst.pixel_color_unchecked(2, 0), Rgba::rgb(50, 50, 50));
    }

    #[test]
    fn test_mix_creates_destination_alpha() {
        let mut dst = solid(1, 1, Rgba::rgb(0, 0, 0)).try_into_mut().unwrap();
        assert!(!dst.has_alpha());

        let src = Bitmap::new(1, 1, BitDepth::Bit24).unwrap();
        let mut src_mut = src.try_into_mut().unwrap();
        src_mut.enable_alpha().unwrap();
        src_mut.set_pixel_unchecked(0, 0, rgb::compose_rgba(10, 10, 10, 101));
        let src: Bitmap = src_mut.into();

        dst.mix(&src, MixOp::Average, 0, 0, true).unwrap();
        assert!(dst.has_alpha());
        // created alpha starts opaque: (255 + 101) / 2
        assert_eq!(dst.pixel_color_unchecked(0, 0).alpha, 178);
    }

    #[test]
    fn test_paste_from() {
        let mut dst = solid(4, 4, Rgba::rgb(0, 0, 0)).try_into_mut().unwrap();
        let src = solid(2, 1, Rgba::rgb(5, 6, 7));
        dst.paste_from(&src, 2, 1);
        assert_eq!(dst.pixel_color_unchecked(2, 1), Rgba::rgb(5, 6, 7));
        assert_eq!(dst.pixel_color_unchecked(3, 1), Rgba::rgb(5, 6, 7));
        assert_eq!(dst.pixel_color_unchecked(1, 1), Rgba::rgb(0, 0, 0));

        // clipped paste must not panic
        dst.paste_from(&src, -1, 3);
        assert_eq!(dst.pixel_color_unchecked(0, 3), Rgba::rgb(5, 6, 7));
    }
}
