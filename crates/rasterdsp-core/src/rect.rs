//! Rect - axis-aligned rectangle regions
//!
//! Rectangles locate selections, crop windows, and histogram regions.
//! Coordinates are half-open: a pixel (px, py) is inside when
//! `x <= px < x + width` and `y <= py < y + height`.

use crate::error::{Error, Result};

/// A rectangular region
///
/// A simple `Copy` type since it is small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Create a rectangle without validation.
    pub const fn new_unchecked(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (x, width) = if x1 <= x2 {
            (x1, x2 - x1)
        } else {
            (x2, x1 - x2)
        };
        let (y, height) = if y1 <= y2 {
            (y1, y2 - y1)
        } else {
            (y2, y1 - y2)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right x coordinate (exclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Get the bottom y coordinate (exclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Get the center x coordinate.
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Get the center y coordinate.
    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Get the area.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle overlaps with another.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                width: right - x,
                height: bottom - y,
            })
        } else {
            None
        }
    }

    /// Compute the union (bounding rectangle) of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// Clip to an image of the given dimensions.
    ///
    /// Returns `None` if nothing of the rectangle lies inside the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        self.intersect(&Rect::new_unchecked(0, 0, width as i32, height as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert!(Rect::new(0, 0, -1, 5).is_err());
        assert!(Rect::new(0, 0, 5, -1).is_err());
        assert!(Rect::new(-3, -3, 5, 5).is_ok());
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new_unchecked(2, 3, 4, 5);
        assert!(r.contains_point(2, 3));
        assert!(r.contains_point(5, 7));
        assert!(!r.contains_point(6, 3));
        assert!(!r.contains_point(2, 8));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new_unchecked(0, 0, 10, 10);
        let b = Rect::new_unchecked(5, 5, 10, 10);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Rect::new_unchecked(5, 5, 5, 5));

        let c = Rect::new_unchecked(20, 20, 3, 3);
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_union() {
        let a = Rect::new_unchecked(0, 0, 2, 2);
        let b = Rect::new_unchecked(5, 5, 2, 2);
        assert_eq!(a.union(&b), Rect::new_unchecked(0, 0, 7, 7));
    }

    #[test]
    fn test_clip() {
        let r = Rect::new_unchecked(-5, -5, 20, 8);
        let clipped = r.clip(10, 10).unwrap();
        assert_eq!(clipped, Rect::new_unchecked(0, 0, 10, 3));

        let outside = Rect::new_unchecked(50, 50, 5, 5);
        assert!(outside.clip(10, 10).is_none());
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(8, 9, 2, 3);
        assert_eq!(r, Rect::new_unchecked(2, 3, 6, 6));
    }
}
