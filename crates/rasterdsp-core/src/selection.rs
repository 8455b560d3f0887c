//! Selection - per-pixel region of interest
//!
//! A selection is an 8-bit level plane the size of the image plus a cached
//! bounding rectangle. A pixel is inside the selection when its level is
//! nonzero. Transforms that honor the selection skip pixels outside it;
//! an image without a selection is fully in scope.

use crate::rect::Rect;

/// Per-pixel selection plane with a cached bounding rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    width: u32,
    height: u32,
    levels: Vec<u8>,
    bounds: Rect,
}

impl Selection {
    /// Create an empty (nothing selected) plane for a width x height image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            levels: vec![0; width as usize * height as usize],
            bounds: Rect::default(),
        }
    }

    /// Get the plane width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the plane height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the selection level at (x, y). Out-of-range coordinates are 0.
    #[inline]
    pub fn level_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.levels[y as usize * self.width as usize + x as usize]
    }

    /// Check whether (x, y) is selected (level nonzero).
    #[inline]
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        self.level_at(x, y) != 0
    }

    /// Cached bounding rectangle of the nonzero region (empty when nothing
    /// is selected).
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// OR `level` into the plane at (x, y) without touching the cached
    /// bounds. Out-of-range coordinates are ignored. Call
    /// [`Selection::rebuild_bounds`] after a batch of marks.
    #[inline]
    pub fn mark(&mut self, x: i32, y: i32, level: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.levels[y as usize * self.width as usize + x as usize] |= level;
    }

    /// Assign `level` at (x, y), replacing the previous value, without
    /// touching the cached bounds. Out-of-range coordinates are ignored.
    /// Call [`Selection::rebuild_bounds`] after a batch of edits.
    #[inline]
    pub fn set_level(&mut self, x: i32, y: i32, level: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.levels[y as usize * self.width as usize + x as usize] = level;
    }

    /// Select a rectangle at the given level and grow the cached bounds.
    pub fn select_rect(&mut self, rect: Rect, level: u8) {
        let Some(clipped) = rect.clip(self.width, self.height) else {
            return;
        };
        for y in clipped.y..clipped.bottom() {
            let row = y as usize * self.width as usize;
            for x in clipped.x..clipped.right() {
                self.levels[row + x as usize] = level;
            }
        }
        if level != 0 {
            self.bounds = if self.bounds.is_empty() {
                clipped
            } else {
                self.bounds.union(&clipped)
            };
        } else {
            self.rebuild_bounds();
        }
    }

    /// Clear the whole plane.
    pub fn clear(&mut self) {
        self.levels.fill(0);
        self.bounds = Rect::default();
    }

    /// Recompute the bounding rectangle by scanning the plane.
    pub fn rebuild_bounds(&mut self) {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for y in 0..self.height as i32 {
            let row = y as usize * self.width as usize;
            for x in 0..self.width as i32 {
                if self.levels[row + x as usize] != 0 {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }
        self.bounds = if min_x == i32::MAX {
            Rect::default()
        } else {
            Rect::from_corners(min_x, min_y, max_x + 1, max_y + 1)
        };
    }

    /// Raw access to the level plane (row-major).
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }
}
