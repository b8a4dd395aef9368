//! Axis-aligned integer rectangles in world coordinates.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle.
///
/// Containment is half-open: a point is inside when
/// `min_x <= x < min_x + width` and `min_y <= y < min_y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect2i {
    pub min_x: i32,
    pub min_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2i {
    /// Creates a rectangle from its minimum corner and size.
    pub const fn new(min_x: i32, min_y: i32, width: u32, height: u32) -> Self {
        Self { min_x, min_y, width, height }
    }

    /// Creates a rectangle spanning `[min, max)` on both axes.
    ///
    /// An inverted span yields an empty rectangle at `min`.
    pub fn from_min_max(min: IVec2, max: IVec2) -> Self {
        Self {
            min_x: min.x,
            min_y: min.y,
            width: (max.x as i64 - min.x as i64).max(0) as u32,
            height: (max.y as i64 - min.y as i64).max(0) as u32,
        }
    }

    pub fn min(&self) -> IVec2 {
        IVec2::new(self.min_x, self.min_y)
    }

    /// Exclusive maximum corner.
    pub fn max(&self) -> IVec2 {
        IVec2::new(self.max_x(), self.max_y())
    }

    /// Exclusive maximum x, saturating at `i32::MAX`.
    pub fn max_x(&self) -> i32 {
        self.min_x.saturating_add_unsigned(self.width)
    }

    /// Exclusive maximum y, saturating at `i32::MAX`.
    pub fn max_y(&self) -> i32 {
        self.min_y.saturating_add_unsigned(self.height)
    }

    /// Whether the exclusive maximum corner is representable, i.e. no
    /// coordinate of the rectangle was lost to saturation.
    pub fn fits(&self) -> bool {
        self.min_x.checked_add_unsigned(self.width).is_some()
            && self.min_y.checked_add_unsigned(self.height).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x() && y >= self.min_y && y < self.max_y()
    }

    /// Returns true if the two rectangles share at least one point.
    pub fn intersects(&self, other: &Rect2i) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Returns the overlapping area of two rectangles (possibly empty).
    pub fn intersection(&self, other: &Rect2i) -> Rect2i {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        Rect2i::from_min_max(min, max)
    }
}
