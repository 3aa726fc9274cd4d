//! Shape Primitives
//!
//! Axis-aligned rectangles and circles in canvas space.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from a position and a size vector.
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Left edge x.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Right edge x.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Top edge y.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge y.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Closest point inside the rectangle to `p`.
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.bottom()),
        )
    }
}

/// Circle given by centre and radius.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    /// Centre point
    pub center: Vec2,
    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Create a new circle.
    #[inline]
    pub const fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(150.0, 320.0, 120.0, 20.0);
        assert_eq!(r.left(), 150.0);
        assert_eq!(r.right(), 270.0);
        assert_eq!(r.top(), 320.0);
        assert_eq!(r.bottom(), 340.0);
    }

    #[test]
    fn test_closest_point() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.closest_point(Vec2::new(5.0, 5.0)), Vec2::new(5.0, 5.0));
        assert_eq!(r.closest_point(Vec2::new(-3.0, 20.0)), Vec2::new(0.0, 10.0));
    }
}
