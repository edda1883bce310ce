//! Axis-aligned rectangles
//!
//! World space has its origin at the bottom-left corner with y pointing up,
//! so `pos` is the bottom-left corner of the box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True when both boxes share a non-zero area. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.top()
            && self.top() > other.pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes_overlap() {
        let a = Rect::new(100.0, 20.0, 64.0, 64.0);
        let b = Rect::new(100.0, 20.0, 64.0, 64.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_partial_overlap_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        let b = Rect::new(40.0, 50.0, 64.0, 64.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        assert!(!a.overlaps(&Rect::new(64.0, 0.0, 64.0, 64.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 64.0, 64.0, 64.0)));
        assert!(!a.overlaps(&Rect::new(-64.0, -64.0, 64.0, 64.0)));
    }

    #[test]
    fn test_needs_overlap_on_both_axes() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        // Overlaps on x only
        assert!(!a.overlaps(&Rect::new(10.0, 100.0, 64.0, 64.0)));
        // Overlaps on y only
        assert!(!a.overlaps(&Rect::new(100.0, 10.0, 64.0, 64.0)));
    }

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 64.0, 32.0);
        assert_eq!(r.right(), 74.0);
        assert_eq!(r.top(), 52.0);
        assert_eq!(r.center(), Vec2::new(42.0, 36.0));
    }
}
