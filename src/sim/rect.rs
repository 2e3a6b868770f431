//! Axis-aligned rectangle primitive
//!
//! Every entity owns one of these. Containment is inclusive on both edges,
//! overlap is exclusive: rectangles that only share an edge do not collide.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, world units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle sized from a sprite
    pub fn sized(x: i32, y: i32, size: IVec2) -> Self {
        Self::new(x, y, size.x.max(0), size.y.max(0))
    }

    /// Point containment, inclusive on both bounds
    pub fn contains(&self, px: i32, py: i32) -> bool {
        (self.x..=self.x + self.w).contains(&px) && (self.y..=self.y + self.h).contains(&py)
    }

    /// Overlap test, edge-adjacent rectangles do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.x >= other.x + other.w || self.x + self.w <= other.x {
            return false;
        }
        if self.y >= other.y + other.h || self.y + self.h <= other.y {
            return false;
        }
        true
    }

    /// Resize; non-positive dimensions are ignored
    pub fn set_size(&mut self, w: i32, h: i32) {
        if w > 0 {
            self.w = w;
        }
        if h > 0 {
            self.h = h;
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Same rectangle grown by `margin` in every direction
    pub fn inflated(&self, margin: i32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2 * margin,
            self.h + 2 * margin,
        )
    }

    /// Center point (integer division, as sprites are drawn)
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_fields() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!((r.x, r.y, r.w, r.h), (1, 2, 3, 4));
    }

    #[test]
    fn test_contains_inclusive() {
        let r = Rect::new(1, 2, 5, 6);
        assert!(r.contains(3, 3));
        assert!(!r.contains(1, 1));
        // Both corners are inside
        assert!(r.contains(1, 2));
        assert!(r.contains(6, 8));
        assert!(!r.contains(7, 8));
    }

    #[test]
    fn test_edge_touching_does_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Rect::new(9, 0, 10, 10);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_set_size_ignores_non_positive() {
        let mut r = Rect::new(0, 0, 4, 4);
        r.set_size(-1, 0);
        assert_eq!((r.w, r.h), (4, 4));
        r.set_size(8, 2);
        assert_eq!((r.w, r.h), (8, 2));
    }

    #[test]
    fn test_inflated_shield_margin() {
        let r = Rect::new(200, 400, 100, 50).inflated(20);
        assert_eq!(r, Rect::new(180, 380, 140, 90));
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(
            ax in -500i32..500, ay in -500i32..500, aw in 0i32..200, ah in 0i32..200,
            bx in -500i32..500, by in -500i32..500, bw in 0i32..200, bh in 0i32..200,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn test_neighbours_never_overlap(x in -500i32..500, y in -500i32..500, w in 1i32..200, h in 1i32..200) {
            let a = Rect::new(x, y, w, h);
            prop_assert!(!a.overlaps(&Rect::new(x + w, y, w, h)));
            prop_assert!(!a.overlaps(&Rect::new(x, y + h, w, h)));
            prop_assert!(a.overlaps(&Rect::new(x + w - 1, y, w, h)));
        }
    }
}
