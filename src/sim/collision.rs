//! Axis-aligned rectangle collision
//!
//! One overlap test serves landing, hazard contact and target contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Midpoint of the bottom edge
    #[inline]
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.bottom())
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            pos: self.pos + by,
            size: self.size,
        }
    }
}

/// Stateless overlap queries
pub struct CollisionDetector;

impl CollisionDetector {
    /// True when the rectangles share interior area. Touching edges do not count.
    #[inline]
    pub fn intersects(a: &Rect, b: &Rect) -> bool {
        let x_overlap = a.left() < b.right() && a.right() > b.left();
        let y_overlap = a.top() < b.bottom() && a.bottom() > b.top();
        x_overlap && y_overlap
    }

    /// First rect in `others` overlapping `subject`, by index
    pub fn first_hit<'a, I>(subject: &Rect, others: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        others
            .into_iter()
            .position(|r| Self::intersects(subject, r))
    }

    pub fn any_hit<'a, I>(subject: &Rect, others: I) -> bool
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        Self::first_hit(subject, others).is_some()
    }
}

/// How a bonus round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusOutcome {
    /// Player caught the target
    Caught,
    /// Player touched a hazard
    HitHazard,
}

/// Resolve the end-of-tick contact checks. A hazard hit outranks a catch on the same frame.
pub fn resolve_outcome(caught: bool, hit_hazard: bool) -> Option<BonusOutcome> {
    if hit_hazard {
        Some(BonusOutcome::HitHazard)
    } else if caught {
        Some(BonusOutcome::Caught)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(CollisionDetector::intersects(&a, &b));
        assert!(CollisionDetector::intersects(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!CollisionDetector::intersects(&a, &right));
        assert!(!CollisionDetector::intersects(&a, &below));
    }

    #[test]
    fn test_contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(CollisionDetector::intersects(&outer, &inner));
    }

    #[test]
    fn test_first_hit_index() {
        let player = Rect::new(50.0, 50.0, 10.0, 10.0);
        let rects = [
            Rect::new(0.0, 0.0, 5.0, 5.0),
            Rect::new(55.0, 55.0, 5.0, 5.0),
            Rect::new(52.0, 52.0, 5.0, 5.0),
        ];
        assert_eq!(CollisionDetector::first_hit(&player, &rects), Some(1));
        assert!(!CollisionDetector::any_hit(&player, &rects[..1]));
    }

    #[test]
    fn test_hazard_outranks_catch() {
        assert_eq!(resolve_outcome(true, true), Some(BonusOutcome::HitHazard));
        assert_eq!(resolve_outcome(true, false), Some(BonusOutcome::Caught));
        assert_eq!(resolve_outcome(false, true), Some(BonusOutcome::HitHazard));
        assert_eq!(resolve_outcome(false, false), None);
    }
}
