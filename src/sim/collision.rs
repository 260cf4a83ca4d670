//! Axis-aligned collision detection and response
//!
//! Boxes are resolved along the axis of least penetration; ties go to the
//! first side in left, right, top, bottom order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point-in-rect test, edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }
}

/// Side of the obstacle that was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// How far a moving box reaches past each side of an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Penetration {
    /// Side with the smallest overlap; earlier sides win ties
    pub fn min_side(&self) -> (Side, f32) {
        let mut best = (Side::Left, self.left);
        for candidate in [
            (Side::Right, self.right),
            (Side::Top, self.top),
            (Side::Bottom, self.bottom),
        ] {
            if candidate.1 < best.1 {
                best = candidate;
            }
        }
        best
    }
}

/// Overlap depths of `mover` into `obstacle`, or `None` when they don't overlap
pub fn aabb_penetration(mover: &Rect, obstacle: &Rect) -> Option<Penetration> {
    if !mover.overlaps(obstacle) {
        return None;
    }
    Some(Penetration {
        left: mover.right() - obstacle.x,
        right: obstacle.right() - mover.x,
        top: mover.bottom() - obstacle.y,
        bottom: obstacle.bottom() - mover.y,
    })
}

/// Push `mover` out of `obstacle` along the least-penetration axis and bounce.
///
/// The mover ends `clearance` pixels clear of the struck side; the velocity
/// component on that axis is pointed away from the obstacle and scaled by
/// `boost`. Returns the side struck.
pub fn resolve_aabb(
    mover: &mut Rect,
    velocity: &mut Vec2,
    obstacle: &Rect,
    clearance: f32,
    boost: f32,
) -> Option<Side> {
    let (side, _) = aabb_penetration(mover, obstacle)?.min_side();
    match side {
        Side::Left => {
            mover.x = obstacle.x - mover.width - clearance;
            velocity.x = -velocity.x.abs() * boost;
        }
        Side::Right => {
            mover.x = obstacle.right() + clearance;
            velocity.x = velocity.x.abs() * boost;
        }
        Side::Top => {
            mover.y = obstacle.y - mover.height - clearance;
            velocity.y = -velocity.y.abs() * boost;
        }
        Side::Bottom => {
            mover.y = obstacle.bottom() + clearance;
            velocity.y = velocity.y.abs() * boost;
        }
    }
    Some(side)
}

/// Wrap a box that has fully left the world to just past the opposite edge.
///
/// Horizontal and vertical wraps are independent. Returns whether it moved.
pub fn wrap_toroidal(rect: &mut Rect, world_width: f32, world_height: f32) -> bool {
    let mut wrapped = false;
    if rect.right() < 0.0 {
        rect.x = world_width;
        wrapped = true;
    }
    if rect.x > world_width {
        rect.x = -rect.width;
        wrapped = true;
    }
    if rect.bottom() < 0.0 {
        rect.y = world_height;
        wrapped = true;
    }
    if rect.y > world_height {
        rect.y = -rect.height;
        wrapped = true;
    }
    wrapped
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(aabb_penetration(&a, &b).is_none());
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 15.0)));
        assert!(r.contains(Vec2::new(30.0, 10.0)));
        assert!(!r.contains(Vec2::new(30.1, 12.0)));
    }

    #[test]
    fn test_resolve_left_overlap() {
        // left = 5, right = 50, top = 40, bottom = 60
        let obstacle = Rect::new(100.0, 100.0, 35.0, 60.0);
        let mut mover = Rect::new(85.0, 100.0, 20.0, 40.0);
        let pen = aabb_penetration(&mover, &obstacle).unwrap();
        assert_eq!(
            pen,
            Penetration {
                left: 5.0,
                right: 50.0,
                top: 40.0,
                bottom: 60.0
            }
        );

        let mut vel = Vec2::new(30.0, 7.0);
        let side = resolve_aabb(&mut mover, &mut vel, &obstacle, 1.0, 1.2);
        assert_eq!(side, Some(Side::Left));
        assert_eq!(mover.x, 100.0 - 20.0 - 1.0);
        assert_eq!(mover.y, 100.0);
        assert!((vel.x - (-36.0)).abs() < 1e-4);
        assert_eq!(vel.y, 7.0);
    }

    #[test]
    fn test_min_side_prefers_left_on_ties() {
        let pen = Penetration {
            left: 5.0,
            right: 5.0,
            top: 5.0,
            bottom: 5.0,
        };
        assert_eq!(pen.min_side().0, Side::Left);
        let pen = Penetration {
            left: 9.0,
            right: 6.0,
            top: 6.0,
            bottom: 6.0,
        };
        assert_eq!(pen.min_side().0, Side::Right);
    }

    #[test]
    fn test_resolve_bottom_points_velocity_down() {
        let obstacle = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut mover = Rect::new(40.0, 48.0, 20.0, 20.0);
        let mut vel = Vec2::new(0.0, -10.0);
        let side = resolve_aabb(&mut mover, &mut vel, &obstacle, 1.0, 1.2);
        assert_eq!(side, Some(Side::Bottom));
        assert_eq!(mover.y, 51.0);
        assert!((vel.y - 12.0).abs() < 1e-4);
        assert!(!mover.overlaps(&obstacle));
    }

    #[test]
    fn test_resolve_without_overlap_is_noop() {
        let obstacle = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut mover = Rect::new(50.0, 50.0, 10.0, 10.0);
        let mut vel = Vec2::new(3.0, 4.0);
        assert_eq!(resolve_aabb(&mut mover, &mut vel, &obstacle, 1.0, 1.2), None);
        assert_eq!(mover, Rect::new(50.0, 50.0, 10.0, 10.0));
        assert_eq!(vel, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_wrap_each_edge() {
        let (w, h) = (800.0, 600.0);

        let mut r = Rect::new(-71.0, 100.0, 70.0, 40.0);
        assert!(wrap_toroidal(&mut r, w, h));
        assert_eq!(r.x, 800.0);

        let mut r = Rect::new(800.5, 100.0, 70.0, 40.0);
        assert!(wrap_toroidal(&mut r, w, h));
        assert_eq!(r.x, -70.0);

        let mut r = Rect::new(100.0, -41.0, 70.0, 40.0);
        assert!(wrap_toroidal(&mut r, w, h));
        assert_eq!(r.y, 600.0);

        let mut r = Rect::new(100.0, 601.0, 70.0, 40.0);
        assert!(wrap_toroidal(&mut r, w, h));
        assert_eq!(r.y, -40.0);
    }

    #[test]
    fn test_partially_outside_does_not_wrap() {
        let mut r = Rect::new(-30.0, 580.0, 70.0, 40.0);
        assert!(!wrap_toroidal(&mut r, 800.0, 600.0));
        assert_eq!(r, Rect::new(-30.0, 580.0, 70.0, 40.0));
    }

    #[test]
    fn test_reflect_velocity() {
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }
}
