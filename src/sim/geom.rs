//! Integer rectangles and bounding circles
//!
//! World space is measured in whole units with Y growing downward. Bodies keep
//! continuous positions, but every overlap test runs on integer rectangles
//! derived from those positions.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Integer center (rounded toward the top-left)
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Middle of the bottom edge, where feet-anchored bodies stand
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + self.width as f32 / 2.0, self.bottom() as f32)
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: IVec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// True when the two rectangles share interior area (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Signed penetration depth of `self` into `other`
    ///
    /// Each component is the minimum translation that moves `self` out of
    /// `other` along that axis. Returns zero when the rectangles don't overlap.
    pub fn intersection_depth(&self, other: &Rect) -> Vec2 {
        let half_a = Vec2::new(self.width as f32, self.height as f32) / 2.0;
        let half_b = Vec2::new(other.width as f32, other.height as f32) / 2.0;

        let center_a = Vec2::new(self.x as f32, self.y as f32) + half_a;
        let center_b = Vec2::new(other.x as f32, other.y as f32) + half_b;

        let distance = center_a - center_b;
        let min_distance = half_a + half_b;

        if distance.x.abs() >= min_distance.x || distance.y.abs() >= min_distance.y {
            return Vec2::ZERO;
        }

        let depth_x = if distance.x > 0.0 {
            min_distance.x - distance.x
        } else {
            -min_distance.x - distance.x
        };
        let depth_y = if distance.y > 0.0 {
            min_distance.y - distance.y
        } else {
            -min_distance.y - distance.y
        };
        Vec2::new(depth_x, depth_y)
    }
}

/// Horizontal facing of enemies, shooting traps and projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// A bounding circle used for item pickup and spinning traps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Circle-vs-rectangle overlap via the closest point on the rectangle
    pub fn intersects(&self, rect: &Rect) -> bool {
        let closest = Vec2::new(
            self.center
                .x
                .clamp(rect.left() as f32, rect.right() as f32),
            self.center
                .y
                .clamp(rect.top() as f32, rect.bottom() as f32),
        );
        self.center.distance_squared(closest) < self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(40, 32, 40, 32);
        assert_eq!(r.right(), 80);
        assert_eq!(r.bottom(), 64);
        assert_eq!(r.center(), IVec2::new(60, 48));
        assert_eq!(r.bottom_center(), Vec2::new(60.0, 64.0));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn test_intersection_depth_points_out_of_other() {
        // Body sinking 4 units into a floor tile below it
        let body = Rect::new(10, 0, 20, 36);
        let floor = Rect::new(0, 32, 40, 32);
        let depth = body.intersection_depth(&floor);
        assert_eq!(depth.y, -4.0);
        assert!(depth.x.abs() > depth.y.abs());

        // Wall to the right: push left
        let body = Rect::new(35, 0, 10, 10);
        let wall = Rect::new(40, 0, 40, 32);
        let depth = body.intersection_depth(&wall);
        assert_eq!(depth.x, -5.0);
    }

    #[test]
    fn test_intersection_depth_zero_when_apart() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersection_depth(&Rect::new(50, 50, 10, 10)), Vec2::ZERO);
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(0, 0, 20, 20);
        assert!(Circle::new(Vec2::new(25.0, 10.0), 6.0).intersects(&rect));
        assert!(!Circle::new(Vec2::new(30.0, 10.0), 6.0).intersects(&rect));
        // Center inside the rectangle
        assert!(Circle::new(Vec2::new(10.0, 10.0), 1.0).intersects(&rect));
    }
}
