//! Scrolling camera
//!
//! Derived from the character position each frame; never feeds back into the
//! simulation.

use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
use crate::sim::Level;
use crate::tuning::CameraTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the view in world units
    pub position: Vec2,
    /// View size in world units
    pub viewport: Vec2,
    margins: CameraTuning,
}

impl Camera {
    pub fn new(viewport: Vec2, margins: CameraTuning) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
            margins,
        }
    }

    /// Nudge the view so `target` stays inside the margin box
    pub fn follow(&mut self, target: Vec2, level_size: Vec2) {
        let margin_x = self.viewport.x * self.margins.view_margin;
        let left = self.position.x + margin_x;
        let right = self.position.x + self.viewport.x - margin_x;
        let top = self.position.y + self.viewport.y * self.margins.top_margin;
        let bottom =
            self.position.y + self.viewport.y - self.viewport.y * self.margins.bottom_margin;

        let mut movement = Vec2::ZERO;
        if target.x < left {
            movement.x = target.x - left;
        } else if target.x > right {
            movement.x = target.x - right;
        }
        if target.y < top {
            movement.y = target.y - top;
        } else if target.y > bottom {
            movement.y = target.y - bottom;
        }

        // A level smaller than the viewport pins the view at the origin
        let max = (level_size - self.viewport).max(Vec2::ZERO);
        self.position = (self.position + movement).clamp(Vec2::ZERO, max);
    }

    /// Follow the character of a level
    pub fn follow_level(&mut self, level: &Level) {
        self.follow(level.character().position, level.grid().pixel_size());
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Tile columns and rows overlapping the view
    pub fn visible_tiles(&self) -> (Range<i32>, Range<i32>) {
        let min = self.position;
        let max = self.position + self.viewport;
        let columns = (min.x / TILE_WIDTH as f32).floor() as i32
            ..(max.x / TILE_WIDTH as f32).ceil() as i32;
        let rows = (min.y / TILE_HEIGHT as f32).floor() as i32
            ..(max.y / TILE_HEIGHT as f32).ceil() as i32;
        (columns, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(800.0, 480.0);
    const LEVEL: Vec2 = Vec2::new(4000.0, 960.0);

    fn camera() -> Camera {
        Camera::new(VIEW, CameraTuning::default())
    }

    #[test]
    fn test_target_inside_margins_does_not_scroll() {
        let mut cam = camera();
        cam.follow(Vec2::new(400.0, 300.0), LEVEL);
        assert_eq!(cam.position, Vec2::ZERO);
    }

    #[test]
    fn test_scrolls_right_past_margin() {
        let mut cam = camera();
        // Right margin at 800 - 280 = 520
        cam.follow(Vec2::new(600.0, 300.0), LEVEL);
        assert_eq!(cam.position.x, 80.0);
        assert_eq!(cam.world_to_screen(Vec2::new(600.0, 300.0)).x, 520.0);
    }

    #[test]
    fn test_vertical_margins_are_asymmetric() {
        let mut cam = camera();
        cam.position.y = 200.0;
        // Bottom margin line at 200 + 480 - 48 = 632
        cam.follow(Vec2::new(400.0, 650.0), LEVEL);
        assert_eq!(cam.position.y, 218.0);
        // Top margin line at 218 + 144 = 362
        cam.follow(Vec2::new(400.0, 300.0), LEVEL);
        assert_eq!(cam.position.y, 156.0);
    }

    #[test]
    fn test_clamped_to_level_bounds() {
        let mut cam = camera();
        cam.follow(Vec2::new(-500.0, -500.0), LEVEL);
        assert_eq!(cam.position, Vec2::ZERO);
        cam.follow(Vec2::new(10_000.0, 10_000.0), LEVEL);
        assert_eq!(cam.position, LEVEL - VIEW);
    }

    #[test]
    fn test_small_level_pins_view() {
        let mut cam = camera();
        cam.follow(Vec2::new(700.0, 400.0), Vec2::new(400.0, 320.0));
        assert_eq!(cam.position, Vec2::ZERO);
    }

    #[test]
    fn test_visible_tiles() {
        let mut cam = camera();
        cam.position = Vec2::new(60.0, 16.0);
        let (columns, rows) = cam.visible_tiles();
        assert_eq!(columns, 1..22);
        assert_eq!(rows, 0..16);
    }
}
