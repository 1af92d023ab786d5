//! Patrolling enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::body_rect;
use super::geom::{Facing, Rect};
use super::tile::{TileCollision, TileGrid};
use crate::content::Tint;
use crate::tuning::EnemyTuning;

/// A monster walking back and forth along its ledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Content table name, e.g. "Zombie"
    pub name: String,
    /// Feet position
    pub position: Vec2,
    pub health: i32,
    pub damage: i32,
    pub points_on_death: i32,
    pub tint: Tint,
    pub facing: Facing,
    /// Seconds left before turning around
    wait_time: f32,
    local_bounds: Rect,
}

impl Enemy {
    pub fn new(
        name: impl Into<String>,
        position: Vec2,
        health: i32,
        damage: i32,
        points_on_death: i32,
        tint: Tint,
        tuning: &EnemyTuning,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            health,
            damage,
            points_on_death,
            tint,
            facing: Facing::Left,
            wait_time: 0.0,
            local_bounds: tuning.local_bounds,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_time > 0.0
    }

    pub fn bounding_rect(&self) -> Rect {
        body_rect(self.position, self.local_bounds)
    }

    /// Walk forward, or wait and turn at a wall or a drop
    pub fn update(&mut self, grid: &TileGrid, dt: f32, tuning: &EnemyTuning) {
        let dir = self.facing.sign();

        // Leading edge of the body, in tiles
        let lead_x = self.position.x + (self.local_bounds.width / 2 * dir) as f32;
        let (lead_cell, tile_y) = grid.cell_at(lead_x, self.position.y);
        let tile_x = lead_cell - dir;

        if self.wait_time > 0.0 {
            self.wait_time = (self.wait_time - dt).max(0.0);
            if self.wait_time <= 0.0 {
                self.facing = self.facing.flipped();
            }
        } else if grid.collision_at(tile_x + dir, tile_y - 1) == TileCollision::Impassable
            || grid.collision_at(tile_x + dir, tile_y) == TileCollision::Passable
        {
            self.wait_time = tuning.max_wait_secs;
        } else {
            self.position.x += dir as f32 * tuning.move_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SIM_DT, TILE_WIDTH};

    /// Ledge of columns 5..=12 on row 10; wall at column 13 on row 9
    fn ledge_grid() -> TileGrid {
        TileGrid::from_fn(20, 15, |x, y| match (x, y) {
            (5..=12, 10) => TileCollision::Impassable,
            (13, 9) => TileCollision::Impassable,
            _ => TileCollision::Passable,
        })
    }

    fn enemy_at(x: f32) -> Enemy {
        Enemy::new(
            "Zombie",
            Vec2::new(x, 320.0),
            80,
            20,
            40,
            Tint::WHITE,
            &EnemyTuning::default(),
        )
    }

    #[test]
    fn test_walks_forward_on_solid_ground() {
        let grid = ledge_grid();
        let mut enemy = enemy_at(300.0);
        enemy.update(&grid, 0.5, &EnemyTuning::default());
        assert_eq!(enemy.position.x, 268.0);
        assert!(!enemy.is_waiting());
    }

    #[test]
    fn test_waits_at_drop_then_turns() {
        let grid = ledge_grid();
        let tuning = EnemyTuning::default();
        let mut enemy = enemy_at(300.0);
        let mut turned_at = None;
        for i in 0..600 {
            enemy.update(&grid, SIM_DT, &tuning);
            if enemy.facing == Facing::Right {
                turned_at = Some(i);
                break;
            }
        }
        assert!(turned_at.is_some());
        // Never walked off the ledge (left edge of column 5 is x = 200)
        assert!(enemy.position.x >= 200.0);
    }

    #[test]
    fn test_turns_at_wall() {
        let grid = ledge_grid();
        let tuning = EnemyTuning::default();
        let mut enemy = enemy_at(480.0);
        enemy.facing = Facing::Right;
        for _ in 0..600 {
            enemy.update(&grid, SIM_DT, &tuning);
            if enemy.facing == Facing::Left {
                break;
            }
        }
        assert_eq!(enemy.facing, Facing::Left);
        // Feet stay short of the wall column
        assert!(enemy.position.x < (13 * TILE_WIDTH) as f32);
    }

    #[test]
    fn test_alive_while_health_positive() {
        let mut enemy = enemy_at(300.0);
        assert!(enemy.is_alive());
        enemy.health = 0;
        assert!(!enemy.is_alive());
    }
}
