//! Thrown spears and trap darts

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{Facing, Rect};
use super::tile::{TileCollision, TileGrid};
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
use crate::tuning::ProjectileSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Thrown by the character
    Spear,
    /// Fired by a shooting trap
    Dart,
}

/// Which side a projectile can hurt; never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTarget {
    Enemies,
    Character,
}

/// A projectile flying horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Top-left corner
    pub position: Vec2,
    /// Signed horizontal speed
    pub velocity: f32,
    pub damage: i32,
    pub target: DamageTarget,
    width: i32,
    height: i32,
    /// Set on impact; compacted out after the sweep
    spent: bool,
}

impl Projectile {
    /// A spear thrown by the character; hurts enemies
    pub fn spear(position: Vec2, facing: Facing, spec: &ProjectileSpec) -> Self {
        Self::with_spec(
            ProjectileKind::Spear,
            DamageTarget::Enemies,
            position,
            facing,
            spec.damage,
            spec,
        )
    }

    /// A dart fired by a trap; hurts the character
    pub fn dart(position: Vec2, facing: Facing, damage: i32, spec: &ProjectileSpec) -> Self {
        Self::with_spec(
            ProjectileKind::Dart,
            DamageTarget::Character,
            position,
            facing,
            damage,
            spec,
        )
    }

    fn with_spec(
        kind: ProjectileKind,
        target: DamageTarget,
        position: Vec2,
        facing: Facing,
        damage: i32,
        spec: &ProjectileSpec,
    ) -> Self {
        Self {
            kind,
            position,
            velocity: spec.speed * facing.sign() as f32,
            damage,
            target,
            width: spec.width,
            height: spec.height,
            spent: false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub(crate) fn mark_spent(&mut self) {
        self.spent = true;
    }

    pub fn facing(&self) -> Facing {
        if self.velocity < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
            self.width,
            self.height,
        )
    }

    pub fn update(&mut self, dt: f32) {
        self.position.x += self.velocity * dt;
    }

    /// Whether the projectile has left the level or struck a solid cell
    pub fn is_blocked(&self, grid: &TileGrid) -> bool {
        let rect = self.bounding_rect();
        if !rect.intersects(&grid.pixel_bounds()) {
            return true;
        }

        let left = rect.left().div_euclid(TILE_WIDTH);
        let right = (rect.right() - 1).div_euclid(TILE_WIDTH);
        let top = rect.top().div_euclid(TILE_HEIGHT);
        let bottom = (rect.bottom() - 1).div_euclid(TILE_HEIGHT);
        (top..=bottom).any(|y| {
            (left..=right).any(|x| grid.collision_at(x, y) == TileCollision::Impassable)
        })
    }
}
