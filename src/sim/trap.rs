//! Spinning, rising, falling and shooting traps
//!
//! The three contact variants hurt the character on every overlapping tick;
//! only the character's invulnerability window throttles them. Shooting traps
//! never touch the character themselves and fire a dart on a fixed timer.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{Circle, Facing, Rect};
use super::projectile::Projectile;
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
use crate::content::Tint;
use crate::error::LevelError;
use crate::tuning::{ProjectileSpec, TrapTuning};

/// Variant and animation phase of a trap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrapKind {
    /// Spinning blade; angle in degrees
    Static { angle: f32 },
    /// Spikes moving up out of their cell and back; offset in [-tile height, 0]
    Rising { offset: f32, direction: f32 },
    /// Block lifting out of its cell, resting one tile up, then dropping
    /// back; `phase` counts down from two tile heights to minus one
    Falling { phase: f32 },
    /// Dart launcher; seconds until the next shot
    Shooting { facing: Facing, cooldown: f32 },
}

impl TrapKind {
    /// Build a trap variant by name with a random starting phase
    ///
    /// Shooting traps fire on their first tick.
    pub fn from_name<R: Rng + ?Sized>(
        name: &str,
        facing: Option<Facing>,
        rng: &mut R,
    ) -> Result<Self, LevelError> {
        let travel = TILE_HEIGHT as f32;
        match name.to_ascii_lowercase().as_str() {
            "static" => Ok(TrapKind::Static {
                angle: rng.random_range(0.0..360.0),
            }),
            "rising" => Ok(TrapKind::Rising {
                offset: -rng.random_range(0.0..travel),
                direction: -1.0,
            }),
            "falling" => Ok(TrapKind::Falling {
                phase: -rng.random_range(0.0..travel),
            }),
            "shooting" => {
                let facing = facing.ok_or(LevelError::MissingAttribute {
                    record: "shooting trap",
                    attribute: "direction",
                })?;
                Ok(TrapKind::Shooting {
                    facing,
                    cooldown: 0.0,
                })
            }
            _ => Err(LevelError::UnknownTrap(name.to_string())),
        }
    }

    /// Vertical displacement from the trap's cell, always in [-tile height, 0]
    pub fn vertical_offset(&self) -> f32 {
        match self {
            TrapKind::Rising { offset, .. } => *offset,
            TrapKind::Falling { phase } if *phase <= 0.0 => *phase,
            TrapKind::Falling { phase } => -phase.min(TILE_HEIGHT as f32),
            TrapKind::Static { .. } | TrapKind::Shooting { .. } => 0.0,
        }
    }

    /// Table key of this variant
    pub fn name(&self) -> &'static str {
        match self {
            TrapKind::Static { .. } => "static",
            TrapKind::Rising { .. } => "rising",
            TrapKind::Falling { .. } => "falling",
            TrapKind::Shooting { .. } => "shooting",
        }
    }
}

/// Move `offset` by `direction * step`, reflecting off `[low, high]`
fn bounce(offset: &mut f32, direction: &mut f32, step: f32, low: f32, high: f32) {
    *offset += *direction * step;
    if *offset < low {
        *offset = (2.0 * low - *offset).min(high);
        *direction = 1.0;
    } else if *offset > high {
        *offset = (2.0 * high - *offset).max(low);
        *direction = -1.0;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    /// Top-left corner of the cell the trap was placed in
    pub origin: Vec2,
    pub damage: i32,
    pub tint: Tint,
}

impl Trap {
    pub fn new(kind: TrapKind, origin: Vec2, damage: i32, tint: Tint) -> Self {
        Self {
            kind,
            origin,
            damage,
            tint,
        }
    }

    fn cell_center(&self) -> Vec2 {
        self.origin + Vec2::new(TILE_WIDTH as f32, TILE_HEIGHT as f32) / 2.0
    }

    /// World rectangle the trap currently occupies
    pub fn bounding_rect(&self, tuning: &TrapTuning) -> Rect {
        let x = self.origin.x as i32;
        let y = self.origin.y as i32;
        match &self.kind {
            TrapKind::Static { .. } => {
                let c = self.cell_center();
                let half = tuning.static_size as f32 / 2.0;
                Rect::new(
                    (c.x - half) as i32,
                    (c.y - half) as i32,
                    tuning.static_size,
                    tuning.static_size,
                )
            }
            TrapKind::Rising { .. } | TrapKind::Falling { .. } => Rect::new(
                x,
                y + self.kind.vertical_offset().round() as i32,
                TILE_WIDTH,
                TILE_HEIGHT,
            ),
            TrapKind::Shooting { .. } => Rect::new(x, y, TILE_WIDTH, TILE_HEIGHT),
        }
    }

    /// Whether this trap hurts a body occupying `rect`
    pub fn touches(&self, rect: &Rect, tuning: &TrapTuning) -> bool {
        match &self.kind {
            TrapKind::Static { .. } => {
                Circle::new(self.cell_center(), tuning.static_size as f32 / 2.0).intersects(rect)
            }
            TrapKind::Rising { .. } | TrapKind::Falling { .. } => {
                self.bounding_rect(tuning).intersects(rect)
            }
            TrapKind::Shooting { .. } => false,
        }
    }

    /// Advance the animation phase; a shooting trap may return a dart
    pub fn update(
        &mut self,
        dt: f32,
        tuning: &TrapTuning,
        dart: &ProjectileSpec,
    ) -> Option<Projectile> {
        let travel = TILE_HEIGHT as f32;
        let step = tuning.rise_speed * dt;
        match &mut self.kind {
            TrapKind::Static { angle } => {
                *angle = (*angle + tuning.static_spin_speed * dt).rem_euclid(360.0);
                None
            }
            TrapKind::Rising { offset, direction } => {
                bounce(offset, direction, step, -travel, 0.0);
                None
            }
            TrapKind::Falling { phase } => {
                *phase -= step;
                if *phase <= -travel {
                    *phase = 2.0 * travel;
                }
                None
            }
            TrapKind::Shooting { facing, cooldown } => {
                *cooldown -= dt;
                if *cooldown > 0.0 {
                    return None;
                }
                *cooldown = tuning.shooting_cooldown_secs;

                let facing = *facing;
                let mid_x = self.origin.x + TILE_WIDTH as f32 / 2.0;
                let x = match facing {
                    Facing::Right => mid_x,
                    Facing::Left => mid_x - dart.width as f32,
                };
                let y = self.origin.y + (TILE_HEIGHT - dart.height) as f32 / 2.0;
                Some(Projectile::dart(Vec2::new(x, y), facing, self.damage, dart))
            }
        }
    }
}
