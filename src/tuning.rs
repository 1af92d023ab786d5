//! Data-driven game balance
//!
//! Every constant the simulation reads lives here. Defaults reproduce the
//! classic feel; a caller can deserialize overrides from JSON and pass the
//! result by reference into level construction.

use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;

/// Character movement, jump and timer constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    /// Bounding rectangle relative to the rounded feet position
    pub local_bounds: Rect,
    pub move_acceleration: f32,
    pub max_move_speed: f32,
    pub ground_drag: f32,
    pub air_drag: f32,

    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Negative: Y grows downward
    pub jump_launch_velocity: f32,
    /// Seconds of ascent before gravity takes over
    pub max_jump_time: f32,
    /// Exponent of the ascent power curve
    pub jump_control_power: f32,

    /// Seconds of damage immunity after a hit
    pub invulnerability_secs: f32,
    /// Seconds the heal visual stays armed
    pub heal_effect_secs: f32,

    /// Seconds between thrown spears
    pub throw_cooldown_secs: f32,
    /// Score spent per thrown spear
    pub throw_cost: i64,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            local_bounds: Rect::new(-13, -51, 25, 51),
            move_acceleration: 14000.0,
            max_move_speed: 2000.0,
            ground_drag: 0.58,
            air_drag: 0.65,

            gravity: 3500.0,
            max_fall_speed: 600.0,
            jump_launch_velocity: -4000.0,
            max_jump_time: 0.35,
            jump_control_power: 0.14,

            invulnerability_secs: 2.0,
            heal_effect_secs: 2.0,

            throw_cooldown_secs: 1.0,
            throw_cost: 100,
        }
    }
}

/// Level-wide scoring and time rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Budget used when a descriptor doesn't carry one
    pub default_time_secs: f64,
    /// Points awarded per second of remaining time drained after the exit
    pub points_per_second: i64,
    /// Seconds of remaining time drained per real second after the exit
    pub exit_drain_speed: f32,
    /// Seconds subtracted by starting a new life
    pub new_life_penalty_secs: u64,
    /// Fraction of max health restored by starting a new life
    pub new_life_heal_fraction: f32,
    /// Starting health/max health for a fresh session
    pub starting_health: i32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            default_time_secs: 60.0,
            points_per_second: 5,
            exit_drain_speed: 100.0,
            new_life_penalty_secs: 15,
            new_life_heal_fraction: 0.1,
            starting_health: 100,
        }
    }
}

/// Enemy patrol behaviour and shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub local_bounds: Rect,
    pub move_speed: f32,
    /// Seconds spent waiting at a ledge or wall before turning
    pub max_wait_secs: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            local_bounds: Rect::new(-11, -44, 22, 44),
            move_speed: 64.0,
            max_wait_secs: 0.5,
        }
    }
}

/// Item bobbing and pickup radius
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    /// Pickup circle radius as a fraction of the tile width
    pub radius_tile_fraction: f32,
    pub bounce_height: f32,
    pub bounce_rate: f32,
    pub bounce_sync: f32,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            radius_tile_fraction: 1.0 / 3.0,
            bounce_height: 0.18 * 32.0,
            bounce_rate: 3.0,
            bounce_sync: -0.75,
        }
    }
}

/// Trap animation and shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapTuning {
    /// Side of the square spinning trap
    pub static_size: i32,
    /// Degrees per second
    pub static_spin_speed: f32,
    /// Units per second of the rise/fall offset
    pub rise_speed: f32,
    /// Seconds between darts
    pub shooting_cooldown_secs: f32,
}

impl Default for TrapTuning {
    fn default() -> Self {
        Self {
            static_size: 32,
            static_spin_speed: 100.0,
            rise_speed: 25.0,
            shooting_cooldown_secs: 3.75,
        }
    }
}

/// Shape and speed of one projectile kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub damage: i32,
    pub width: i32,
    pub height: i32,
}

/// Thrown and trap-fired projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub spear: ProjectileSpec,
    pub dart: ProjectileSpec,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            spear: ProjectileSpec {
                speed: 500.0,
                damage: 10,
                width: 32,
                height: 8,
            },
            dart: ProjectileSpec {
                speed: 300.0,
                damage: 10,
                width: 20,
                height: 6,
            },
        }
    }
}

/// Camera margins as fractions of the viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub view_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            view_margin: 0.35,
            top_margin: 0.3,
            bottom_margin: 0.1,
        }
    }
}

/// All tunable constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub character: CharacterTuning,
    pub level: LevelTuning,
    pub enemy: EnemyTuning,
    pub item: ItemTuning,
    pub trap: TrapTuning,
    pub projectile: ProjectileTuning,
    pub camera: CameraTuning,
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, crate::LevelError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "level": { "points_per_second": 7 } }"#).unwrap();
        assert_eq!(tuning.level.points_per_second, 7);
        assert_eq!(tuning.level.new_life_penalty_secs, 15);
        assert_eq!(tuning.character.max_jump_time, 0.35);
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.character.local_bounds, Rect::new(-13, -51, 25, 51));
        assert_eq!(back.projectile.dart.speed, 300.0);
    }
}
