//! The controllable character
//!
//! A feet-anchored physics body with independent timers for jump ascent,
//! invulnerability, the heal visual and the throw cooldown. States are not
//! mutually exclusive: a character can be airborne, ascending, invulnerable
//! and healing in the same tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{body_rect, resolve_tile_collisions};
use super::geom::{Facing, Rect};
use super::tile::TileGrid;
use crate::tuning::CharacterTuning;

/// Movement intent for one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterInput {
    /// Horizontal axis in [-1, 1]
    pub movement: f32,
    /// Jump button held
    pub jump: bool,
}

/// What ended the character's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Contact with the enemy at this index
    Enemy(usize),
    /// Dropped below the bottom of the grid
    Fell,
    /// Health ran out from traps, projectiles or poison
    Injury,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub position: Vec2,
    pub velocity: Vec2,
    health: i32,
    max_health: i32,
    alive: bool,
    grounded: bool,
    /// Bottom edge of the last resolved rectangle
    previous_bottom: i32,
    /// Jump intent for the current tick; cleared when a wall is hit
    jumping: bool,
    was_jumping: bool,
    /// Seconds into the current ascent (0 = not ascending)
    jump_time: f32,
    invulnerable_timer: f32,
    heal_timer: f32,
    throw_timer: f32,
    death_cause: Option<DeathCause>,
    tuning: CharacterTuning,
}

impl Character {
    pub fn new(position: Vec2, health: i32, max_health: i32, tuning: CharacterTuning) -> Self {
        let mut character = Self {
            position,
            velocity: Vec2::ZERO,
            health,
            max_health: max_health.max(1),
            alive: true,
            grounded: false,
            previous_bottom: 0,
            jumping: false,
            was_jumping: false,
            jump_time: 0.0,
            invulnerable_timer: 0.0,
            heal_timer: 0.0,
            throw_timer: 0.0,
            death_cause: None,
            tuning,
        };
        character.reset(position);
        character
    }

    /// Bring the character (back) to life at `position`
    ///
    /// Health and score are untouched; only the body is reset.
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.alive = true;
        self.grounded = false;
        self.jumping = false;
        self.was_jumping = false;
        self.jump_time = 0.0;
        self.death_cause = None;
        self.previous_bottom = self.bounding_rect().bottom();
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Jump intent of the current tick (for animation)
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_ascending(&self) -> bool {
        self.jump_time > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    pub fn is_healing(&self) -> bool {
        self.heal_timer > 0.0
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    /// Rectangle which bounds this character in world space
    pub fn bounding_rect(&self) -> Rect {
        body_rect(self.position, self.tuning.local_bounds)
    }

    /// Clamp health into [0, max]; empty health ends the life
    pub fn clamp_health(&mut self) {
        if self.health <= 0 {
            self.health = 0;
            if self.alive {
                self.alive = false;
                self.death_cause.get_or_insert(DeathCause::Injury);
            }
        }
        if self.health > self.max_health {
            self.health = self.max_health;
        }
    }

    /// Full per-tick update while the level is being played
    ///
    /// Returns true when a jump began this tick.
    pub fn update(&mut self, grid: &TileGrid, input: &CharacterInput, dt: f32) -> bool {
        self.clamp_health();

        if self.throw_timer > 0.0 {
            self.throw_timer -= dt;
        }
        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer -= dt;
        }
        if self.heal_timer > 0.0 {
            self.heal_timer -= dt;
        }

        self.apply_physics(grid, input, dt)
    }

    /// Velocity and position update from input, gravity and collision
    ///
    /// Returns true when a jump began this tick.
    pub fn apply_physics(&mut self, grid: &TileGrid, input: &CharacterInput, dt: f32) -> bool {
        let t = &self.tuning;
        let previous_position = self.position;
        let movement = input.movement.clamp(-1.0, 1.0);
        self.jumping = input.jump;

        self.velocity.x += movement * t.move_acceleration * dt;
        self.velocity.y =
            (self.velocity.y + t.gravity * dt).clamp(-t.max_fall_speed, t.max_fall_speed);

        let jumped = self.do_jump(dt);

        // Pseudo-drag
        self.velocity.x *= if self.grounded {
            self.tuning.ground_drag
        } else {
            self.tuning.air_drag
        };
        self.velocity.x = self
            .velocity
            .x
            .clamp(-self.tuning.max_move_speed, self.tuning.max_move_speed);

        self.position += self.velocity * dt;
        self.position = self.position.round();

        let result = resolve_tile_collisions(
            grid,
            self.position,
            self.tuning.local_bounds,
            self.previous_bottom,
        );
        self.position = result.position;
        self.grounded = result.grounded;
        self.previous_bottom = result.previous_bottom;
        if result.hit_wall {
            self.jumping = false;
        }

        // Collision absorbed the motion
        if self.position.x == previous_position.x {
            self.velocity.x = 0.0;
        }
        if self.position.y == previous_position.y {
            self.velocity.y = 0.0;
        }

        jumped
    }

    /// Override vertical velocity with the ascent power curve while a jump is held
    fn do_jump(&mut self, dt: f32) -> bool {
        let mut jumped = false;
        if self.jumping {
            // Begin or continue a jump
            if (!self.was_jumping && self.grounded) || self.jump_time > 0.0 {
                jumped = self.jump_time == 0.0;
                self.jump_time += dt;
            }

            if self.jump_time > 0.0 && self.jump_time <= self.tuning.max_jump_time {
                let progress = self.jump_time / self.tuning.max_jump_time;
                self.velocity.y = self.tuning.jump_launch_velocity
                    * (1.0 - progress.powf(self.tuning.jump_control_power));
            } else {
                // Apex reached
                self.jump_time = 0.0;
            }
        } else {
            self.jump_time = 0.0;
        }
        self.was_jumping = self.jumping;
        jumped
    }

    /// Apply damage unless invulnerable. Returns true if health changed.
    pub fn hurt(&mut self, amount: i32) -> bool {
        if self.invulnerable_timer > 0.0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_timer = self.tuning.invulnerability_secs;
        if self.health <= 0 && self.alive {
            self.alive = false;
            self.death_cause.get_or_insert(DeathCause::Injury);
        }
        true
    }

    /// Restore health and raise max health; clamped on the next tick
    pub fn heal(&mut self, amount: i32, max_increase: i32) {
        self.health = self.health.saturating_add(amount);
        self.max_health = self.max_health.saturating_add(max_increase).max(1);
        self.heal_timer = self.tuning.heal_effect_secs;
    }

    /// Negative heal: subtracts without invulnerability protection
    pub fn poison(&mut self, amount: i32, max_change: i32) {
        self.health = self.health.saturating_add(amount);
        self.max_health = self.max_health.saturating_add(max_change).max(1);
    }

    /// End the life immediately
    pub fn kill(&mut self, cause: DeathCause) {
        self.health = 0;
        self.alive = false;
        self.death_cause = Some(cause);
        log::info!("Character killed: {:?}", cause);
    }

    /// Whether the throw cooldown has elapsed
    pub fn can_throw(&self) -> bool {
        self.alive && self.throw_timer <= 0.0
    }

    /// Start the throw cooldown and return the spear's spawn point and direction
    pub fn throw(&mut self) -> (Vec2, Facing) {
        self.throw_timer = self.tuning.throw_cooldown_secs;
        let bounds = self.bounding_rect();
        let facing = if self.velocity.x >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };
        let x = bounds.left() + bounds.width * facing.sign();
        (Vec2::new(x as f32, bounds.top() as f32), facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tile::TileCollision;
    use proptest::prelude::*;

    /// Floor of impassable tiles along row 10 (top edge at y = 320)
    fn floor_grid() -> TileGrid {
        TileGrid::from_fn(20, 15, |_, y| {
            if y == 10 {
                TileCollision::Impassable
            } else {
                TileCollision::Passable
            }
        })
    }

    fn standing_character() -> Character {
        Character::new(Vec2::new(300.0, 320.0), 100, 100, CharacterTuning::default())
    }

    fn settle(character: &mut Character, grid: &TileGrid) {
        for _ in 0..10 {
            character.update(grid, &CharacterInput::default(), SIM_DT);
        }
    }

    #[test]
    fn test_resting_on_floor_converges_to_grounded() {
        let grid = floor_grid();
        let mut character = standing_character();
        settle(&mut character, &grid);
        assert!(character.is_grounded());
        assert_eq!(character.velocity.y, 0.0);
        assert_eq!(character.position.y, 320.0);
    }

    #[test]
    fn test_scenario_hurt_during_invulnerability() {
        let grid = floor_grid();
        let mut character = standing_character();
        settle(&mut character, &grid);

        assert!(character.hurt(30));
        assert_eq!(character.health(), 70);
        assert!(!character.hurt(30));
        assert_eq!(character.health(), 70);
        assert!(character.is_invulnerable());
    }

    #[test]
    fn test_hurt_lands_again_after_window() {
        let grid = floor_grid();
        let mut character = standing_character();
        character.hurt(10);
        // 2 seconds of ticks plus one
        for _ in 0..121 {
            character.update(&grid, &CharacterInput::default(), SIM_DT);
        }
        assert!(!character.is_invulnerable());
        assert!(character.hurt(10));
        assert_eq!(character.health(), 80);
    }

    #[test]
    fn test_lethal_hurt_ends_life() {
        let mut character = standing_character();
        character.hurt(150);
        assert!(!character.is_alive());
        assert_eq!(character.death_cause(), Some(DeathCause::Injury));
        character.clamp_health();
        assert_eq!(character.health(), 0);
    }

    #[test]
    fn test_heal_clamps_next_tick_and_raises_max() {
        let grid = floor_grid();
        let mut character = standing_character();
        character.hurt(50);
        character.heal(80, 10);
        assert_eq!(character.health(), 130);
        assert_eq!(character.max_health(), 110);
        assert!(character.is_healing());
        character.update(&grid, &CharacterInput::default(), SIM_DT);
        assert_eq!(character.health(), 110);
    }

    #[test]
    fn test_poison_ignores_invulnerability() {
        let mut character = standing_character();
        character.hurt(10);
        character.poison(-20, 0);
        assert_eq!(character.health(), 70);
        assert!(!character.is_healing());
    }

    #[test]
    fn test_extreme_heal_and_poison_saturate() {
        let grid = floor_grid();
        let mut character = standing_character();
        character.heal(i32::MAX, i32::MAX);
        assert_eq!(character.health(), i32::MAX);
        assert_eq!(character.max_health(), i32::MAX);
        character.update(&grid, &CharacterInput::default(), SIM_DT);
        assert_eq!(character.health(), i32::MAX);

        character.poison(i32::MIN, i32::MIN);
        assert_eq!(character.max_health(), 1);
        character.update(&grid, &CharacterInput::default(), SIM_DT);
        assert_eq!(character.health(), 0);
        assert!(!character.is_alive());
    }

    #[test]
    fn test_jump_rises_then_falls_back() {
        let grid = floor_grid();
        let mut character = standing_character();
        settle(&mut character, &grid);

        let hold = CharacterInput {
            movement: 0.0,
            jump: true,
        };
        assert!(character.update(&grid, &hold, SIM_DT));
        assert!(character.is_ascending());
        assert!(character.velocity.y < 0.0);

        let mut apex = character.position.y;
        for _ in 0..60 {
            character.update(&grid, &hold, SIM_DT);
            apex = apex.min(character.position.y);
        }
        assert!(apex < 320.0 - 32.0);
        // Holding jump on landing does not start a new jump
        assert!(character.is_grounded());
        assert!(!character.is_ascending());
    }

    #[test]
    fn test_releasing_jump_early_lowers_apex() {
        let grid = floor_grid();
        let hold = CharacterInput {
            movement: 0.0,
            jump: true,
        };

        let apex_for = |hold_ticks: usize| {
            let mut character = standing_character();
            settle(&mut character, &grid);
            let mut apex = character.position.y;
            for i in 0..90 {
                let input = if i < hold_ticks {
                    hold
                } else {
                    CharacterInput::default()
                };
                character.update(&grid, &input, SIM_DT);
                apex = apex.min(character.position.y);
            }
            apex
        };

        let short = apex_for(3);
        let long = apex_for(30);
        assert!(long < short);
    }

    #[test]
    fn test_running_into_wall_stops_horizontal_velocity() {
        let grid = TileGrid::from_fn(20, 15, |x, y| {
            if y == 10 || x == 10 {
                TileCollision::Impassable
            } else {
                TileCollision::Passable
            }
        });
        let mut character = standing_character();
        let right = CharacterInput {
            movement: 1.0,
            jump: false,
        };
        for _ in 0..120 {
            character.update(&grid, &right, SIM_DT);
        }
        assert!(character.bounding_rect().right() <= 400);
        assert_eq!(character.velocity.x, 0.0);
    }

    #[test]
    fn test_throw_spawns_ahead_and_starts_cooldown() {
        let mut character = standing_character();
        assert!(character.can_throw());
        let (pos, facing) = character.throw();
        assert_eq!(facing, Facing::Right);
        let bounds = character.bounding_rect();
        assert_eq!(pos, Vec2::new((bounds.left() + bounds.width) as f32, bounds.top() as f32));
        assert!(!character.can_throw());
    }

    proptest! {
        #[test]
        fn prop_health_clamped_after_update(
            damage in -200i32..300,
            heal in -200i32..300,
            max_increase in -50i32..50,
        ) {
            let grid = floor_grid();
            let mut character = standing_character();
            character.hurt(damage);
            if heal >= 0 {
                character.heal(heal, max_increase);
            } else {
                character.poison(heal, max_increase);
            }
            character.update(&grid, &CharacterInput::default(), SIM_DT);
            prop_assert!(character.health() >= 0);
            prop_assert!(character.health() <= character.max_health());
        }

        #[test]
        fn prop_identical_inputs_give_identical_trajectories(
            inputs in proptest::collection::vec((-1.0f32..=1.0, any::<bool>()), 1..120),
        ) {
            let grid = floor_grid();
            let mut a = standing_character();
            let mut b = standing_character();
            for (movement, jump) in inputs {
                let input = CharacterInput { movement, jump };
                a.update(&grid, &input, SIM_DT);
                b.update(&grid, &input, SIM_DT);
                prop_assert_eq!(a.position, b.position);
                prop_assert_eq!(a.velocity, b.velocity);
                prop_assert_eq!(a.is_ascending(), b.is_ascending());
                prop_assert_eq!(a.is_grounded(), b.is_grounded());
            }
        }
    }
}
