//! Fixed timestep simulation tick
//!
//! Advances a level deterministically: the same level fed the same inputs and
//! step sizes always ends in the same state.

use std::time::Duration;

use super::character::{CharacterInput, DeathCause};
use super::level::{Level, LevelEvent};
use super::projectile::Projectile;

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement axis in [-1, 1]
    pub movement: f32,
    /// Jump held
    pub jump: bool,
    /// Throw pressed this tick
    pub throw: bool,
}

/// Advance the level by one timestep
pub fn tick(level: &mut Level, input: &TickInput, dt: f32) {
    let was_alive = level.character.is_alive();

    if !was_alive || level.board.time_remaining.is_zero() {
        // Entities freeze; the body still falls and collides
        level
            .character
            .apply_physics(&level.grid, &CharacterInput::default(), dt);
    } else if level.reached_exit {
        score_remaining_time(level, dt);
    } else {
        play(level, input, dt);
    }

    level.character.clamp_health();
    if was_alive && !level.character.is_alive() {
        let cause = level.character.death_cause().unwrap_or(DeathCause::Injury);
        level.events.push(LevelEvent::CharacterKilled { cause });
    }
}

/// Drain whole seconds of remaining time into score
fn score_remaining_time(level: &mut Level, dt: f32) {
    let remaining = level.board.time_remaining;
    let whole_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    let drained = ((dt * level.tuning.level.exit_drain_speed).round().max(0.0) as u64)
        .min(whole_secs);

    level.board.time_remaining = remaining.saturating_sub(Duration::from_secs(drained));
    level.board.score += drained as i64 * level.tuning.level.points_per_second;
}

/// Normal play: time, throw, character, entities, then fall and exit checks
fn play(level: &mut Level, input: &TickInput, dt: f32) {
    let step = Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or_default();
    level.board.time_remaining = level.board.time_remaining.saturating_sub(step);
    level.elapsed += dt;

    if input.throw {
        throw_spear(level);
    }

    let character_input = CharacterInput {
        movement: input.movement,
        jump: input.jump,
    };
    if level.character.update(&level.grid, &character_input, dt) {
        level.events.push(LevelEvent::Jumped);
    }

    level.entities.update_items(
        level.elapsed,
        &mut level.character,
        &mut level.board,
        &level.tuning.item,
        &mut level.events,
    );
    level.entities.update_traps(
        dt,
        &mut level.character,
        &level.tuning,
        &mut level.events,
    );
    level.entities.update_enemies(
        &level.grid,
        dt,
        &mut level.character,
        &level.tuning.enemy,
        &mut level.events,
    );
    level.entities.update_projectiles(
        &level.grid,
        dt,
        &mut level.character,
        &mut level.board,
        &mut level.events,
    );

    // Fell off the bottom of the level
    if level.character.is_alive()
        && level.character.bounding_rect().top() >= level.grid.pixel_bounds().bottom()
    {
        level.character.kill(DeathCause::Fell);
    }

    check_exits(level);
}

/// Spend score on a spear when the cooldown allows it
fn throw_spear(level: &mut Level) {
    let cost = level.tuning.character.throw_cost;
    if level.board.score < cost || !level.character.can_throw() {
        return;
    }
    level.board.score -= cost;

    let (position, facing) = level.character.throw();
    level.entities.spawn_projectile(Projectile::spear(
        position,
        facing,
        &level.tuning.projectile.spear,
    ));
    level.events.push(LevelEvent::SpearThrown { cost });
}

fn check_exits(level: &mut Level) {
    if !level.character.is_alive() || !level.character.is_grounded() {
        return;
    }
    let rect = level.character.bounding_rect();
    let Some(exit) = level.exits().iter().find(|e| rect.contains(e.center)) else {
        return;
    };

    let destination = exit.destination.clone();
    log::info!(
        "Exit reached in '{}' with {:.1}s left, next: {:?}",
        level.name(),
        level.board.time_remaining.as_secs_f32(),
        destination
    );
    level.reached_exit = true;
    level.next_level = destination.clone();
    level.events.push(LevelEvent::ExitReached { destination });
}
