//! Entity collections and their per-tick interactions
//!
//! Items and projectiles are flagged during a sweep and compacted after it,
//! so every entity in a collection is visited exactly once per tick. Dead
//! enemies stay in storage and are skipped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::character::{Character, DeathCause};
use super::enemy::Enemy;
use super::item::{Item, ItemKind};
use super::level::{LevelEvent, Scoreboard};
use super::projectile::{DamageTarget, Projectile};
use super::tile::TileGrid;
use super::trap::Trap;
use crate::tuning::{EnemyTuning, ItemTuning, Tuning};

/// Owns every dynamic entity except the character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityManager {
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub traps: Vec<Trap>,
    pub projectiles: Vec<Projectile>,
}

/// Damage the character, reporting the hit if it landed
fn hurt_character(character: &mut Character, amount: i32, events: &mut Vec<LevelEvent>) -> bool {
    if !character.hurt(amount) {
        return false;
    }
    events.push(LevelEvent::CharacterHurt {
        amount,
        health: character.health(),
    });
    true
}

/// Apply a collected item's effect
fn apply_item(
    item: &Item,
    character: &mut Character,
    board: &mut Scoreboard,
    events: &mut Vec<LevelEvent>,
) {
    board.score += item.points as i64;
    match &item.kind {
        ItemKind::Gem => {}
        ItemKind::TimeBonus { bonus_ms } => {
            board.time_remaining = board
                .time_remaining
                .saturating_add(Duration::from_millis(*bonus_ms));
        }
        ItemKind::HealthPack { heal, max_heal } => {
            let max = character.max_health();
            let amount = heal.resolve(max);
            let max_increase = max_heal.resolve(max);
            if amount < 0 {
                character.poison(amount, max_increase);
                events.push(LevelEvent::Poisoned { amount });
            } else {
                character.heal(amount, max_increase);
                events.push(LevelEvent::Healed {
                    amount,
                    max_increase,
                });
            }
        }
    }
    events.push(LevelEvent::ItemCollected {
        kind: item.kind.clone(),
        points: item.points,
    });
}

impl EntityManager {
    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    /// Bob every item and collect the ones touching the character
    pub fn update_items(
        &mut self,
        total_time: f32,
        character: &mut Character,
        board: &mut Scoreboard,
        tuning: &ItemTuning,
        events: &mut Vec<LevelEvent>,
    ) {
        let rect = character.bounding_rect();
        for item in self.items.iter_mut() {
            item.update(total_time, tuning);
            if character.is_alive() && item.bounding_circle(tuning).intersects(&rect) {
                apply_item(item, character, board, events);
                item.mark_collected();
            }
        }
        self.items.retain(|item| !item.is_collected());
    }

    /// Animate traps, fire darts and apply contact damage
    pub fn update_traps(
        &mut self,
        dt: f32,
        character: &mut Character,
        tuning: &Tuning,
        events: &mut Vec<LevelEvent>,
    ) {
        let rect = character.bounding_rect();
        for (i, trap) in self.traps.iter_mut().enumerate() {
            if let Some(dart) = trap.update(dt, &tuning.trap, &tuning.projectile.dart) {
                self.projectiles.push(dart);
                events.push(LevelEvent::DartFired { trap: i });
            }
            if character.is_alive() && trap.touches(&rect, &tuning.trap) {
                hurt_character(character, trap.damage, events);
            }
        }
    }

    /// Patrol enemies and apply contact damage
    ///
    /// A hit that drives health below zero ends the sweep.
    pub fn update_enemies(
        &mut self,
        grid: &TileGrid,
        dt: f32,
        character: &mut Character,
        tuning: &EnemyTuning,
        events: &mut Vec<LevelEvent>,
    ) {
        for (i, enemy) in self.enemies.iter_mut().enumerate() {
            if !enemy.is_alive() {
                continue;
            }
            enemy.update(grid, dt, tuning);

            if !character.is_alive()
                || !enemy.bounding_rect().intersects(&character.bounding_rect())
            {
                continue;
            }
            // Only a hit that overshoots zero is credited to the enemy
            if hurt_character(character, enemy.damage, events) && character.health() < 0 {
                character.kill(DeathCause::Enemy(i));
                break;
            }
        }
    }

    /// Fly projectiles and resolve their first hit
    pub fn update_projectiles(
        &mut self,
        grid: &TileGrid,
        dt: f32,
        character: &mut Character,
        board: &mut Scoreboard,
        events: &mut Vec<LevelEvent>,
    ) {
        for projectile in self.projectiles.iter_mut() {
            projectile.update(dt);
            if projectile.is_blocked(grid) {
                projectile.mark_spent();
                continue;
            }

            let rect = projectile.bounding_rect();
            match projectile.target {
                DamageTarget::Enemies => {
                    let hit = self
                        .enemies
                        .iter_mut()
                        .enumerate()
                        .find(|(_, e)| e.is_alive() && e.bounding_rect().intersects(&rect));
                    if let Some((i, enemy)) = hit {
                        enemy.health -= projectile.damage;
                        projectile.mark_spent();
                        if !enemy.is_alive() {
                            board.score += enemy.points_on_death as i64;
                            events.push(LevelEvent::EnemyKilled {
                                enemy: i,
                                points: enemy.points_on_death,
                            });
                            log::debug!("{} killed by {:?}", enemy.name, projectile.kind);
                        }
                    }
                }
                DamageTarget::Character => {
                    if character.is_alive() && character.bounding_rect().intersects(&rect) {
                        hurt_character(character, projectile.damage, events);
                        projectile.mark_spent();
                    }
                }
            }
        }
        self.projectiles.retain(|p| !p.is_spent());
    }
}
