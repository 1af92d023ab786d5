//! Level state
//!
//! Owns the grid, the character, every entity collection, the score and the
//! time budget. Built once from a descriptor; `tick` advances it.

use std::time::Duration;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::character::{Character, DeathCause};
use super::enemy::Enemy;
use super::entities::EntityManager;
use super::item::{Item, ItemKind};
use super::tile::{Tile, TileCollision, TileGrid};
use super::trap::{Trap, TrapKind};
use crate::consts::{LOW_TIME_WARNING_SECS, MIN_LEVEL_HEIGHT, MIN_LEVEL_WIDTH};
use crate::content::{ContentTables, Tint};
use crate::descriptor::{ItemFamily, LevelDescriptor, parse_location};
use crate::error::LevelError;
use crate::tuning::Tuning;

/// Score and remaining time, updated together by items and exit scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// May dip below zero after paying for a throw
    pub score: i64,
    pub time_remaining: Duration,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    Jumped,
    CharacterHurt { amount: i32, health: i32 },
    Healed { amount: i32, max_increase: i32 },
    Poisoned { amount: i32 },
    ItemCollected { kind: ItemKind, points: i32 },
    SpearThrown { cost: i64 },
    DartFired { trap: usize },
    EnemyKilled { enemy: usize, points: i32 },
    CharacterKilled { cause: DeathCause },
    ExitReached { destination: Option<String> },
    NewLife,
}

/// Which branch of the master tick the level is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    PlayerDead,
    TimeExpired,
    /// Remaining time is being converted into score
    ReachedExit,
}

/// How a finished level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Exit reached and the remaining time fully scored
    Won,
    TimeUp,
    Died,
}

/// An exit trigger point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    /// Center of the exit cell in world units
    pub center: IVec2,
    pub destination: Option<String>,
}

/// A weighted spawn candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    pub position: Vec2,
    pub weight: u32,
}

/// State kept from one level to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryOver {
    pub score: i64,
    pub health: i32,
    pub max_health: i32,
}

impl CarryOver {
    /// Full health and no score
    pub fn fresh(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            health: tuning.level.starting_health,
            max_health: tuning.level.starting_health,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    name: String,
    pub(crate) grid: TileGrid,
    pub(crate) character: Character,
    pub(crate) entities: EntityManager,
    pub(crate) board: Scoreboard,
    exits: Vec<Exit>,
    starts: Vec<StartPoint>,
    /// Start point chosen at load; every new life begins here
    start: Vec2,
    pub(crate) reached_exit: bool,
    pub(crate) next_level: Option<String>,
    /// Seconds of normal play, drives item bobbing
    pub(crate) elapsed: f32,
    pub(crate) events: Vec<LevelEvent>,
    pub(crate) tuning: Tuning,
}

/// Parse a location and make sure it names a grid cell
fn grid_cell(grid: &TileGrid, location: &str) -> Result<(i32, i32), LevelError> {
    let (x, y) = parse_location(location)?;
    if grid.tile(x, y).is_none() {
        return Err(LevelError::OutOfBounds { x, y });
    }
    Ok((x, y))
}

/// Entities may not be embedded in solid tiles
fn reachable(grid: &TileGrid, what: &'static str, x: i32, y: i32) -> Result<(), LevelError> {
    if grid.collision_at(x, y) == TileCollision::Impassable {
        return Err(LevelError::Unreachable { what, x, y });
    }
    Ok(())
}

impl Level {
    /// Build a level from a descriptor
    ///
    /// Any validation failure aborts the whole load.
    pub fn load<R: Rng + ?Sized>(
        desc: &LevelDescriptor,
        tables: &ContentTables,
        tuning: &Tuning,
        carry: CarryOver,
        rng: &mut R,
    ) -> Result<Self, LevelError> {
        if desc.width < MIN_LEVEL_WIDTH || desc.height < MIN_LEVEL_HEIGHT {
            return Err(LevelError::GridTooSmall {
                width: desc.width,
                height: desc.height,
            });
        }
        let mut grid = TileGrid::new(desc.width, desc.height);

        for record in &desc.tiles {
            let (x, y) = grid_cell(&grid, &record.location)?;
            let def = tables.tile(&record.kind)?;
            let visual = grid.intern_visual(def.pick_visual(rng)?);
            let collision = record.collision.unwrap_or(def.collision);
            grid.set(x, y, Tile::new(collision, Some(visual)));
        }

        let mut exits = Vec::with_capacity(desc.exits.len());
        for record in &desc.exits {
            let (x, y) = grid_cell(&grid, &record.location)?;
            if grid.tile(x, y).is_some_and(|t| t.visual.is_some()) {
                return Err(LevelError::ExitOnTile { x, y });
            }
            let def = tables.tile("exit")?;
            let visual = grid.intern_visual(def.pick_visual(rng)?);
            grid.set(x, y, Tile::new(def.collision, Some(visual)));
            exits.push(Exit {
                center: grid.bounds_of(x, y).center(),
                destination: desc
                    .default_destination
                    .clone()
                    .or_else(|| record.destination.clone()),
            });
        }

        let mut starts = Vec::with_capacity(desc.starts.len());
        for record in &desc.starts {
            let (x, y) = grid_cell(&grid, &record.location)?;
            reachable(&grid, "start point", x, y)?;
            starts.push(StartPoint {
                position: grid.bounds_of(x, y).bottom_center(),
                weight: record.weight,
            });
        }

        let mut entities = EntityManager::default();

        for record in &desc.enemies {
            let (x, y) = grid_cell(&grid, &record.location)?;
            reachable(&grid, "enemy", x, y)?;
            let def = tables.enemy(&record.name)?;
            entities.enemies.push(Enemy::new(
                record.name.clone(),
                grid.bounds_of(x, y).bottom_center(),
                record.health.unwrap_or(def.health),
                record.damage.unwrap_or(def.damage),
                record.points.unwrap_or(def.points),
                Tint::from_name(record.tint.as_deref().unwrap_or(&def.tint)),
                &tuning.enemy,
            ));
        }

        for record in &desc.items {
            let (x, y) = grid_cell(&grid, &record.location)?;
            reachable(&grid, "item", x, y)?;
            let def = match record.family {
                ItemFamily::Gem => tables.gem(&record.variant)?,
                ItemFamily::TimeBonus => tables.time_bonus(&record.variant)?,
                ItemFamily::HealthPack => tables.health_pack(&record.variant)?,
            };
            let kind = match record.family {
                ItemFamily::Gem => ItemKind::Gem,
                ItemFamily::TimeBonus => ItemKind::TimeBonus {
                    bonus_ms: record.bonus_ms.unwrap_or(def.bonus_ms),
                },
                ItemFamily::HealthPack => ItemKind::HealthPack {
                    heal: record.heal.as_deref().unwrap_or(&def.heal).parse()?,
                    max_heal: record.max_heal.as_deref().unwrap_or(&def.max_heal).parse()?,
                },
            };
            let center = grid.bounds_of(x, y).center();
            entities.items.push(Item::new(
                kind,
                Vec2::new(center.x as f32, center.y as f32),
                record.points.unwrap_or(def.points),
                Tint::from_name(record.tint.as_deref().unwrap_or(&def.tint)),
            ));
        }

        for record in &desc.traps {
            let (x, y) = grid_cell(&grid, &record.location)?;
            reachable(&grid, "trap", x, y)?;
            let kind = TrapKind::from_name(&record.kind, record.direction, rng)?;
            let def = tables.trap(kind.name())?;
            let origin = grid.bounds_of(x, y);
            entities.traps.push(Trap::new(
                kind,
                Vec2::new(origin.x as f32, origin.y as f32),
                record.damage.unwrap_or(def.damage),
                Tint::from_name(record.tint.as_deref().unwrap_or(&def.tint)),
            ));
        }

        if starts.is_empty() {
            return Err(LevelError::MissingStart);
        }
        if exits.is_empty() {
            return Err(LevelError::MissingExit);
        }
        let start = starts
            .choose_weighted(rng, |s| s.weight)
            .map_err(|_| LevelError::InvalidWeights("start point"))?
            .position;

        let secs = desc.time_secs.unwrap_or(tuning.level.default_time_secs);
        let time_remaining =
            Duration::try_from_secs_f64(secs).map_err(|_| LevelError::InvalidTime(secs))?;

        log::info!(
            "Loaded level '{}' ({}x{}): {} enemies, {} items, {} traps, {} exits",
            desc.name,
            desc.width,
            desc.height,
            entities.enemies.len(),
            entities.items.len(),
            entities.traps.len(),
            exits.len()
        );

        Ok(Self {
            name: desc.name.clone(),
            grid,
            character: Character::new(
                start,
                carry.health,
                carry.max_health,
                tuning.character.clone(),
            ),
            entities,
            board: Scoreboard {
                score: carry.score,
                time_remaining,
            },
            exits,
            starts,
            start,
            reached_exit: false,
            next_level: None,
            elapsed: 0.0,
            events: Vec::new(),
            tuning: tuning.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    pub fn starts(&self) -> &[StartPoint] {
        &self.starts
    }

    /// The start point chosen at load
    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    pub fn score(&self) -> i64 {
        self.board.score
    }

    pub fn time_remaining(&self) -> Duration {
        self.board.time_remaining
    }

    pub fn reached_exit(&self) -> bool {
        self.reached_exit
    }

    /// Destination of the exit that was reached
    pub fn next_level(&self) -> Option<&str> {
        self.next_level.as_deref()
    }

    pub fn phase(&self) -> LevelPhase {
        if !self.character.is_alive() {
            LevelPhase::PlayerDead
        } else if self.reached_exit {
            LevelPhase::ReachedExit
        } else if self.board.time_remaining.is_zero() {
            LevelPhase::TimeExpired
        } else {
            LevelPhase::Playing
        }
    }

    /// `None` while the level is still being played or scored
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.character.is_alive() {
            Some(Outcome::Died)
        } else if !self.board.time_remaining.is_zero() {
            None
        } else if self.reached_exit {
            Some(Outcome::Won)
        } else {
            Some(Outcome::TimeUp)
        }
    }

    /// Time is running out and the exit hasn't been reached
    pub fn is_time_low(&self) -> bool {
        !self.reached_exit
            && self.board.time_remaining < Duration::from_secs(LOW_TIME_WARNING_SECS)
    }

    /// Score and health to bring into the next level
    pub fn carry_over(&self) -> CarryOver {
        CarryOver {
            score: self.board.score,
            health: self.character.health(),
            max_health: self.character.max_health(),
        }
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Revive at the chosen start point for a time penalty
    ///
    /// Returns false (and does nothing) while the character is alive.
    pub fn start_new_life(&mut self) -> bool {
        if self.character.is_alive() {
            return false;
        }
        let penalty = Duration::from_secs(self.tuning.level.new_life_penalty_secs);
        self.board.time_remaining = self.board.time_remaining.saturating_sub(penalty);

        self.character.clamp_health();
        let heal = (self.character.max_health() as f32 * self.tuning.level.new_life_heal_fraction)
            as i32;
        self.character.heal(heal, 0);
        self.character.reset(self.start);

        self.events.push(LevelEvent::NewLife);
        log::info!(
            "New life in '{}': {} health, {:.1}s left",
            self.name,
            self.character.health(),
            self.board.time_remaining.as_secs_f32()
        );
        true
    }
}
