//! Level-to-level progression
//!
//! A session owns the current level plus everything needed to build the next
//! one. The continue button revives a dead character, advances past a scored
//! exit, or retries a level whose time ran out.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::content::ContentTables;
use crate::descriptor::LevelDescriptor;
use crate::error::LevelError;
use crate::sim::{CarryOver, Level, TickInput, tick};
use crate::tuning::Tuning;

/// Supplies level descriptors by identifier
pub trait LevelSource {
    fn load(&mut self, id: &str) -> Result<LevelDescriptor, LevelError>;

    /// Level to play after `id` when its exit names no destination
    fn successor(&self, _id: &str) -> Option<String> {
        None
    }
}

/// Descriptors held in memory, played in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    levels: BTreeMap<String, LevelDescriptor>,
    order: Vec<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, desc: LevelDescriptor) {
        let id = id.into();
        if !self.levels.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.levels.insert(id, desc);
    }
}

impl LevelSource for MemorySource {
    fn load(&mut self, id: &str) -> Result<LevelDescriptor, LevelError> {
        self.levels
            .get(id)
            .cloned()
            .ok_or_else(|| LevelError::UnknownLevel(id.to_string()))
    }

    fn successor(&self, id: &str) -> Option<String> {
        let index = self.order.iter().position(|known| known == id)?;
        self.order.get(index + 1).cloned()
    }
}

pub struct Session<S: LevelSource> {
    source: S,
    tables: ContentTables,
    tuning: Tuning,
    rng: Pcg32,
    current: String,
    level: Level,
    continue_was_pressed: bool,
    accumulator: f32,
}

impl<S: LevelSource> Session<S> {
    /// Start at level `first` with fresh health and no score
    pub fn new(
        mut source: S,
        first: &str,
        tables: ContentTables,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, LevelError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let desc = source.load(first)?;
        let level = Level::load(&desc, &tables, &tuning, CarryOver::fresh(&tuning), &mut rng)?;
        log::info!("Session started at '{}' (seed {})", first, seed);
        Ok(Self {
            source,
            tables,
            tuning,
            rng,
            current: first.to_string(),
            level,
            continue_was_pressed: false,
            accumulator: 0.0,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Identifier of the level being played
    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// Accumulate frame time and run as many fixed steps as fit
    ///
    /// Returns the number of steps taken. A throw press only counts for the
    /// first step of the frame.
    pub fn update(
        &mut self,
        input: &TickInput,
        continue_pressed: bool,
        frame_dt: f32,
    ) -> Result<u32, LevelError> {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(&input, continue_pressed)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.throw = false;
        }
        Ok(substeps)
    }

    /// Handle the continue button, then advance one fixed step
    pub fn step(&mut self, input: &TickInput, continue_pressed: bool) -> Result<(), LevelError> {
        let pressed_now = continue_pressed && !self.continue_was_pressed;
        self.continue_was_pressed = continue_pressed;
        if pressed_now {
            self.handle_continue()?;
        }
        tick(&mut self.level, input, SIM_DT);
        Ok(())
    }

    fn handle_continue(&mut self) -> Result<(), LevelError> {
        if !self.level.character().is_alive() {
            self.level.start_new_life();
        } else if self.level.time_remaining().is_zero() {
            if self.level.reached_exit() {
                let next = self
                    .level
                    .next_level()
                    .map(str::to_string)
                    .or_else(|| self.source.successor(&self.current))
                    .unwrap_or_else(|| self.current.clone());
                let carry = self.level.carry_over();
                self.load(&next, carry)?;
            } else {
                let max_health = self.level.character().max_health();
                let carry = CarryOver {
                    score: 0,
                    health: max_health,
                    max_health,
                };
                let current = self.current.clone();
                self.load(&current, carry)?;
            }
        }
        Ok(())
    }

    /// Replace the current level; on failure the old level stays in place
    fn load(&mut self, id: &str, carry: CarryOver) -> Result<(), LevelError> {
        let desc = self.source.load(id)?;
        let level = Level::load(&desc, &self.tables, &self.tuning, carry, &mut self.rng)?;
        log::info!(
            "Level '{}' -> '{}' (score {}, health {}/{})",
            self.current,
            id,
            carry.score,
            carry.health,
            carry.max_health
        );
        self.level = level;
        self.current = id.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::DeathCause;
    use crate::sim::level::tests::flat_descriptor;
    use std::time::Duration;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        let mut first = flat_descriptor();
        first.exits[0].destination = None;
        source.insert("one", first);
        let mut second = flat_descriptor();
        second.name = "second".to_string();
        source.insert("two", second);
        source
    }

    fn session() -> Session<MemorySource> {
        Session::new(
            source(),
            "one",
            ContentTables::default(),
            Tuning::default(),
            9,
        )
        .unwrap()
    }

    #[test]
    fn test_continue_revives_dead_character() {
        let mut session = session();
        session.level_mut().character.kill(DeathCause::Fell);
        session.step(&TickInput::default(), true).unwrap();
        assert!(session.level().character().is_alive());
        assert!(session.level().time_remaining() < Duration::from_secs(45));

        // Holding the button is not a second press
        session.level_mut().character.kill(DeathCause::Fell);
        session.step(&TickInput::default(), true).unwrap();
        assert!(!session.level().character().is_alive());
    }

    #[test]
    fn test_scored_exit_advances_with_carry_over() {
        let mut session = session();
        {
            let level = session.level_mut();
            level.reached_exit = true;
            level.board.time_remaining = Duration::ZERO;
            level.board.score = 420;
            level.character.hurt(30);
        }
        session.step(&TickInput::default(), true).unwrap();

        assert_eq!(session.current_id(), "two");
        assert_eq!(session.level().score(), 420);
        assert_eq!(session.level().character().health(), 70);
        assert!(!session.level().reached_exit());
    }

    #[test]
    fn test_time_up_without_exit_retries_from_scratch() {
        let mut session = session();
        {
            let level = session.level_mut();
            level.board.time_remaining = Duration::ZERO;
            level.board.score = 300;
            level.character.hurt(60);
        }
        session.step(&TickInput::default(), true).unwrap();

        assert_eq!(session.current_id(), "one");
        assert_eq!(session.level().score(), 0);
        assert_eq!(session.level().character().health(), 100);
        assert!(session.level().time_remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_continue_while_playing_does_nothing() {
        let mut session = session();
        session.step(&TickInput::default(), true).unwrap();
        assert_eq!(session.current_id(), "one");
        assert!(session.level().character().is_alive());
    }

    #[test]
    fn test_missing_level_keeps_current() {
        let mut source = MemorySource::new();
        source.insert("only", flat_descriptor());
        let mut session =
            Session::new(source, "only", ContentTables::default(), Tuning::default(), 1).unwrap();
        {
            let level = session.level_mut();
            level.reached_exit = true;
            level.next_level = Some("level2".to_string());
            level.board.time_remaining = Duration::ZERO;
        }
        // The reached exit names "level2", which the source doesn't have
        assert!(matches!(
            session.step(&TickInput::default(), true),
            Err(LevelError::UnknownLevel(_))
        ));
        assert_eq!(session.current_id(), "only");
        assert!(session.level().reached_exit());
        assert_eq!(session.level().next_level(), Some("level2"));
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut session = session();
        assert_eq!(session.update(&TickInput::default(), false, 0.06).unwrap(), 3);
        // Long frames are capped
        assert_eq!(session.update(&TickInput::default(), false, 5.0).unwrap(), 6);
    }
}
