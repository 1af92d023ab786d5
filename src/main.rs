//! Tile Platformer headless runner
//!
//! Loads a level descriptor (JSON or text layout), drives it with a scripted
//! input at the fixed timestep and logs what happens. Run with
//! `RUST_LOG=debug` to see per-second state.
//!
//! Optional JSON overrides are read from the paths in `TILE_PLATFORMER_TUNING`
//! and `TILE_PLATFORMER_CONTENT`.

use std::path::{Path, PathBuf};
use std::{env, fs, process};

use glam::Vec2;

use tile_platformer::consts::SIM_DT;
use tile_platformer::sim::{LevelEvent, TickInput};
use tile_platformer::{
    Camera, ContentTables, LevelDescriptor, LevelError, LevelSource, Session, Tuning,
};

/// Levels stored as `<id>.json` or `<id>.txt` in one directory
struct DirectorySource {
    dir: PathBuf,
}

impl LevelSource for DirectorySource {
    fn load(&mut self, id: &str) -> Result<LevelDescriptor, LevelError> {
        let json = self.dir.join(format!("{}.json", id));
        if json.is_file() {
            return LevelDescriptor::from_json(&fs::read_to_string(json)?);
        }
        let text = self.dir.join(format!("{}.txt", id));
        if text.is_file() {
            return LevelDescriptor::from_layout(id, &fs::read_to_string(text)?);
        }
        Err(LevelError::UnknownLevel(id.to_string()))
    }

    /// Numbered levels play in order
    fn successor(&self, id: &str) -> Option<String> {
        id.parse::<u32>().ok().map(|n| (n + 1).to_string())
    }
}

/// Run right, hop periodically and throw now and then
fn scripted_input(tick: u64) -> TickInput {
    TickInput {
        movement: if (tick / 240) % 4 == 3 { -1.0 } else { 1.0 },
        jump: tick % 45 < 20,
        throw: tick % 120 == 60,
    }
}

fn log_event(tick: u64, event: &LevelEvent) {
    let secs = tick as f32 * SIM_DT;
    match event {
        LevelEvent::Jumped | LevelEvent::DartFired { .. } => {
            log::trace!("[{:7.2}s] {:?}", secs, event)
        }
        LevelEvent::ItemCollected { kind, points } => {
            log::debug!("[{:7.2}s] Picked up {} (+{})", secs, kind.label(), points)
        }
        LevelEvent::CharacterHurt { .. }
        | LevelEvent::Healed { .. }
        | LevelEvent::Poisoned { .. }
        | LevelEvent::SpearThrown { .. } => log::debug!("[{:7.2}s] {:?}", secs, event),
        LevelEvent::EnemyKilled { .. }
        | LevelEvent::CharacterKilled { .. }
        | LevelEvent::ExitReached { .. }
        | LevelEvent::NewLife => log::info!("[{:7.2}s] {:?}", secs, event),
    }
}

fn read_override<T>(
    var: &str,
    parse: impl Fn(&str) -> Result<T, LevelError>,
) -> Result<Option<T>, LevelError> {
    match env::var(var) {
        Ok(path) => {
            log::info!("Reading {} from {}", var, path);
            Ok(Some(parse(&fs::read_to_string(path)?)?))
        }
        Err(_) => Ok(None),
    }
}

fn run() -> Result<(), LevelError> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        log::error!("usage: tile-platformer <level.json|level.txt> [seconds] [seed]");
        process::exit(2);
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);

    let tuning = read_override("TILE_PLATFORMER_TUNING", Tuning::from_json)?.unwrap_or_default();
    let tables =
        read_override("TILE_PLATFORMER_CONTENT", ContentTables::from_json)?.unwrap_or_default();

    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| LevelError::UnknownLevel(path.display().to_string()))?
        .to_string();

    let mut camera = Camera::new(Vec2::new(800.0, 480.0), tuning.camera.clone());
    let mut session = Session::new(DirectorySource { dir }, &id, tables, tuning, seed)?;

    let ticks = (seconds / SIM_DT).round() as u64;
    for n in 0..ticks {
        // Tap continue twice a second once the level is over
        let continue_pressed = session.level().outcome().is_some() && n % 30 == 0;
        session.step(&scripted_input(n), continue_pressed)?;
        camera.follow_level(session.level());

        for event in session.level_mut().drain_events() {
            log_event(n, &event);
        }

        if n % 60 == 0 {
            let level = session.level();
            let character = level.character();
            log::debug!(
                "[{:7.2}s] '{}' {:?} pos=({:.0}, {:.0}) health={}/{} score={} time={:.1}s camera=({:.0}, {:.0})",
                n as f32 * SIM_DT,
                session.current_id(),
                level.phase(),
                character.position.x,
                character.position.y,
                character.health(),
                character.max_health(),
                level.score(),
                level.time_remaining().as_secs_f32(),
                camera.position.x,
                camera.position.y
            );
            if level.is_time_low() {
                log::debug!("Hurry up!");
            }
        }
    }

    let level = session.level();
    log::info!(
        "Finished in '{}': score {}, health {}/{}, {:.1}s left, outcome {:?}",
        session.current_id(),
        level.score(),
        level.character().health(),
        level.character().max_health(),
        level.time_remaining().as_secs_f32(),
        level.outcome()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Tile Platformer (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        process::exit(1);
    }
}
