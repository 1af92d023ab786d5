//! Tile Platformer - a tile-based 2D platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile grid, collision, character, entities, level tick)
//! - `descriptor`: Already-parsed level descriptors and their validation
//! - `content`: Per-kind content tables (tiles, enemies, traps, items)
//! - `tuning`: Data-driven game balance
//! - `camera`: Scroll offset derived from the character position
//! - `session`: Level-to-level progression

pub mod camera;
pub mod content;
pub mod descriptor;
pub mod error;
pub mod session;
pub mod sim;
pub mod tuning;

pub use camera::Camera;
pub use content::ContentTables;
pub use descriptor::LevelDescriptor;
pub use error::LevelError;
pub use session::{LevelSource, Session};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum simulation steps per frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tile dimensions in world units
    pub const TILE_WIDTH: i32 = 40;
    pub const TILE_HEIGHT: i32 = 32;

    /// Smallest grid a level descriptor may declare
    pub const MIN_LEVEL_WIDTH: usize = 20;
    pub const MIN_LEVEL_HEIGHT: usize = 15;

    /// Remaining time below which the HUD should warn
    pub const LOW_TIME_WARNING_SECS: u64 = 30;
}
