//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Injected RNG only, and only at level load
//! - Stable iteration order (storage order of each collection)
//! - No rendering, audio or input-device dependencies

pub mod character;
pub mod collision;
pub mod enemy;
pub mod entities;
pub mod geom;
pub mod item;
pub mod level;
pub mod projectile;
pub mod tick;
pub mod tile;
pub mod trap;

pub use character::{Character, CharacterInput, DeathCause};
pub use collision::{CollisionResult, resolve_tile_collisions};
pub use enemy::Enemy;
pub use entities::EntityManager;
pub use geom::{Circle, Facing, Rect};
pub use item::{HealAmount, Item, ItemKind};
pub use level::{CarryOver, Exit, Level, LevelEvent, LevelPhase, Outcome, Scoreboard, StartPoint};
pub use projectile::{DamageTarget, Projectile, ProjectileKind};
pub use tick::{TickInput, tick};
pub use tile::{Tile, TileCollision, TileGrid, VisualId};
pub use trap::{Trap, TrapKind};
