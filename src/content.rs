//! Content tables
//!
//! Per-kind defaults for tiles, enemies, traps and items. Descriptor records
//! name an entry (case-insensitively) and may patch individual fields. The
//! tables are loaded once, usually from JSON, and passed by reference into
//! level construction.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::tile::TileCollision;

/// Colour multiplier applied when drawing an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint(pub [u8; 3]);

impl Tint {
    pub const WHITE: Tint = Tint([255, 255, 255]);

    /// Resolve a colour name; unknown names fall back to white
    pub fn from_name(name: &str) -> Tint {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Tint([255, 0, 0]),
            "green" => Tint([0, 128, 0]),
            "blue" => Tint([0, 0, 255]),
            "yellow" => Tint([255, 255, 0]),
            "orange" => Tint([255, 165, 0]),
            "purple" => Tint([128, 0, 128]),
            "cyan" => Tint([0, 255, 255]),
            "magenta" => Tint([255, 0, 255]),
            "gray" | "grey" => Tint([128, 128, 128]),
            "black" => Tint([0, 0, 0]),
            "gold" => Tint([255, 215, 0]),
            "silver" => Tint([192, 192, 192]),
            "brown" => Tint([165, 42, 42]),
            "pink" => Tint([255, 192, 203]),
            "lime" => Tint([0, 255, 0]),
            _ => Tint::WHITE,
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

/// One visual of a tile type and how often it is picked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileVariant {
    pub visual: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// A tile type: collision class plus weighted visuals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDef {
    pub collision: TileCollision,
    pub variants: Vec<TileVariant>,
}

impl TileDef {
    fn new(collision: TileCollision, variants: &[(&str, u32)]) -> Self {
        Self {
            collision,
            variants: variants
                .iter()
                .map(|(visual, weight)| TileVariant {
                    visual: visual.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    /// Pick a visual by weight; a single variant needs no draw
    pub fn pick_visual<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, LevelError> {
        if let [only] = self.variants.as_slice() {
            return Ok(only.visual.as_str());
        }
        self.variants
            .choose_weighted(rng, |v| v.weight)
            .map(|v| v.visual.as_str())
            .map_err(|_| LevelError::InvalidWeights("tile variant"))
    }
}

/// Defaults for an enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyDef {
    pub health: i32,
    pub points: i32,
    pub damage: i32,
    pub tint: String,
}

impl Default for EnemyDef {
    fn default() -> Self {
        Self {
            health: 100,
            points: 50,
            damage: 20,
            tint: "white".to_string(),
        }
    }
}

/// Defaults for a trap kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapDef {
    pub damage: i32,
    pub tint: String,
}

impl Default for TrapDef {
    fn default() -> Self {
        Self {
            damage: 20,
            tint: "white".to_string(),
        }
    }
}

/// Defaults shared by every item family; fields a family doesn't use are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDef {
    pub points: i32,
    pub tint: String,
    /// Time bonus only
    pub bonus_ms: u64,
    /// Health pack only: integer or `<int>%`
    pub heal: String,
    /// Health pack only: integer or `<int>%`
    pub max_heal: String,
}

impl Default for ItemDef {
    fn default() -> Self {
        Self {
            points: 0,
            tint: "white".to_string(),
            bonus_ms: 0,
            heal: "0".to_string(),
            max_heal: "0".to_string(),
        }
    }
}

fn item(points: i32, tint: &str, bonus_ms: u64, heal: &str, max_heal: &str) -> ItemDef {
    ItemDef {
        points,
        tint: tint.to_string(),
        bonus_ms,
        heal: heal.to_string(),
        max_heal: max_heal.to_string(),
    }
}

/// Case-insensitive lookup in a name-keyed table
fn lookup<'a, V>(table: &'a BTreeMap<String, V>, name: &str) -> Option<&'a V> {
    table.get(name).or_else(|| {
        table
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

/// Every content table a level load consults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    pub tiles: BTreeMap<String, TileDef>,
    pub enemies: BTreeMap<String, EnemyDef>,
    pub traps: BTreeMap<String, TrapDef>,
    pub gems: BTreeMap<String, ItemDef>,
    pub time_bonuses: BTreeMap<String, ItemDef>,
    pub health_packs: BTreeMap<String, ItemDef>,
}

impl Default for ContentTables {
    fn default() -> Self {
        let tiles = BTreeMap::from([
            (
                "platform".to_string(),
                TileDef::new(TileCollision::Platform, &[("Platform", 1)]),
            ),
            (
                "orange".to_string(),
                TileDef::new(
                    TileCollision::Impassable,
                    &[("Orange0", 6), ("Orange1", 3), ("Orange2", 1)],
                ),
            ),
            (
                "mossygreen".to_string(),
                TileDef::new(
                    TileCollision::Impassable,
                    &[("MossyGreen0", 6), ("MossyGreen1", 3), ("MossyGreen2", 1)],
                ),
            ),
            (
                "exit".to_string(),
                TileDef::new(TileCollision::Passable, &[("Exit", 1)]),
            ),
        ]);

        let enemy = |health, points, damage| EnemyDef {
            health,
            points,
            damage,
            tint: "white".to_string(),
        };
        let enemies = BTreeMap::from([
            ("barbarian".to_string(), enemy(100, 50, 30)),
            ("pygmy".to_string(), enemy(40, 30, 15)),
            ("zombie".to_string(), enemy(80, 40, 20)),
            ("skeleton".to_string(), enemy(60, 60, 25)),
        ]);

        let trap = |damage| TrapDef {
            damage,
            tint: "white".to_string(),
        };
        let traps = BTreeMap::from([
            ("static".to_string(), trap(40)),
            ("rising".to_string(), trap(20)),
            ("falling".to_string(), trap(20)),
            ("shooting".to_string(), trap(10)),
        ]);

        Self {
            tiles,
            enemies,
            traps,
            gems: BTreeMap::from([("default".to_string(), item(30, "yellow", 0, "0", "0"))]),
            time_bonuses: BTreeMap::from([(
                "default".to_string(),
                item(10, "white", 5000, "0", "0"),
            )]),
            health_packs: BTreeMap::from([
                ("default".to_string(), item(0, "white", 0, "25%", "0")),
                ("poison".to_string(), item(0, "green", 0, "-20", "0")),
                ("weak".to_string(), item(0, "white", 0, "10%", "0")),
                ("strong".to_string(), item(0, "white", 0, "50%", "0")),
                ("ultimate".to_string(), item(0, "gold", 0, "100%", "10%")),
            ]),
        }
    }
}

impl ContentTables {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tile(&self, name: &str) -> Result<&TileDef, LevelError> {
        lookup(&self.tiles, name).ok_or_else(|| LevelError::UnknownTile(name.to_string()))
    }

    pub fn enemy(&self, name: &str) -> Result<&EnemyDef, LevelError> {
        lookup(&self.enemies, name).ok_or_else(|| LevelError::UnknownEnemy(name.to_string()))
    }

    pub fn trap(&self, name: &str) -> Result<&TrapDef, LevelError> {
        lookup(&self.traps, name).ok_or_else(|| LevelError::UnknownTrap(name.to_string()))
    }

    pub fn gem(&self, name: &str) -> Result<&ItemDef, LevelError> {
        lookup(&self.gems, name).ok_or_else(|| LevelError::UnknownItem(name.to_string()))
    }

    pub fn time_bonus(&self, name: &str) -> Result<&ItemDef, LevelError> {
        lookup(&self.time_bonuses, name).ok_or_else(|| LevelError::UnknownItem(name.to_string()))
    }

    pub fn health_pack(&self, name: &str) -> Result<&ItemDef, LevelError> {
        lookup(&self.health_packs, name).ok_or_else(|| LevelError::UnknownItem(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lookup_ignores_case() {
        let tables = ContentTables::default();
        assert_eq!(tables.enemy("Zombie").unwrap().health, 80);
        assert_eq!(tables.trap("STATIC").unwrap().damage, 40);
        assert!(matches!(
            tables.enemy("Dragon"),
            Err(LevelError::UnknownEnemy(_))
        ));
    }

    #[test]
    fn test_variety_tile_picks_known_visual_deterministically() {
        let tables = ContentTables::default();
        let orange = tables.tile("Orange").unwrap();
        let mut a = Pcg32::seed_from_u64(3);
        let mut b = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let va = orange.pick_visual(&mut a).unwrap();
            assert!(va.starts_with("Orange"));
            assert_eq!(va, orange.pick_visual(&mut b).unwrap());
        }
    }

    #[test]
    fn test_zero_weights_rejected() {
        let def = TileDef::new(TileCollision::Impassable, &[("A", 0), ("B", 0)]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            def.pick_visual(&mut rng),
            Err(LevelError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_tables_accept_partial_json() {
        let tables = ContentTables::from_json(
            r#"{ "enemies": { "slime": { "health": 5, "damage": 1 } } }"#,
        )
        .unwrap();
        let slime = tables.enemy("Slime").unwrap();
        assert_eq!(slime.health, 5);
        assert_eq!(slime.points, 50);
        // Tables not mentioned keep their defaults
        assert!(tables.tile("platform").is_ok());
    }

    #[test]
    fn test_tint_names() {
        assert_eq!(Tint::from_name("Red"), Tint([255, 0, 0]));
        assert_eq!(Tint::from_name("no such colour"), Tint::WHITE);
    }
}
