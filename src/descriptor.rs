//! Level descriptors
//!
//! A descriptor is the already-parsed description of one level: grid size,
//! per-cell tile records and entity placements. It comes either from JSON or
//! from the classic one-character-per-cell text layout. Nothing here touches
//! the simulation; `Level::load` turns a descriptor into live state.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::geom::Facing;
use crate::sim::tile::TileCollision;

fn default_weight() -> u32 {
    1
}

fn default_variant() -> String {
    "default".to_string()
}

/// A tile type placed in one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Tile table name
    pub kind: String,
    /// `"x - y"` cell coordinate
    pub location: String,
    /// Overrides the table's collision class (re-skinned variety tiles)
    #[serde(default)]
    pub collision: Option<TileCollision>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub location: String,
    /// Next level identifier
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRecord {
    pub location: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    /// Enemy table name
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub points: Option<i32>,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub tint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFamily {
    Gem,
    TimeBonus,
    HealthPack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub family: ItemFamily,
    /// Entry within the family's table
    #[serde(default = "default_variant")]
    pub variant: String,
    pub location: String,
    #[serde(default)]
    pub points: Option<i32>,
    #[serde(default)]
    pub tint: Option<String>,
    #[serde(default)]
    pub bonus_ms: Option<u64>,
    #[serde(default)]
    pub heal: Option<String>,
    #[serde(default)]
    pub max_heal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapRecord {
    /// `static`, `rising`, `falling` or `shooting`
    pub kind: String,
    pub location: String,
    #[serde(default)]
    pub damage: Option<i32>,
    #[serde(default)]
    pub tint: Option<String>,
    /// Required for shooting traps
    #[serde(default)]
    pub direction: Option<Facing>,
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Time budget; the tuning default applies when absent
    #[serde(default)]
    pub time_secs: Option<f64>,
    /// When set, every exit leads here regardless of its own destination
    #[serde(default)]
    pub default_destination: Option<String>,
    #[serde(default)]
    pub tiles: Vec<TileRecord>,
    #[serde(default)]
    pub exits: Vec<ExitRecord>,
    #[serde(default)]
    pub starts: Vec<StartRecord>,
    #[serde(default)]
    pub enemies: Vec<EnemyRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub traps: Vec<TrapRecord>,
}

/// Parse an `"x - y"` cell coordinate
pub fn parse_location(location: &str) -> Result<(i32, i32), LevelError> {
    let malformed = || LevelError::MalformedLocation(location.to_string());
    let (x, y) = location.split_once('-').ok_or_else(malformed)?;
    let x = x.trim().parse::<i32>().map_err(|_| malformed())?;
    let y = y.trim().parse::<i32>().map_err(|_| malformed())?;
    Ok((x, y))
}

/// Format a cell coordinate the way `parse_location` reads it
pub fn format_location(x: usize, y: usize) -> String {
    format!("{} - {}", x, y)
}

impl LevelDescriptor {
    /// An empty descriptor of the given size
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            time_secs: None,
            default_destination: None,
            tiles: Vec::new(),
            exits: Vec::new(),
            starts: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
            traps: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the classic text layout
    ///
    /// The first line names the default destination (blank for none). Every
    /// following line is one grid row, one character per cell.
    pub fn from_layout(name: &str, text: &str) -> Result<Self, LevelError> {
        let mut lines = text.lines();
        let default_destination = lines
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut rows: Vec<&str> = lines.collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }

        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut desc = LevelDescriptor::new(name, width, rows.len());
        desc.default_destination = default_destination;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                // Line numbers count the destination header
                return Err(LevelError::RaggedLayout { line: y + 2 });
            }
            for (x, ch) in row.chars().enumerate() {
                desc.push_layout_cell(ch, x, y)?;
            }
        }
        Ok(desc)
    }

    fn push_layout_cell(&mut self, ch: char, x: usize, y: usize) -> Result<(), LevelError> {
        let location = format_location(x, y);
        match ch {
            '.' => {}
            'X' => self.exits.push(ExitRecord {
                location,
                destination: None,
            }),
            '1' => self.starts.push(StartRecord {
                location,
                weight: 1,
            }),

            '-' => self.push_tile("platform", location, None),
            '~' => self.push_tile("mossygreen", location, Some(TileCollision::Platform)),
            ':' => self.push_tile("mossygreen", location, Some(TileCollision::Passable)),
            '#' => self.push_tile("orange", location, Some(TileCollision::Impassable)),

            'G' => self.push_item(ItemFamily::Gem, "default", location),
            'T' => self.push_item(ItemFamily::TimeBonus, "default", location),
            '+' => self.push_item(ItemFamily::HealthPack, "default", location),
            '@' => self.push_item(ItemFamily::HealthPack, "poison", location),
            '(' => self.push_item(ItemFamily::HealthPack, "weak", location),
            ')' => self.push_item(ItemFamily::HealthPack, "strong", location),
            '=' => self.push_item(ItemFamily::HealthPack, "ultimate", location),

            'A' => self.push_enemy("Barbarian", location),
            'B' => self.push_enemy("Pygmy", location),
            'C' => self.push_enemy("Zombie", location),
            'D' => self.push_enemy("Skeleton", location),

            '*' => self.push_trap("static", location, None),
            '^' => self.push_trap("rising", location, None),
            'v' => self.push_trap("falling", location, None),
            '>' => self.push_trap("shooting", location, Some(Facing::Right)),
            '<' => self.push_trap("shooting", location, Some(Facing::Left)),

            _ => return Err(LevelError::UnknownLayoutChar { ch, x, y }),
        }
        Ok(())
    }

    fn push_tile(&mut self, kind: &str, location: String, collision: Option<TileCollision>) {
        self.tiles.push(TileRecord {
            kind: kind.to_string(),
            location,
            collision,
        });
    }

    fn push_item(&mut self, family: ItemFamily, variant: &str, location: String) {
        self.items.push(ItemRecord {
            family,
            variant: variant.to_string(),
            location,
            points: None,
            tint: None,
            bonus_ms: None,
            heal: None,
            max_heal: None,
        });
    }

    fn push_enemy(&mut self, name: &str, location: String) {
        self.enemies.push(EnemyRecord {
            name: name.to_string(),
            location,
            health: None,
            points: Some(50),
            damage: None,
            tint: None,
        });
    }

    fn push_trap(&mut self, kind: &str, location: String, direction: Option<Facing>) {
        self.traps.push(TrapRecord {
            kind: kind.to_string(),
            location,
            damage: None,
            tint: None,
            direction,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("3 - 14").unwrap(), (3, 14));
        assert_eq!(parse_location("3-14").unwrap(), (3, 14));
        for bad in ["3 14", "a - 1", "1 - ", "", "1 - 2 - 3"] {
            assert!(
                matches!(parse_location(bad), Err(LevelError::MalformedLocation(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_layout_records() {
        let text = "Level2\n\
                    ..X.\n\
                    1.G>\n\
                    ##~-\n";
        let desc = LevelDescriptor::from_layout("tiny", text).unwrap();
        assert_eq!(desc.default_destination.as_deref(), Some("Level2"));
        assert_eq!((desc.width, desc.height), (4, 3));
        assert_eq!(desc.exits[0].location, "2 - 0");
        assert_eq!(desc.starts[0].location, "0 - 1");
        assert_eq!(desc.items[0].family, ItemFamily::Gem);
        assert_eq!(desc.traps[0].direction, Some(Facing::Right));
        assert_eq!(desc.tiles.len(), 4);
        assert_eq!(desc.tiles[2].collision, Some(TileCollision::Platform));
        assert_eq!(desc.tiles[3].kind, "platform");
    }

    #[test]
    fn test_layout_blank_header_means_no_destination() {
        let desc = LevelDescriptor::from_layout("tiny", "\n1X\n##\n\n").unwrap();
        assert_eq!(desc.default_destination, None);
        assert_eq!(desc.height, 2);
    }

    #[test]
    fn test_layout_errors() {
        assert!(matches!(
            LevelDescriptor::from_layout("bad", "\n...\n..\n"),
            Err(LevelError::RaggedLayout { line: 3 })
        ));
        assert!(matches!(
            LevelDescriptor::from_layout("bad", "\n..Q\n"),
            Err(LevelError::UnknownLayoutChar { ch: 'Q', x: 2, y: 0 })
        ));
    }

    #[test]
    fn test_json_descriptor_defaults() {
        let desc = LevelDescriptor::from_json(
            r#"{
                "name": "json level",
                "width": 20,
                "height": 15,
                "starts": [{ "location": "1 - 13" }],
                "exits": [{ "location": "18 - 13", "destination": "next" }],
                "items": [{ "family": "health_pack", "location": "5 - 13", "heal": "50%" }],
                "traps": [{ "kind": "shooting", "location": "9 - 13", "direction": "Left" }]
            }"#,
        )
        .unwrap();
        assert_eq!(desc.starts[0].weight, 1);
        assert_eq!(desc.items[0].variant, "default");
        assert_eq!(desc.items[0].heal.as_deref(), Some("50%"));
        assert_eq!(desc.traps[0].direction, Some(Facing::Left));
        assert!(desc.tiles.is_empty());
    }
}
