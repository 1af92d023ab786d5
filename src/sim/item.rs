//! Collectible items

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Circle;
use crate::consts::TILE_WIDTH;
use crate::content::Tint;
use crate::error::LevelError;
use crate::tuning::ItemTuning;

/// A heal or max-heal amount: either literal or relative to max health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealAmount {
    Flat(i32),
    /// Percent of the character's max health at the moment of pickup
    Percent(i32),
}

impl HealAmount {
    /// Concrete amount for a character with `max_health`, saturating at the
    /// `i32` range
    pub fn resolve(self, max_health: i32) -> i32 {
        match self {
            HealAmount::Flat(n) => n,
            HealAmount::Percent(p) => {
                let amount = i64::from(max_health) * i64::from(p) / 100;
                amount.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
        }
    }
}

impl Default for HealAmount {
    fn default() -> Self {
        HealAmount::Flat(0)
    }
}

impl FromStr for HealAmount {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i32>() {
            return Ok(HealAmount::Flat(n));
        }
        trimmed
            .strip_suffix('%')
            .and_then(|p| p.trim_end().parse::<i32>().ok())
            .map(HealAmount::Percent)
            .ok_or_else(|| LevelError::InvalidHealAmount(s.to_string()))
    }
}

/// Variant payload of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Gem,
    TimeBonus {
        bonus_ms: u64,
    },
    HealthPack {
        heal: HealAmount,
        max_heal: HealAmount,
    },
}

impl ItemKind {
    /// Human-readable family name
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Gem => "gem",
            ItemKind::TimeBonus { .. } => "time bonus",
            ItemKind::HealthPack { .. } => "health pack",
        }
    }
}

/// A bobbing pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Current (bobbing) center
    pub position: Vec2,
    /// Center of the cell the item was placed in
    base_position: Vec2,
    pub points: i32,
    pub tint: Tint,
    /// Set when picked up; compacted out after the sweep
    collected: bool,
}

impl Item {
    pub fn new(kind: ItemKind, base_position: Vec2, points: i32, tint: Tint) -> Self {
        Self {
            kind,
            position: base_position,
            base_position,
            points,
            tint,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub(crate) fn mark_collected(&mut self) {
        self.collected = true;
    }

    /// Bob around the base position; neighbouring items are out of phase
    pub fn update(&mut self, total_time: f32, tuning: &ItemTuning) {
        let t = total_time * tuning.bounce_rate + self.base_position.x * tuning.bounce_sync;
        self.position = self.base_position + Vec2::new(0.0, t.sin() * tuning.bounce_height);
    }

    pub fn bounding_circle(&self, tuning: &ItemTuning) -> Circle {
        Circle::new(
            self.position,
            TILE_WIDTH as f32 * tuning.radius_tile_fraction,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_amount_parses_flat_and_percent() {
        assert_eq!("25".parse::<HealAmount>().unwrap(), HealAmount::Flat(25));
        assert_eq!(" -20 ".parse::<HealAmount>().unwrap(), HealAmount::Flat(-20));
        assert_eq!("50%".parse::<HealAmount>().unwrap(), HealAmount::Percent(50));
        assert!(matches!(
            "lots".parse::<HealAmount>(),
            Err(LevelError::InvalidHealAmount(_))
        ));
        assert!("%".parse::<HealAmount>().is_err());
    }

    #[test]
    fn test_percent_resolves_against_max_health() {
        assert_eq!(HealAmount::Percent(50).resolve(100), 50);
        // Integer division truncates
        assert_eq!(HealAmount::Percent(10).resolve(55), 5);
        assert_eq!(HealAmount::Flat(7).resolve(1000), 7);
    }

    #[test]
    fn test_huge_percent_saturates() {
        let huge: HealAmount = "50000000%".parse().unwrap();
        assert_eq!(huge.resolve(100), 50_000_000);
        assert_eq!(huge.resolve(i32::MAX), i32::MAX);
        assert_eq!(HealAmount::Percent(-50_000_000).resolve(i32::MAX), i32::MIN);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ItemKind::Gem.label(), "gem");
        let pack = ItemKind::HealthPack {
            heal: HealAmount::Percent(25),
            max_heal: HealAmount::default(),
        };
        assert_eq!(pack.label(), "health pack");
    }

    #[test]
    fn test_bob_stays_within_amplitude() {
        let tuning = ItemTuning::default();
        let base = Vec2::new(60.0, 48.0);
        let mut item = Item::new(ItemKind::Gem, base, 30, Tint::WHITE);
        for i in 0..200 {
            item.update(i as f32 * 0.05, &tuning);
            assert_eq!(item.position.x, base.x);
            assert!((item.position.y - base.y).abs() <= tuning.bounce_height + 1e-3);
        }
    }
}
