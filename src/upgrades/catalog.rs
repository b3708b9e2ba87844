//! Upgrade catalog.
//!
//! `UpgradeId` is a closed enumeration and `CATALOG` is its definition
//! table, indexed by discriminant. An entry either carries an apply/remove
//! pair that rewrites the owner's `ScoreModifiers`, or no hooks at all, in
//! which case the scoring code checks ownership of the id directly.
//!
//! ```
//! use rummy_rogue::upgrades::UpgradeId;
//!
//! let id: UpgradeId = "combo".parse().unwrap();
//! assert_eq!(id, UpgradeId::Combo);
//! assert_eq!(id.def().name, "Combo");
//! assert!("recycled_wood".parse::<UpgradeId>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::modifiers::{ScoreModifiers, UpgradeSet};
use crate::cards::Rank;
use crate::core::GameRng;
use crate::error::UnknownUpgrade;

// === Effect constants ===

pub const WILDFIRE_MULT: f64 = 5.0;
pub const EVO_SCALE_STEP: f64 = 0.5;
pub const EVO_BASE_STEP: i64 = 5;
pub const RECYCLING_PLANT_STEP: i64 = 10;
pub const MASON_MULT: f64 = 1.5;
pub const COURIER_MULT: f64 = 2.0;
pub const GOLDEN_TOUCH_MULT: f64 = 1.25;
pub const SHARP_EDGE_BASE: i64 = 5;
pub const ROYAL_COURT_VALUE: u32 = 20;

/// Every upgrade a player can own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    Pairs,
    Combo,
    Wildfire,
    EvoScale,
    EvoBase,
    RecyclingPlant,
    Mason,
    Courier,
    GoldenTouch,
    SharpEdge,
    RoyalCourt,
}

/// Side-effecting hook on the owner's modifiers.
pub type UpgradeHook = fn(&mut ScoreModifiers);

/// Static description of one upgrade.
#[derive(Clone, Copy)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    /// Stable lookup key, e.g. `evo_scale`.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub apply: Option<UpgradeHook>,
    pub remove: Option<UpgradeHook>,
}

impl fmt::Debug for UpgradeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeDef")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("has_apply", &self.apply.is_some())
            .field("has_remove", &self.remove.is_some())
            .finish()
    }
}

/// Definition table. Entry `i` describes the variant with discriminant `i`.
pub static CATALOG: [UpgradeDef; 11] = [
    UpgradeDef {
        id: UpgradeId::Pairs,
        key: "pairs",
        name: "Pairs",
        description: "Two cards of the same rank can be melded as a pair.",
        apply: None,
        remove: None,
    },
    UpgradeDef {
        id: UpgradeId::Combo,
        key: "combo",
        name: "Combo",
        description: "Every third meld or layoff in a round scores a flat 50 bonus.",
        apply: None,
        remove: None,
    },
    UpgradeDef {
        id: UpgradeId::Wildfire,
        key: "wildfire",
        name: "Wildfire",
        description: "Your first meld or layoff each round scores x5.",
        apply: Some(|m: &mut ScoreModifiers| m.wildfire_available = true),
        remove: Some(|m: &mut ScoreModifiers| m.wildfire_available = false),
    },
    UpgradeDef {
        id: UpgradeId::EvoScale,
        key: "evo_scale",
        name: "Evolving Scale",
        description: "Actions score +0.5x for every round played since you took this.",
        apply: None,
        remove: None,
    },
    UpgradeDef {
        id: UpgradeId::EvoBase,
        key: "evo_base",
        name: "Evolving Base",
        description: "Actions gain +5 base for every round played since you took this.",
        apply: None,
        remove: None,
    },
    UpgradeDef {
        id: UpgradeId::RecyclingPlant,
        key: "recycling_plant",
        name: "Recycling Plant",
        description: "Actions gain +10 base for every reshuffle of the stock you have seen.",
        apply: None,
        remove: None,
    },
    UpgradeDef {
        id: UpgradeId::Mason,
        key: "mason",
        name: "Mason",
        description: "Melds score x1.5.",
        apply: Some(|m: &mut ScoreModifiers| m.meld_mult *= MASON_MULT),
        remove: Some(|m: &mut ScoreModifiers| m.meld_mult /= MASON_MULT),
    },
    UpgradeDef {
        id: UpgradeId::Courier,
        key: "courier",
        name: "Courier",
        description: "Layoffs score x2.",
        apply: Some(|m: &mut ScoreModifiers| m.layoff_mult *= COURIER_MULT),
        remove: Some(|m: &mut ScoreModifiers| m.layoff_mult /= COURIER_MULT),
    },
    UpgradeDef {
        id: UpgradeId::GoldenTouch,
        key: "golden_touch",
        name: "Golden Touch",
        description: "Everything you score is worth x1.25.",
        apply: Some(|m: &mut ScoreModifiers| m.all_mult *= GOLDEN_TOUCH_MULT),
        remove: Some(|m: &mut ScoreModifiers| m.all_mult /= GOLDEN_TOUCH_MULT),
    },
    UpgradeDef {
        id: UpgradeId::SharpEdge,
        key: "sharp_edge",
        name: "Sharp Edge",
        description: "Melds and layoffs gain +5 base.",
        apply: Some(|m: &mut ScoreModifiers| m.base_mod += SHARP_EDGE_BASE),
        remove: Some(|m: &mut ScoreModifiers| m.base_mod -= SHARP_EDGE_BASE),
    },
    UpgradeDef {
        id: UpgradeId::RoyalCourt,
        key: "royal_court",
        name: "Royal Court",
        description: "Your Jacks, Queens and Kings are worth 20.",
        apply: Some(|m: &mut ScoreModifiers| {
            for rank in [Rank::Jack, Rank::Queen, Rank::King] {
                m.rank_overrides.insert(rank, ROYAL_COURT_VALUE);
            }
        }),
        remove: Some(|m: &mut ScoreModifiers| m.rank_overrides.retain(|rank, _| !rank.is_court())),
    },
];

impl UpgradeId {
    /// Every upgrade, in catalog order.
    pub const ALL: [UpgradeId; 11] = [
        UpgradeId::Pairs,
        UpgradeId::Combo,
        UpgradeId::Wildfire,
        UpgradeId::EvoScale,
        UpgradeId::EvoBase,
        UpgradeId::RecyclingPlant,
        UpgradeId::Mason,
        UpgradeId::Courier,
        UpgradeId::GoldenTouch,
        UpgradeId::SharpEdge,
        UpgradeId::RoyalCourt,
    ];

    /// Catalog entry for this upgrade.
    #[must_use]
    pub fn def(self) -> &'static UpgradeDef {
        &CATALOG[self as usize]
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        self.def().key
    }

    /// Run the apply hook, if any.
    pub fn apply(self, modifiers: &mut ScoreModifiers) {
        if let Some(hook) = self.def().apply {
            hook(modifiers);
        }
    }

    /// Run the remove hook, if any.
    pub fn remove(self, modifiers: &mut ScoreModifiers) {
        if let Some(hook) = self.def().remove {
            hook(modifiers);
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpgradeId {
    type Err = UnknownUpgrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .find(|def| def.key == s)
            .map(|def| def.id)
            .ok_or_else(|| UnknownUpgrade(s.to_string()))
    }
}

/// Draw up to `count` distinct upgrades the owner does not have yet.
///
/// The remaining catalog is shuffled uniformly and the first `count`
/// entries are returned.
pub fn draw_offer(owned: &UpgradeSet, count: usize, rng: &mut GameRng) -> Vec<UpgradeId> {
    let mut pool: Vec<UpgradeId> = UpgradeId::ALL
        .iter()
        .copied()
        .filter(|&id| !owned.contains(id))
        .collect();
    rng.shuffle(&mut pool);
    pool.truncate(count);
    pool
}
