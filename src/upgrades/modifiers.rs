//! Persistent scoring modifiers a player accumulates from upgrades.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::catalog::UpgradeId;
use crate::cards::Rank;

/// Which accumulator an action draws from besides `all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Meld,
    Layoff,
}

/// Accumulators written by upgrade hooks and read by the scoring formula.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreModifiers {
    pub meld_mult: f64,
    pub layoff_mult: f64,
    pub all_mult: f64,
    /// Flat addend to the base of every meld and layoff.
    pub base_mod: i64,
    /// Per-player card values that replace the table value.
    pub rank_overrides: FxHashMap<Rank, u32>,
    /// One-shot ×5 still unused this round.
    pub wildfire_available: bool,
}

impl Default for ScoreModifiers {
    fn default() -> Self {
        Self {
            meld_mult: 1.0,
            layoff_mult: 1.0,
            all_mult: 1.0,
            base_mod: 0,
            rank_overrides: FxHashMap::default(),
            wildfire_available: false,
        }
    }
}

impl ScoreModifiers {
    /// Accumulator for a category (not including `all`).
    #[must_use]
    pub fn category(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Meld => self.meld_mult,
            ScoreCategory::Layoff => self.layoff_mult,
        }
    }
}

/// Upgrades owned by one player, in acquisition order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSet {
    owned: Vec<UpgradeId>,
}

impl UpgradeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: UpgradeId) -> bool {
        self.owned.contains(&id)
    }

    /// Record ownership. Returns false if already owned.
    pub fn insert(&mut self, id: UpgradeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.owned.push(id);
        true
    }

    /// Drop ownership. Returns false if not owned.
    pub fn remove(&mut self, id: UpgradeId) -> bool {
        let before = self.owned.len();
        self.owned.retain(|&o| o != id);
        self.owned.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = UpgradeId> + '_ {
        self.owned.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}
