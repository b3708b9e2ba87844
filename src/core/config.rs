//! Rules configuration.
//!
//! Loaded once at startup and immutable afterwards: the engine stores its
//! own copy and only hands out shared references. Every section has a
//! serde default, so a config file only needs the keys it changes.
//!
//! ```
//! use rummy_rogue::core::RulesConfig;
//!
//! let config = RulesConfig::from_json_str(r#"{ "cards_dealt": 5 }"#).unwrap();
//! assert_eq!(config.cards_dealt, 5);
//! assert_eq!(config.multipliers.set, 3.0);
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Rank, DECK_SIZE};
use crate::error::ConfigError;

/// Point value per rank.
///
/// Ranks missing from the map fall back to `Rank::default_value`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardValues(pub FxHashMap<Rank, u32>);

impl CardValues {
    /// Value of a rank under this table.
    #[must_use]
    pub fn get(&self, rank: Rank) -> u32 {
        self.0.get(&rank).copied().unwrap_or_else(|| rank.default_value())
    }
}

/// Size bounds for each meld shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeldSizes {
    pub set_min: usize,
    pub set_max: usize,
    pub run_min: usize,
    pub pair: usize,
}

impl Default for MeldSizes {
    fn default() -> Self {
        Self {
            set_min: 3,
            set_max: 4,
            run_min: 3,
            pair: 2,
        }
    }
}

/// Per-action score multipliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionMultipliers {
    pub set: f64,
    pub run: f64,
    pub pair: f64,
    pub layoff: f64,
}

impl Default for ActionMultipliers {
    fn default() -> Self {
        Self {
            set: 3.0,
            run: 2.5,
            pair: 1.5,
            layoff: 2.0,
        }
    }
}

/// Round-end and combo bonus constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// Flat bonus for the round winner.
    pub win: i64,
    /// Opponents' remaining hand value is divided by this.
    pub deadwood_divisor: u32,
    /// Upper bound of the deadwood bonus.
    pub deadwood_cap: i64,
    /// Flat bonus for emptying the hand before discarding.
    pub overflow: i64,
    /// Layoffs beyond this count do not raise the layoff multiplier.
    pub layoff_cap: u32,
    /// Multiplier increment per counted layoff.
    pub layoff_per_level: f64,
    /// Flat bonus of the combo upgrade before the `all` multiplier.
    pub combo: f64,
    /// Combo fires on every n-th scoring action.
    pub combo_every: u32,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            win: 100,
            deadwood_divisor: 10,
            deadwood_cap: 100,
            overflow: 50,
            layoff_cap: 5,
            layoff_per_level: 0.1,
            combo: 50.0,
            combo_every: 3,
        }
    }
}

/// Complete rules configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub card_values: CardValues,
    pub meld_sizes: MeldSizes,
    pub multipliers: ActionMultipliers,
    pub bonuses: BonusConfig,
    /// Next-round multiplier gained per point behind the leader.
    pub catchup_rate: f64,
    /// Reshuffles of the discard pile allowed per round.
    pub max_reshuffles: u8,
    pub cards_dealt: usize,
    /// Settled rounds after which the game ends.
    pub rounds_per_game: u32,
    /// Seat names in turn order. Their count is the table size.
    pub player_names: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            card_values: CardValues::default(),
            meld_sizes: MeldSizes::default(),
            multipliers: ActionMultipliers::default(),
            bonuses: BonusConfig::default(),
            catchup_rate: 0.002,
            max_reshuffles: 2,
            cards_dealt: 7,
            rounds_per_game: 5,
            player_names: ["You", "Bot 1", "Bot 2", "Bot 3"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RulesConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// Set the seat names (builder pattern).
    #[must_use]
    pub fn with_players<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the hand size (builder pattern).
    #[must_use]
    pub fn with_cards_dealt(mut self, cards: usize) -> Self {
        self.cards_dealt = cards;
        self
    }

    /// Set the game length (builder pattern).
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds_per_game = rounds;
        self
    }

    /// Check that a round can actually be dealt and scored.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_count();
        if !(2..=8).contains(&players) {
            return Err(ConfigError::Invalid(format!(
                "player count must be 2-8, got {players}"
            )));
        }
        if self.cards_dealt == 0 || players * self.cards_dealt + 1 > DECK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "cannot deal {} cards to {players} players from {DECK_SIZE}",
                self.cards_dealt
            )));
        }
        let m = &self.multipliers;
        if [m.set, m.run, m.pair, m.layoff].iter().any(|&x| !(x > 0.0)) {
            return Err(ConfigError::Invalid("action multipliers must be positive".into()));
        }
        if self.bonuses.deadwood_divisor == 0 {
            return Err(ConfigError::Invalid("deadwood divisor must be non-zero".into()));
        }
        if self.bonuses.combo_every == 0 {
            return Err(ConfigError::Invalid("combo interval must be non-zero".into()));
        }
        let sizes = &self.meld_sizes;
        if sizes.set_min > sizes.set_max || sizes.run_min < 2 || sizes.pair < 2 {
            return Err(ConfigError::Invalid("meld size bounds are inconsistent".into()));
        }
        // a set size that overlaps the pair size would shadow pairs
        if sizes.set_min <= sizes.pair {
            return Err(ConfigError::Invalid(format!(
                "smallest set ({}) must be larger than a pair ({})",
                sizes.set_min, sizes.pair
            )));
        }
        if self.catchup_rate < 0.0 {
            return Err(ConfigError::Invalid("catchup rate cannot be negative".into()));
        }
        if self.rounds_per_game == 0 {
            return Err(ConfigError::Invalid("a game needs at least one round".into()));
        }
        Ok(())
    }
}
