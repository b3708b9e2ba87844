//! # rummy-rogue
//!
//! Rules and scoring engine for a fast Rummy variant with a roguelike
//! upgrade layer.
//!
//! ## Design Principles
//!
//! 1. **Single Mutator**: `Game` owns all state. Consumers (a UI, an
//!    automated opponent) issue commands and read queries and result
//!    objects; they never mutate shared state.
//!
//! 2. **Explicit Turn Machine**: every command maps to a `TurnEvent` and is
//!    legal only if the phase transition table has an edge for it.
//!
//! 3. **No Partial Failure**: a rejected command returns an `ActionError`
//!    and leaves hands, melds, piles and scores untouched.
//!
//! 4. **Deterministic**: one seeded `GameRng` drives every shuffle and
//!    random choice.
//!
//! ## Modules
//!
//! - `core`: seats, the random source, rules configuration
//! - `cards`: ranks, suits, cards, the stock
//! - `melds`: meld classification, layoffs, notation, the meld finder
//! - `upgrades`: the upgrade catalog and score modifiers
//! - `game`: players, phases, scoring, settlement, the engine
//! - `error`: error types

pub mod cards;
pub mod core;
pub mod error;
pub mod game;
pub mod melds;
pub mod upgrades;

// Re-export commonly used types
pub use crate::core::{GameRng, GameRngState, PlayerId, PlayerMap, RulesConfig};

pub use crate::cards::{parse_cards, Card, Deck, Rank, Suit, DECK_SIZE};

pub use crate::melds::{
    classify, find_all_potential_melds, find_valid_layoffs, LayoffTarget, Meld, MeldCandidate,
    MeldKind,
};

pub use crate::upgrades::{ScoreModifiers, UpgradeId, UpgradeSet, CATALOG};

pub use crate::game::{
    ActionScore, BonusKind, BonusLine, DiscardOutcome, DrawOutcome, DrawSource, Game,
    LayoffOutcome, MeldOutcome, Phase, Player, PlayerRound, PlayerSettlement, RoundLayout,
    RoundOutcome, RoundRecord,
};

pub use crate::error::{
    ActionError, ConfigError, LayoutError, LayoffRejection, MeldRejection, NotationError,
    SetupError, UnknownUpgrade,
};
