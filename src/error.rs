//! Error types for the engine.
//!
//! Commands never panic on bad input from a caller: they return
//! `ActionError` and leave the game untouched, so a UI or an automated
//! policy can show the reason and try something else.

use thiserror::Error;

use crate::cards::Card;
use crate::game::Phase;

/// Why a group of cards cannot be committed as a meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeldRejection {
    #[error("cards do not form a set or a run")]
    NotASetOrRun,
    #[error("pairs cannot be melded without the pairs upgrade")]
    PairsLocked,
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// Why a card cannot be laid off onto a meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoffRejection {
    #[error("no meld at that index")]
    NoSuchMeld,
    #[error("card does not extend the meld")]
    NotEligible,
}

/// Recoverable failure of an engine command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("invalid meld: {0}")]
    InvalidMeld(MeldRejection),

    #[error("cannot lay off {card} on meld {meld_index}: {reason}")]
    InvalidLayoffTarget {
        card: Card,
        meld_index: usize,
        reason: LayoffRejection,
    },

    #[error("the discard pile is empty")]
    EmptySource,

    /// The stock ran out after the last allowed reshuffle. The round has
    /// been settled as a stalemate by the time this is returned.
    #[error("stock exhausted after the maximum number of reshuffles")]
    Stalemate,

    #[error("cannot {action} during the {phase:?} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("card {0} is not in the current player's hand")]
    CardNotInHand(Card),
}

/// Failure to parse card or meld notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("unknown rank `{0}`")]
    UnknownRank(String),
    #[error("unknown suit letter `{0}`")]
    UnknownSuit(char),
    #[error("malformed card `{0}`")]
    BadCard(String),
    #[error("meld notation contains no cards")]
    EmptyMeld,
}

/// Lookup failure for an upgrade key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown upgrade `{0}`")]
pub struct UnknownUpgrade(pub String);

/// Failure to load or validate a `RulesConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A scripted deal that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has {actual} hands but the table seats {expected}")]
    WrongPlayerCount { expected: usize, actual: usize },
    #[error("card {0} is placed more than once")]
    DuplicateCard(Card),
    #[error("card {0} is not part of a standard deck")]
    ForeignCard(Card),
}

/// Failure to construct a `Game`.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("cannot deal a round during the {0:?} phase")]
    NotBetweenRounds(Phase),
}
