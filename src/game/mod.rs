//! Rounds, turns and scoring.
//!
//! ## Key Types
//!
//! - `Game`: the engine, sole mutator of game state
//! - `Phase` / `transition`: the turn state machine
//! - `Player` / `PlayerRound` / `RoundState`: persistent and round-scoped state
//! - `RoundLayout`: scripted deals for tests and tools
//! - Outcome types returned by every command and kept in history

pub mod engine;
pub mod layout;
pub mod outcome;
pub mod phase;
pub mod player;
pub mod scoring;

pub use engine::Game;
pub use layout::RoundLayout;
pub use outcome::{
    AutoLayoff, DiscardOutcome, DrawOutcome, DrawSource, LayoffOutcome, MeldOutcome,
    PlayerSettlement, RoundOutcome, RoundRecord,
};
pub use phase::{transition, Phase, TurnEvent};
pub use player::{EvoCounter, Player, PlayerRound, RoundState};
pub use scoring::{ActionKind, ActionScore, BonusAmount, BonusKind, BonusLine};
