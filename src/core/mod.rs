//! Core engine types: seats, the random source, and rules configuration.
//!
//! These are game-agnostic building blocks; everything that knows about
//! melds, upgrades or scoring lives in the other modules.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{ActionMultipliers, BonusConfig, CardValues, MeldSizes, RulesConfig};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
