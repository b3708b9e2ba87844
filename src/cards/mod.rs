//! Cards and the stock.
//!
//! ## Key Types
//!
//! - `Rank`, `Suit`: fixed enumerations; declaration order defines adjacency
//! - `Card`: immutable value with a per-deck copy index for identity
//! - `Deck`: the ordered stock, shuffled with the engine's `GameRng`

pub mod card;
pub mod deck;

pub use card::{parse_cards, Card, Rank, Suit};
pub use deck::{Deck, DECK_SIZE};
