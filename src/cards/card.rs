//! Card values: rank, suit, and per-deck identity.
//!
//! A `Card` is a plain value. Two cards with the same rank and suit are
//! only distinct when they come from different physical decks, which is
//! what the `copy` index records. With a single 52-card deck every card
//! has `copy == 0` and (rank, suit) alone identifies it.
//!
//! ## Notation
//!
//! `<rank><suit-letter>`, e.g. `10s`, `Ah`, `Qd`. A non-zero copy index is
//! written as a `#n` suffix: `9h#1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// Card rank. Declaration order is rank order: Ace is low and only low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric index used for run adjacency (Ace = 0, King = 12).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank at the given index, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Rank> {
        Self::ALL.get(index).copied()
    }

    /// Printed symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// Standard point value: Ace 11, pips face value, court cards 10.
    #[must_use]
    pub const fn default_value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other as u32 + 1,
        }
    }

    /// Jack, Queen or King.
    #[must_use]
    pub const fn is_court(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Rank {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| NotationError::UnknownRank(s.to_string()))
    }
}

/// Card suit. Declaration order is the canonical display order for sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "s")]
    Spades,
    #[serde(rename = "h")]
    Hearts,
    #[serde(rename = "d")]
    Diamonds,
    #[serde(rename = "c")]
    Clubs,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Single-letter notation.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    /// Parse a notation letter.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Suit> {
        Suit::ALL
            .iter()
            .copied()
            .find(|s| s.letter() == letter.to_ascii_lowercase())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A playing card.
///
/// Immutable value; equality is identity. `copy` distinguishes otherwise
/// identical cards from different physical decks.
///
/// ```
/// use rummy_rogue::cards::{Card, Rank, Suit};
///
/// let card: Card = "10s".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Ten, Suit::Spades));
/// assert_eq!(card.to_string(), "10s");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    /// Per-deck instance index.
    #[serde(default)]
    pub copy: u8,
}

impl Card {
    /// Create a card from the first deck.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit, copy: 0 }
    }

    /// Create a card from a specific deck copy.
    #[must_use]
    pub const fn with_copy(rank: Rank, suit: Suit, copy: u8) -> Self {
        Self { rank, suit, copy }
    }

    /// True if both cards have the same rank and suit, ignoring deck copy.
    #[must_use]
    pub fn same_face(&self, other: &Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)?;
        if self.copy != 0 {
            write!(f, "#{}", self.copy)?;
        }
        Ok(())
    }
}

impl FromStr for Card {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (face, copy) = match s.split_once('#') {
            Some((face, copy)) => {
                let copy = copy
                    .parse::<u8>()
                    .map_err(|_| NotationError::BadCard(s.to_string()))?;
                (face, copy)
            }
            None => (s, 0),
        };

        let letter = face
            .chars()
            .last()
            .ok_or_else(|| NotationError::BadCard(s.to_string()))?;
        let suit = Suit::from_letter(letter).ok_or(NotationError::UnknownSuit(letter))?;
        let rank: Rank = face[..face.len() - letter.len_utf8()].parse()?;

        Ok(Card::with_copy(rank, suit, copy))
    }
}

/// Parse a whitespace- or comma-separated list of cards.
///
/// ```
/// use rummy_rogue::cards::parse_cards;
///
/// let cards = parse_cards("9s 9h, 9c").unwrap();
/// assert_eq!(cards.len(), 3);
/// ```
pub fn parse_cards(text: &str) -> Result<Vec<Card>, NotationError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}
