//! The stock: an ordered, shuffleable pile of cards.
//!
//! The top of the stock is the end of the vector, so `draw` is a `pop`.

use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use crate::core::GameRng;

/// Number of cards in one full deck.
pub const DECK_SIZE: usize = 52;

/// An ordered pile of cards. Top = last element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// An unshuffled 52-card deck: every (rank, suit) exactly once.
    #[must_use]
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// A freshly shuffled 52-card deck.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    /// Build a deck from explicit cards (last card is the top).
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Put cards into the deck (on top, in order).
    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards from bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_standard_deck_is_complete() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);

        let unique: FxHashSet<_> = deck.cards().iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffled_deck_keeps_cards() {
        let mut rng = GameRng::new(9);
        let deck = Deck::shuffled(&mut rng);
        assert_ne!(deck, Deck::standard());

        let mut sorted = deck.cards().to_vec();
        sorted.sort();
        let mut expected = Deck::standard().cards().to_vec();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_draw_takes_top() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        let b = Card::new(Rank::Two, Suit::Spades);
        let mut deck = Deck::from_cards(vec![a, b]);

        assert_eq!(deck.draw(), Some(b));
        assert_eq!(deck.draw(), Some(a));
        assert_eq!(deck.draw(), None);
        assert!(deck.is_empty());
    }
}
