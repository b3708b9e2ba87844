//! Scripted deals.
//!
//! A `RoundLayout` fixes some or all of the cards a round starts with.
//! Every card of the standard deck that the layout does not place is
//! shuffled into the stock beneath `stock_top`, so a layout always deals
//! exactly 52 cards.
//!
//! ```
//! use rummy_rogue::cards::parse_cards;
//! use rummy_rogue::game::RoundLayout;
//!
//! let layout = RoundLayout::new(vec![
//!     parse_cards("9s 9h 9c 2d").unwrap(),
//!     parse_cards("4d 5d 6d Kc").unwrap(),
//! ])
//! .with_discard(parse_cards("Qh").unwrap())
//! .with_stock_top(parse_cards("9d").unwrap());
//!
//! assert!(layout.validate(2).is_ok());
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck};
use crate::core::{GameRng, PlayerId};
use crate::error::LayoutError;

/// Cards a round starts with, by position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLayout {
    /// One hand per seat, in seat order.
    pub hands: Vec<Vec<Card>>,
    /// Discard pile, bottom first.
    pub discard: Vec<Card>,
    /// Cards on top of the stock, next draw first.
    pub stock_top: Vec<Card>,
    /// Seat that takes the first turn. Defaults to the round's rotation.
    pub starting_player: Option<PlayerId>,
}

/// Cards in position, ready to become a round.
pub(crate) struct Dealt {
    pub hands: Vec<Vec<Card>>,
    pub discard: Vec<Card>,
    pub stock: Deck,
}

impl RoundLayout {
    #[must_use]
    pub fn new(hands: Vec<Vec<Card>>) -> Self {
        Self {
            hands,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_discard(mut self, discard: Vec<Card>) -> Self {
        self.discard = discard;
        self
    }

    #[must_use]
    pub fn with_stock_top(mut self, stock_top: Vec<Card>) -> Self {
        self.stock_top = stock_top;
        self
    }

    #[must_use]
    pub fn with_starting_player(mut self, player: PlayerId) -> Self {
        self.starting_player = Some(player);
        self
    }

    fn placed(&self) -> impl Iterator<Item = &Card> {
        self.hands
            .iter()
            .flatten()
            .chain(&self.discard)
            .chain(&self.stock_top)
    }

    /// Check the layout against a table of `player_count` seats.
    pub fn validate(&self, player_count: usize) -> Result<(), LayoutError> {
        if self.hands.len() != player_count {
            return Err(LayoutError::WrongPlayerCount {
                expected: player_count,
                actual: self.hands.len(),
            });
        }
        if let Some(seat) = self.starting_player {
            if seat.index() >= player_count {
                return Err(LayoutError::WrongPlayerCount {
                    expected: player_count,
                    actual: seat.index() + 1,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for card in self.placed() {
            if card.copy != 0 {
                return Err(LayoutError::ForeignCard(*card));
            }
            if !seen.insert(*card) {
                return Err(LayoutError::DuplicateCard(*card));
            }
        }
        Ok(())
    }

    /// Place the cards. Assumes `validate` passed.
    pub(crate) fn deal(self, rng: &mut GameRng) -> Dealt {
        let placed: FxHashSet<Card> = self.placed().copied().collect();
        let mut rest: Vec<Card> = Deck::standard()
            .cards()
            .iter()
            .copied()
            .filter(|c| !placed.contains(c))
            .collect();
        rng.shuffle(&mut rest);

        let mut stock = Deck::from_cards(rest);
        stock.extend(self.stock_top.into_iter().rev());

        Dealt {
            hands: self.hands,
            discard: self.discard,
            stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, DECK_SIZE};

    #[test]
    fn test_validate_counts_seats() {
        let layout = RoundLayout::new(vec![vec![], vec![]]);
        assert!(layout.validate(2).is_ok());
        assert_eq!(
            layout.validate(3),
            Err(LayoutError::WrongPlayerCount { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_duplicates_and_copies() {
        let dup = RoundLayout::new(vec![parse_cards("9s 9h").unwrap(), vec![]])
            .with_discard(parse_cards("9s").unwrap());
        assert!(matches!(dup.validate(2), Err(LayoutError::DuplicateCard(_))));

        let foreign = RoundLayout::new(vec![parse_cards("9s#1").unwrap(), vec![]]);
        assert!(matches!(foreign.validate(2), Err(LayoutError::ForeignCard(_))));
    }

    #[test]
    fn test_deal_fills_stock_beneath_top() {
        let layout = RoundLayout::new(vec![parse_cards("As 2s").unwrap(), parse_cards("3s").unwrap()])
            .with_discard(parse_cards("4s").unwrap())
            .with_stock_top(parse_cards("5s 6s").unwrap());
        let mut rng = GameRng::new(1);
        let mut dealt = layout.deal(&mut rng);

        let total = dealt.hands.iter().map(Vec::len).sum::<usize>() + dealt.discard.len() + dealt.stock.len();
        assert_eq!(total, DECK_SIZE);
        assert_eq!(dealt.stock.draw().unwrap().to_string(), "5s");
        assert_eq!(dealt.stock.draw().unwrap().to_string(), "6s");
    }
}
