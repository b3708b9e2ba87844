//! Result objects returned by engine commands and recorded in history.

use serde::{Deserialize, Serialize};

use super::scoring::{ActionScore, BonusLine};
use crate::cards::Card;
use crate::core::{PlayerId, PlayerMap};
use crate::melds::MeldKind;

/// Which pile a card was drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawSource {
    Stock,
    Discard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub card: Card,
    pub source: DrawSource,
    /// Reshuffles performed to make this draw possible.
    pub reshuffled: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeldOutcome {
    /// Position in the table meld list.
    pub meld_index: usize,
    pub kind: MeldKind,
    pub score: ActionScore,
    /// The meld emptied the hand and ended the round.
    pub player_won: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoffOutcome {
    pub card: Card,
    pub meld_index: usize,
    pub score: ActionScore,
    /// The layoff emptied the hand and ended the round.
    pub player_won: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardOutcome {
    pub card: Card,
    /// The discard was the last card in hand.
    pub player_won: bool,
}

/// A layoff made on a player's behalf during settlement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoLayoff {
    pub player: PlayerId,
    pub card: Card,
    pub meld_index: usize,
    pub points: i64,
}

/// One player's round-end breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettlement {
    pub player: PlayerId,
    /// Points from melds and layoffs, auto-layoffs included.
    pub round_points: i64,
    pub bonuses: Vec<BonusLine>,
    pub flat_total: i64,
    pub multiplier: f64,
    pub final_score: i64,
    pub total_after: i64,
    /// Catchup multiplier granted for the next round.
    pub next_carryover: f64,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Won {
        winner: PlayerId,
        /// Hand emptied by a meld or layoff instead of a discard.
        overflow: bool,
    },
    Stalemate,
}

impl RoundOutcome {
    #[must_use]
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            RoundOutcome::Won { winner, .. } => Some(winner),
            RoundOutcome::Stalemate => None,
        }
    }
}

/// Immutable history entry for a settled round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub settlements: PlayerMap<PlayerSettlement>,
    pub auto_layoffs: Vec<AutoLayoff>,
}

impl RoundRecord {
    /// Final round score per player.
    #[must_use]
    pub fn scores(&self) -> PlayerMap<i64> {
        self.settlements.map(|_, s| s.final_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_winner() {
        let won = RoundOutcome::Won { winner: PlayerId::new(2), overflow: false };
        assert_eq!(won.winner(), Some(PlayerId::new(2)));
        assert_eq!(RoundOutcome::Stalemate.winner(), None);
    }
}
