//! Turn and round phases as an explicit state machine.
//!
//! Every engine command names the `TurnEvent` it would cause; the command
//! is only legal if `transition(phase, event)` has an edge. Keeping all
//! edges in one table makes the turn structure auditable in one place:
//!
//! ```text
//! Draw ──Draw──▶ Action ──Meld/Layoff──▶ Action
//!   │              │ ├──HandEmptied──▶ RoundEnd
//!   │              │ ├──LastDiscard──▶ RoundEnd
//!   │              │ └──Discard──────▶ Discard ──NextPlayer──▶ Draw
//!   └─StockExhausted─▶ Stalemate
//! RoundEnd/Stalemate ──NextRound──▶ Draw
//! RoundEnd/Stalemate ──GameOver───▶ GameEnd
//! ```

use serde::{Deserialize, Serialize};

/// Where the table is in the turn/round cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Current player must draw one card.
    Draw,
    /// Current player may meld and lay off, then must discard.
    Action,
    /// Current player has discarded; waiting for the hand-off.
    Discard,
    /// A player went out and the round has been settled.
    RoundEnd,
    /// The stock ran dry and the round has been settled without a winner.
    Stalemate,
    /// The last round has been settled.
    GameEnd,
}

impl Phase {
    /// Whether the machine has an edge for `event` from this phase.
    #[must_use]
    pub fn accepts(self, event: TurnEvent) -> bool {
        transition(self, event).is_some()
    }
}

/// Something that happens to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnEvent {
    Draw,
    StockExhausted,
    Meld,
    Layoff,
    /// A meld or layoff used the last card in hand.
    HandEmptied,
    Discard,
    /// The discard used the last card in hand.
    LastDiscard,
    NextPlayer,
    NextRound,
    GameOver,
}

/// The transition table.
#[must_use]
pub fn transition(from: Phase, event: TurnEvent) -> Option<Phase> {
    use Phase as P;
    use TurnEvent as E;

    match (from, event) {
        (P::Draw, E::Draw) => Some(P::Action),
        (P::Draw, E::StockExhausted) => Some(P::Stalemate),
        (P::Action, E::Meld | E::Layoff) => Some(P::Action),
        (P::Action, E::HandEmptied | E::LastDiscard) => Some(P::RoundEnd),
        (P::Action, E::Discard) => Some(P::Discard),
        (P::Discard, E::NextPlayer) => Some(P::Draw),
        (P::RoundEnd | P::Stalemate, E::NextRound) => Some(P::Draw),
        (P::RoundEnd | P::Stalemate, E::GameOver) => Some(P::GameEnd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_turn() {
        let mut phase = Phase::Draw;
        for event in [TurnEvent::Draw, TurnEvent::Meld, TurnEvent::Layoff, TurnEvent::Discard, TurnEvent::NextPlayer] {
            phase = transition(phase, event).unwrap();
        }
        assert_eq!(phase, Phase::Draw);
    }

    #[test]
    fn test_round_endings() {
        assert_eq!(transition(Phase::Action, TurnEvent::HandEmptied), Some(Phase::RoundEnd));
        assert_eq!(transition(Phase::Action, TurnEvent::LastDiscard), Some(Phase::RoundEnd));
        assert_eq!(transition(Phase::Draw, TurnEvent::StockExhausted), Some(Phase::Stalemate));
        assert_eq!(transition(Phase::Stalemate, TurnEvent::NextRound), Some(Phase::Draw));
        assert_eq!(transition(Phase::RoundEnd, TurnEvent::GameOver), Some(Phase::GameEnd));
    }

    #[test]
    fn test_illegal_edges() {
        assert!(!Phase::Draw.accepts(TurnEvent::Meld));
        assert!(!Phase::Draw.accepts(TurnEvent::Discard));
        assert!(!Phase::Action.accepts(TurnEvent::Draw));
        assert!(!Phase::Discard.accepts(TurnEvent::Layoff));
        assert!(!Phase::RoundEnd.accepts(TurnEvent::Draw));
        for event in [TurnEvent::Draw, TurnEvent::NextRound, TurnEvent::GameOver, TurnEvent::Meld] {
            assert!(!Phase::GameEnd.accepts(event));
        }
    }
}
