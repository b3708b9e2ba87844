//! Player state, split by lifetime.
//!
//! - `Player`: survives round resets. Upgrades, their accumulators and
//!   counters, the running total and the carryover multiplier.
//! - `PlayerRound`: lives for exactly one round and is replaced wholesale
//!   (inside a fresh `RoundState`) when the next round is dealt.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::cards::{Card, Deck};
use crate::core::{CardValues, PlayerId, PlayerMap};
use crate::melds::{Meld, MeldKind};
use crate::upgrades::{ScoreModifiers, UpgradeId, UpgradeSet};

/// Win/loss tally that drives one evolving upgrade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvoCounter {
    pub wins: u32,
    pub losses: u32,
}

impl EvoCounter {
    /// Rounds counted so far.
    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Persistent per-player state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    upgrades: UpgradeSet,
    modifiers: ScoreModifiers,
    pub(crate) evo_scale: EvoCounter,
    pub(crate) evo_base: EvoCounter,
    /// Reshuffles witnessed while owning the recycling plant.
    pub(crate) recycled: u32,
    /// Catchup multiplier for the current round.
    pub(crate) carryover: f64,
    pub(crate) total_score: i64,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upgrades: UpgradeSet::new(),
            modifiers: ScoreModifiers::default(),
            evo_scale: EvoCounter::default(),
            evo_base: EvoCounter::default(),
            recycled: 0,
            carryover: 1.0,
            total_score: 0,
        }
    }

    #[must_use]
    pub fn upgrades(&self) -> &UpgradeSet {
        &self.upgrades
    }

    #[must_use]
    pub fn owns(&self, id: UpgradeId) -> bool {
        self.upgrades.contains(id)
    }

    #[must_use]
    pub fn modifiers(&self) -> &ScoreModifiers {
        &self.modifiers
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut ScoreModifiers {
        &mut self.modifiers
    }

    #[must_use]
    pub fn evo_scale(&self) -> EvoCounter {
        self.evo_scale
    }

    #[must_use]
    pub fn evo_base(&self) -> EvoCounter {
        self.evo_base
    }

    #[must_use]
    pub fn recycled(&self) -> u32 {
        self.recycled
    }

    #[must_use]
    pub fn carryover(&self) -> f64 {
        self.carryover
    }

    #[must_use]
    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    /// Take an upgrade. No-op returning false if already owned.
    pub fn apply_upgrade(&mut self, id: UpgradeId) -> bool {
        if !self.upgrades.insert(id) {
            return false;
        }
        id.apply(&mut self.modifiers);
        true
    }

    /// Give up an upgrade. No-op returning false if not owned.
    pub fn remove_upgrade(&mut self, id: UpgradeId) -> bool {
        if !self.upgrades.remove(id) {
            return false;
        }
        id.remove(&mut self.modifiers);
        true
    }

    /// Card value for this player: upgrade override, else the table value.
    #[must_use]
    pub fn card_value(&self, card: &Card, table: &CardValues) -> u32 {
        self.modifiers
            .rank_overrides
            .get(&card.rank)
            .copied()
            .unwrap_or_else(|| table.get(card.rank))
    }

    /// Re-arm one-shot effects at the start of a round.
    pub(crate) fn begin_round(&mut self) {
        self.modifiers.wildfire_available = self.owns(UpgradeId::Wildfire);
    }
}

/// Round-scoped per-player state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRound {
    pub hand: Vec<Card>,
    /// Points scored by melds and layoffs this round.
    pub points: i64,
    pub melds: u32,
    pub sets: u32,
    pub runs: u32,
    pub pairs: u32,
    pub layoffs: u32,
    /// Scoring actions taken, for the combo upgrade.
    pub actions: u32,
    /// Hand emptied by a meld or layoff rather than a discard.
    pub emptied_early: bool,
}

impl PlayerRound {
    #[must_use]
    pub fn with_hand(hand: Vec<Card>) -> Self {
        Self {
            hand,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn holds(&self, card: &Card) -> bool {
        self.hand.contains(card)
    }

    /// Remove one card by identity.
    pub(crate) fn take(&mut self, card: &Card) -> Option<Card> {
        let pos = self.hand.iter().position(|c| c == card)?;
        Some(self.hand.remove(pos))
    }

    pub(crate) fn count_meld(&mut self, kind: MeldKind) {
        self.melds += 1;
        match kind {
            MeldKind::Set => self.sets += 1,
            MeldKind::Run => self.runs += 1,
            MeldKind::Pair => self.pairs += 1,
            MeldKind::Invalid => {}
        }
    }
}

/// Everything that exists only for the current round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub number: u32,
    pub phase: Phase,
    pub current: PlayerId,
    pub stock: Deck,
    /// Top is the last element.
    pub discard: Vec<Card>,
    pub melds: Vec<Meld>,
    pub reshuffles: u8,
    pub players: PlayerMap<PlayerRound>,
}

impl RoundState {
    /// Cards accounted for anywhere on the table.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.stock.len()
            + self.discard.len()
            + self.players.values().map(|p| p.hand.len()).sum::<usize>()
            + self.melds.iter().map(Meld::len).sum::<usize>()
    }
}
