//! Meld discovery over a hand.
//!
//! Pure functions: nothing here mutates the hand or the table. The engine
//! uses them for previews and for auto-layoff, and automated players use
//! them to decide what to commit.
//!
//! Runs are reported maximal (a five-card run is one candidate, not three
//! overlapping windows) and a rank held four times is one set of four.
//! Every candidate is checked against the `MeldSizes` the table plays
//! with, so anything returned here is accepted by `Game::create_meld`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::meld::{classify_with, Meld, MeldKind};
use crate::cards::{Card, Rank, Suit};
use crate::core::{MeldSizes, PlayerId};

/// A group of hand cards that would be accepted as a meld.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldCandidate {
    pub kind: MeldKind,
    pub cards: Vec<Card>,
}

/// A table meld a card could be laid off onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoffTarget {
    pub meld_index: usize,
    pub owner: PlayerId,
}

/// All maximal runs and all sets in `hand`.
///
/// ```
/// use rummy_rogue::cards::parse_cards;
/// use rummy_rogue::core::MeldSizes;
/// use rummy_rogue::melds::{find_all_potential_melds, MeldKind};
///
/// let hand = parse_cards("4d 5d 6d 7d 8d 9s 9h 9c Kh").unwrap();
/// let found = find_all_potential_melds(&hand, &MeldSizes::default());
///
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].kind, MeldKind::Run);
/// assert_eq!(found[0].cards.len(), 5);
/// assert_eq!(found[1].kind, MeldKind::Set);
/// ```
#[must_use]
pub fn find_all_potential_melds(hand: &[Card], sizes: &MeldSizes) -> Vec<MeldCandidate> {
    let mut found = find_runs(hand, sizes);
    found.extend(find_sets(hand, sizes));
    found
}

/// Maximal same-suit consecutive runs at least `sizes.run_min` long.
#[must_use]
pub fn find_runs(hand: &[Card], sizes: &MeldSizes) -> Vec<MeldCandidate> {
    let mut found = Vec::new();

    for suit in Suit::ALL {
        let mut cards: SmallVec<[Card; 13]> = hand.iter().filter(|c| c.suit == suit).copied().collect();
        cards.sort_by_key(|c| (c.rank, c.copy));
        cards.dedup_by_key(|c| c.rank);

        let mut segment: Vec<Card> = Vec::new();
        for card in cards {
            let extends = segment
                .last()
                .is_some_and(|last| last.rank.index() + 1 == card.rank.index());
            if !extends {
                push_run(&mut found, std::mem::take(&mut segment), sizes);
            }
            segment.push(card);
        }
        push_run(&mut found, segment, sizes);
    }

    found
}

fn push_run(found: &mut Vec<MeldCandidate>, segment: Vec<Card>, sizes: &MeldSizes) {
    if classify_with(&segment, sizes, false) == MeldKind::Run {
        found.push(MeldCandidate {
            kind: MeldKind::Run,
            cards: segment,
        });
    }
}

/// One set per rank held at least `sizes.set_min` times, capped at
/// `sizes.set_max` cards.
#[must_use]
pub fn find_sets(hand: &[Card], sizes: &MeldSizes) -> Vec<MeldCandidate> {
    groups_by_rank(hand)
        .into_iter()
        .map(|mut group| {
            group.truncate(sizes.set_max);
            group
        })
        .filter(|group| classify_with(group, sizes, false) == MeldKind::Set)
        .map(|cards| MeldCandidate {
            kind: MeldKind::Set,
            cards,
        })
        .collect()
}

/// Every rank held exactly `sizes.pair` times. Only meldable with the
/// pairs upgrade.
#[must_use]
pub fn find_pairs(hand: &[Card], sizes: &MeldSizes) -> Vec<MeldCandidate> {
    groups_by_rank(hand)
        .into_iter()
        .filter(|group| classify_with(group, sizes, true) == MeldKind::Pair)
        .map(|cards| MeldCandidate {
            kind: MeldKind::Pair,
            cards,
        })
        .collect()
}

fn groups_by_rank(hand: &[Card]) -> Vec<Vec<Card>> {
    Rank::ALL
        .iter()
        .map(|&rank| {
            let mut group: Vec<Card> = hand.iter().filter(|c| c.rank == rank).copied().collect();
            group.sort_by_key(|c| (c.suit, c.copy));
            group
        })
        .filter(|group| !group.is_empty())
        .collect()
}

/// Table melds that would accept `card` as a layoff.
#[must_use]
pub fn find_valid_layoffs(card: &Card, melds: &[Meld]) -> Vec<LayoffTarget> {
    melds
        .iter()
        .enumerate()
        .filter(|(_, meld)| meld.can_layoff(card))
        .map(|(meld_index, meld)| LayoffTarget {
            meld_index,
            owner: meld.owner(),
        })
        .collect()
}
