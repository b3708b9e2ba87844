//! Committed melds: classification, layoff extension, and notation.
//!
//! A meld is created once from cards that classify as a set, a run or
//! (with the pairs upgrade) a pair, and afterwards only grows by layoffs.
//! Layoff cards are tagged by identity so a display can tell them apart
//! from the original cards even when ranks repeat.
//!
//! ## Notation
//!
//! Cards joined with `-`, layoff cards bracketed: `3h-[4h]-5h`.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, Rank, Suit};
use crate::core::{MeldSizes, PlayerId};
use crate::error::{LayoffRejection, MeldRejection, NotationError};

/// Shape of a group of cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Same rank, distinct suits.
    Set,
    /// Same suit, consecutive ranks, Ace low.
    Run,
    /// Two cards of the same rank. Needs the pairs upgrade.
    Pair,
    Invalid,
}

impl MeldKind {
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != MeldKind::Invalid
    }
}

/// Classify cards with the standard size bounds.
///
/// ```
/// use rummy_rogue::cards::parse_cards;
/// use rummy_rogue::melds::{classify, MeldKind};
///
/// assert_eq!(classify(&parse_cards("9s 9h 9c").unwrap(), false), MeldKind::Set);
/// assert_eq!(classify(&parse_cards("4d 5d 6d").unwrap(), false), MeldKind::Run);
/// assert_eq!(classify(&parse_cards("3s 3h 7d").unwrap(), false), MeldKind::Invalid);
/// ```
#[must_use]
pub fn classify(cards: &[Card], allow_pairs: bool) -> MeldKind {
    classify_with(cards, &MeldSizes::default(), allow_pairs)
}

/// Classify cards as a set, run, pair, or invalid.
#[must_use]
pub fn classify_with(cards: &[Card], sizes: &MeldSizes, allow_pairs: bool) -> MeldKind {
    let Some(first) = cards.first() else {
        return MeldKind::Invalid;
    };
    let same_rank = cards.iter().all(|c| c.rank == first.rank);

    if same_rank && (sizes.set_min..=sizes.set_max).contains(&cards.len()) {
        let suits: FxHashSet<Suit> = cards.iter().map(|c| c.suit).collect();
        if suits.len() == cards.len() {
            return MeldKind::Set;
        }
        return MeldKind::Invalid;
    }

    if same_rank && cards.len() == sizes.pair {
        return if allow_pairs { MeldKind::Pair } else { MeldKind::Invalid };
    }

    if cards.len() >= sizes.run_min && cards.iter().all(|c| c.suit == first.suit) {
        let mut indices: SmallVec<[usize; 13]> = cards.iter().map(|c| c.rank.index()).collect();
        indices.sort_unstable();
        if indices.windows(2).all(|w| w[1] == w[0] + 1) {
            return MeldKind::Run;
        }
    }

    MeldKind::Invalid
}

/// A committed meld on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    cards: SmallVec<[Card; 4]>,
    owner: PlayerId,
    kind: MeldKind,
    layoffs: FxHashSet<Card>,
}

impl Meld {
    /// Validate and commit cards as a meld owned by `owner`.
    pub fn try_new(
        cards: &[Card],
        owner: PlayerId,
        sizes: &MeldSizes,
        allow_pairs: bool,
    ) -> Result<Self, MeldRejection> {
        let mut seen = FxHashSet::default();
        if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
            return Err(MeldRejection::DuplicateCard(*dup));
        }

        let kind = classify_with(cards, sizes, allow_pairs);
        if kind == MeldKind::Invalid {
            let is_pair_shape = cards.len() == sizes.pair
                && cards.iter().all(|c| c.rank == cards[0].rank);
            return Err(if is_pair_shape {
                MeldRejection::PairsLocked
            } else {
                MeldRejection::NotASetOrRun
            });
        }

        let mut meld = Self {
            cards: cards.iter().copied().collect(),
            owner,
            kind,
            layoffs: FxHashSet::default(),
        };
        meld.sort();
        Ok(meld)
    }

    #[must_use]
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Cards in display order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True if `card` joined this meld through a layoff.
    #[must_use]
    pub fn is_layoff(&self, card: &Card) -> bool {
        self.layoffs.contains(card)
    }

    /// Shared rank of a set or pair.
    #[must_use]
    pub fn rank(&self) -> Option<Rank> {
        match self.kind {
            MeldKind::Set | MeldKind::Pair => self.cards.first().map(|c| c.rank),
            _ => None,
        }
    }

    /// Point value of the meld under a per-card valuation.
    pub fn value(&self, card_value: impl Fn(&Card) -> u32) -> u32 {
        self.cards.iter().map(card_value).sum()
    }

    /// Whether `card` may be laid off here.
    ///
    /// Sets and pairs take any card of their rank, with no size cap.
    /// Runs only grow at either end, in suit.
    #[must_use]
    pub fn can_layoff(&self, card: &Card) -> bool {
        if self.cards.contains(card) {
            return false;
        }
        match self.kind {
            MeldKind::Set | MeldKind::Pair => self.rank() == Some(card.rank),
            MeldKind::Run => {
                let Some((low, high)) = self.run_bounds() else {
                    return false;
                };
                let suit = self.cards[0].suit;
                let idx = card.rank.index();
                card.suit == suit && (idx + 1 == low || idx == high + 1)
            }
            MeldKind::Invalid => false,
        }
    }

    /// Append a layoff card, tag it, and restore display order.
    pub fn add_layoff(&mut self, card: Card) -> Result<(), LayoffRejection> {
        if !self.can_layoff(&card) {
            return Err(LayoffRejection::NotEligible);
        }
        self.cards.push(card);
        self.layoffs.insert(card);
        self.sort();
        Ok(())
    }

    /// Textual notation, e.g. `3h-[4h]-5h`.
    #[must_use]
    pub fn notation(&self) -> String {
        self.cards
            .iter()
            .map(|c| {
                if self.layoffs.contains(c) {
                    format!("[{c}]")
                } else {
                    c.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Rebuild a meld from its notation.
    ///
    /// The kind is taken from the unbracketed cards, so a set that grew
    /// past four cards through layoffs still parses as a set.
    pub fn parse(text: &str, owner: PlayerId) -> Result<Self, NotationError> {
        let mut cards = SmallVec::new();
        let mut layoffs = FxHashSet::default();

        for token in text.trim().split('-').filter(|t| !t.is_empty()) {
            let (inner, tagged) = match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                Some(inner) => (inner, true),
                None => (token, false),
            };
            let card: Card = inner.parse()?;
            if tagged {
                layoffs.insert(card);
            }
            cards.push(card);
        }
        if cards.is_empty() {
            return Err(NotationError::EmptyMeld);
        }

        let base: Vec<Card> = cards.iter().filter(|c| !layoffs.contains(c)).copied().collect();
        let kind = classify(&base, true);

        Ok(Self {
            cards,
            owner,
            kind,
            layoffs,
        })
    }

    fn run_bounds(&self) -> Option<(usize, usize)> {
        let low = self.cards.iter().map(|c| c.rank.index()).min()?;
        let high = self.cards.iter().map(|c| c.rank.index()).max()?;
        Some((low, high))
    }

    fn sort(&mut self) {
        match self.kind {
            MeldKind::Run => self.cards.sort_by_key(|c| (c.rank, c.copy)),
            _ => self.cards.sort_by_key(|c| (c.suit, c.copy)),
        }
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn meld(text: &str) -> Meld {
        Meld::try_new(&parse_cards(text).unwrap(), PlayerId::new(0), &MeldSizes::default(), true)
            .unwrap()
    }

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn test_classify_sets_and_runs() {
        assert_eq!(classify(&parse_cards("9s 9h 9c").unwrap(), false), MeldKind::Set);
        assert_eq!(classify(&parse_cards("9s 9h 9c 9d").unwrap(), false), MeldKind::Set);
        assert_eq!(classify(&parse_cards("4d 5d 6d").unwrap(), false), MeldKind::Run);
        assert_eq!(classify(&parse_cards("6d 4d 5d").unwrap(), false), MeldKind::Run);
        assert_eq!(classify(&parse_cards("3s 3h 7d").unwrap(), false), MeldKind::Invalid);
    }

    #[test]
    fn test_classify_pairs_need_capability() {
        let twins = parse_cards("9h 9h#1").unwrap();
        assert_eq!(classify(&twins, false), MeldKind::Invalid);
        assert_eq!(classify(&twins, true), MeldKind::Pair);
    }

    #[test]
    fn test_classify_rejects_wraparound_and_gaps() {
        assert_eq!(classify(&parse_cards("Qs Ks As").unwrap(), false), MeldKind::Invalid);
        assert_eq!(classify(&parse_cards("As 2s 3s").unwrap(), false), MeldKind::Run);
        assert_eq!(classify(&parse_cards("4d 5d 7d").unwrap(), false), MeldKind::Invalid);
        assert_eq!(classify(&parse_cards("4d 5d 6h").unwrap(), false), MeldKind::Invalid);
        assert_eq!(classify(&parse_cards("9s 9s#1 9h").unwrap(), false), MeldKind::Invalid);
        assert_eq!(classify(&[], true), MeldKind::Invalid);
    }

    #[test]
    fn test_try_new_rejections() {
        let sizes = MeldSizes::default();
        let owner = PlayerId::new(0);
        assert_eq!(
            Meld::try_new(&parse_cards("9h 9s").unwrap(), owner, &sizes, false),
            Err(MeldRejection::PairsLocked)
        );
        assert_eq!(
            Meld::try_new(&parse_cards("9h 9h 9s").unwrap(), owner, &sizes, false),
            Err(MeldRejection::DuplicateCard(card("9h")))
        );
        assert_eq!(
            Meld::try_new(&parse_cards("2h 9h 9s").unwrap(), owner, &sizes, false),
            Err(MeldRejection::NotASetOrRun)
        );
    }

    #[test]
    fn test_run_layoff_only_at_ends() {
        let run = meld("4d 5d 6d");
        assert!(run.can_layoff(&card("3d")));
        assert!(run.can_layoff(&card("7d")));
        assert!(!run.can_layoff(&card("8d")));
        assert!(!run.can_layoff(&card("4h")));
        assert!(!run.can_layoff(&card("5d")));
    }

    #[test]
    fn test_set_layoff_by_rank() {
        let set = meld("9s 9h 9c");
        assert!(set.can_layoff(&card("9d")));
        assert!(!set.can_layoff(&card("8d")));
    }

    #[test]
    fn test_set_grows_past_four() {
        let mut set = meld("9s 9h 9c 9d");
        set.add_layoff(card("9s#1")).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.kind(), MeldKind::Set);
    }

    #[test]
    fn test_add_layoff_tags_and_sorts() {
        let mut run = meld("5h 3h 4h");
        assert_eq!(run.notation(), "3h-4h-5h");

        run.add_layoff(card("2h")).unwrap();
        assert_eq!(run.notation(), "[2h]-3h-4h-5h");
        assert!(run.is_layoff(&card("2h")));
        assert!(!run.is_layoff(&card("3h")));

        assert_eq!(run.add_layoff(card("9h")), Err(LayoffRejection::NotEligible));
        assert_eq!(run.len(), 4);
    }

    #[test]
    fn test_set_display_order_is_canonical() {
        let set = meld("9c 9s 9d 9h");
        assert_eq!(set.notation(), "9s-9h-9d-9c");
    }

    #[test]
    fn test_value_uses_valuation() {
        let set = meld("Js Jh Jc");
        assert_eq!(set.value(|c| c.rank.default_value()), 30);
        assert_eq!(set.value(|_| 20), 60);
    }

    #[test]
    fn test_notation_roundtrip() {
        let mut run = meld("3h 5h 4h");
        run.add_layoff(card("6h")).unwrap();
        let text = run.notation();
        assert_eq!(text, "3h-4h-5h-[6h]");

        let parsed = Meld::parse(&text, PlayerId::new(0)).unwrap();
        assert_eq!(parsed, run);
        assert_eq!(parsed.kind(), MeldKind::Run);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Meld::parse("", PlayerId::new(0)), Err(NotationError::EmptyMeld));
        assert!(Meld::parse("3h-[4x]", PlayerId::new(0)).is_err());
    }
}
