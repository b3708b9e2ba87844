//! Melds: classification, layoffs, and discovery.
//!
//! - `meld`: the committed `Meld`, `classify`, layoff eligibility, notation
//! - `finder`: combinatorial search for candidate melds and layoff targets

pub mod finder;
pub mod meld;

pub use finder::{
    find_all_potential_melds, find_pairs, find_runs, find_sets, find_valid_layoffs,
    LayoffTarget, MeldCandidate,
};
pub use meld::{classify, classify_with, Meld, MeldKind};
