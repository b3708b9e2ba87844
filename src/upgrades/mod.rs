//! Upgrade system: the catalog and the modifiers upgrades write.
//!
//! ## Key Types
//!
//! - `UpgradeId`: closed enumeration of upgrades
//! - `UpgradeDef` / `CATALOG`: display metadata plus optional apply/remove hooks
//! - `ScoreModifiers`: per-player accumulators the hooks mutate
//! - `UpgradeSet`: duplicate-free ownership list

pub mod catalog;
pub mod modifiers;

pub use catalog::{draw_offer, UpgradeDef, UpgradeHook, UpgradeId, CATALOG};
pub use modifiers::{ScoreCategory, ScoreModifiers, UpgradeSet};
