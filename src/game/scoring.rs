//! Scoring formulas.
//!
//! Pure functions over player state and config; the engine decides when
//! to call them and applies the results.
//!
//! ## Per action
//!
//! ```text
//! base        = card values + base addends
//! action_mult = set | run | pair | layoff multiplier
//! upgrade     = category acc * all acc [* wildfire] [* evo scale]
//! points      = round(base * action_mult * upgrade)
//! ```
//!
//! ## Per round
//!
//! ```text
//! final = round((round points + flat bonuses) * product(multipliers))
//! ```

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerRound};
use crate::core::RulesConfig;
use crate::melds::MeldKind;
use crate::upgrades::catalog::{EVO_BASE_STEP, EVO_SCALE_STEP, RECYCLING_PLANT_STEP, WILDFIRE_MULT};
use crate::upgrades::{ScoreCategory, UpgradeId};

/// What kind of scoring action is being priced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Meld(MeldKind),
    Layoff,
}

impl ActionKind {
    #[must_use]
    pub fn category(self) -> ScoreCategory {
        match self {
            ActionKind::Meld(_) => ScoreCategory::Meld,
            ActionKind::Layoff => ScoreCategory::Layoff,
        }
    }
}

/// Breakdown of one meld or layoff score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionScore {
    /// Sum of the scored cards under the player's valuation.
    pub card_value: u32,
    /// Flat addends from upgrades.
    pub base_bonus: i64,
    pub action_mult: f64,
    pub upgrade_mult: f64,
    /// The wildfire charge was spent on this action.
    pub wildfire: bool,
    pub points: i64,
    /// Flat combo bonus triggered by this action.
    pub combo_bonus: i64,
}

impl ActionScore {
    /// Everything this action added to the round points.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.points + self.combo_bonus
    }
}

/// Flat addends to the base of every meld and layoff.
#[must_use]
pub fn base_bonus(player: &Player) -> i64 {
    let mut bonus = player.modifiers().base_mod;
    if player.owns(UpgradeId::RecyclingPlant) {
        bonus += i64::from(player.recycled()) * RECYCLING_PLANT_STEP;
    }
    if player.owns(UpgradeId::EvoBase) {
        bonus += i64::from(player.evo_base().rounds()) * EVO_BASE_STEP;
    }
    bonus
}

/// Multiplier fixed by the shape of the action.
#[must_use]
pub fn action_multiplier(kind: ActionKind, config: &RulesConfig) -> f64 {
    let m = &config.multipliers;
    match kind {
        ActionKind::Meld(MeldKind::Pair) => m.pair,
        ActionKind::Meld(MeldKind::Set) => m.set,
        ActionKind::Meld(MeldKind::Run) => m.run,
        ActionKind::Meld(MeldKind::Invalid) => 0.0,
        ActionKind::Layoff => m.layoff,
    }
}

/// Upgrade multiplier and whether a wildfire charge would be spent.
#[must_use]
pub fn upgrade_multiplier(player: &Player, category: ScoreCategory) -> (f64, bool) {
    let modifiers = player.modifiers();
    let mut mult = modifiers.category(category) * modifiers.all_mult;

    let wildfire = player.owns(UpgradeId::Wildfire) && modifiers.wildfire_available;
    if wildfire {
        mult *= WILDFIRE_MULT;
    }
    if player.owns(UpgradeId::EvoScale) {
        mult *= 1.0 + f64::from(player.evo_scale().rounds()) * EVO_SCALE_STEP;
    }
    (mult, wildfire)
}

/// Price a meld or layoff worth `card_value` for `player`.
///
/// Does not include the combo bonus, which depends on the action count
/// after this action is recorded.
#[must_use]
pub fn score_action(
    player: &Player,
    card_value: u32,
    kind: ActionKind,
    config: &RulesConfig,
) -> ActionScore {
    let base_bonus = base_bonus(player);
    let action_mult = action_multiplier(kind, config);
    let (upgrade_mult, wildfire) = upgrade_multiplier(player, kind.category());

    let base = i64::from(card_value) + base_bonus;
    let points = (base as f64 * action_mult * upgrade_mult).round() as i64;

    ActionScore {
        card_value,
        base_bonus,
        action_mult,
        upgrade_mult,
        wildfire,
        points,
        combo_bonus: 0,
    }
}

/// Combo payout once the player has taken `actions` scoring actions.
#[must_use]
pub fn combo_bonus(player: &Player, actions: u32, config: &RulesConfig) -> i64 {
    let every = config.bonuses.combo_every;
    if player.owns(UpgradeId::Combo) && actions > 0 && actions % every == 0 {
        (config.bonuses.combo * player.modifiers().all_mult).round() as i64
    } else {
        0
    }
}

// === Round end ===

pub const ALCHEMIST_PER_MELD: f64 = 0.5;
pub const ALCHEMIST_PER_LAYOFF: f64 = 0.1;
pub const HUT_HIKE_MULT: f64 = 1.5;
pub const MARATHON_MULT: f64 = 2.0;
pub const SLOT_MACHINE_MULT: f64 = 2.0;
pub const HEXAGRAM_MULT: f64 = 3.0;

/// Named line of a round-end breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Win,
    Deadwood,
    Overflow,
    Layoff,
    Alchemist,
    HutHike,
    Marathon,
    SlotMachine,
    Hexagram,
    Catchup,
}

/// A bonus either adds points or multiplies the round score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BonusAmount {
    Flat(i64),
    Multiplier(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusLine {
    pub kind: BonusKind,
    pub amount: BonusAmount,
}

impl BonusLine {
    fn flat(kind: BonusKind, points: i64) -> Self {
        Self {
            kind,
            amount: BonusAmount::Flat(points),
        }
    }

    fn mult(kind: BonusKind, factor: f64) -> Self {
        Self {
            kind,
            amount: BonusAmount::Multiplier(factor),
        }
    }
}

/// Facts about the round that bonuses depend on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettlementContext {
    /// This player went out.
    pub won: bool,
    /// Nobody went out; flat bonuses are skipped.
    pub stalemate: bool,
    /// Deadwood bonus available to the winner.
    pub deadwood: i64,
}

/// Deadwood bonus for the winner given opponents' remaining hand value.
#[must_use]
pub fn deadwood_bonus(opponent_hand_value: u32, config: &RulesConfig) -> i64 {
    let b = &config.bonuses;
    let raw = (f64::from(opponent_hand_value) / f64::from(b.deadwood_divisor)).round() as i64;
    raw.min(b.deadwood_cap)
}

/// Round-end bonus lines for one player.
///
/// Flat lines need a win or an early finish and vanish on stalemate. The
/// multipliers read only this round's counters plus the carryover, so they
/// apply to every player whether or not they own any upgrade.
#[must_use]
pub fn round_bonuses(
    player: &Player,
    round: &PlayerRound,
    ctx: &SettlementContext,
    config: &RulesConfig,
) -> Vec<BonusLine> {
    let b = &config.bonuses;
    let mut lines = Vec::new();

    if !ctx.stalemate {
        if ctx.won {
            lines.push(BonusLine::flat(BonusKind::Win, b.win));
            if ctx.deadwood > 0 {
                lines.push(BonusLine::flat(BonusKind::Deadwood, ctx.deadwood));
            }
        }
        if round.emptied_early {
            lines.push(BonusLine::flat(BonusKind::Overflow, b.overflow));
        }
    }

    if round.layoffs > 0 {
        let counted = round.layoffs.min(b.layoff_cap);
        lines.push(BonusLine::mult(
            BonusKind::Layoff,
            1.0 + f64::from(counted) * b.layoff_per_level,
        ));
    }
    if round.melds > 0 || round.layoffs > 0 {
        lines.push(BonusLine::mult(
            BonusKind::Alchemist,
            1.0 + ALCHEMIST_PER_MELD * f64::from(round.melds)
                + ALCHEMIST_PER_LAYOFF * f64::from(round.layoffs),
        ));
    }
    if round.sets >= 1 && round.runs >= 1 {
        lines.push(BonusLine::mult(BonusKind::HutHike, HUT_HIKE_MULT));
    }
    if round.runs >= 2 {
        lines.push(BonusLine::mult(BonusKind::Marathon, MARATHON_MULT));
    }
    if round.sets >= 2 {
        lines.push(BonusLine::mult(BonusKind::SlotMachine, SLOT_MACHINE_MULT));
    }
    if round.pairs >= 3 {
        lines.push(BonusLine::mult(BonusKind::Hexagram, HEXAGRAM_MULT));
    }
    if player.carryover() > 1.0 {
        lines.push(BonusLine::mult(BonusKind::Catchup, player.carryover()));
    }

    lines
}

/// Sum of flat lines, product of multiplier lines, and the final score.
#[must_use]
pub fn final_round_score(round_points: i64, lines: &[BonusLine]) -> (i64, f64, i64) {
    let mut flat = 0;
    let mut mult = 1.0;
    for line in lines {
        match line.amount {
            BonusAmount::Flat(points) => flat += points,
            BonusAmount::Multiplier(factor) => mult *= factor,
        }
    }
    let score = ((round_points + flat) as f64 * mult).round() as i64;
    (flat, mult, score)
}

/// Next-round multiplier for a player `leader - total` points behind.
#[must_use]
pub fn catchup_multiplier(total: i64, leader: i64, rate: f64) -> f64 {
    if total >= leader {
        1.0
    } else {
        1.0 + (leader - total) as f64 * rate
    }
}
