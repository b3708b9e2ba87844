//! The game engine.
//!
//! `Game` is the sole mutator of game state. Consumers drive it through
//! commands (`draw_from_stock`, `create_meld`, `layoff`, `discard`,
//! `next_player`, `start_next_round`) and read it through queries. Every
//! command checks the phase transition table first and returns an
//! `ActionError` without touching state when it is rejected.
//!
//! ## Round lifecycle
//!
//! ```text
//! deal ─▶ [draw ─▶ meld/layoff* ─▶ discard ─▶ next_player]* ─▶ settle
//!                          │                     │
//!                          └─ hand empty ────────┴─▶ settle (winner)
//! stock dry after max reshuffles ─────────────────▶ settle (stalemate)
//! ```
//!
//! ```
//! use rummy_rogue::core::RulesConfig;
//! use rummy_rogue::game::{Game, Phase};
//!
//! let mut game = Game::new(RulesConfig::default(), 42).unwrap();
//! assert_eq!(game.stock_len(), 52 - 4 * 7 - 1);
//!
//! game.draw_from_stock().unwrap();
//! assert_eq!(game.phase(), Phase::Action);
//! assert!(game.card_conservation_holds());
//! ```

use im::Vector;
use tracing::{debug, info};

use super::layout::{Dealt, RoundLayout};
use super::outcome::{
    AutoLayoff, DiscardOutcome, DrawOutcome, DrawSource, LayoffOutcome, MeldOutcome,
    PlayerSettlement, RoundOutcome, RoundRecord,
};
use super::phase::{transition, Phase, TurnEvent};
use super::player::{Player, PlayerRound, RoundState};
use super::scoring::{
    catchup_multiplier, combo_bonus, deadwood_bonus, final_round_score, round_bonuses,
    score_action, ActionKind, ActionScore, SettlementContext,
};
use crate::cards::{Card, Deck, DECK_SIZE};
use crate::core::{GameRng, GameRngState, PlayerId, PlayerMap, RulesConfig};
use crate::error::{ActionError, LayoffRejection, SetupError};
use crate::melds::{
    find_all_potential_melds, find_pairs, find_valid_layoffs, LayoffTarget, Meld, MeldCandidate,
};
use crate::upgrades::{draw_offer, UpgradeId};

/// A game of several rounds at one table.
#[derive(Clone, Debug)]
pub struct Game {
    config: RulesConfig,
    rng: GameRng,
    players: PlayerMap<Player>,
    round: RoundState,
    history: Vector<RoundRecord>,
}

impl Game {
    // === Construction ===

    /// Validate `config`, seat the players and deal round 1.
    pub fn new(config: RulesConfig, seed: u64) -> Result<Self, SetupError> {
        Self::with_rng(config, GameRng::new(seed))
    }

    /// Like [`Game::new`] with an injected random source.
    pub fn with_rng(config: RulesConfig, rng: GameRng) -> Result<Self, SetupError> {
        let mut game = Self::seat(config, rng)?;
        let dealt = game.deal_shuffled();
        game.open_round(1, dealt, None);
        Ok(game)
    }

    /// Start round 1 from a scripted deal.
    pub fn with_layout(
        config: RulesConfig,
        seed: u64,
        layout: RoundLayout,
    ) -> Result<Self, SetupError> {
        let mut game = Self::seat(config, GameRng::new(seed))?;
        layout.validate(game.players.player_count())?;
        let starting = layout.starting_player;
        let dealt = layout.deal(&mut game.rng);
        game.open_round(1, dealt, starting);
        Ok(game)
    }

    fn seat(config: RulesConfig, rng: GameRng) -> Result<Self, SetupError> {
        config.validate()?;
        let players = PlayerMap::from_vec(config.player_names.iter().map(Player::new).collect());
        let round = RoundState {
            number: 0,
            phase: Phase::RoundEnd,
            current: PlayerId::new(0),
            stock: Deck::from_cards(Vec::new()),
            discard: Vec::new(),
            melds: Vec::new(),
            reshuffles: 0,
            players: PlayerMap::with_default(players.player_count()),
        };
        Ok(Self {
            config,
            rng,
            players,
            round,
            history: Vector::new(),
        })
    }

    fn deal_shuffled(&mut self) -> Dealt {
        let mut stock = Deck::shuffled(&mut self.rng);
        let mut hands = vec![Vec::with_capacity(self.config.cards_dealt); self.players.player_count()];
        for _ in 0..self.config.cards_dealt {
            for hand in &mut hands {
                hand.extend(stock.draw());
            }
        }
        let discard = stock.draw().into_iter().collect();
        Dealt {
            hands,
            discard,
            stock,
        }
    }

    /// Replace the round state wholesale.
    fn open_round(&mut self, number: u32, dealt: Dealt, starting: Option<PlayerId>) {
        let count = self.players.player_count();
        let current = starting.unwrap_or_else(|| PlayerId::new(((number - 1) as usize % count) as u8));

        for (_, player) in self.players.iter_mut() {
            player.begin_round();
        }
        self.round = RoundState {
            number,
            phase: Phase::Draw,
            current,
            stock: dealt.stock,
            discard: dealt.discard,
            melds: Vec::new(),
            reshuffles: 0,
            players: PlayerMap::from_vec(dealt.hands.into_iter().map(PlayerRound::with_hand).collect()),
        };
        debug_assert!(self.card_conservation_holds());

        info!(
            round = number,
            first = %self.players[current].name,
            stock = self.round.stock.len(),
            "round started"
        );
    }

    // === Commands ===

    fn check(&self, action: &'static str, event: TurnEvent) -> Result<Phase, ActionError> {
        let phase = self.round.phase;
        transition(phase, event).ok_or(ActionError::WrongPhase { action, phase })
    }

    /// Draw the top card of the stock.
    ///
    /// An empty stock is refilled from the discard pile (all but its top
    /// card) up to `max_reshuffles` times per round. Once that limit is
    /// spent and the stock is still empty the round is settled as a
    /// stalemate and `ActionError::Stalemate` is returned.
    pub fn draw_from_stock(&mut self) -> Result<DrawOutcome, ActionError> {
        let next = self.check("draw", TurnEvent::Draw)?;
        let mut reshuffled = 0;

        loop {
            if let Some(card) = self.round.stock.draw() {
                let player = self.round.current;
                self.round.players[player].hand.push(card);
                self.round.phase = next;
                debug!(round = self.round.number, %player, %card, reshuffled, "drew from stock");
                return Ok(DrawOutcome {
                    card,
                    source: DrawSource::Stock,
                    reshuffled,
                });
            }
            if self.round.reshuffles >= self.config.max_reshuffles {
                self.round.phase = self.check("draw", TurnEvent::StockExhausted)?;
                self.settle(RoundOutcome::Stalemate);
                return Err(ActionError::Stalemate);
            }
            self.reshuffle();
            reshuffled += 1;
        }
    }

    fn reshuffle(&mut self) {
        let top = self.round.discard.pop();
        let rest = std::mem::take(&mut self.round.discard);
        let moved = rest.len();

        self.round.stock.extend(rest);
        self.round.stock.shuffle(&mut self.rng);
        self.round.discard.extend(top);
        self.round.reshuffles += 1;

        for (_, player) in self.players.iter_mut() {
            if player.owns(UpgradeId::RecyclingPlant) {
                player.recycled += 1;
            }
        }
        debug!(
            round = self.round.number,
            reshuffles = self.round.reshuffles,
            moved,
            "reshuffled discard pile into stock"
        );
    }

    /// Take the top card of the discard pile.
    pub fn draw_from_discard(&mut self) -> Result<DrawOutcome, ActionError> {
        let next = self.check("draw", TurnEvent::Draw)?;
        let card = self.round.discard.pop().ok_or(ActionError::EmptySource)?;

        let player = self.round.current;
        self.round.players[player].hand.push(card);
        self.round.phase = next;
        debug!(round = self.round.number, %player, %card, "drew from discard");
        Ok(DrawOutcome {
            card,
            source: DrawSource::Discard,
            reshuffled: 0,
        })
    }

    /// Commit `cards` from the current hand as a set, run or pair.
    pub fn create_meld(&mut self, cards: &[Card]) -> Result<MeldOutcome, ActionError> {
        self.check("meld", TurnEvent::Meld)?;
        let player = self.round.current;
        let hand = &self.round.players[player];
        if let Some(missing) = cards.iter().find(|c| !hand.holds(c)) {
            return Err(ActionError::CardNotInHand(*missing));
        }

        let allow_pairs = self.players[player].owns(UpgradeId::Pairs);
        let meld = Meld::try_new(cards, player, &self.config.meld_sizes, allow_pairs)
            .map_err(ActionError::InvalidMeld)?;
        let kind = meld.kind();

        let round = &mut self.round.players[player];
        for card in cards {
            round.take(card);
        }
        round.count_meld(kind);

        let value = {
            let p = &self.players[player];
            meld.value(|c| p.card_value(c, &self.config.card_values))
        };
        let meld_index = self.round.melds.len();
        debug!(round = self.round.number, %player, meld = %meld, "meld created");
        self.round.melds.push(meld);

        let score = self.score(player, value, ActionKind::Meld(kind));
        let player_won = self.finish_action(player);
        Ok(MeldOutcome {
            meld_index,
            kind,
            score,
            player_won,
        })
    }

    /// Lay `card` off onto the table meld at `meld_index`.
    pub fn layoff(&mut self, card: Card, meld_index: usize) -> Result<LayoffOutcome, ActionError> {
        self.check("lay off", TurnEvent::Layoff)?;
        let player = self.round.current;
        if !self.round.players[player].holds(&card) {
            return Err(ActionError::CardNotInHand(card));
        }
        let reject = |reason: LayoffRejection| ActionError::InvalidLayoffTarget {
            card,
            meld_index,
            reason,
        };
        let meld = self
            .round
            .melds
            .get_mut(meld_index)
            .ok_or_else(|| reject(LayoffRejection::NoSuchMeld))?;
        meld.add_layoff(card).map_err(reject)?;

        self.round.players[player].take(&card);
        let value = self.players[player].card_value(&card, &self.config.card_values);
        let score = self.score(player, value, ActionKind::Layoff);
        self.round.players[player].layoffs += 1;
        debug!(round = self.round.number, %player, %card, meld_index, points = score.total(), "laid off");

        let player_won = self.finish_action(player);
        Ok(LayoffOutcome {
            card,
            meld_index,
            score,
            player_won,
        })
    }

    /// Price an action, bank it and spend one-shot effects.
    fn score(&mut self, player: PlayerId, card_value: u32, kind: ActionKind) -> ActionScore {
        let mut score = score_action(&self.players[player], card_value, kind, &self.config);
        if score.wildfire {
            self.players[player].modifiers_mut().wildfire_available = false;
        }

        let round = &mut self.round.players[player];
        round.points += score.points;
        round.actions += 1;
        score.combo_bonus = combo_bonus(&self.players[player], round.actions, &self.config);
        round.points += score.combo_bonus;

        debug!(
            round = self.round.number,
            %player,
            ?kind,
            score = score.total(),
            wildfire = score.wildfire,
            "action scored"
        );
        score
    }

    /// End the round if a meld or layoff emptied the hand.
    fn finish_action(&mut self, player: PlayerId) -> bool {
        if !self.round.players[player].hand.is_empty() {
            return false;
        }
        self.round.players[player].emptied_early = true;
        self.round.phase = transition(self.round.phase, TurnEvent::HandEmptied).unwrap_or(Phase::RoundEnd);
        self.settle(RoundOutcome::Won {
            winner: player,
            overflow: true,
        });
        true
    }

    /// Put `card` on the discard pile. Discarding the last card wins.
    pub fn discard(&mut self, card: Card) -> Result<DiscardOutcome, ActionError> {
        let next = self.check("discard", TurnEvent::Discard)?;
        let player = self.round.current;
        let round = &mut self.round.players[player];
        round.take(&card).ok_or(ActionError::CardNotInHand(card))?;
        self.round.discard.push(card);
        debug!(round = self.round.number, %player, %card, "discarded");

        let player_won = self.round.players[player].hand.is_empty();
        if player_won {
            self.round.phase = self.check("discard", TurnEvent::LastDiscard)?;
            self.settle(RoundOutcome::Won {
                winner: player,
                overflow: false,
            });
        } else {
            self.round.phase = next;
        }
        Ok(DiscardOutcome { card, player_won })
    }

    /// Hand the turn to the next seat.
    pub fn next_player(&mut self) -> Result<PlayerId, ActionError> {
        let next = self.check("pass the turn", TurnEvent::NextPlayer)?;
        self.round.current = self.round.current.next(self.players.player_count());
        self.round.phase = next;
        Ok(self.round.current)
    }

    /// Deal the next round after a settled one.
    pub fn start_next_round(&mut self) -> Result<(), ActionError> {
        self.check("start a round", TurnEvent::NextRound)?;
        let dealt = self.deal_shuffled();
        self.open_round(self.round.number + 1, dealt, None);
        Ok(())
    }

    /// Deal the next round from a scripted layout.
    pub fn start_next_round_with(&mut self, layout: RoundLayout) -> Result<(), SetupError> {
        let phase = self.round.phase;
        if !phase.accepts(TurnEvent::NextRound) {
            return Err(SetupError::NotBetweenRounds(phase));
        }
        layout.validate(self.players.player_count())?;
        let starting = layout.starting_player;
        let dealt = layout.deal(&mut self.rng);
        self.open_round(self.round.number + 1, dealt, starting);
        Ok(())
    }

    // === Settlement ===

    fn settle(&mut self, outcome: RoundOutcome) {
        let winner = outcome.winner();
        let auto_layoffs = self.auto_layoff(winner);

        let deadwood = winner.map_or(0, |w| {
            let table = &self.config.card_values;
            let left: u32 = self
                .round
                .players
                .iter()
                .filter(|(p, _)| *p != w)
                .flat_map(|(_, r)| r.hand.iter())
                .map(|c| table.get(c.rank))
                .sum();
            deadwood_bonus(left, &self.config)
        });

        let mut partial = Vec::with_capacity(self.players.player_count());
        for (id, player) in self.players.iter() {
            let round = &self.round.players[id];
            let ctx = SettlementContext {
                won: winner == Some(id),
                stalemate: winner.is_none(),
                deadwood,
            };
            let bonuses = round_bonuses(player, round, &ctx, &self.config);
            let (flat_total, multiplier, final_score) = final_round_score(round.points, &bonuses);
            partial.push((round.points, bonuses, flat_total, multiplier, final_score));
        }

        for ((_, player), (.., final_score)) in self.players.iter_mut().zip(&partial) {
            player.total_score += final_score;
        }
        let leader = self.players.values().map(Player::total_score).max().unwrap_or(0);

        let mut settlements = Vec::with_capacity(partial.len());
        for ((id, player), (round_points, bonuses, flat_total, multiplier, final_score)) in
            self.players.iter_mut().zip(partial)
        {
            let won = winner == Some(id);
            player.carryover = catchup_multiplier(player.total_score, leader, self.config.catchup_rate);
            if player.owns(UpgradeId::EvoScale) {
                player.evo_scale.record(won);
            }
            if player.owns(UpgradeId::EvoBase) {
                player.evo_base.record(won);
            }
            settlements.push(PlayerSettlement {
                player: id,
                round_points,
                bonuses,
                flat_total,
                multiplier,
                final_score,
                total_after: player.total_score,
                next_carryover: player.carryover,
            });
        }

        let record = RoundRecord {
            round: self.round.number,
            outcome,
            settlements: PlayerMap::from_vec(settlements),
            auto_layoffs,
        };
        let scores = record.scores();
        info!(round = record.round, winner = ?winner, ?scores, "round settled");
        self.history.push_back(record);

        if self.round.number >= self.config.rounds_per_game {
            if let Some(end) = transition(self.round.phase, TurnEvent::GameOver) {
                self.round.phase = end;
                info!(
                    rounds = self.round.number,
                    winner = ?self.winner(),
                    "game over"
                );
            }
        }
    }

    /// Lay off whatever the losers still hold onto random eligible melds.
    fn auto_layoff(&mut self, winner: Option<PlayerId>) -> Vec<AutoLayoff> {
        let mut made = Vec::new();
        let seats: Vec<PlayerId> = self.players.player_ids().filter(|&p| Some(p) != winner).collect();

        for player in seats {
            let hand = self.round.players[player].hand.clone();
            for card in hand {
                let targets = find_valid_layoffs(&card, &self.round.melds);
                let Some(meld_index) = self.rng.choose(&targets).map(|t| t.meld_index) else {
                    continue;
                };
                if self.round.melds[meld_index].add_layoff(card).is_err() {
                    continue;
                }
                self.round.players[player].take(&card);

                let value = self.players[player].card_value(&card, &self.config.card_values);
                let score = self.score(player, value, ActionKind::Layoff);
                self.round.players[player].layoffs += 1;
                debug!(round = self.round.number, %player, %card, meld_index, "auto layoff");
                made.push(AutoLayoff {
                    player,
                    card,
                    meld_index,
                    points: score.total(),
                });
            }
        }
        made
    }

    // === Upgrades ===

    /// Up to `count` distinct upgrades `player` does not own yet.
    pub fn offer_upgrades(&mut self, player: PlayerId, count: usize) -> Vec<UpgradeId> {
        draw_offer(self.players[player].upgrades(), count, &mut self.rng)
    }

    /// Give `player` an upgrade. Returns false if already owned.
    pub fn select_upgrade(&mut self, player: PlayerId, id: UpgradeId) -> bool {
        let taken = self.players[player].apply_upgrade(id);
        if taken {
            debug!(%player, upgrade = id.key(), "upgrade selected");
        }
        taken
    }

    /// Like [`Game::select_upgrade`] by catalog key. Unknown keys are ignored.
    pub fn select_upgrade_by_key(&mut self, player: PlayerId, key: &str) -> bool {
        key.parse::<UpgradeId>()
            .map_or(false, |id| self.select_upgrade(player, id))
    }

    pub fn remove_upgrade(&mut self, player: PlayerId, id: UpgradeId) -> bool {
        self.players[player].remove_upgrade(id)
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.round.current
    }

    /// Round in play, or the round just settled.
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round.number
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub fn round_stats(&self, player: PlayerId) -> &PlayerRound {
        &self.round.players[player]
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.round.players[player].hand
    }

    #[must_use]
    pub fn all_melds(&self) -> &[Meld] {
        &self.round.melds
    }

    /// Table melds owned by `player`, with their indices.
    pub fn melds_of(&self, player: PlayerId) -> impl Iterator<Item = (usize, &Meld)> {
        self.round
            .melds
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.owner() == player)
    }

    #[must_use]
    pub fn stock_len(&self) -> usize {
        self.round.stock.len()
    }

    #[must_use]
    pub fn discard_top(&self) -> Option<&Card> {
        self.round.discard.last()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.round.discard.len()
    }

    #[must_use]
    pub fn reshuffles(&self) -> u8 {
        self.round.reshuffles
    }

    #[must_use]
    pub fn total_scores(&self) -> PlayerMap<i64> {
        self.players.map(|_, p| p.total_score())
    }

    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    #[must_use]
    pub fn last_settlement(&self) -> Option<&RoundRecord> {
        self.history.last()
    }

    /// Value of `card` for `player`, upgrade overrides included.
    #[must_use]
    pub fn card_value(&self, player: PlayerId, card: &Card) -> u32 {
        self.players[player].card_value(card, &self.config.card_values)
    }

    #[must_use]
    pub fn find_valid_layoffs_for(&self, card: &Card) -> Vec<LayoffTarget> {
        find_valid_layoffs(card, &self.round.melds)
    }

    /// Melds `player` could commit from their hand under this table's
    /// meld sizes, pairs included when the upgrade is owned.
    #[must_use]
    pub fn potential_melds(&self, player: PlayerId) -> Vec<MeldCandidate> {
        let hand = self.hand(player);
        let sizes = &self.config.meld_sizes;
        let mut found = find_all_potential_melds(hand, sizes);
        if self.players[player].owns(UpgradeId::Pairs) {
            found.extend(find_pairs(hand, sizes));
        }
        found
    }

    #[must_use]
    pub fn card_conservation_holds(&self) -> bool {
        self.round.card_count() == DECK_SIZE
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.round.phase == Phase::GameEnd
    }

    /// Highest total once the game is over. Ties go to the earlier seat.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_over() {
            return None;
        }
        self.players
            .iter()
            .fold(None, |best: Option<(PlayerId, i64)>, (id, p)| match best {
                Some((_, score)) if score >= p.total_score() => best,
                _ => Some((id, p.total_score())),
            })
            .map(|(id, _)| id)
    }
}
