//! Round scenarios driven through the public command API.
//!
//! Deals are scripted with `RoundLayout` so every draw is known.

use rummy_rogue::cards::{parse_cards, Card, Deck};
use rummy_rogue::core::{PlayerId, RulesConfig};
use rummy_rogue::error::ActionError;
use rummy_rogue::game::{BonusKind, DrawSource, Game, Phase, RoundLayout, RoundOutcome};
use rummy_rogue::upgrades::UpgradeId;
use rummy_rogue::melds::MeldKind;

const ADA: PlayerId = PlayerId::new(0);
const BO: PlayerId = PlayerId::new(1);

fn cards(text: &str) -> Vec<Card> {
    parse_cards(text).unwrap()
}

fn two_seats() -> RulesConfig {
    RulesConfig::default().with_players(["Ada", "Bo"])
}

fn scripted(ada: &str, bo: &str, discard: &str, stock_top: &str) -> Game {
    let layout = RoundLayout::new(vec![cards(ada), cards(bo)])
        .with_discard(cards(discard))
        .with_stock_top(cards(stock_top));
    Game::with_layout(two_seats(), 9, layout).unwrap()
}

/// Split a fresh standard deck into consecutive chunks.
fn split_deck(sizes: &[usize]) -> Vec<Vec<Card>> {
    let mut all = Deck::standard().cards().to_vec().into_iter();
    sizes.iter().map(|&n| all.by_ref().take(n).collect()).collect()
}

#[test]
fn test_four_player_deal() {
    let game = Game::new(RulesConfig::default(), 2024).unwrap();

    assert_eq!(game.player_count(), 4);
    assert_eq!(game.stock_len(), 52 - 4 * 7 - 1);
    assert_eq!(game.discard_len(), 1);
    assert_eq!(game.phase(), Phase::Draw);
    assert!(game.card_conservation_holds());
}

#[test]
fn test_same_seed_same_deal() {
    let a = Game::new(RulesConfig::default(), 77).unwrap();
    let b = Game::new(RulesConfig::default(), 77).unwrap();
    let c = Game::new(RulesConfig::default(), 78).unwrap();

    for id in PlayerId::all(4) {
        assert_eq!(a.hand(id), b.hand(id));
    }
    assert_eq!(a.discard_top(), b.discard_top());
    assert!(PlayerId::all(4).any(|id| a.hand(id) != c.hand(id)));
}

#[test]
fn test_set_then_last_discard_wins_by_discard() {
    let mut game = scripted("9s 9h 9c", "4d 5d 6d Kh", "Qh", "Kc");

    game.draw_from_stock().unwrap();
    let meld = game.create_meld(&cards("9s 9h 9c")).unwrap();
    assert_eq!(meld.kind, MeldKind::Set);
    assert_eq!(meld.score.points, 81);
    assert!(!meld.player_won);

    let discard = game.discard(cards("Kc")[0]).unwrap();
    assert!(discard.player_won);
    assert_eq!(game.phase(), Phase::RoundEnd);

    let record = game.last_settlement().unwrap();
    assert_eq!(record.outcome, RoundOutcome::Won { winner: ADA, overflow: false });

    let ada = &record.settlements[ADA];
    let kinds: Vec<BonusKind> = ada.bonuses.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BonusKind::Win, BonusKind::Deadwood, BonusKind::Alchemist]);
    // 4+5+6+10 = 25 left in Bo's hand, 25/10 rounds to 3
    assert_eq!(ada.flat_total, 103);
    // one meld: alchemist x1.5
    assert_eq!(ada.final_score, 276);
    assert_eq!(record.settlements[BO].final_score, 0);
}

#[test]
fn test_auto_layoff_scores_for_losers() {
    let mut game = scripted("4d 5d 6d", "7d 3c 3h", "Qh", "Kc");

    game.draw_from_stock().unwrap();
    let run = game.create_meld(&cards("4d 5d 6d")).unwrap();
    assert_eq!(run.score.points, 38);
    game.discard(cards("Kc")[0]).unwrap();

    let record = game.last_settlement().unwrap();
    assert_eq!(record.auto_layoffs.len(), 1);
    assert_eq!(record.auto_layoffs[0].player, BO);
    assert_eq!(record.auto_layoffs[0].points, 14);
    assert_eq!(game.all_melds()[0].notation(), "4d-5d-6d-[7d]");
    assert_eq!(game.hand(BO), cards("3c 3h").as_slice());

    // Bo: 14 points with one layoff, x1.1 layoff and x1.1 alchemist
    assert_eq!(record.settlements[BO].final_score, 17);
    // Ada: (38 + win 100 + deadwood round(6/10)) x1.5 alchemist
    assert_eq!(record.settlements[ADA].final_score, 209);
    assert!(game.card_conservation_holds());
}

#[test]
fn test_turns_rotate_and_wrap() {
    let config = RulesConfig::default().with_players(["A", "B", "C"]);
    let mut game = Game::new(config, 5).unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(game.current_player());
        game.draw_from_stock().unwrap();
        let card = game.hand(game.current_player())[0];
        game.discard(card).unwrap();
        assert_eq!(game.phase(), Phase::Discard);
        game.next_player().unwrap();
    }
    assert_eq!(seen, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2), PlayerId::new(0)]);
}

#[test]
fn test_discard_draw_takes_top() {
    let mut game = scripted("2c 3c", "4d 5d", "Qh Js", "Kc");

    let drawn = game.draw_from_discard().unwrap();
    assert_eq!(drawn.source, DrawSource::Discard);
    assert_eq!(drawn.card, cards("Js")[0]);
    assert_eq!(game.discard_top(), Some(&cards("Qh")[0]));
}

#[test]
fn test_reshuffle_keeps_top_discard() {
    let mut chunks = split_deck(&[24, 24, 4]);
    let discard = chunks.pop().unwrap();
    let top = *discard.last().unwrap();
    let layout = RoundLayout::new(chunks).with_discard(discard);
    let mut game = Game::with_layout(two_seats(), 1, layout).unwrap();
    assert_eq!(game.stock_len(), 0);

    let drawn = game.draw_from_stock().unwrap();
    assert_eq!(drawn.reshuffled, 1);
    assert_eq!(game.reshuffles(), 1);
    assert_eq!(game.discard_len(), 1);
    assert_eq!(game.discard_top(), Some(&top));
    assert_eq!(game.stock_len(), 2);
    assert!(game.card_conservation_holds());
}

#[test]
fn test_stalemate_after_two_reshuffles() {
    let mut chunks = split_deck(&[25, 26, 1]);
    let discard = chunks.pop().unwrap();
    let layout = RoundLayout::new(chunks).with_discard(discard);
    let mut game = Game::with_layout(two_seats(), 1, layout).unwrap();
    game.select_upgrade_by_key(ADA, "recycling_plant");

    assert_eq!(game.draw_from_stock(), Err(ActionError::Stalemate));
    assert_eq!(game.phase(), Phase::Stalemate);
    assert_eq!(game.reshuffles(), 2);
    assert_eq!(game.player(ADA).recycled(), 2);
    assert!(game.card_conservation_holds());

    let record = game.last_settlement().unwrap();
    assert_eq!(record.outcome, RoundOutcome::Stalemate);
    for settlement in record.settlements.values() {
        assert_eq!(settlement.flat_total, 0);
        assert_eq!(settlement.final_score, 0);
    }

    assert!(matches!(game.draw_from_stock(), Err(ActionError::WrongPhase { .. })));
    game.start_next_round().unwrap();
    assert_eq!(game.phase(), Phase::Draw);
    assert_eq!(game.reshuffles(), 0);
}

#[test]
fn test_stalemate_counts_as_loss_for_evo_owners() {
    let mut chunks = split_deck(&[25, 26, 1]);
    let discard = chunks.pop().unwrap();
    let layout = RoundLayout::new(chunks).with_discard(discard);
    let mut game = Game::with_layout(two_seats(), 1, layout).unwrap();
    game.select_upgrade(ADA, UpgradeId::EvoScale);
    game.select_upgrade(BO, UpgradeId::EvoBase);

    assert_eq!(game.draw_from_stock(), Err(ActionError::Stalemate));

    assert_eq!(game.player(ADA).evo_scale().wins, 0);
    assert_eq!(game.player(ADA).evo_scale().losses, 1);
    assert_eq!(game.player(BO).evo_base().wins, 0);
    assert_eq!(game.player(BO).evo_base().losses, 1);
    // counters only move for owners
    assert_eq!(game.player(ADA).evo_base().rounds(), 0);
}

#[test]
fn test_stalemate_keeps_multipliers_on_scored_points() {
    let ada_hand = cards("9s 9h 9c 2d");
    let top = cards("Kd");
    let rest: Vec<Card> = Deck::standard()
        .cards()
        .iter()
        .copied()
        .filter(|c| !ada_hand.contains(c) && !top.contains(c))
        .collect();
    let layout = RoundLayout::new(vec![ada_hand, rest]).with_discard(top);
    let mut game = Game::with_layout(two_seats(), 6, layout).unwrap();
    assert_eq!(game.stock_len(), 0);

    game.draw_from_discard().unwrap();
    game.create_meld(&cards("9s 9h 9c")).unwrap();
    game.discard(cards("Kd")[0]).unwrap();
    game.next_player().unwrap();
    assert_eq!(game.draw_from_stock(), Err(ActionError::Stalemate));

    let record = game.last_settlement().unwrap();
    assert_eq!(record.outcome, RoundOutcome::Stalemate);
    // nobody won, so Bo's 9d still finds the set
    assert_eq!(record.auto_layoffs.len(), 1);
    assert_eq!(record.auto_layoffs[0].player, BO);

    let ada = &record.settlements[ADA];
    let kinds: Vec<BonusKind> = ada.bonuses.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BonusKind::Alchemist]);
    assert_eq!(ada.flat_total, 0);
    assert_eq!(ada.round_points, 81);
    assert_eq!(ada.final_score, 122);

    let bo = &record.settlements[BO];
    let kinds: Vec<BonusKind> = bo.bonuses.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BonusKind::Layoff, BonusKind::Alchemist]);
    assert_eq!(bo.round_points, 18);
    // 18 x1.1 x1.1
    assert_eq!(bo.final_score, 22);
    assert!(game.card_conservation_holds());
}

#[test]
fn test_overflow_win_by_layoff() {
    let mut game = scripted("9s 9h 9c", "4d 5d 6d Kh", "Qh", "9d");

    game.draw_from_stock().unwrap();
    assert!(!game.create_meld(&cards("9s 9h 9c")).unwrap().player_won);
    let lay = game.layoff(cards("9d")[0], 0).unwrap();
    assert!(lay.player_won);
    assert!(game.hand(ADA).is_empty());
    assert_eq!(game.phase(), Phase::RoundEnd);
    assert!(matches!(game.discard(cards("Kh")[0]), Err(ActionError::WrongPhase { .. })));

    let record = game.last_settlement().unwrap();
    assert_eq!(record.outcome, RoundOutcome::Won { winner: ADA, overflow: true });
    let ada = &record.settlements[ADA];
    let kinds: Vec<BonusKind> = ada.bonuses.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BonusKind::Win,
            BonusKind::Deadwood,
            BonusKind::Overflow,
            BonusKind::Layoff,
            BonusKind::Alchemist,
        ]
    );
    // 81 + 18 points, 100 + 3 + 50 flat, x1.1 layoff, x1.6 alchemist
    assert_eq!(ada.round_points, 99);
    assert_eq!(ada.flat_total, 153);
    assert_eq!(ada.final_score, 444);
}

#[test]
fn test_combo_fires_on_third_action() {
    let mut game = scripted("9s 9h 9c 4d 5d 6d 2c", "Kc Kh", "Qh", "9d");
    game.select_upgrade(ADA, UpgradeId::Combo);

    game.draw_from_stock().unwrap();
    let set = game.create_meld(&cards("9s 9h 9c")).unwrap();
    let run = game.create_meld(&cards("4d 5d 6d")).unwrap();
    let lay = game.layoff(cards("9d")[0], 0).unwrap();

    assert_eq!(set.score.combo_bonus, 0);
    assert_eq!(run.score.combo_bonus, 0);
    assert_eq!(lay.score.combo_bonus, 50);
    assert_eq!(lay.score.total(), 18 + 50);

    let stats = game.round_stats(ADA);
    assert_eq!(stats.actions, 3);
    assert_eq!(stats.points, 81 + 38 + 18 + 50);
}

#[test]
fn test_rejected_layoff_leaves_round_untouched() {
    let mut game = scripted("9s 9h 9c 8d 2c", "Kc", "Qh", "3c");
    game.draw_from_stock().unwrap();
    game.create_meld(&cards("9s 9h 9c")).unwrap();

    let hand = game.hand(ADA).to_vec();
    let stats = game.round_stats(ADA).clone();
    let melds = game.all_melds().to_vec();
    let discard_len = game.discard_len();

    assert!(game.layoff(cards("8d")[0], 0).is_err());
    assert!(game.layoff(cards("2c")[0], 3).is_err());

    assert_eq!(game.hand(ADA), hand.as_slice());
    assert_eq!(game.round_stats(ADA).points, 81);
    assert_eq!(game.round_stats(ADA), &stats);
    assert_eq!(game.all_melds(), melds.as_slice());
    assert_eq!(game.discard_len(), discard_len);
    assert_eq!(game.phase(), Phase::Action);
}

#[test]
fn test_commands_rejected_after_round_end() {
    let mut game = scripted("9s 9h 9c", "4d 5d 6d Kh", "Qh", "Kc");
    game.draw_from_stock().unwrap();
    game.create_meld(&cards("9s 9h 9c")).unwrap();
    game.discard(cards("Kc")[0]).unwrap();

    assert!(matches!(game.draw_from_discard(), Err(ActionError::WrongPhase { .. })));
    assert!(matches!(game.next_player(), Err(ActionError::WrongPhase { .. })));
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_next_round_rotates_first_seat() {
    let mut game = scripted("9s 9h 9c", "4d 5d 6d Kh", "Qh", "Kc");
    game.draw_from_stock().unwrap();
    game.create_meld(&cards("9s 9h 9c")).unwrap();
    game.discard(cards("Kc")[0]).unwrap();

    game.start_next_round().unwrap();
    assert_eq!(game.round_number(), 2);
    assert_eq!(game.current_player(), BO);
    assert_eq!(game.hand(ADA).len(), 7);
    assert_eq!(game.round_stats(ADA).points, 0);
    assert!(game.all_melds().is_empty());
    assert_eq!(game.stock_len(), 52 - 2 * 7 - 1);
    assert_eq!(game.player(ADA).total_score(), 276);
}
