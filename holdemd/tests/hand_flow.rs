//! Hand lifecycle scenarios: fold wins, all-in run-outs, synthetic checks,
//! short blinds and the betting preconditions.

use holdem_shared::{ActionKind, HandEventBody, PlayerAction, SeatStatus, Street};
use holdemd::game::{ActionError, Hand};
use holdemd::poker::DeckSeed;

fn synthetic_checks(hand: &Hand) -> Vec<(usize, Street)> {
    hand.events
        .iter()
        .filter_map(|e| match &e.body {
            HandEventBody::Action {
                seat,
                action: ActionKind::Check,
                street,
            } => Some((seat.0, *street)),
            _ => None,
        })
        .collect()
}

#[test]
fn heads_up_fold_after_all_in_ends_immediately() {
    // Alice (dealer/small blind) shoves for her whole stack; Bob folds.
    let mut hand = Hand::start(1, 0, &[1000, 1000], 5, 10, DeckSeed::from_u64(3)).unwrap();
    hand.apply_action(0, PlayerAction::AllIn).unwrap();
    hand.apply_action(1, PlayerAction::Fold).unwrap();

    assert!(hand.complete);
    assert_eq!(hand.winners, vec![0]);
    assert_eq!(hand.seats[0].chips, 1010);
    assert_eq!(hand.seats[1].chips, 990);
    assert!(hand.community.is_empty(), "no community cards are dealt");
    assert!(
        synthetic_checks(&hand).is_empty(),
        "a fold-ended hand records no synthetic checks"
    );

    // Further actions are refused.
    assert_eq!(
        hand.apply_action(0, PlayerAction::Check),
        Err(ActionError::HandComplete)
    );
}

#[test]
fn both_all_in_runs_out_one_street_per_call() {
    let mut hand = Hand::start(1, 0, &[500, 500], 5, 10, DeckSeed::from_u64(7)).unwrap();
    hand.apply_action(0, PlayerAction::AllIn).unwrap();
    hand.apply_action(1, PlayerAction::Call).unwrap();

    assert_eq!(hand.to_act, None, "turn pointer clears after the second all-in");
    assert!(hand.is_runout());

    // Betting is over, so advancing before the run-out finishes is the only
    // legal progression; each call deals exactly one street.
    hand.advance_runout().unwrap();
    assert_eq!(hand.street, Street::Flop);
    assert_eq!(hand.community.len(), 3);
    hand.advance_runout().unwrap();
    assert_eq!(hand.street, Street::Turn);
    assert_eq!(hand.community.len(), 4);
    hand.advance_runout().unwrap();
    assert_eq!(hand.street, Street::River);
    assert_eq!(hand.community.len(), 5);
    hand.advance_runout().unwrap();
    assert_eq!(hand.street, Street::Showdown);
    assert!(hand.complete);

    // Showdown is idempotent: repeated resolution does not move chips.
    let stacks: Vec<u32> = hand.seats.iter().map(|s| s.chips).collect();
    hand.process_showdown().unwrap();
    hand.advance_runout().unwrap();
    assert_eq!(stacks, hand.seats.iter().map(|s| s.chips).collect::<Vec<_>>());

    let total: u32 = hand.seats.iter().map(|s| s.chips).sum();
    assert_eq!(total, 1000);
}

#[test]
fn lone_actionable_seat_gets_synthetic_checks() {
    // Bob is all-in after calling; Alice covers him. Every later street
    // records a synthetic check for Alice before it is dealt.
    let mut hand = Hand::start(1, 0, &[1000, 100], 5, 10, DeckSeed::from_u64(9)).unwrap();
    hand.apply_action(0, PlayerAction::Raise(90)).unwrap();
    hand.apply_action(1, PlayerAction::Call).unwrap();
    assert_eq!(hand.seats[1].status, SeatStatus::AllIn);
    assert_eq!(hand.to_act, None);

    for _ in 0..4 {
        hand.advance_runout().unwrap();
    }
    assert!(hand.complete);

    let checks = synthetic_checks(&hand);
    assert_eq!(
        checks,
        vec![(0, Street::Flop), (0, Street::Turn), (0, Street::River)],
        "one synthetic check per run-out street with a lone actionable seat"
    );
}

#[test]
fn short_big_blind_goes_all_in_and_excess_returns() {
    // Bob can only post 3 of the 10 big blind.
    let mut hand = Hand::start(1, 0, &[1000, 3], 5, 10, DeckSeed::from_u64(21)).unwrap();
    assert_eq!(hand.seats[1].status, SeatStatus::AllIn);
    assert_eq!(hand.seats[1].chips, 0);
    assert_eq!(hand.pot, 8);
    assert_eq!(hand.current_bet, 10, "the nominal big blind is still owed");

    // Alice completes; the uncontested part of her call comes back at
    // resolution.
    assert_eq!(hand.to_act, Some(0));
    hand.apply_action(0, PlayerAction::Call).unwrap();
    for _ in 0..4 {
        hand.advance_runout().unwrap();
    }
    assert!(hand.complete);

    assert_eq!(hand.pots.len(), 2);
    assert_eq!(hand.pots[0].amount, 6);
    assert_eq!(hand.pots[0].eligible.len(), 2);
    assert_eq!(hand.pots[1].amount, 7);
    assert_eq!(hand.pots[1].eligible.len(), 1);

    let total: u32 = hand.seats.iter().map(|s| s.chips).sum();
    assert_eq!(total, 1003);
}

#[test]
fn all_in_under_raise_does_not_reopen_action() {
    let mut hand = Hand::start(1, 0, &[1000, 80], 5, 10, DeckSeed::from_u64(13)).unwrap();

    // Preflop: Alice completes, Bob checks his option.
    hand.apply_action(0, PlayerAction::Call).unwrap();
    hand.apply_action(1, PlayerAction::Check).unwrap();
    assert_eq!(hand.street, Street::Flop);

    // Flop: Bob (first to act) checks, Alice bets 50, Bob shoves his last
    // 70 - an under-raise of 20 on top.
    hand.apply_action(1, PlayerAction::Check).unwrap();
    hand.apply_action(0, PlayerAction::Bet(50)).unwrap();
    hand.apply_action(1, PlayerAction::AllIn).unwrap();
    assert_eq!(hand.current_bet, 70);
    assert_eq!(hand.last_raise, 50, "an under-raise leaves the raise size");

    // Alice already acted and the shove was not a full raise: she may only
    // call or fold.
    assert_eq!(
        hand.apply_action(0, PlayerAction::Raise(100)),
        Err(ActionError::IllegalAction("betting is not reopened".into()))
    );
    hand.apply_action(0, PlayerAction::Call).unwrap();
    assert_eq!(hand.to_act, None);
}

#[test]
fn betting_preconditions_are_enforced() {
    let mut hand = Hand::start(1, 0, &[1000, 1000, 1000], 5, 10, DeckSeed::from_u64(17)).unwrap();
    // Three-handed: dealer 0, small blind 1, big blind 2; dealer acts first.
    assert_eq!(hand.to_act, Some(0));

    assert_eq!(
        hand.apply_action(1, PlayerAction::Call),
        Err(ActionError::NotYourTurn)
    );
    assert!(matches!(
        hand.apply_action(0, PlayerAction::Check),
        Err(ActionError::IllegalAction(_))
    ));
    assert!(matches!(
        hand.apply_action(0, PlayerAction::Bet(50)),
        Err(ActionError::IllegalAction(_))
    ));
    assert_eq!(
        hand.apply_action(0, PlayerAction::Raise(5)),
        Err(ActionError::AmountBelowMinimum { min: 10 })
    );
    assert_eq!(
        hand.apply_action(0, PlayerAction::Raise(2000)),
        Err(ActionError::AmountExceedsStack { max: 990 })
    );

    hand.apply_action(0, PlayerAction::Call).unwrap();
    assert_eq!(hand.to_act, Some(1));

    // The turn pointer always references a seat that can act.
    let to_act = hand.to_act.unwrap();
    assert!(hand.seats[to_act].status == SeatStatus::Active && hand.seats[to_act].chips > 0);
}

#[test]
fn reveal_card_requires_the_runout_condition() {
    let mut hand = Hand::start(1, 0, &[1000, 1000], 5, 10, DeckSeed::from_u64(25)).unwrap();
    // Betting is still live: revealing is refused.
    assert_eq!(hand.reveal_next(), Err(ActionError::NotAllInRunout));

    hand.apply_action(0, PlayerAction::AllIn).unwrap();
    hand.apply_action(1, PlayerAction::Call).unwrap();
    assert!(hand.is_runout());

    hand.reveal_next().unwrap();
    assert_eq!(hand.street, Street::Flop);
    assert_eq!(hand.community.len(), 3);

    for _ in 0..3 {
        hand.reveal_next().unwrap();
    }
    assert!(hand.complete);
}

#[test]
fn big_blind_keeps_the_option_to_raise() {
    let mut hand = Hand::start(1, 0, &[1000, 1000, 1000], 5, 10, DeckSeed::from_u64(19)).unwrap();
    hand.apply_action(0, PlayerAction::Call).unwrap();
    hand.apply_action(1, PlayerAction::Call).unwrap();
    // All limped; the big blind has not acted yet, so the round is open.
    assert_eq!(hand.to_act, Some(2));
    hand.apply_action(2, PlayerAction::Raise(20)).unwrap();
    assert_eq!(hand.current_bet, 30);
    // The limpers must act again.
    assert_eq!(hand.to_act, Some(0));
    hand.apply_action(0, PlayerAction::Call).unwrap();
    hand.apply_action(1, PlayerAction::Fold).unwrap();
    assert_eq!(hand.street, Street::Flop);
}
