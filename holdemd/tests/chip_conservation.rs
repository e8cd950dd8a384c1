//! Chip conservation across many hands and deterministic split-pot
//! remainder placement.

use holdem_shared::{Card, PlayerAction, Rank, Suit};
use holdemd::game::{next_funded_from, Hand};
use holdemd::poker::DeckSeed;

fn conserved(hand: &Hand, expected_total: u32) {
    let live: u32 = hand.seats.iter().map(|s| s.chips).sum::<u32>() + hand.pot;
    assert_eq!(live, expected_total, "chip conservation violated");
}

/// Simple deterministic strategy: open for 50 when nothing is bet, check
/// when already matched, otherwise call.
fn scripted_action(hand: &Hand, actor: usize) -> PlayerAction {
    let seat = &hand.seats[actor];
    if hand.current_bet == 0 {
        PlayerAction::Bet(50.min(seat.chips))
    } else if seat.current_bet == hand.current_bet {
        PlayerAction::Check
    } else {
        PlayerAction::Call
    }
}

#[test]
fn conservation_holds_across_many_hands() {
    let mut stacks = vec![1000u32, 1000, 1000];
    let total: u32 = stacks.iter().sum();
    let mut dealer = 0usize;

    for hand_no in 1..=300u64 {
        let funded = stacks.iter().filter(|&&c| c > 0).count();
        if funded < 2 {
            break;
        }
        dealer = if hand_no == 1 {
            next_funded_from(&stacks, 0).unwrap()
        } else {
            next_funded_from(&stacks, (dealer + 1) % stacks.len()).unwrap()
        };

        let mut hand =
            Hand::start(hand_no, dealer, &stacks, 5, 10, DeckSeed::from_u64(hand_no)).unwrap();
        conserved(&hand, total);

        let mut steps = 0;
        while !hand.complete {
            match hand.to_act {
                Some(actor) => hand.apply_action(actor, scripted_action(&hand, actor)).unwrap(),
                None => hand.advance_runout().unwrap(),
            }
            conserved(&hand, total);
            steps += 1;
            assert!(steps < 200, "hand did not terminate");
        }

        stacks = hand.seats.iter().map(|s| s.chips).collect();
        assert_eq!(stacks.iter().sum::<u32>(), total);
    }
}

#[test]
fn split_pot_remainder_goes_to_earliest_winner_clockwise_of_dealer() {
    // Dealer seat 0, small blind seat 1, big blind seat 2. The small blind
    // folds, leaving an odd pot of 25 between seats 0 and 2.
    let mut hand = Hand::start(1, 0, &[1000, 1000, 1000], 5, 10, DeckSeed::from_u64(2)).unwrap();
    hand.apply_action(0, PlayerAction::Call).unwrap();
    hand.apply_action(1, PlayerAction::Fold).unwrap();
    hand.apply_action(2, PlayerAction::Check).unwrap();
    assert_eq!(hand.pot, 25);

    // Check it down to the river.
    for _ in 0..2 {
        hand.apply_action(2, PlayerAction::Check).unwrap();
        hand.apply_action(0, PlayerAction::Check).unwrap();
    }
    assert_eq!(hand.community.len(), 5);

    // Force a board that plays for both remaining seats.
    hand.community = vec![
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::King, Suit::Diamonds),
        Card::new(Rank::Queen, Suit::Clubs),
        Card::new(Rank::Jack, Suit::Hearts),
        Card::new(Rank::Ten, Suit::Spades),
    ];
    hand.seats[0].hole_cards = Some([
        Card::new(Rank::Two, Suit::Clubs),
        Card::new(Rank::Three, Suit::Diamonds),
    ]);
    hand.seats[2].hole_cards = Some([
        Card::new(Rank::Two, Suit::Diamonds),
        Card::new(Rank::Three, Suit::Clubs),
    ]);

    hand.apply_action(2, PlayerAction::Check).unwrap();
    hand.apply_action(0, PlayerAction::Check).unwrap();
    assert!(hand.complete);

    // 25 split two ways: 12 each, the odd chip to the seat closest
    // clockwise from the dealer (seat 2, the big blind).
    assert_eq!(hand.winners, vec![0, 2]);
    assert_eq!(hand.seats[2].chips, 1003);
    assert_eq!(hand.seats[0].chips, 1002);
    assert_eq!(hand.seats[1].chips, 995);
}
