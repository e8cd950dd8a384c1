//! Event-log replay.
//!
//! The recorded event list is the canonical history of a hand; folding it
//! back through the state deltas reconstructs the hand exactly, including
//! the deck cursor and turn pointer. The persisted snapshot is merely a
//! cache of this computation.

use holdem_shared::{HandEvent, HandEventBody, HandResult, SeatId, SeatStatus, Street};

use crate::game::errors::ActionError;
use crate::game::hand::{Hand, HandSeat};
use crate::poker::{evaluate_best_hand, pick_best_five, shuffled_deck, DeckSeed};

/// Rebuild a hand from its ordered event log.
pub fn replay_hand(events: &[HandEvent]) -> Result<Hand, ActionError> {
    let first = events
        .first()
        .ok_or_else(|| ActionError::IllegalAction("empty event log".into()))?;
    let HandEventBody::HandStart {
        hand_no,
        dealer_pos,
        deck_seed,
        small_blind,
        big_blind,
        stacks_start,
        blinds_posted,
    } = &first.body
    else {
        return Err(ActionError::IllegalAction(
            "event log does not begin with a hand start".into(),
        ));
    };

    let seed = DeckSeed::from_hex(deck_seed)
        .ok_or_else(|| ActionError::IllegalAction("malformed deck seed".into()))?;
    let seats: Vec<HandSeat> = stacks_start
        .iter()
        .map(|&chips| HandSeat {
            chips,
            hole_cards: None,
            status: if chips > 0 {
                SeatStatus::Active
            } else {
                SeatStatus::Out
            },
            current_bet: 0,
            total_bet: 0,
            last_action: None,
        })
        .collect();

    let mut hand = Hand::new_shell(
        *hand_no,
        *dealer_pos,
        *small_blind,
        *big_blind,
        seed,
        shuffled_deck(&seed),
        seats,
        stacks_start.clone(),
    );
    for (seat, kind, _) in blinds_posted {
        match kind {
            holdem_shared::BlindKind::SmallBlind => hand.sb_pos = seat.0,
            holdem_shared::BlindKind::BigBlind => hand.bb_pos = seat.0,
        }
    }
    hand.street = Street::Preflop;
    hand.current_bet = *big_blind;
    hand.last_raise = *big_blind;

    for ev in &events[1..] {
        apply_event(&mut hand, &ev.body)?;
    }

    hand.events = events.to_vec();
    hand.next_seq = events.last().map(|e| e.seq + 1).unwrap_or(0);
    hand.to_act = final_to_act(&hand, events);
    hand.check_conservation()?;
    Ok(hand)
}

fn apply_event(hand: &mut Hand, body: &HandEventBody) -> Result<(), ActionError> {
    match body {
        HandEventBody::HandStart { .. } => Err(ActionError::IllegalAction(
            "duplicate hand start in event log".into(),
        )),

        HandEventBody::Deal { seat, cards } => {
            hand.seats[seat.0].hole_cards = Some(*cards);
            hand.deck_pos += 2;
            Ok(())
        }

        HandEventBody::PostBlind { seat, amount, .. } => {
            let s = &mut hand.seats[seat.0];
            s.chips -= amount;
            s.current_bet += amount;
            s.total_bet += amount;
            if s.chips == 0 {
                s.status = SeatStatus::AllIn;
            }
            hand.pot += amount;
            Ok(())
        }

        HandEventBody::Action { seat, action, .. } => {
            hand.apply_recorded_action(seat.0, *action);
            Ok(())
        }

        HandEventBody::DealCommunity { cards, .. } => {
            hand.community.extend_from_slice(cards);
            hand.deck_pos += cards.len();
            Ok(())
        }

        HandEventBody::AdvanceStreet { to, .. } => {
            for s in &mut hand.seats {
                s.current_bet = 0;
                s.last_action = None;
            }
            hand.current_bet = 0;
            hand.last_raise = 0;
            hand.street = *to;
            Ok(())
        }

        HandEventBody::Showdown {
            pots,
            winners_by_pot,
        } => {
            for (pot, winners) in pots.iter().zip(winners_by_pot) {
                if winners.is_empty() {
                    if let [sole] = pot.eligible[..] {
                        hand.seats[sole.0].chips += pot.amount;
                    }
                    continue;
                }
                // Winners are recorded in remainder order (earliest
                // clockwise from the dealer first).
                let share = pot.amount / winners.len() as u32;
                let remainder = pot.amount % winners.len() as u32;
                for (j, w) in winners.iter().enumerate() {
                    let extra = if (j as u32) < remainder { 1 } else { 0 };
                    hand.seats[w.0].chips += share + extra;
                }
            }
            hand.pot = 0;
            hand.pots = pots.clone();
            let mut winners: Vec<usize> = winners_by_pot
                .iter()
                .flatten()
                .map(|s| s.0)
                .collect();
            winners.sort_unstable();
            winners.dedup();
            hand.winners = winners;
            hand.results = showdown_results(hand);
            hand.showdown_done = true;
            Ok(())
        }

        HandEventBody::HandComplete { stacks_end } => {
            hand.complete = true;
            if &hand.stacks() != stacks_end {
                hand.poisoned = true;
                return Err(ActionError::Invariant(
                    "replayed stacks diverge from recorded hand end".into(),
                ));
            }
            Ok(())
        }
    }
}

/// Evaluated hands shown at a contested showdown, recomputed the same way
/// the live engine computes them.
fn showdown_results(hand: &Hand) -> Vec<HandResult> {
    let contenders = hand.contenders();
    if contenders.len() < 2 {
        return Vec::new();
    }
    contenders
        .iter()
        .map(|&i| {
            let hole = hand.seats[i].hole_cards.expect("contender was dealt in");
            HandResult {
                seat: SeatId(i),
                rank: evaluate_best_hand(hole, &hand.community),
                best_five: pick_best_five(hole, &hand.community),
            }
        })
        .collect()
}

/// Reconstruct the turn pointer from the tail of the log, mirroring the
/// live selection rules.
fn final_to_act(hand: &Hand, events: &[HandEvent]) -> Option<usize> {
    if hand.complete || hand.poisoned {
        return None;
    }
    let heads_up = hand.stacks_start.iter().filter(|&&c| c > 0).count() == 2;
    match &events.last()?.body {
        HandEventBody::PostBlind { .. } | HandEventBody::Deal { .. } => {
            if hand.should_auto_advance() {
                None
            } else if heads_up {
                hand.first_actionable_from(hand.sb_pos)
            } else {
                hand.next_actionable_after(hand.bb_pos)
            }
        }
        HandEventBody::Action { seat, .. } => {
            if hand.round_complete() {
                None
            } else {
                hand.next_actionable_after(seat.0)
            }
        }
        HandEventBody::AdvanceStreet { .. } => {
            if hand.should_auto_advance() {
                None
            } else {
                hand.first_actionable_from((hand.dealer_pos + 1) % hand.seats.len())
            }
        }
        _ => None,
    }
}
