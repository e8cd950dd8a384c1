//! Hand initialization: dealer rotation, hole-card dealing and blinds.

use holdem_shared::{BlindKind, HandEventBody, SeatId, SeatStatus, Street};

use crate::game::errors::ActionError;
use crate::game::hand::{Hand, HandSeat};
use crate::poker::{shuffled_deck, DeckSeed};

/// Next seat at or after `from` (clockwise) holding chips, in table order.
pub fn next_funded_from(stacks: &[u32], from: usize) -> Option<usize> {
    let n = stacks.len();
    (0..n).map(|step| (from + step) % n).find(|&i| stacks[i] > 0)
}

impl Hand {
    /// Start a new hand: shuffle from `seed`, deal two hole cards to every
    /// funded seat (one card per seat per pass, starting left of the
    /// dealer), post blinds capped by stacks, and establish the first
    /// actor. `dealer_pos` must hold chips.
    pub fn start(
        hand_no: u64,
        dealer_pos: usize,
        stacks: &[u32],
        small_blind: u32,
        big_blind: u32,
        seed: DeckSeed,
    ) -> Result<Hand, ActionError> {
        let n = stacks.len();
        let funded: Vec<usize> = (0..n).filter(|&i| stacks[i] > 0).collect();
        if funded.len() < 2 {
            return Err(ActionError::NotEnoughPlayers);
        }
        if stacks[dealer_pos] == 0 {
            return Err(ActionError::IllegalAction("dealer seat has no chips".into()));
        }

        let seats: Vec<HandSeat> = stacks
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

        let deck = shuffled_deck(&seed);
        let mut hand = Hand::new_shell(
            hand_no,
            dealer_pos,
            small_blind,
            big_blind,
            seed,
            deck,
            seats,
            stacks.to_vec(),
        );

        // Heads-up: the dealer posts the small blind; otherwise blinds sit
        // left of the dealer in table order, skipping unfunded seats.
        let heads_up = funded.len() == 2;
        let (sb_pos, bb_pos) = if heads_up {
            let other = next_funded_from(stacks, (dealer_pos + 1) % n)
                .expect("two funded seats exist");
            (dealer_pos, other)
        } else {
            let sb = next_funded_from(stacks, (dealer_pos + 1) % n).expect("funded seat");
            let bb = next_funded_from(stacks, (sb + 1) % n).expect("funded seat");
            (sb, bb)
        };
        hand.sb_pos = sb_pos;
        hand.bb_pos = bb_pos;

        let sb_amount = small_blind.min(hand.seats[sb_pos].chips);
        let bb_amount = big_blind.min(hand.seats[bb_pos].chips);

        hand.push_event(HandEventBody::HandStart {
            hand_no,
            dealer_pos,
            deck_seed: seed.to_hex(),
            small_blind,
            big_blind,
            stacks_start: stacks.to_vec(),
            blinds_posted: vec![
                (SeatId(sb_pos), BlindKind::SmallBlind, sb_amount),
                (SeatId(bb_pos), BlindKind::BigBlind, bb_amount),
            ],
        })?;

        hand.deal_hole_cards()?;
        hand.post_blind(sb_pos, BlindKind::SmallBlind, small_blind)?;
        hand.post_blind(bb_pos, BlindKind::BigBlind, big_blind)?;

        // The nominal big blind is the bet to match even when posted short.
        hand.current_bet = big_blind;
        hand.last_raise = big_blind;
        hand.street = Street::Preflop;

        hand.to_act = if hand.should_auto_advance() {
            None
        } else if heads_up {
            // Heads-up preflop the dealer (small blind) acts first.
            hand.first_actionable_from(sb_pos)
        } else {
            // First to act is left of the big blind.
            hand.next_actionable_after(bb_pos)
        };

        Ok(hand)
    }

    /// Deal two passes of one card each to every funded seat, starting at
    /// the seat left of the dealer, then record one `Deal` event per seat.
    fn deal_hole_cards(&mut self) -> Result<(), ActionError> {
        let n = self.seats.len();
        let order: Vec<usize> = (1..=n)
            .map(|step| (self.dealer_pos + step) % n)
            .filter(|&i| self.seats[i].status == SeatStatus::Active)
            .collect();

        let mut first_pass = Vec::with_capacity(order.len());
        for _ in &order {
            first_pass.push(self.draw()?);
        }
        let mut second_pass = Vec::with_capacity(order.len());
        for _ in &order {
            second_pass.push(self.draw()?);
        }

        for (i, &idx) in order.iter().enumerate() {
            let cards = [first_pass[i], second_pass[i]];
            self.seats[idx].hole_cards = Some(cards);
            self.push_event(HandEventBody::Deal {
                seat: SeatId(idx),
                cards,
            })?;
        }
        Ok(())
    }

    /// Post a blind capped by the poster's stack; a short blind puts the
    /// seat all-in immediately.
    fn post_blind(
        &mut self,
        idx: usize,
        kind: BlindKind,
        amount: u32,
    ) -> Result<(), ActionError> {
        let seat = &mut self.seats[idx];
        let posted = amount.min(seat.chips);
        seat.chips -= posted;
        seat.current_bet += posted;
        seat.total_bet += posted;
        self.pot += posted;
        if seat.chips == 0 {
            seat.status = SeatStatus::AllIn;
        }
        self.push_event(HandEventBody::PostBlind {
            seat: SeatId(idx),
            kind,
            amount: posted,
        })
    }
}
