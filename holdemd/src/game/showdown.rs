//! Pot resolution: comparator-based awards, split pots with deterministic
//! remainder placement, uncalled-portion returns and the fold-win fast
//! path. Guarded by `showdown_done` so repeated calls are no-ops.

use std::collections::BTreeSet;

use holdem_shared::{HandEventBody, HandRank, HandResult, Pot, SeatId};

use crate::game::errors::ActionError;
use crate::game::hand::Hand;
use crate::game::pots::build_pots;
use crate::poker::{evaluate_best_hand, pick_best_five};

impl Hand {
    /// Award every pot. Each pot goes to the comparator-maximum hand among
    /// its eligible seats, split as evenly as possible with the remainder
    /// to the earliest winner clockwise from the dealer. A pot with a
    /// single eligible seat is an uncalled portion: returned, not won.
    pub fn process_showdown(&mut self) -> Result<(), ActionError> {
        if self.showdown_done {
            return Ok(());
        }
        if self.poisoned {
            return Err(ActionError::Invariant("hand is poisoned".into()));
        }

        let contenders = self.contenders();
        if contenders.len() <= 1 {
            return self.finish_fold_win();
        }

        let results: Vec<HandResult> = contenders
            .iter()
            .map(|&i| {
                let hole = self.seats[i].hole_cards.expect("contender was dealt in");
                HandResult {
                    seat: SeatId(i),
                    rank: evaluate_best_hand(hole, &self.community),
                    best_five: pick_best_five(hole, &self.community),
                }
            })
            .collect();
        let rank_of = |seat: SeatId| -> &HandRank {
            &results
                .iter()
                .find(|r| r.seat == seat)
                .expect("every eligible seat contends")
                .rank
        };

        let pots = build_pots(&self.seats);
        let mut winners_by_pot: Vec<Vec<SeatId>> = Vec::with_capacity(pots.len());
        let mut contested_winners: BTreeSet<usize> = BTreeSet::new();

        for pot in &pots {
            if let [sole] = pot.eligible[..] {
                // Uncalled portion: money back, no winner flagged.
                self.seats[sole.0].chips += pot.amount;
                winners_by_pot.push(Vec::new());
                continue;
            }

            let best = pot
                .eligible
                .iter()
                .map(|&s| rank_of(s))
                .max()
                .expect("pot has eligible seats");
            let mut winners: Vec<usize> = pot
                .eligible
                .iter()
                .filter(|&&s| rank_of(s) == best)
                .map(|s| s.0)
                .collect();
            // Remainder chips go to the earliest winners clockwise from
            // the dealer.
            let n = self.seats.len();
            let dealer = self.dealer_pos;
            winners.sort_by_key(|&i| (i + n - (dealer + 1) % n) % n);

            let share = pot.amount / winners.len() as u32;
            let remainder = pot.amount % winners.len() as u32;
            for (j, &w) in winners.iter().enumerate() {
                let extra = if (j as u32) < remainder { 1 } else { 0 };
                self.seats[w].chips += share + extra;
            }

            contested_winners.extend(winners.iter().copied());
            winners_by_pot.push(winners.iter().map(|&i| SeatId(i)).collect());
        }

        self.pot = 0;
        self.pots = pots.clone();
        self.winners = contested_winners.into_iter().collect();
        self.results = results;
        self.showdown_done = true;
        self.complete = true;
        self.to_act = None;

        self.push_event(HandEventBody::Showdown {
            pots,
            winners_by_pot,
        })?;
        let stacks_end = self.stacks();
        self.push_event(HandEventBody::HandComplete { stacks_end })
    }

    /// Everyone else folded: the last contender takes the whole pot without
    /// a card comparison. The street is left where the hand ended and no
    /// further community cards are dealt.
    pub(crate) fn finish_fold_win(&mut self) -> Result<(), ActionError> {
        if self.showdown_done {
            return Ok(());
        }
        let winner = *self
            .contenders()
            .first()
            .ok_or_else(|| ActionError::Invariant("hand has no contender".into()))?;

        let amount = self.pot;
        self.seats[winner].chips += amount;
        self.pot = 0;
        let pots = vec![Pot {
            amount,
            eligible: vec![SeatId(winner)],
        }];
        self.pots = pots.clone();
        self.winners = vec![winner];
        self.showdown_done = true;
        self.complete = true;
        self.to_act = None;

        self.push_event(HandEventBody::Showdown {
            pots,
            winners_by_pot: vec![vec![SeatId(winner)]],
        })?;
        let stacks_end = self.stacks();
        self.push_event(HandEventBody::HandComplete { stacks_end })
    }
}
