//! Hand flow: turn order, betting-round completion, street advance and the
//! auto-advance machinery for all-in run-outs.

use holdem_shared::{ActionKind, HandEventBody, SeatId, SeatStatus, Street};

use crate::game::errors::ActionError;
use crate::game::hand::Hand;

impl Hand {
    /// Centralized post-action update: terminate on fold-win, advance the
    /// street on round completion, otherwise pass the turn.
    pub(crate) fn after_action(&mut self, actor: usize) -> Result<(), ActionError> {
        if self.contenders().len() <= 1 {
            return self.finish_fold_win();
        }

        if self.round_complete() {
            if self.should_auto_advance() {
                // No decisions remain; streets are dealt via the explicit
                // advance operation so observers can follow the run-out.
                self.to_act = None;
                Ok(())
            } else {
                self.advance_street()
            }
        } else {
            self.to_act = self.next_actionable_after(actor);
            Ok(())
        }
    }

    /// A betting round is complete when every active seat has acted and
    /// matched the current bet, or fewer than two seats still contend.
    pub fn round_complete(&self) -> bool {
        if self.contenders().len() < 2 {
            return true;
        }
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Active)
            .all(|s| s.last_action.is_some() && s.current_bet == self.current_bet)
    }

    /// No further player decisions are possible on this or future streets:
    /// everyone contending is all-in, or the sole seat that could act has
    /// already matched the current bet, or only one seat is left un-folded.
    pub fn should_auto_advance(&self) -> bool {
        let contenders = self.contenders();
        if contenders.len() <= 1 {
            return true;
        }
        let actionable: Vec<usize> = (0..self.seats.len())
            .filter(|&i| self.seats[i].can_act())
            .collect();
        match actionable.len() {
            0 => true,
            1 => self.seats[actionable[0]].current_bet == self.current_bet,
            _ => false,
        }
    }

    /// The all-in run-out condition: at least two seats contend, at least
    /// one is all-in, and no further betting decision is possible. Under
    /// this condition hole cards become public before the final streets.
    pub fn is_runout(&self) -> bool {
        let contenders = self.contenders();
        contenders.len() >= 2
            && contenders
                .iter()
                .any(|&i| self.seats[i].status == SeatStatus::AllIn)
            && self.should_auto_advance()
    }

    /// Advance one street: reset per-street betting state, deal the next
    /// community cards (3/1/1) and pick the first actor. Reaching showdown
    /// resolves the hand.
    pub(crate) fn advance_street(&mut self) -> Result<(), ActionError> {
        let from = self.street;
        let to = from.next();

        for seat in &mut self.seats {
            seat.current_bet = 0;
            seat.last_action = None;
        }
        self.current_bet = 0;
        self.last_raise = 0;

        let dealt = match to {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        };
        if dealt > 0 {
            let mut cards = Vec::with_capacity(dealt);
            for _ in 0..dealt {
                cards.push(self.draw()?);
            }
            self.community.extend_from_slice(&cards);
            self.push_event(HandEventBody::DealCommunity { street: to, cards })?;
        }

        self.street = to;
        self.push_event(HandEventBody::AdvanceStreet { from, to })?;

        if to == Street::Showdown {
            self.to_act = None;
            return self.process_showdown();
        }

        self.to_act = if self.should_auto_advance() {
            None
        } else {
            // First to act post-flop: next seat after the dealer that can act.
            self.first_actionable_from((self.dealer_pos + 1) % self.seats.len())
        };
        Ok(())
    }

    /// Explicit advance during an auto-advance phase (the `AdvanceRound`
    /// operation). Deals exactly one street per call; repeated calls after
    /// completion are no-ops thanks to showdown idempotence.
    pub fn advance_runout(&mut self) -> Result<(), ActionError> {
        if self.poisoned {
            return Err(ActionError::Invariant("hand is poisoned".into()));
        }
        if self.complete {
            return Ok(());
        }
        if !self.should_auto_advance() {
            return Err(ActionError::NotAutoAdvanceable);
        }
        self.synthesize_pending_check()?;
        self.advance_street()
    }

    /// Reveal the next street during an all-in run-out (the `RevealCard`
    /// operation). Stricter precondition than `advance_runout`: the hand
    /// must actually be in a run-out.
    pub fn reveal_next(&mut self) -> Result<(), ActionError> {
        if self.poisoned {
            return Err(ActionError::Invariant("hand is poisoned".into()));
        }
        if self.complete {
            return Ok(());
        }
        if !self.is_runout() {
            return Err(ActionError::NotAllInRunout);
        }
        self.synthesize_pending_check()?;
        self.advance_street()
    }

    /// When exactly one seat could still act and owes nothing, record a
    /// synthetic check on its behalf so the event log stays faithful
    /// without a human clicking through meaningless checks.
    fn synthesize_pending_check(&mut self) -> Result<(), ActionError> {
        let actionable: Vec<usize> = (0..self.seats.len())
            .filter(|&i| self.seats[i].can_act())
            .collect();
        if let [lone] = actionable[..] {
            let seat = &self.seats[lone];
            if seat.current_bet == self.current_bet && seat.last_action.is_none() {
                let street = self.street;
                self.apply_recorded_action(lone, ActionKind::Check);
                self.push_event(HandEventBody::Action {
                    seat: SeatId(lone),
                    action: ActionKind::Check,
                    street,
                })?;
            }
        }
        Ok(())
    }
}
