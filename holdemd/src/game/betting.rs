//! Betting rules: validation and application of a single player action.

use holdem_shared::{ActionKind, HandEventBody, PlayerAction, SeatId, SeatStatus};

use crate::game::errors::ActionError;
use crate::game::hand::Hand;

impl Hand {
    /// Validate and apply one action for `actor`, then update the hand flow
    /// (next actor, street advance, termination).
    pub fn apply_action(&mut self, actor: usize, action: PlayerAction) -> Result<(), ActionError> {
        self.ensure_mutable()?;
        if self.street == holdem_shared::Street::Showdown {
            return Err(ActionError::HandNotActive);
        }
        if self.to_act != Some(actor) {
            return Err(ActionError::NotYourTurn);
        }
        let seat = &self.seats[actor];
        if !seat.can_act() {
            // Turn legality keeps this unreachable; fail closed regardless.
            return Err(ActionError::NotYourTurn);
        }

        let kind = self.resolve_action(actor, action)?;
        let street = self.street;
        self.apply_recorded_action(actor, kind);
        self.push_event(HandEventBody::Action {
            seat: SeatId(actor),
            action: kind,
            street,
        })?;
        self.after_action(actor)
    }

    /// Translate a submitted action into the concrete [`ActionKind`] that
    /// will be recorded, enforcing every betting precondition.
    fn resolve_action(&self, actor: usize, action: PlayerAction) -> Result<ActionKind, ActionError> {
        let seat = &self.seats[actor];
        let owed = self.current_bet.saturating_sub(seat.current_bet);

        match action {
            PlayerAction::Fold => Ok(ActionKind::Fold),

            PlayerAction::Check => {
                if owed != 0 {
                    return Err(ActionError::IllegalAction(format!(
                        "cannot check facing a bet of {}",
                        self.current_bet
                    )));
                }
                Ok(ActionKind::Check)
            }

            PlayerAction::Call => {
                if owed == 0 {
                    return Err(ActionError::IllegalAction("nothing to call".into()));
                }
                // Short-stack rule: a call may consume the whole stack.
                Ok(ActionKind::Call {
                    amount: owed.min(seat.chips),
                })
            }

            PlayerAction::Bet(amount) => {
                if self.current_bet != 0 {
                    return Err(ActionError::IllegalAction(
                        "cannot bet facing a bet; raise instead".into(),
                    ));
                }
                if amount == 0 {
                    return Err(ActionError::AmountBelowMinimum {
                        min: self.big_blind.min(seat.chips),
                    });
                }
                if amount > seat.chips {
                    return Err(ActionError::AmountExceedsStack { max: seat.chips });
                }
                // An all-in for less than the big blind is a legal under-bet.
                if amount < self.big_blind && amount != seat.chips {
                    return Err(ActionError::AmountBelowMinimum {
                        min: self.big_blind.min(seat.chips),
                    });
                }
                Ok(ActionKind::Bet { amount })
            }

            PlayerAction::Raise(amount) => {
                if self.current_bet == 0 {
                    return Err(ActionError::IllegalAction(
                        "nothing to raise; bet instead".into(),
                    ));
                }
                if seat.last_action.is_some() {
                    // Betting was not reopened for this seat (an all-in
                    // under-raise does not restore raising rights).
                    return Err(ActionError::IllegalAction(
                        "betting is not reopened".into(),
                    ));
                }
                if seat.chips <= owed {
                    return Err(ActionError::InsufficientChips);
                }
                let headroom = seat.chips - owed;
                if amount > headroom {
                    return Err(ActionError::AmountExceedsStack { max: headroom });
                }
                if amount == 0 {
                    return Err(ActionError::AmountBelowMinimum {
                        min: self.last_raise.min(headroom),
                    });
                }
                // An all-in for less than a full raise is a legal under-raise.
                if amount < self.last_raise && owed + amount != seat.chips {
                    return Err(ActionError::AmountBelowMinimum {
                        min: self.last_raise.min(headroom),
                    });
                }
                Ok(ActionKind::Raise {
                    to: seat.current_bet + owed + amount,
                    by: amount,
                })
            }

            PlayerAction::AllIn => {
                if seat.chips == 0 {
                    return Err(ActionError::InsufficientChips);
                }
                if seat.chips > owed && owed > 0 && seat.last_action.is_some() {
                    // A raising all-in needs raising rights, same as above.
                    return Err(ActionError::IllegalAction(
                        "betting is not reopened".into(),
                    ));
                }
                Ok(ActionKind::AllIn { amount: seat.chips })
            }
        }
    }

    /// Apply the chip, status and reopen effects of a recorded action.
    /// Shared between the live path and event replay; assumes the action
    /// was validated (or recorded by a prior run of this engine).
    pub(crate) fn apply_recorded_action(&mut self, actor: usize, kind: ActionKind) {
        let prev_current_bet = self.current_bet;

        let moved = match kind {
            ActionKind::Fold => {
                self.seats[actor].status = SeatStatus::Folded;
                0
            }
            ActionKind::Check => 0,
            ActionKind::Call { amount } => amount,
            ActionKind::Bet { amount } => {
                self.current_bet = self.seats[actor].current_bet + amount;
                self.last_raise = amount;
                if amount >= self.big_blind {
                    self.reopen_action(actor);
                }
                amount
            }
            ActionKind::Raise { to, by } => {
                self.current_bet = to;
                if by >= self.last_raise {
                    self.last_raise = by;
                    self.reopen_action(actor);
                }
                to - self.seats[actor].current_bet
            }
            ActionKind::AllIn { amount } => {
                let new_street_bet = self.seats[actor].current_bet + amount;
                if new_street_bet > prev_current_bet {
                    let by = new_street_bet - prev_current_bet;
                    self.current_bet = new_street_bet;
                    let full = if prev_current_bet == 0 {
                        // Opening all-in: establishes the raise size like a
                        // bet, full only when it reaches the big blind.
                        self.last_raise = by;
                        by >= self.big_blind
                    } else {
                        by >= self.last_raise
                    };
                    if full {
                        self.last_raise = by;
                        self.reopen_action(actor);
                    }
                }
                amount
            }
        };

        let seat = &mut self.seats[actor];
        seat.chips -= moved;
        seat.current_bet += moved;
        seat.total_bet += moved;
        self.pot += moved;
        if seat.chips == 0 && seat.status == SeatStatus::Active {
            seat.status = SeatStatus::AllIn;
        }
        seat.last_action = Some(kind);
    }

    /// A full bet or raise reopens the action: every other active seat must
    /// act again and regains the right to raise.
    fn reopen_action(&mut self, actor: usize) {
        for (i, seat) in self.seats.iter_mut().enumerate() {
            if i != actor && seat.status == SeatStatus::Active {
                seat.last_action = None;
            }
        }
    }
}
