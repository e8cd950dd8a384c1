//! The per-hand state machine root.
//!
//! A `Hand` owns its deck snapshot, the per-hand view of every seat, the
//! betting state of the current street and the append-only event log. All
//! mutation goes through the methods in the sibling modules (`dealing`,
//! `betting`, `flow`, `showdown`); each applied mutation appends events and
//! re-checks chip conservation.

use serde::{Deserialize, Serialize};

use holdem_shared::{
    ActionKind, Card, HandEvent, HandEventBody, HandResult, Pot, SeatStatus, Street,
};

use crate::game::errors::ActionError;
use crate::poker::DeckSeed;

/// Per-hand mutable state of one seat. Index within `Hand::seats` is the
/// seat id; seats keep their table position across hands.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandSeat {
    /// Live stack during the hand.
    pub chips: u32,
    pub hole_cards: Option<[Card; 2]>,
    pub status: SeatStatus,
    /// Chips committed on the current street.
    pub current_bet: u32,
    /// Chips committed across the whole hand.
    pub total_bet: u32,
    /// Last completed betting action this street; cleared on street advance
    /// and by a full bet/raise (which reopens the action).
    pub last_action: Option<ActionKind>,
}

impl HandSeat {
    /// A seat that may still take a betting decision.
    pub fn can_act(&self) -> bool {
        self.status == SeatStatus::Active && self.chips > 0
    }
}

/// A hand of no-limit hold'em in progress (or just completed).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Hand {
    pub hand_no: u64,
    pub dealer_pos: usize,
    pub sb_pos: usize,
    pub bb_pos: usize,
    pub small_blind: u32,
    pub big_blind: u32,

    pub seed: DeckSeed,
    /// Full shuffled deck; `deck_pos` is the running deal cursor.
    pub deck: Vec<Card>,
    pub deck_pos: usize,

    pub seats: Vec<HandSeat>,
    pub community: Vec<Card>,

    /// Chips committed to the hand by everyone, until distributed.
    pub pot: u32,
    /// Layered pot breakdown, recorded at resolution.
    pub pots: Vec<Pot>,
    pub street: Street,
    /// Highest per-street commitment so far.
    pub current_bet: u32,
    /// Size of the most recent full bet/raise; minimum for the next raise.
    pub last_raise: u32,
    /// Seat index to act, or `None` when no decision is pending.
    pub to_act: Option<usize>,

    pub stacks_start: Vec<u32>,
    pub showdown_done: bool,
    /// Seats that won a contested pot this hand.
    pub winners: Vec<usize>,
    /// Evaluated hands revealed at showdown.
    pub results: Vec<HandResult>,
    pub complete: bool,
    /// Set when an invariant violation is detected; all further mutation
    /// is refused.
    pub poisoned: bool,

    pub events: Vec<HandEvent>,
    pub(crate) next_seq: u64,
}

impl Hand {
    pub(crate) fn new_shell(
        hand_no: u64,
        dealer_pos: usize,
        small_blind: u32,
        big_blind: u32,
        seed: DeckSeed,
        deck: Vec<Card>,
        seats: Vec<HandSeat>,
        stacks_start: Vec<u32>,
    ) -> Self {
        let n = seats.len();
        Hand {
            hand_no,
            dealer_pos,
            sb_pos: dealer_pos,
            bb_pos: (dealer_pos + 1) % n,
            small_blind,
            big_blind,
            seed,
            deck,
            deck_pos: 0,
            seats,
            community: Vec::new(),
            pot: 0,
            pots: Vec::new(),
            street: Street::Preflop,
            current_bet: 0,
            last_raise: 0,
            to_act: None,
            stacks_start,
            showdown_done: false,
            winners: Vec::new(),
            results: Vec::new(),
            complete: false,
            poisoned: false,
            events: Vec::new(),
            next_seq: 0,
        }
    }

    /// Seat indices still contending for a pot (active or all-in).
    pub fn contenders(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.status.contends().then_some(i))
            .collect()
    }

    /// Next seat clockwise after `from` that can still act, if any.
    pub(crate) fn next_actionable_after(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&idx| self.seats[idx].can_act())
    }

    /// First seat at or after `from` (clockwise) that can still act.
    pub(crate) fn first_actionable_from(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n)
            .map(|step| (from + step) % n)
            .find(|&idx| self.seats[idx].can_act())
    }

    /// Draw the next card from the deck snapshot.
    pub(crate) fn draw(&mut self) -> Result<Card, ActionError> {
        let card = self
            .deck
            .get(self.deck_pos)
            .copied()
            .ok_or_else(|| ActionError::Invariant("deck underflow".into()))?;
        self.deck_pos += 1;
        Ok(card)
    }

    /// Refuse mutation on poisoned or finished hands.
    pub(crate) fn ensure_mutable(&self) -> Result<(), ActionError> {
        if self.poisoned {
            return Err(ActionError::Invariant("hand is poisoned".into()));
        }
        if self.complete {
            return Err(ActionError::HandComplete);
        }
        Ok(())
    }

    /// Append an event, assigning the next sequence number, then verify
    /// chip conservation. A violation poisons the hand and surfaces as a
    /// fatal error.
    pub(crate) fn push_event(&mut self, body: HandEventBody) -> Result<(), ActionError> {
        let ev = HandEvent::new(self.next_seq, body);
        self.next_seq += 1;
        self.events.push(ev);
        self.check_conservation()
    }

    /// Chip conservation: live stacks plus the pot always equal the
    /// starting stacks. Checked after every event.
    pub(crate) fn check_conservation(&mut self) -> Result<(), ActionError> {
        let live: u64 = self.seats.iter().map(|s| s.chips as u64).sum::<u64>() + self.pot as u64;
        let start: u64 = self.stacks_start.iter().map(|&c| c as u64).sum();
        if live != start {
            self.poisoned = true;
            self.to_act = None;
            return Err(ActionError::Invariant(format!(
                "chip conservation violated: stacks+pot={} expected={}",
                live, start
            )));
        }
        Ok(())
    }

    /// Current stacks, index-aligned with seats.
    pub(crate) fn stacks(&self) -> Vec<u32> {
        self.seats.iter().map(|s| s.chips).collect()
    }
}
