//! The hand-scoped event log. One event is appended per applied mutation;
//! the ordered list reconstructs the hand exactly (see the engine's replay).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{ActionKind, BlindKind, Street};
use crate::hand::Pot;
use crate::seat::SeatId;

/// A recorded event with its hand-local sequence number and timestamp.
/// `seq` is monotonic within a hand, starting at 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub seq: u64,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: HandEventBody,
}

/// Event payloads. Each carries enough context to be interpreted without
/// looking at later events.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HandEventBody {
    /// Hand initialization: `deck_seed` is the hex-encoded shuffle seed, so
    /// any holder of the log can reproduce the deal. `stacks_start` is the
    /// chip count of every seat (index = seat id) before blinds.
    HandStart {
        hand_no: u64,
        dealer_pos: usize,
        deck_seed: String,
        small_blind: u32,
        big_blind: u32,
        stacks_start: Vec<u32>,
        blinds_posted: Vec<(SeatId, BlindKind, u32)>,
    },
    /// Hole cards dealt to one seat.
    Deal { seat: SeatId, cards: [Card; 2] },
    /// A blind posted, possibly short (capped by the poster's stack).
    PostBlind {
        seat: SeatId,
        kind: BlindKind,
        amount: u32,
    },
    /// A completed betting action, including engine-synthesized checks.
    Action {
        seat: SeatId,
        action: ActionKind,
        street: Street,
    },
    /// Community cards dealt for a street (3 for the flop, then 1, 1).
    DealCommunity { street: Street, cards: Vec<Card> },
    /// Street transition after a completed betting round.
    AdvanceStreet { from: Street, to: Street },
    /// Pot resolution: the full layered breakdown and, aligned by index,
    /// the winners of each pot (empty for uncalled layers returned to
    /// their sole eligible seat).
    Showdown {
        pots: Vec<Pot>,
        winners_by_pot: Vec<Vec<SeatId>>,
    },
    /// Terminal event; `stacks_end` is every seat's chips after payouts.
    HandComplete { stacks_end: Vec<u32> },
}

impl HandEvent {
    pub fn new(seq: u64, body: HandEventBody) -> Self {
        HandEvent {
            seq,
            at: Utc::now(),
            body,
        }
    }
}
