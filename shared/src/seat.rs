//! Seat identity and public seat state.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::ActionKind;

/// Stable identifier for a seat at a table. Seat ids are table-local and
/// never reused for a different player within the table's lifetime.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId(pub usize);

impl From<usize> for SeatId {
    fn from(v: usize) -> Self {
        SeatId(v)
    }
}

impl From<SeatId> for usize {
    fn from(id: SeatId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participation status of a seat within the current hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Active,
    Folded,
    AllIn,
    Out,
}

impl SeatStatus {
    /// Seats that still contend for a pot (not folded, not out).
    pub fn contends(self) -> bool {
        matches!(self, SeatStatus::Active | SeatStatus::AllIn)
    }
}

/// Sanitized per-seat state as delivered to subscribers. `hole_cards` is
/// `None` unless the visibility rules permit revealing it to this audience.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeatPublic {
    pub id: SeatId,
    pub name: String,
    pub chips: u32,
    pub status: SeatStatus,
    pub current_bet: u32,
    pub total_bet: u32,
    pub last_action: Option<ActionKind>,
    pub hole_cards: Option<[Card; 2]>,
    pub show_cards: bool,
    pub connected: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
}
