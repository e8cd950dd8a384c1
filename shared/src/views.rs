//! Sanitized snapshot projections delivered to subscribers. Every field is
//! total: a table with no hand in progress carries an explicit `None`, never
//! an omitted key.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Street;
use crate::hand::{HandResult, Pot};
use crate::seat::{SeatId, SeatPublic};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Seats may join; no hand has been dealt yet.
    Waiting,
    /// Hands are being played.
    Playing,
    /// Fewer than two seats have chips; no further hands.
    Completed,
}

/// Public projection of the hand in progress (or just finished).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandView {
    pub hand_no: u64,
    pub street: Street,
    pub community: Vec<Card>,
    pub pot: u32,
    /// Layered pot breakdown; populated at showdown, empty before.
    pub pots: Vec<Pot>,
    pub current_bet: u32,
    pub min_raise: u32,
    pub to_act: Option<SeatId>,
    pub dealer_pos: usize,
    /// Winners of contested pots; empty until the hand resolves.
    pub winners: Vec<SeatId>,
    /// Evaluated hands revealed at showdown, for display.
    pub results: Vec<HandResult>,
    pub complete: bool,
}

/// The observer projection: everything public about a table. Hole cards
/// appear on a seat only when the visibility rules permit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableView {
    pub room_code: String,
    pub revision: u64,
    pub status: TableStatus,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_chips: u32,
    pub seats: Vec<SeatPublic>,
    pub hand: Option<HandView>,
}

/// The per-player projection: the table view plus the viewer's own hole
/// cards, which are always visible to the viewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub viewer: SeatId,
    pub table: TableView,
}
