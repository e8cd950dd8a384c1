//! Persistence interface.
//!
//! The engine treats storage as an external collaborator behind the
//! [`Store`] trait: an append-only event log per hand plus a cached table
//! snapshot and a self-contained record per completed hand. Deleting a
//! table's snapshot and replaying its events reconstructs every hand.

mod fs;
mod mem;

pub use fs::FsStore;
pub use mem::MemStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use holdem_shared::{Card, HandEvent, Pot, SeatId, TableStatus};

use crate::game::Hand;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failure: {0}")]
    Io(String),
    #[error("storage encoding failure: {0}")]
    Codec(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// A seat as persisted with the table snapshot.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeatRecord {
    pub id: SeatId,
    pub name: String,
    /// Hex-encoded SHA-256 of the seat's credential; the credential itself
    /// is never stored.
    pub fingerprint: String,
    pub chips: u32,
    pub show_cards: bool,
    pub connected: bool,
}

/// The authoritative per-table state, as owned by the table serializer and
/// persisted after every applied mutation. This is a cache: the event log
/// is canonical.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableSnapshot {
    pub table_id: String,
    pub room_code: String,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_chips: u32,
    pub status: TableStatus,
    pub seats: Vec<SeatRecord>,
    pub dealer_pos: usize,
    pub hand_counter: u64,
    pub revision: u64,
    pub hand: Option<Hand>,
}

/// Self-contained summary of a completed hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandRecord {
    pub hand_no: u64,
    pub dealer_pos: usize,
    pub deck_seed: String,
    pub small_blind: u32,
    pub big_blind: u32,
    pub stacks_start: Vec<u32>,
    pub hole_cards: Vec<Option<[Card; 2]>>,
    pub community: Vec<Card>,
    pub pots: Vec<Pot>,
    pub winners: Vec<SeatId>,
    pub stacks_end: Vec<u32>,
    pub pot_amount: u32,
    pub completed_at: DateTime<Utc>,
}

impl HandRecord {
    /// Summarize a completed hand.
    pub fn from_hand(hand: &Hand) -> Self {
        HandRecord {
            hand_no: hand.hand_no,
            dealer_pos: hand.dealer_pos,
            deck_seed: hand.seed.to_hex(),
            small_blind: hand.small_blind,
            big_blind: hand.big_blind,
            stacks_start: hand.stacks_start.clone(),
            hole_cards: hand.seats.iter().map(|s| s.hole_cards).collect(),
            community: hand.community.clone(),
            pots: hand.pots.clone(),
            winners: hand.winners.iter().map(|&i| SeatId(i)).collect(),
            stacks_end: hand.seats.iter().map(|s| s.chips).collect(),
            pot_amount: hand.pots.iter().map(|p| p.amount).sum(),
            completed_at: Utc::now(),
        }
    }
}

/// The named persistence interface used by every table serializer.
pub trait Store: Send + Sync {
    /// Append events to a hand's log. Events arrive in sequence order and
    /// are never rewritten.
    fn append_events(
        &self,
        room: &str,
        hand_no: u64,
        events: &[HandEvent],
    ) -> Result<(), StoreError>;

    /// Overwrite the cached table snapshot.
    fn save_snapshot(&self, snapshot: &TableSnapshot) -> Result<(), StoreError>;

    /// Write the summary record of a completed hand.
    fn save_hand(&self, room: &str, record: &HandRecord) -> Result<(), StoreError>;

    /// Load a table snapshot, if one was persisted.
    fn load_snapshot(&self, room: &str) -> Result<Option<TableSnapshot>, StoreError>;

    /// Load a hand's full event log in sequence order.
    fn load_events(&self, room: &str, hand_no: u64) -> Result<Vec<HandEvent>, StoreError>;

    /// Room codes of all persisted tables.
    fn list_rooms(&self) -> Result<Vec<String>, StoreError>;
}
