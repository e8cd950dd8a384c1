//! Client-server messaging protocol.

use serde::{Deserialize, Serialize};

use crate::game::PlayerAction;
use crate::seat::SeatId;
use crate::views::{PlayerView, TableView};

/// Which projection a subscription receives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Table,
    Player,
}

/// Caller-visible error taxonomy. The `message` accompanying an error names
/// the specific failure (e.g. "room not found", "amount below minimum 20").
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputValidation,
    Authorization,
    Precondition,
    RuleViolation,
    Conflict,
    Transient,
    Timeout,
    Fatal,
}

/// Messages clients send to the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMsg {
    CreateTable {
        small_blind: u32,
        big_blind: u32,
        starting_chips: u32,
    },
    Join {
        room_code: String,
        name: String,
        credential: String,
    },
    Authenticate {
        room_code: String,
        name: String,
        credential: String,
    },
    StartHand {
        token: String,
    },
    Action {
        token: String,
        action: PlayerAction,
    },
    AdvanceRound {
        token: String,
    },
    RevealCard {
        token: String,
    },
    NextHand {
        token: String,
    },
    ShowCards {
        token: String,
        show: bool,
    },
    Subscribe {
        room_code: String,
        stream: StreamKind,
        token: Option<String>,
    },
}

/// Messages the service sends to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMsg {
    TableCreated {
        table_id: String,
        room_code: String,
    },
    Joined {
        seat: SeatId,
        token: String,
        view: PlayerView,
    },
    Authenticated {
        seat: SeatId,
        token: String,
        view: PlayerView,
    },
    Table(TableView),
    Player(PlayerView),
    Error {
        kind: ErrorKind,
        message: String,
    },
}
