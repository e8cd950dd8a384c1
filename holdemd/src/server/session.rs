//! Sessions and credential fingerprints.
//!
//! Credentials are never stored: seats keep a SHA-256 fingerprint, and a
//! successful join or authenticate mints an opaque session token mapping
//! back to `(room, seat)`.

use std::collections::HashMap;
use std::sync::RwLock;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use holdem_shared::SeatId;

/// Minimum credential length accepted at join time.
pub const MIN_CREDENTIAL_LEN: usize = 8;

/// Hex-encoded SHA-256 of a credential.
pub fn credential_fingerprint(credential: &str) -> String {
    hex::encode(Sha256::digest(credential.as_bytes()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub room_code: String,
    pub seat: SeatId,
}

/// Token-to-seat registry shared by all transports.
#[derive(Default)]
pub struct Sessions {
    tokens: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token bound to a seat.
    pub fn create(&self, room_code: &str, seat: SeatId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().unwrap().insert(
            token.clone(),
            Session {
                room_code: room_code.to_string(),
                seat,
            },
        );
        token
    }

    pub fn resolve(&self, token: &str) -> Option<Session> {
        self.tokens.read().unwrap().get(token).cloned()
    }
}
