//! In-memory store for tests. Supports injected failures so the
//! serializer's transient-error path can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use holdem_shared::HandEvent;

use super::{HandRecord, Store, StoreError, TableSnapshot};

#[derive(Default)]
struct Tables {
    snapshots: HashMap<String, TableSnapshot>,
    events: HashMap<(String, u64), Vec<HandEvent>>,
    hands: HashMap<(String, u64), HandRecord>,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Tables>,
    /// Number of upcoming write operations that should fail.
    fail_writes: AtomicU32,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` write operations fail with an I/O error.
    pub fn fail_next_writes(&self, n: u32) {
        self.fail_writes.store(n, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        let prev = self
            .fail_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
            .unwrap_or(0);
        if prev > 0 {
            Err(StoreError::Io("injected failure".into()))
        } else {
            Ok(())
        }
    }

    pub fn hand_record(&self, room: &str, hand_no: u64) -> Option<HandRecord> {
        self.inner
            .lock()
            .unwrap()
            .hands
            .get(&(room.to_string(), hand_no))
            .cloned()
    }
}

impl Store for MemStore {
    fn append_events(
        &self,
        room: &str,
        hand_no: u64,
        events: &[HandEvent],
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut inner = self.inner.lock().unwrap();
        let log = inner
            .events
            .entry((room.to_string(), hand_no))
            .or_default();
        let last = log.last().map(|e| e.seq);
        log.extend(
            events
                .iter()
                .filter(|e| last.is_none_or(|l| e.seq > l))
                .cloned(),
        );
        Ok(())
    }

    fn save_snapshot(&self, snapshot: &TableSnapshot) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .snapshots
            .insert(snapshot.room_code.clone(), snapshot.clone());
        Ok(())
    }

    fn save_hand(&self, room: &str, record: &HandRecord) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .hands
            .insert((room.to_string(), record.hand_no), record.clone());
        Ok(())
    }

    fn load_snapshot(&self, room: &str) -> Result<Option<TableSnapshot>, StoreError> {
        Ok(self.inner.lock().unwrap().snapshots.get(room).cloned())
    }

    fn load_events(&self, room: &str, hand_no: u64) -> Result<Vec<HandEvent>, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .events
            .get(&(room.to_string(), hand_no))
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound(format!("no event log for hand {hand_no} in room {room}"))
            })
    }

    fn list_rooms(&self) -> Result<Vec<String>, StoreError> {
        let mut rooms: Vec<String> = self
            .inner
            .lock()
            .unwrap()
            .snapshots
            .keys()
            .cloned()
            .collect();
        rooms.sort();
        Ok(rooms)
    }
}
