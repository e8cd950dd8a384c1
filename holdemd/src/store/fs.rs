//! Filesystem-backed store: JSON snapshot and hand records, JSONL event
//! logs, one directory per table under the configured data dir.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use holdem_shared::HandEvent;

use super::{HandRecord, Store, StoreError, TableSnapshot};

pub struct FsStore {
    root: PathBuf,
    /// Highest appended sequence number per hand log, so a retried append
    /// never writes a duplicate line.
    appended: Mutex<HashMap<(String, u64), u64>>,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore {
            root: root.into(),
            appended: Mutex::new(HashMap::new()),
        }
    }

    fn table_dir(&self, room: &str) -> PathBuf {
        self.root.join("tables").join(room)
    }

    fn ensure_dir(&self, room: &str) -> Result<PathBuf, StoreError> {
        let dir = self.table_dir(room);
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(dir)
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let text =
            serde_json::to_string_pretty(value).map_err(|e| StoreError::Codec(e.to_string()))?;
        fs::write(path, text).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl Store for FsStore {
    fn append_events(
        &self,
        room: &str,
        hand_no: u64,
        events: &[HandEvent],
    ) -> Result<(), StoreError> {
        let mut appended = self.appended.lock().unwrap();
        let key = (room.to_string(), hand_no);
        let last = appended.get(&key).copied();
        let fresh: Vec<&HandEvent> = events
            .iter()
            .filter(|e| last.is_none_or(|l| e.seq > l))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }
        let dir = self.ensure_dir(room)?;
        let path = dir.join(format!("events-{hand_no}.jsonl"));
        // Single buffered append so a retried batch is all-or-nothing.
        let mut buf = String::new();
        for event in &fresh {
            let line =
                serde_json::to_string(event).map_err(|e| StoreError::Codec(e.to_string()))?;
            buf.push_str(&line);
            buf.push('\n');
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        file.write_all(buf.as_bytes())
            .map_err(|e| StoreError::Io(e.to_string()))?;
        let max_seq = fresh.last().map(|e| e.seq).unwrap_or(0);
        appended.insert(key, max_seq);
        Ok(())
    }

    fn save_snapshot(&self, snapshot: &TableSnapshot) -> Result<(), StoreError> {
        let dir = self.ensure_dir(&snapshot.room_code)?;
        Self::write_json(&dir.join("snapshot.json"), snapshot)
    }

    fn save_hand(&self, room: &str, record: &HandRecord) -> Result<(), StoreError> {
        let dir = self.ensure_dir(room)?;
        Self::write_json(&dir.join(format!("hand-{}.json", record.hand_no)), record)
    }

    fn load_snapshot(&self, room: &str) -> Result<Option<TableSnapshot>, StoreError> {
        let path = self.table_dir(room).join("snapshot.json");
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        let snapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn load_events(&self, room: &str, hand_no: u64) -> Result<Vec<HandEvent>, StoreError> {
        let path = self.table_dir(room).join(format!("events-{hand_no}.jsonl"));
        if !path.exists() {
            return Err(StoreError::NotFound(format!(
                "no event log for hand {hand_no} in room {room}"
            )));
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut events = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let event: HandEvent =
                serde_json::from_str(line).map_err(|e| StoreError::Codec(e.to_string()))?;
            events.push(event);
        }
        Ok(events)
    }

    fn list_rooms(&self) -> Result<Vec<String>, StoreError> {
        let tables = self.root.join("tables");
        if !tables.exists() {
            return Ok(Vec::new());
        }
        let mut rooms = Vec::new();
        let entries = fs::read_dir(&tables).map_err(|e| StoreError::Io(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    rooms.push(name.to_string());
                }
            }
        }
        rooms.sort();
        Ok(rooms)
    }
}
