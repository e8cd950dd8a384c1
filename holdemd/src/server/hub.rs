//! The subscription hub.
//!
//! Subscribers are keyed by `(table, stream, viewer)`. For every committed
//! revision the hub projects once per distinct projection group and fans
//! the result out on watch channels: slow consumers skip intermediate
//! revisions but always converge on the latest one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use holdem_shared::{SeatId, ServerMsg, StreamKind};

use crate::server::views;
use crate::store::TableSnapshot;

type GroupKey = (StreamKind, Option<SeatId>);
type Groups = Arc<Mutex<HashMap<GroupKey, watch::Sender<ServerMsg>>>>;

#[derive(Default)]
pub struct Hub {
    tables: Mutex<HashMap<String, Groups>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fanning out a table's committed snapshots. Called once per
    /// spawned table.
    pub fn register_table(&self, room: &str, mut updates: watch::Receiver<Arc<TableSnapshot>>) {
        let groups: Groups = Arc::new(Mutex::new(HashMap::new()));
        self.tables
            .lock()
            .unwrap()
            .insert(room.to_string(), groups.clone());

        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                let mut groups = groups.lock().unwrap();
                // Project once per live group; drop groups nobody watches.
                groups.retain(|key, sender| {
                    if sender.receiver_count() == 0 {
                        return false;
                    }
                    sender.send_replace(project(key, &snapshot));
                    true
                });
            }
        });
    }

    /// Subscribe to a projection group, receiving the current projection
    /// immediately and every subsequent revision (latest-wins).
    pub fn subscribe(
        &self,
        room: &str,
        stream: StreamKind,
        viewer: Option<SeatId>,
        current: &TableSnapshot,
    ) -> Option<watch::Receiver<ServerMsg>> {
        let tables = self.tables.lock().unwrap();
        let groups = tables.get(room)?;
        let key = (stream, viewer);
        let mut groups = groups.lock().unwrap();
        let sender = groups.entry(key).or_insert_with(|| {
            let (tx, _rx) = watch::channel(project(&key, current));
            tx
        });
        // Refresh a group that sat idle across revisions with no
        // receivers. Never regress: the fan task may already have
        // published something newer than the caller's snapshot. The
        // borrow must end before send_replace takes the write lock.
        let stale = {
            let stored = sender.borrow();
            projection_revision(&stored) < current.revision
        };
        if stale {
            sender.send_replace(project(&key, current));
        }
        Some(sender.subscribe())
    }
}

fn projection_revision(msg: &ServerMsg) -> u64 {
    match msg {
        ServerMsg::Table(view) => view.revision,
        ServerMsg::Player(view) => view.table.revision,
        _ => 0,
    }
}

fn project(key: &GroupKey, snapshot: &TableSnapshot) -> ServerMsg {
    match key {
        (StreamKind::Table, _) | (StreamKind::Player, None) => {
            ServerMsg::Table(views::table_view(snapshot))
        }
        (StreamKind::Player, Some(viewer)) => {
            ServerMsg::Player(views::player_view(snapshot, *viewer))
        }
    }
}
