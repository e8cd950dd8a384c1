//! Shared application state: the table registry, session registry,
//! subscription hub and the persistence handle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rand::distr::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use holdem_shared::TableStatus;

use crate::config::Config;
use crate::errors::ServiceError;
use crate::server::hub::Hub;
use crate::server::session::Sessions;
use crate::server::table::{spawn_table, TableHandle};
use crate::store::{Store, TableSnapshot};

pub const ROOM_CODE_LEN: usize = 6;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    tables: RwLock<HashMap<String, TableHandle>>,
    sessions: Sessions,
    hub: Hub,
    store: Arc<dyn Store>,
    config: Config,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        AppState {
            inner: Arc::new(Inner {
                tables: RwLock::new(HashMap::new()),
                sessions: Sessions::new(),
                hub: Hub::new(),
                store,
                config,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn sessions(&self) -> &Sessions {
        &self.inner.sessions
    }

    pub fn hub(&self) -> &Hub {
        &self.inner.hub
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.inner.store.clone()
    }

    pub fn table(&self, room_code: &str) -> Option<TableHandle> {
        self.inner.tables.read().unwrap().get(room_code).cloned()
    }

    /// Create a table, spawn its serializer task and register it with the
    /// hub. The initial snapshot is persisted before the table is visible.
    pub fn create_table(
        &self,
        small_blind: u32,
        big_blind: u32,
        starting_chips: u32,
    ) -> Result<TableHandle, ServiceError> {
        if small_blind == 0 || big_blind < small_blind || starting_chips < big_blind {
            return Err(ServiceError::InputValidation(
                "blinds must satisfy 0 < small <= big <= starting chips".into(),
            ));
        }

        let room_code = self.fresh_room_code();
        let snapshot = TableSnapshot {
            table_id: Uuid::new_v4().to_string(),
            room_code: room_code.clone(),
            small_blind,
            big_blind,
            starting_chips,
            status: TableStatus::Waiting,
            seats: Vec::new(),
            dealer_pos: 0,
            hand_counter: 0,
            revision: 0,
            hand: None,
        };
        self.inner.store.save_snapshot(&snapshot)?;
        Ok(self.install(snapshot))
    }

    /// Re-spawn serializers for every table persisted in the store.
    pub fn recover_tables(&self) -> Result<usize, ServiceError> {
        let rooms = self.inner.store.list_rooms()?;
        let mut recovered = 0;
        for room in rooms {
            if self.table(&room).is_some() {
                continue;
            }
            if let Some(snapshot) = self.inner.store.load_snapshot(&room)? {
                tracing::info!(room = %room, revision = snapshot.revision, "recovered table");
                self.install(snapshot);
                recovered += 1;
            }
        }
        Ok(recovered)
    }

    fn install(&self, snapshot: TableSnapshot) -> TableHandle {
        let room_code = snapshot.room_code.clone();
        let handle = spawn_table(snapshot, self.inner.store.clone());
        self.inner.hub.register_table(&room_code, handle.updates());
        self.inner
            .tables
            .write()
            .unwrap()
            .insert(room_code, handle.clone());
        handle
    }

    fn fresh_room_code(&self) -> String {
        let tables = self.inner.tables.read().unwrap();
        loop {
            let code: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(ROOM_CODE_LEN)
                .map(|c| (c as char).to_ascii_uppercase())
                .collect();
            if !tables.contains_key(&code) {
                return code;
            }
        }
    }
}
