//! The per-table serializer.
//!
//! Each table is owned by exactly one spawned task. Requests arrive on an
//! mpsc queue and are applied one at a time: the task mutates a working
//! copy of the snapshot, persists the resulting events and snapshot (one
//! retry on transient failure), then commits, bumps the revision and
//! publishes on a watch channel. A failed persist discards the working
//! copy, so readers only ever observe persisted revisions, in strictly
//! increasing order.

use std::io::IsTerminal;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use holdem_shared::{HandEvent, PlayerAction, SeatId, TableStatus};

use crate::errors::ServiceError;
use crate::game::{next_funded_from, Hand};
use crate::poker::DeckSeed;
use crate::pretty;
use crate::store::{HandRecord, SeatRecord, Store, StoreError, TableSnapshot};

pub const MAX_SEATS: usize = 10;
pub const CHANNEL_BUFFER_SIZE: usize = 256;

pub type Reply<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Successful join/authenticate outcome.
pub struct JoinedSeat {
    pub seat: SeatId,
    pub snapshot: Arc<TableSnapshot>,
}

/// Requests a table task can apply.
pub enum TableCmd {
    Join {
        name: String,
        fingerprint: String,
        reply: Reply<JoinedSeat>,
    },
    Authenticate {
        name: String,
        fingerprint: String,
        reply: Reply<JoinedSeat>,
    },
    StartHand {
        reply: Reply<Arc<TableSnapshot>>,
    },
    Action {
        seat: SeatId,
        action: PlayerAction,
        reply: Reply<Arc<TableSnapshot>>,
    },
    AdvanceRound {
        reply: Reply<Arc<TableSnapshot>>,
    },
    RevealCard {
        reply: Reply<Arc<TableSnapshot>>,
    },
    NextHand {
        reply: Reply<Arc<TableSnapshot>>,
    },
    ShowCards {
        seat: SeatId,
        show: bool,
        reply: Reply<Arc<TableSnapshot>>,
    },
    /// Connection bookkeeping from the subscription layer; no reply.
    SetConnected { seat: SeatId, connected: bool },
    Snapshot {
        reply: Reply<Arc<TableSnapshot>>,
    },
}

/// A queued request with its optional deadline. Requests whose deadline
/// has passed before application starts are rejected with `Timeout`; once
/// application starts they run to completion.
pub struct TableRequest {
    pub deadline: Option<Instant>,
    pub cmd: TableCmd,
}

/// Cheap cloneable handle to a table task.
#[derive(Clone)]
pub struct TableHandle {
    pub table_id: String,
    pub room_code: String,
    tx: mpsc::Sender<TableRequest>,
    updates: watch::Receiver<Arc<TableSnapshot>>,
}

impl TableHandle {
    pub async fn send(&self, cmd: TableCmd, deadline: Option<Instant>) -> Result<(), ServiceError> {
        self.tx
            .send(TableRequest { deadline, cmd })
            .await
            .map_err(|_| ServiceError::Transient("table task is gone".into()))
    }

    /// Subscribe to committed snapshots (latest-value semantics).
    pub fn updates(&self) -> watch::Receiver<Arc<TableSnapshot>> {
        self.updates.clone()
    }

    /// The most recently committed snapshot.
    pub fn latest(&self) -> Arc<TableSnapshot> {
        self.updates.borrow().clone()
    }
}

/// Create the task owning `snapshot` and return its handle.
pub fn spawn_table(snapshot: TableSnapshot, store: Arc<dyn Store>) -> TableHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let (watch_tx, watch_rx) = watch::channel(Arc::new(snapshot.clone()));
    let handle = TableHandle {
        table_id: snapshot.table_id.clone(),
        room_code: snapshot.room_code.clone(),
        tx,
        updates: watch_rx,
    };
    tokio::spawn(run_table(snapshot, store, rx, watch_tx));
    handle
}

async fn run_table(
    mut state: TableSnapshot,
    store: Arc<dyn Store>,
    mut rx: mpsc::Receiver<TableRequest>,
    watch_tx: watch::Sender<Arc<TableSnapshot>>,
) {
    while let Some(req) = rx.recv().await {
        if let Some(deadline) = req.deadline {
            if Instant::now() > deadline {
                reject(req.cmd, ServiceError::Timeout);
                continue;
            }
        }
        handle_cmd(&mut state, &store, &watch_tx, req.cmd);
    }
    tracing::debug!(room = %state.room_code, "table task shutting down");
}

fn reject(cmd: TableCmd, err: ServiceError) {
    match cmd {
        TableCmd::Join { reply, .. } | TableCmd::Authenticate { reply, .. } => {
            let _ = reply.send(Err(err));
        }
        TableCmd::StartHand { reply }
        | TableCmd::Action { reply, .. }
        | TableCmd::AdvanceRound { reply }
        | TableCmd::RevealCard { reply }
        | TableCmd::NextHand { reply }
        | TableCmd::ShowCards { reply, .. }
        | TableCmd::Snapshot { reply } => {
            let _ = reply.send(Err(err));
        }
        TableCmd::SetConnected { .. } => {}
    }
}

fn handle_cmd(
    state: &mut TableSnapshot,
    store: &Arc<dyn Store>,
    watch_tx: &watch::Sender<Arc<TableSnapshot>>,
    cmd: TableCmd,
) {
    match cmd {
        TableCmd::Snapshot { reply } => {
            let _ = reply.send(Ok(Arc::new(state.clone())));
        }
        TableCmd::Join {
            name,
            fingerprint,
            reply,
        } => {
            let result = apply_mutation(state, store, watch_tx, |work| {
                apply_join(work, &name, &fingerprint)
            })
            .map(|(seat, snapshot)| JoinedSeat { seat, snapshot });
            let _ = reply.send(result);
        }
        TableCmd::Authenticate {
            name,
            fingerprint,
            reply,
        } => {
            // Authentication mutates nothing; resolve against current state.
            let result = authenticate(state, &name, &fingerprint)
                .map(|seat| JoinedSeat {
                    seat,
                    snapshot: Arc::new(state.clone()),
                });
            let _ = reply.send(result);
        }
        TableCmd::StartHand { reply } => {
            let result =
                apply_mutation(state, store, watch_tx, apply_start_hand).map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::Action {
            seat,
            action,
            reply,
        } => {
            let result = apply_mutation(state, store, watch_tx, |work| {
                let hand = active_hand(work)?;
                hand.apply_action(seat.0, action).map_err(ServiceError::from)
            })
            .map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::AdvanceRound { reply } => {
            let result = apply_mutation(state, store, watch_tx, |work| {
                let hand = active_hand(work)?;
                hand.advance_runout().map_err(ServiceError::from)
            })
            .map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::RevealCard { reply } => {
            let result = apply_mutation(state, store, watch_tx, |work| {
                let hand = active_hand(work)?;
                hand.reveal_next().map_err(ServiceError::from)
            })
            .map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::NextHand { reply } => {
            let result =
                apply_mutation(state, store, watch_tx, apply_next_hand).map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::ShowCards { seat, show, reply } => {
            let result = apply_mutation(state, store, watch_tx, |work| {
                match work.seats.get_mut(seat.0) {
                    Some(record) => {
                        record.show_cards = show;
                        Ok(())
                    }
                    None => Err(ServiceError::Precondition("seat not found".into())),
                }
            })
            .map(|(_, s)| s);
            let _ = reply.send(result);
        }
        TableCmd::SetConnected { seat, connected } => {
            let _ = apply_mutation(state, store, watch_tx, |work| {
                if let Some(record) = work.seats.get_mut(seat.0) {
                    record.connected = connected;
                }
                Ok(())
            });
        }
    }
}

/// Apply `f` to a working copy. On success the new events and snapshot are
/// persisted (with one retry per step), then the copy is committed and the
/// new revision published. On persistence failure the copy is discarded
/// and the caller sees a transient error. A fatal engine error commits the
/// poisoned state so further actions are refused.
fn apply_mutation<T>(
    state: &mut TableSnapshot,
    store: &Arc<dyn Store>,
    watch_tx: &watch::Sender<Arc<TableSnapshot>>,
    f: impl FnOnce(&mut TableSnapshot) -> Result<T, ServiceError>,
) -> Result<(T, Arc<TableSnapshot>), ServiceError> {
    let prior = state
        .hand
        .as_ref()
        .map(|h| (h.hand_no, h.events.len(), h.complete));

    let mut work = state.clone();
    match f(&mut work) {
        Ok(value) => {
            finish_bookkeeping(&mut work, prior);
            if work == *state {
                // Nothing observable changed; reply with the current
                // snapshot without minting a new revision.
                return Ok((value, Arc::new(state.clone())));
            }
            let new_events = collect_new_events(&work, prior);
            let completed = completed_record(&work, prior);
            work.revision = state.revision + 1;
            match persist(store.as_ref(), &work, &new_events, completed.as_ref()) {
                Ok(()) => {
                    *state = work;
                    let snapshot = Arc::new(state.clone());
                    watch_tx.send_replace(snapshot.clone());
                    let color = std::io::stdout().is_terminal();
                    for event in &new_events {
                        let line = pretty::format_event_human(event, &state.seats, color);
                        tracing::info!(room = %state.room_code, "{line}");
                    }
                    tracing::debug!(
                        room = %state.room_code,
                        revision = state.revision,
                        events = new_events.len(),
                        "committed revision"
                    );
                    Ok((value, snapshot))
                }
                Err(e) => {
                    tracing::warn!(room = %state.room_code, error = %e, "persist failed; discarding update");
                    Err(ServiceError::Transient(e.to_string()))
                }
            }
        }
        Err(e) if e.is_fatal() => {
            // Invariant violation: commit the poisoned hand so the table
            // refuses further mutation, and surface the incident.
            finish_bookkeeping(&mut work, prior);
            let new_events = collect_new_events(&work, prior);
            work.revision = state.revision + 1;
            if let Err(pe) = persist(store.as_ref(), &work, &new_events, None) {
                tracing::error!(room = %work.room_code, error = %pe, "failed to persist poisoned state");
            }
            *state = work;
            watch_tx.send_replace(Arc::new(state.clone()));
            tracing::error!(room = %state.room_code, error = %e, "hand poisoned");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Mirror live hand stacks onto the seat records and settle table status
/// when a hand completes.
fn finish_bookkeeping(
    work: &mut TableSnapshot,
    prior: Option<(u64, usize, bool)>,
) {
    if let Some(hand) = &work.hand {
        for (record, hand_seat) in work.seats.iter_mut().zip(&hand.seats) {
            record.chips = hand_seat.chips;
        }
    }
    if hand_just_completed(work, prior) {
        let funded = work.seats.iter().filter(|s| s.chips > 0).count();
        if funded < 2 {
            work.status = TableStatus::Completed;
        }
    }
}

fn hand_just_completed(work: &TableSnapshot, prior: Option<(u64, usize, bool)>) -> bool {
    match (&work.hand, prior) {
        (Some(h), Some((hand_no, _, was_complete))) if h.hand_no == hand_no => {
            h.complete && !was_complete
        }
        (Some(h), _) => h.complete,
        (None, _) => false,
    }
}

fn collect_new_events(
    work: &TableSnapshot,
    prior: Option<(u64, usize, bool)>,
) -> Vec<HandEvent> {
    match (&work.hand, prior) {
        (Some(h), Some((hand_no, len, _))) if h.hand_no == hand_no => h.events[len..].to_vec(),
        (Some(h), _) => h.events.clone(),
        (None, _) => Vec::new(),
    }
}

fn completed_record(work: &TableSnapshot, prior: Option<(u64, usize, bool)>) -> Option<HandRecord> {
    if hand_just_completed(work, prior) {
        work.hand.as_ref().map(HandRecord::from_hand)
    } else {
        None
    }
}

/// Persist events, the completed-hand record (if any) and the snapshot.
/// Each step is retried at most once; event appends are idempotent by
/// sequence number, so a retried append never duplicates.
fn persist(
    store: &dyn Store,
    snapshot: &TableSnapshot,
    events: &[HandEvent],
    completed: Option<&HandRecord>,
) -> Result<(), StoreError> {
    if let (Some(hand), false) = (&snapshot.hand, events.is_empty()) {
        retry_once(|| store.append_events(&snapshot.room_code, hand.hand_no, events))?;
    }
    if let Some(record) = completed {
        retry_once(|| store.save_hand(&snapshot.room_code, record))?;
    }
    retry_once(|| store.save_snapshot(snapshot))
}

fn retry_once(mut op: impl FnMut() -> Result<(), StoreError>) -> Result<(), StoreError> {
    op().or_else(|e| {
        tracing::warn!(error = %e, "persistence step failed; retrying once");
        op()
    })
}

fn active_hand(work: &mut TableSnapshot) -> Result<&mut Hand, ServiceError> {
    work.hand
        .as_mut()
        .ok_or_else(|| ServiceError::Precondition("no hand has been dealt".into()))
}

fn apply_join(
    work: &mut TableSnapshot,
    name: &str,
    fingerprint: &str,
) -> Result<SeatId, ServiceError> {
    if work.status == TableStatus::Completed {
        return Err(ServiceError::Precondition("table is completed".into()));
    }
    if work
        .seats
        .iter()
        .any(|s| s.name.eq_ignore_ascii_case(name))
    {
        return Err(ServiceError::Conflict(format!("name '{name}' is taken")));
    }
    if work.seats.len() >= MAX_SEATS {
        return Err(ServiceError::Precondition("table is full".into()));
    }
    if work.hand.as_ref().is_some_and(|h| !h.complete) {
        return Err(ServiceError::Precondition("hand in progress".into()));
    }
    let id = SeatId(work.seats.len());
    work.seats.push(SeatRecord {
        id,
        name: name.to_string(),
        fingerprint: fingerprint.to_string(),
        chips: work.starting_chips,
        show_cards: false,
        connected: false,
    });
    Ok(id)
}

fn authenticate(
    state: &TableSnapshot,
    name: &str,
    fingerprint: &str,
) -> Result<SeatId, ServiceError> {
    let seat = state
        .seats
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ServiceError::Precondition("seat not found".into()))?;
    if seat.fingerprint != fingerprint {
        return Err(ServiceError::Authorization("invalid credential".into()));
    }
    Ok(seat.id)
}

fn apply_start_hand(work: &mut TableSnapshot) -> Result<(), ServiceError> {
    if work.status == TableStatus::Completed {
        return Err(ServiceError::Precondition("table is completed".into()));
    }
    if work.hand.as_ref().is_some_and(|h| !h.complete) {
        return Err(ServiceError::Precondition("hand in progress".into()));
    }
    start_hand_inner(work)
}

fn apply_next_hand(work: &mut TableSnapshot) -> Result<(), ServiceError> {
    match &work.hand {
        None => return Err(ServiceError::Precondition("no hand has been dealt".into())),
        Some(h) if !h.complete => {
            return Err(ServiceError::Precondition("hand is not complete".into()))
        }
        Some(_) => {}
    }
    if work.status == TableStatus::Completed {
        // Fewer than two funded seats remain; the table stays completed.
        return Ok(());
    }
    start_hand_inner(work)
}

fn start_hand_inner(work: &mut TableSnapshot) -> Result<(), ServiceError> {
    let stacks: Vec<u32> = work.seats.iter().map(|s| s.chips).collect();
    let funded = stacks.iter().filter(|&&c| c > 0).count();
    if funded < 2 {
        return Err(ServiceError::Precondition(
            "need at least two funded seats".into(),
        ));
    }
    // Rotate the dealer button to the next funded seat.
    let dealer = if work.hand_counter == 0 {
        next_funded_from(&stacks, 0)
    } else {
        next_funded_from(&stacks, (work.dealer_pos + 1) % stacks.len())
    }
    .expect("funded seats exist");

    let hand_no = work.hand_counter + 1;
    let hand = Hand::start(
        hand_no,
        dealer,
        &stacks,
        work.small_blind,
        work.big_blind,
        DeckSeed::random(),
    )
    .map_err(ServiceError::from)?;

    work.hand_counter = hand_no;
    work.dealer_pos = dealer;
    work.hand = Some(hand);
    work.status = TableStatus::Playing;
    Ok(())
}
