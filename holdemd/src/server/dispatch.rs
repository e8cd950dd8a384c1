//! Unified handling of `ClientMsg` for every transport.
//!
//! WebSocket and HTTP adapters both delegate here so behavior is identical
//! regardless of how a request arrived. Only `Subscribe` is transport
//! specific (it needs a stream) and is handled in the WebSocket layer.

use tokio::sync::oneshot;
use tokio::time::Instant;

use holdem_shared::{ClientMsg, SeatId, ServerMsg};

use crate::errors::ServiceError;
use crate::server::session::{credential_fingerprint, Session, MIN_CREDENTIAL_LEN};
use crate::server::state::AppState;
use crate::server::table::{TableCmd, TableHandle};
use crate::server::views;

/// Handle one client message and produce the response to send back.
pub async fn dispatch_client_message(state: &AppState, msg: ClientMsg) -> ServerMsg {
    match handle(state, msg).await {
        Ok(reply) => reply,
        Err(e) => ServerMsg::Error {
            kind: e.kind(),
            message: e.to_string(),
        },
    }
}

async fn handle(state: &AppState, msg: ClientMsg) -> Result<ServerMsg, ServiceError> {
    match msg {
        ClientMsg::CreateTable {
            small_blind,
            big_blind,
            starting_chips,
        } => {
            let handle = state.create_table(small_blind, big_blind, starting_chips)?;
            tracing::info!(room = %handle.room_code, "table created");
            Ok(ServerMsg::TableCreated {
                table_id: handle.table_id.clone(),
                room_code: handle.room_code.clone(),
            })
        }

        ClientMsg::Join {
            room_code,
            name,
            credential,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::InputValidation("name must not be empty".into()));
            }
            if credential.len() < MIN_CREDENTIAL_LEN {
                return Err(ServiceError::InputValidation(format!(
                    "credential too weak: need at least {MIN_CREDENTIAL_LEN} characters"
                )));
            }
            let handle = lookup(state, &room_code)?;
            let fingerprint = credential_fingerprint(&credential);
            let joined = roundtrip(state, &handle, |reply| TableCmd::Join {
                name: name.clone(),
                fingerprint,
                reply,
            })
            .await?;
            let token = state.sessions().create(&room_code, joined.seat);
            tracing::info!(room = %room_code, seat = %joined.seat, name = %name, "seat joined");
            Ok(ServerMsg::Joined {
                seat: joined.seat,
                token,
                view: views::player_view(&joined.snapshot, joined.seat),
            })
        }

        ClientMsg::Authenticate {
            room_code,
            name,
            credential,
        } => {
            let handle = lookup(state, &room_code)?;
            let fingerprint = credential_fingerprint(&credential);
            let joined = roundtrip(state, &handle, |reply| TableCmd::Authenticate {
                name: name.trim().to_string(),
                fingerprint,
                reply,
            })
            .await?;
            let token = state.sessions().create(&room_code, joined.seat);
            Ok(ServerMsg::Authenticated {
                seat: joined.seat,
                token,
                view: views::player_view(&joined.snapshot, joined.seat),
            })
        }

        ClientMsg::StartHand { token } => {
            seat_op(state, &token, |_, reply| TableCmd::StartHand { reply }).await
        }

        ClientMsg::Action { token, action } => {
            seat_op(state, &token, move |seat, reply| TableCmd::Action {
                seat,
                action,
                reply,
            })
            .await
        }

        ClientMsg::AdvanceRound { token } => {
            seat_op(state, &token, |_, reply| TableCmd::AdvanceRound { reply }).await
        }

        ClientMsg::RevealCard { token } => {
            seat_op(state, &token, |_, reply| TableCmd::RevealCard { reply }).await
        }

        ClientMsg::NextHand { token } => {
            seat_op(state, &token, |_, reply| TableCmd::NextHand { reply }).await
        }

        ClientMsg::ShowCards { token, show } => {
            seat_op(state, &token, move |seat, reply| TableCmd::ShowCards {
                seat,
                show,
                reply,
            })
            .await
        }

        ClientMsg::Subscribe { .. } => Err(ServiceError::InputValidation(
            "subscribe requires a streaming transport".into(),
        )),
    }
}

fn lookup(state: &AppState, room_code: &str) -> Result<TableHandle, ServiceError> {
    state
        .table(room_code)
        .ok_or_else(|| ServiceError::Precondition(format!("room '{room_code}' not found")))
}

pub(crate) fn resolve_session(state: &AppState, token: &str) -> Result<Session, ServiceError> {
    state
        .sessions()
        .resolve(token)
        .ok_or_else(|| ServiceError::Authorization("unknown session token".into()))
}

/// Resolve the token, run a seat-scoped table command and reply with the
/// caller's refreshed player view.
async fn seat_op(
    state: &AppState,
    token: &str,
    build: impl FnOnce(
        SeatId,
        crate::server::table::Reply<std::sync::Arc<crate::store::TableSnapshot>>,
    ) -> TableCmd,
) -> Result<ServerMsg, ServiceError> {
    let session = resolve_session(state, token)?;
    let handle = lookup(state, &session.room_code)?;
    let snapshot = roundtrip(state, &handle, |reply| build(session.seat, reply)).await?;
    Ok(ServerMsg::Player(views::player_view(
        &snapshot,
        session.seat,
    )))
}

/// Queue a command with the configured deadline and wait for its reply.
async fn roundtrip<T>(
    state: &AppState,
    handle: &TableHandle,
    build: impl FnOnce(crate::server::table::Reply<T>) -> TableCmd,
) -> Result<T, ServiceError> {
    let deadline = Instant::now() + state.config().request_timeout();
    let (tx, rx) = oneshot::channel();
    handle.send(build(tx), Some(deadline)).await?;
    rx.await
        .map_err(|_| ServiceError::Transient("table task dropped the request".into()))?
}
