//! WebSocket transport adapter.
//!
//! Sockets speak `ClientMsg`/`ServerMsg` JSON. Non-subscribe messages are
//! delegated to the unified dispatcher; `Subscribe` attaches the socket to
//! a hub projection group and forwards every revision until the socket (or
//! the subscription) goes away.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::WatchStream;

use holdem_shared::{ClientMsg, SeatId, ServerMsg, StreamKind};

use crate::errors::ServiceError;
use crate::server::dispatch::{dispatch_client_message, resolve_session};
use crate::server::state::AppState;
use crate::server::table::TableCmd;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    tracing::debug!("websocket client connected");

    let (out_tx, mut out_rx) = mpsc::channel::<ServerMsg>(64);
    let mut forwarders: Vec<tokio::task::JoinHandle<()>> = Vec::new();
    // Seat whose player stream runs on this socket, for connect tracking.
    let mut attached_seat: Option<(String, SeatId)> = None;

    loop {
        tokio::select! {
            Some(msg) = out_rx.recv() => {
                send_ws(&mut socket, &msg).await;
            }

            incoming = socket.next() => {
                match incoming {
                    Some(Ok(Message::Text(txt))) => {
                        match serde_json::from_str::<ClientMsg>(&txt) {
                            Ok(ClientMsg::Subscribe { room_code, stream, token }) => {
                                let result = start_subscription(
                                    &state,
                                    &room_code,
                                    stream,
                                    token.as_deref(),
                                    out_tx.clone(),
                                    &mut forwarders,
                                    &mut attached_seat,
                                )
                                .await;
                                if let Err(e) = result {
                                    send_ws(
                                        &mut socket,
                                        &ServerMsg::Error { kind: e.kind(), message: e.to_string() },
                                    )
                                    .await;
                                }
                            }
                            Ok(cm) => {
                                let resp = dispatch_client_message(&state, cm).await;
                                send_ws(&mut socket, &resp).await;
                            }
                            Err(_) => {
                                tracing::warn!("failed to parse incoming ClientMsg JSON");
                                send_ws(
                                    &mut socket,
                                    &ServerMsg::Error {
                                        kind: holdem_shared::ErrorKind::InputValidation,
                                        message: "malformed ClientMsg JSON".into(),
                                    },
                                )
                                .await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    for task in forwarders {
        task.abort();
    }
    if let Some((room, seat)) = attached_seat {
        if let Some(handle) = state.table(&room) {
            let _ = handle
                .send(
                    TableCmd::SetConnected {
                        seat,
                        connected: false,
                    },
                    None,
                )
                .await;
        }
    }
    tracing::debug!("websocket client disconnected");
}

async fn start_subscription(
    state: &AppState,
    room_code: &str,
    stream: StreamKind,
    token: Option<&str>,
    out_tx: mpsc::Sender<ServerMsg>,
    forwarders: &mut Vec<tokio::task::JoinHandle<()>>,
    attached_seat: &mut Option<(String, SeatId)>,
) -> Result<(), ServiceError> {
    let handle = state
        .table(room_code)
        .ok_or_else(|| ServiceError::Precondition(format!("room '{room_code}' not found")))?;

    let viewer = match stream {
        StreamKind::Table => None,
        StreamKind::Player => {
            let token = token.ok_or_else(|| {
                ServiceError::Authorization("player stream requires a session token".into())
            })?;
            let session = resolve_session(state, token)?;
            if session.room_code != room_code {
                return Err(ServiceError::Authorization(
                    "session does not belong to this room".into(),
                ));
            }
            Some(session.seat)
        }
    };

    let snapshot = handle.latest();
    let rx = state
        .hub()
        .subscribe(room_code, stream, viewer, &snapshot)
        .ok_or_else(|| ServiceError::Transient("table is not registered with the hub".into()))?;

    // WatchStream yields the current projection first, then every new
    // revision (intermediate ones may be skipped, the latest always lands).
    let mut updates = WatchStream::new(rx);
    forwarders.push(tokio::spawn(async move {
        while let Some(msg) = updates.next().await {
            if out_tx.send(msg).await.is_err() {
                break;
            }
        }
    }));

    if let Some(seat) = viewer {
        *attached_seat = Some((room_code.to_string(), seat));
        handle
            .send(
                TableCmd::SetConnected {
                    seat,
                    connected: true,
                },
                None,
            )
            .await?;
    }
    Ok(())
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(txt) => {
            let _ = socket.send(Message::Text(txt)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
        }
    }
}
