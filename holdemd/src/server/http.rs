//! HTTP adapter: a single transport-agnostic endpoint mirroring the
//! WebSocket message protocol, plus a health probe. Handlers delegate to
//! the unified dispatcher so behavior matches every other transport.

use axum::{extract::State, Json};

use holdem_shared::{ClientMsg, ServerMsg};

use crate::server::dispatch::dispatch_client_message;
use crate::server::state::AppState;

/// Unified handler for all non-streaming `ClientMsg` variants.
pub async fn message_handler(
    State(state): State<AppState>,
    Json(cm): Json<ClientMsg>,
) -> Json<ServerMsg> {
    Json(dispatch_client_message(&state, cm).await)
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
