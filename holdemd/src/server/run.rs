//! Router construction and server startup.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(crate::server::http::health_handler))
        .route("/ws", get(crate::server::ws::ws_handler))
        .route("/api/message", post(crate::server::http::message_handler))
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);

    tracing::info!(%addr, "holdem server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}
