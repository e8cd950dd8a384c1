//! Entry point for the holdem table server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use holdemd::cli::ServerCli;
use holdemd::config::Config;
use holdemd::server::{run_server, AppState};
use holdemd::store::FsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ServerCli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut cfg = Config::load_or_create(&cli.config)
        .with_context(|| format!("loading or creating config '{}'", cli.config.display()))?;

    // CLI overrides are in-memory unless --persist is given.
    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    if let Some(data_dir) = cli.data_dir {
        cfg.data_dir = data_dir;
    }
    if cli.persist {
        cfg.save(&cli.config)
            .with_context(|| format!("saving updated config '{}'", cli.config.display()))?;
    }

    let addr: SocketAddr = cfg
        .listen_addr
        .parse()
        .with_context(|| format!("parsing listen address '{}'", cfg.listen_addr))?;

    tracing::info!(config = %cli.config.display(), data_dir = %cfg.data_dir.display(), "starting holdemd");

    let store = Arc::new(FsStore::new(cfg.data_dir.clone()));
    let state = AppState::new(cfg, store);

    let recovered = state
        .recover_tables()
        .map_err(|e| anyhow::anyhow!("recovering persisted tables: {e}"))?;
    if recovered > 0 {
        tracing::info!(recovered, "re-spawned persisted tables");
    }

    run_server(addr, state).await
}
