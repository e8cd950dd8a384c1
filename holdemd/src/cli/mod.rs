use clap::Parser;
use std::path::PathBuf;

/// Server CLI for holdemd
#[derive(Parser, Debug, Clone)]
#[command(name = "holdemd", version, about = "Multiplayer hold'em table server")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "holdemd.toml")]
    pub config: PathBuf,

    /// Listen address (overrides config.listen_addr)
    #[arg(long)]
    pub listen: Option<String>,

    /// Data directory (overrides config.data_dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Enable verbose debug logging
    #[arg(long, short, default_value_t = false)]
    pub debug: bool,
}
