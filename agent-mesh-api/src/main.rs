//! API server entry point for agent-mesh

use anyhow::Result;
use clap::Parser;
use agent_mesh_api::{run_server, AppState};
use agent_mesh_core::config::ConfigLoader;
use agent_mesh_core::logging::init_logging;
use agent_mesh_core::Platform;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::info;

#[derive(Parser)]
#[command(name = "agent-mesh")]
#[command(about = "Live query/mutation/subscription API for the agent mesh")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    let _log_guard = init_logging(&config.logging);

    if config.api.disabled {
        info!("API is disabled");
        return Ok(());
    }

    let platform = Platform::from_config(&config);
    let state = AppState::new(platform);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let port = cli.port.unwrap_or(config.api.port);
    run_server(state, port, shutdown_rx).await
}
