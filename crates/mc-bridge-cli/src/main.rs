//! mc-bridge: demo host
//!
//! Enables the bridge against an in-memory world with one player, a door in
//! front of them and a zombie within reach, then runs until Ctrl-C.
//!
//! Usage: `mc-bridge [port]`

use anyhow::{Context, Result};
use mc_bridge_core::{Block, BlockPos, Location};
use mc_bridge_server::{BridgeConfig, BridgePlugin, SimWorld};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn demo_world() -> SimWorld {
    SimWorld::new()
        .with_player("Steve", Location::new(0.5, 64.0, 0.5))
        .with_block(BlockPos::new(0, 65, 3), Block::openable("oak_door", false))
        .with_entity("zombie", Location::new(0.5, 64.0, 2.0), 20.0)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(port) => BridgeConfig {
            port: port.parse().with_context(|| format!("Invalid port: {}", port))?,
            ..Default::default()
        },
        None => BridgeConfig::default(),
    };

    let mut plugin = BridgePlugin::new(config);
    plugin.on_enable(demo_world()).await?;
    if let Some(addr) = plugin.local_addr() {
        info!("Bridge listening on ws://{}", addr);
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutting down");

    plugin.on_disable().await;
    Ok(())
}
