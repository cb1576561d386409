//! Host lifecycle
//!
//! The host calls [`BridgePlugin::on_enable`] once the world is ready and
//! [`BridgePlugin::on_disable`] on shutdown.

use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::handler::BridgeHandler;
use crate::registry::ConnectionRegistry;
use crate::scheduler::{UpdateScheduler, UpdateThread};
use crate::server::{ServerHandle, SocketServer};
use mc_bridge_core::{GameState, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

struct Running<W: GameState> {
    server: ServerHandle,
    scheduler: UpdateScheduler<W>,
    update_thread: UpdateThread,
    registry: Arc<ConnectionRegistry>,
}

/// The bridge plugin: one socket server plus one update thread
pub struct BridgePlugin<W: GameState> {
    config: BridgeConfig,
    running: Option<Running<W>>,
}

impl<W: GameState> BridgePlugin<W> {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    /// Start the update thread and the socket server
    pub async fn on_enable(&mut self, world: W) -> Result<()> {
        if self.running.is_some() {
            warn!("Bridge already enabled");
            return Ok(());
        }

        let (scheduler, update_thread) =
            UpdateScheduler::start(world, self.config.queue_capacity)?;
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = Arc::new(BridgeHandler::new(
            registry.clone(),
            Arc::new(CommandDispatcher::new()),
            scheduler.clone(),
            self.config.greeting.clone(),
        ));

        let server = match SocketServer::new(self.config.clone(), handler).start().await {
            Ok(server) => server,
            Err(e) => {
                // Don't leak the update thread if binding failed
                shutdown_updates(scheduler, update_thread).await;
                return Err(e);
            }
        };

        self.running = Some(Running {
            server,
            scheduler,
            update_thread,
            registry,
        });
        Ok(())
    }

    /// Stop the server, then the update thread, waiting for both
    pub async fn on_disable(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        if let Err(e) = running.server.stop().await {
            warn!("Interrupted while stopping WebSocket server: {}", e);
        }
        if shutdown_updates(running.scheduler, running.update_thread).await {
            info!("Bridge disabled");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.running.is_some()
    }

    /// Address the server is bound to, while enabled
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.server.local_addr())
    }

    /// Scheduler for running host-side work on the update thread
    pub fn scheduler(&self) -> Option<&UpdateScheduler<W>> {
        self.running.as_ref().map(|r| &r.scheduler)
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.running.as_ref().map_or(0, |r| r.registry.len())
    }
}

/// Stop the update loop and join its thread. Returns true on a clean exit.
async fn shutdown_updates<W: GameState>(
    scheduler: UpdateScheduler<W>,
    update_thread: UpdateThread,
) -> bool {
    if let Err(e) = scheduler.stop().await {
        warn!("Update thread already gone: {}", e);
    }

    match tokio::task::spawn_blocking(move || update_thread.join()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Update thread failed: {}", e);
            false
        }
        Err(e) => {
            warn!("Interrupted while joining update thread: {}", e);
            false
        }
    }
}
