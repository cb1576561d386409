//! Socket event handling
//!
//! [`SocketEvents`] is the seam between the WebSocket transport and the
//! bridge logic. [`BridgeHandler`] gates messages on registry membership,
//! parses them and posts execution onto the update thread.

use crate::connection::Connection;
use crate::dispatcher::CommandDispatcher;
use crate::registry::ConnectionRegistry;
use crate::scheduler::UpdateScheduler;
use async_trait::async_trait;
use mc_bridge_core::{BridgeError, CommandResult, GameState, INVALID_FORMAT, Request};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callbacks invoked by the socket server
///
/// Open, close and error callbacks may run concurrently for distinct
/// connections. Messages on one connection are delivered in order.
#[async_trait]
pub trait SocketEvents: Send + Sync + 'static {
    /// Server is listening
    fn on_start(&self, local_addr: SocketAddr);

    /// Handshake completed
    fn on_open(&self, conn: &Connection);

    /// Session ended, for any reason
    fn on_close(&self, conn: &Connection);

    /// One text frame received
    async fn on_message(&self, conn: &Connection, text: &str);

    /// Transport fault; `conn` is `None` for server-level faults
    fn on_error(&self, conn: Option<&Connection>, error: &BridgeError);
}

/// Bridge implementation of [`SocketEvents`]
pub struct BridgeHandler<W: GameState> {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<CommandDispatcher>,
    scheduler: UpdateScheduler<W>,
    greeting: String,
}

impl<W: GameState> BridgeHandler<W> {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        dispatcher: Arc<CommandDispatcher>,
        scheduler: UpdateScheduler<W>,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            scheduler,
            greeting: greeting.into(),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }
}

#[async_trait]
impl<W: GameState> SocketEvents for BridgeHandler<W> {
    fn on_start(&self, local_addr: SocketAddr) {
        info!("WebSocket server started on {}", local_addr);
    }

    fn on_open(&self, conn: &Connection) {
        self.registry.admit(conn.id());
        conn.send(self.greeting.as_str());
        info!("New connection from {}", conn.remote_addr());
    }

    fn on_close(&self, conn: &Connection) {
        self.registry.evict(conn.id());
        info!("Connection closed: {}", conn.remote_addr());
    }

    async fn on_message(&self, conn: &Connection, text: &str) {
        if !self.registry.is_active(conn.id()) {
            warn!(
                "Dropping message from inactive connection {} ({})",
                conn.id(),
                conn.remote_addr()
            );
            return;
        }

        let request = match Request::parse(text) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to parse message: {}", e);
                conn.send(INVALID_FORMAT);
                return;
            }
        };
        debug!("[{}→server] {}", conn.remote_addr(), request.command);

        let registry = self.registry.clone();
        let dispatcher = self.dispatcher.clone();
        let reply_to = conn.clone();
        let submitted = self
            .scheduler
            .submit(move |world| {
                let result = dispatcher.dispatch(world, &request);
                if registry.is_active(reply_to.id()) && reply_to.is_open() {
                    reply_to.send(result.to_frame());
                } else {
                    debug!(
                        "Connection {} closed before '{}' finished, dropping reply",
                        reply_to.id(),
                        request.command
                    );
                }
            })
            .await;

        if let Err(e) = submitted {
            warn!("Failed to schedule command: {}", e);
            if self.registry.is_active(conn.id()) {
                let failed = CommandResult::Failed {
                    message: e.to_string(),
                };
                conn.send(failed.to_frame());
            }
        }
    }

    fn on_error(&self, conn: Option<&Connection>, error: &BridgeError) {
        match conn {
            Some(conn) => {
                self.registry.evict(conn.id());
                warn!("WebSocket error on {}: {}", conn.remote_addr(), error);
            }
            None => warn!("WebSocket error: {}", error),
        }
    }
}
