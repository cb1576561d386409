//! WebSocket socket server
//!
//! Owns the accept/read/close lifecycle and forwards events to a
//! [`SocketEvents`] implementation. Each connection gets a reader loop and a
//! writer task draining the connection's outbound frame queue.

use crate::config::BridgeConfig;
use crate::connection::{Connection, ConnectionId, Frame};
use crate::handler::SocketEvents;
use futures_util::{SinkExt, StreamExt};
use mc_bridge_core::{BridgeError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, timeout};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// How long to wait for a writer to flush its close frame
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket server bound to one address
pub struct SocketServer<H: SocketEvents> {
    config: BridgeConfig,
    handler: Arc<H>,
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl<H: SocketEvents> SocketServer<H> {
    pub fn new(config: BridgeConfig, handler: Arc<H>) -> Self {
        Self { config, handler }
    }

    /// Bind and start accepting connections in the background
    pub async fn start(self) -> Result<ServerHandle> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| BridgeError::Transport(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| BridgeError::Transport(format!("Failed to read local address: {}", e)))?;

        self.handler.on_start(local_addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(accept_loop(
            listener,
            self.handler,
            self.config.idle_timeout,
            shutdown_rx,
        ));

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Close every connection and stop accepting, waiting for all tasks
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.task
            .await
            .map_err(|e| BridgeError::Transport(format!("Server task failed: {}", e)))
    }
}

async fn accept_loop<H: SocketEvents>(
    listener: TcpListener,
    handler: Arc<H>,
    idle_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut connections = JoinSet::new();
    let mut next_id: ConnectionId = 0;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,

            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    next_id += 1;
                    connections.spawn(handle_connection(
                        stream,
                        addr,
                        next_id,
                        handler.clone(),
                        idle_timeout,
                        shutdown.clone(),
                    ));
                }
                Err(e) => {
                    handler.on_error(None, &BridgeError::Transport(format!("Accept failed: {}", e)));
                }
            },

            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = joined {
                    warn!("Connection task failed: {}", e);
                }
            }
        }
    }

    debug!("Waiting for {} connections to close", connections.len());
    while let Some(joined) = connections.join_next().await {
        if let Err(e) = joined {
            warn!("Connection task failed: {}", e);
        }
    }
    info!("WebSocket server stopped");
}

async fn handle_connection<H: SocketEvents>(
    stream: TcpStream,
    addr: SocketAddr,
    id: ConnectionId,
    handler: Arc<H>,
    idle_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY for {}: {}", addr, e);
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            handler.on_error(
                None,
                &BridgeError::Transport(format!("WebSocket handshake with {} failed: {}", addr, e)),
            );
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Frame>();
    let conn = Connection::new(id, addr, outbound_tx);

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let closing = matches!(frame, Frame::Close(_));
            if let Err(e) = ws_sender.send(frame.into_message()).await {
                debug!("Write to connection {} failed: {}", id, e);
                break;
            }
            if closing {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    handler.on_open(&conn);

    // Ping once half the idle window passes quietly; close after the full window
    let ping_after = idle_timeout / 2;
    let mut last_seen = Instant::now();
    let mut pinged = false;

    let fault = loop {
        let deadline = last_seen + if pinged { idle_timeout } else { ping_after };

        tokio::select! {
            _ = shutdown.changed() => {
                conn.close(Some("Server shutting down"));
                break None;
            }

            next = timeout(deadline.saturating_duration_since(Instant::now()), ws_receiver.next()) => {
                let msg = match next {
                    Err(_) if pinged => {
                        info!("Connection {} idle for {:?}, closing", addr, idle_timeout);
                        conn.close(Some("Idle timeout"));
                        break None;
                    }
                    Err(_) => {
                        conn.send_frame(Frame::Ping);
                        pinged = true;
                        continue;
                    }
                    Ok(None) => break None,
                    Ok(Some(Err(e))) => break Some(BridgeError::Transport(e.to_string())),
                    Ok(Some(Ok(msg))) => msg,
                };

                last_seen = Instant::now();
                pinged = false;

                match msg {
                    Message::Text(text) => handler.on_message(&conn, text.as_str()).await,
                    Message::Close(_) => {
                        debug!("Client {} requested close", addr);
                        break None;
                    }
                    Message::Binary(data) => {
                        debug!("Ignoring {}-byte binary frame from {}", data.len(), addr);
                    }
                    // Pongs to client pings are queued by tungstenite itself
                    Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
                }
            }
        }
    };

    if let Some(e) = fault {
        handler.on_error(Some(&conn), &e);
    }
    handler.on_close(&conn);

    // Stop the writer even if queued tasks still hold clones of the handle
    conn.close(None);
    drop(conn);
    if timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        debug!("Writer for connection {} did not drain in time", id);
    }
}
