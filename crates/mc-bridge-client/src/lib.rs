//! mc-bridge client
//!
//! Connects to a running bridge over WebSocket, sends `{command, params}`
//! frames and reads back the plain-text replies. The server answers every
//! frame with exactly one reply, so requests are strictly one at a time.

use futures_util::{SinkExt, StreamExt};
use mc_bridge_core::{BridgeError, CommandResult, INVALID_FORMAT, Params, Request, Result};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

/// Default bridge URL
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8765";

/// Client for a running bridge
pub struct BridgeClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    greeting: String,
}

impl BridgeClient {
    /// Connect and wait for the greeting frame
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| BridgeError::Transport(format!("Failed to connect to {}: {}", url, e)))?;

        let mut client = Self {
            stream,
            greeting: String::new(),
        };
        client.greeting = client.next_text().await?;
        debug!("Connected to {}: {}", url, client.greeting);
        Ok(client)
    }

    /// Greeting sent by the server on connect
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Send an arbitrary text frame and return the reply verbatim
    pub async fn send_raw(&mut self, text: &str) -> Result<String> {
        debug!("[client→server] {}", text);
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| BridgeError::Transport(format!("Send failed: {}", e)))?;
        self.next_text().await
    }

    /// Send a command and parse the reply
    pub async fn send_command(&mut self, command: &str, params: Params) -> Result<CommandResult> {
        let frame = Request::new(command, params).to_frame()?;
        let reply = self.send_raw(&frame).await?;

        if reply == INVALID_FORMAT {
            return Err(BridgeError::InvalidFormat(reply));
        }
        CommandResult::from_frame(&reply)
            .ok_or_else(|| BridgeError::Transport(format!("Unexpected reply: {}", reply)))
    }

    pub async fn move_forward(&mut self, distance: f64) -> Result<CommandResult> {
        self.send_command("move_forward", Params::new().with("distance", distance))
            .await
    }

    pub async fn look_left(&mut self, degrees: f32) -> Result<CommandResult> {
        self.send_command("look_left", Params::new().with("degrees", degrees))
            .await
    }

    pub async fn look_right(&mut self, degrees: f32) -> Result<CommandResult> {
        self.send_command("look_right", Params::new().with("degrees", degrees))
            .await
    }

    pub async fn look_up(&mut self, degrees: f32) -> Result<CommandResult> {
        self.send_command("look_up", Params::new().with("degrees", degrees))
            .await
    }

    pub async fn look_down(&mut self, degrees: f32) -> Result<CommandResult> {
        self.send_command("look_down", Params::new().with("degrees", degrees))
            .await
    }

    pub async fn center_view(&mut self) -> Result<CommandResult> {
        self.send_command("center_view", Params::new()).await
    }

    pub async fn chat(&mut self, message: &str) -> Result<CommandResult> {
        self.send_command("chat", Params::new().with("message", message))
            .await
    }

    pub async fn interact(&mut self) -> Result<CommandResult> {
        self.send_command("interact", Params::new()).await
    }

    pub async fn attack(&mut self) -> Result<CommandResult> {
        self.send_command("attack", Params::new()).await
    }

    /// Close the connection cleanly
    pub async fn close(mut self) -> Result<()> {
        self.stream
            .close(None)
            .await
            .map_err(|e| BridgeError::Transport(format!("Close failed: {}", e)))
    }

    /// Next text frame, skipping control frames
    async fn next_text(&mut self) -> Result<String> {
        while let Some(msg) = self.stream.next().await {
            match msg.map_err(|e| BridgeError::Transport(format!("Read failed: {}", e)))? {
                Message::Text(text) => {
                    debug!("[server→client] {}", text.as_str());
                    return Ok(text.as_str().to_string());
                }
                Message::Close(frame) => {
                    return Err(BridgeError::Transport(format!(
                        "Connection closed by server: {:?}",
                        frame
                    )));
                }
                _ => {}
            }
        }
        Err(BridgeError::Transport("Connection closed".into()))
    }
}
