//! Client connection handle

use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

/// Unique identifier for a connection
pub type ConnectionId = u64;

/// Frame queued for a connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Ping,
    Close(Option<String>),
}

impl Frame {
    pub(crate) fn into_message(self) -> Message {
        match self {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Ping => Message::Ping(Vec::new().into()),
            Frame::Close(reason) => Message::Close(reason.map(|reason| CloseFrame {
                code: CloseCode::Normal,
                reason: reason.into(),
            })),
        }
    }
}

/// Handle to one client session
///
/// Cloning is cheap. The handle stays valid after the session ends, but
/// [`Connection::is_open`] turns false once the writer task has exited and
/// sends become no-ops.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    remote_addr: SocketAddr,
    outbound: mpsc::UnboundedSender<Frame>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        remote_addr: SocketAddr,
        outbound: mpsc::UnboundedSender<Frame>,
    ) -> Self {
        Self {
            id,
            remote_addr,
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queue a text frame. Returns false if the session has ended.
    pub fn send(&self, text: impl Into<String>) -> bool {
        self.send_frame(Frame::Text(text.into()))
    }

    /// Queue a close frame; the writer exits after sending it
    pub fn close(&self, reason: Option<&str>) -> bool {
        self.send_frame(Frame::Close(reason.map(str::to_string)))
    }

    pub(crate) fn send_frame(&self, frame: Frame) -> bool {
        self.outbound.send(frame).is_ok()
    }
}
