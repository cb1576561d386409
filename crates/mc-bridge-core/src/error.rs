//! Error types for mc-bridge

use thiserror::Error;

/// Result type for mc-bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// mc-bridge error types
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Inbound frame is not a `{command, params}` object
    #[error("Invalid command format: {0}")]
    InvalidFormat(String),

    /// Required parameter absent from the params bag
    #[error("Missing parameter: {0}")]
    MissingParam(String),

    /// Parameter present but of the wrong type
    #[error("Parameter '{key}' must be a {expected}")]
    ParamType { key: String, expected: &'static str },

    /// Player is not (or no longer) online
    #[error("No such player: {0}")]
    NoSuchPlayer(String),

    /// Target does not support the requested capability
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Socket or WebSocket failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Update thread unavailable
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Game-specific error
    #[error("Game error: {0}")]
    Game(String),

    /// A task panicked on the update thread
    #[error("Command panicked: {0}")]
    Panicked(String),
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::InvalidFormat(err.to_string())
    }
}
