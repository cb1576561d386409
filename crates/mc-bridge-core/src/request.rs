//! Inbound request frames
//!
//! Format: `{"command": "<name>", "params": {"<key>": <number|string>, ...}}`.
//! `params` may be absent or null, which is treated as an empty bag.

use crate::error::{BridgeError, Result};
use crate::params::Params;
use serde::{Deserialize, Serialize};

/// A request decoded from one text frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub command: String,
    pub params: Params,
}

#[derive(Deserialize)]
struct WireRequest {
    command: String,
    #[serde(default)]
    params: Option<Params>,
}

impl Request {
    pub fn new(command: impl Into<String>, params: Params) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }

    /// Parse a text frame into a request
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(BridgeError::InvalidFormat("expected a JSON object".into()));
        }
        let wire: WireRequest = serde_json::from_value(value)?;
        Ok(Self {
            command: wire.command,
            params: wire.params.unwrap_or_default(),
        })
    }

    /// Encode as a text frame
    pub fn to_frame(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BridgeError::InvalidFormat(e.to_string()))
    }
}
