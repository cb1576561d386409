//! Bridge configuration

use mc_bridge_core::GREETING;
use std::time::Duration;

/// Configuration for the bridge server
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Host to bind (default: 127.0.0.1)
    pub host: String,
    /// Port to bind (default: 8765, 0 picks an ephemeral port)
    pub port: u16,
    /// Close connections with no inbound traffic for this long
    pub idle_timeout: Duration,
    /// Capacity of the update-thread task queue
    pub queue_capacity: usize,
    /// Frame sent to every new connection
    pub greeting: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8765,
            idle_timeout: Duration::from_secs(30),
            queue_capacity: 256,
            greeting: GREETING.into(),
        }
    }
}

impl BridgeConfig {
    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
