//! Live connection registry

use crate::connection::ConnectionId;
use dashmap::DashSet;

/// Set of connections that are currently open
///
/// A connection is a member from `on_open` until the first `on_close` or
/// `on_error`. Shared between transport tasks and the update thread.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    active: DashSet<ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a connection. Returns false if it was already a member.
    pub fn admit(&self, id: ConnectionId) -> bool {
        self.active.insert(id)
    }

    /// Evict a connection. Returns false if it was not a member.
    pub fn evict(&self, id: ConnectionId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub fn is_active(&self, id: ConnectionId) -> bool {
        self.active.contains(&id)
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
