//! # mc-bridge-server
//!
//! WebSocket bridge that lets external clients drive an in-game player.
//!
//! This crate provides:
//! - `ConnectionRegistry` for tracking live connections
//! - `SocketServer`, the WebSocket accept/read/close lifecycle
//! - `CommandDispatcher`, mapping commands onto `GameState` mutations
//! - `UpdateScheduler`, the serialized update thread
//! - `BridgePlugin`, tying the above to host enable/disable hooks
//! - `SimWorld`, an in-memory `GameState` for demos and tests

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod handler;
pub mod plugin;
pub mod registry;
pub mod scheduler;
pub mod server;
pub mod sim;

pub use config::BridgeConfig;
pub use connection::{Connection, ConnectionId, Frame};
pub use dispatcher::CommandDispatcher;
pub use handler::{BridgeHandler, SocketEvents};
pub use plugin::BridgePlugin;
pub use registry::ConnectionRegistry;
pub use scheduler::{UpdateScheduler, UpdateThread};
pub use server::{ServerHandle, SocketServer};
pub use sim::SimWorld;
