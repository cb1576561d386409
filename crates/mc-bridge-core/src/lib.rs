//! # mc-bridge-core
//!
//! Core types and traits for the mc-bridge command protocol.
//!
//! This crate provides the foundational types shared by the server and client:
//! - Request frames and the parameter bag
//! - Typed player-control commands
//! - Reply frames
//! - The game-state collaborator trait

pub mod command;
pub mod error;
pub mod game;
pub mod params;
pub mod reply;
pub mod request;

pub use command::Command;
pub use error::{BridgeError, Result};
pub use game::{Block, BlockPos, EntityId, GameState, Location, PlayerId};
pub use params::{ParamValue, Params};
pub use reply::{CommandResult, GREETING, INVALID_FORMAT};
pub use request::Request;
