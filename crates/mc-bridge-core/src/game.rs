//! Game-state collaborator interface
//!
//! The host game implements [`GameState`]. All methods are called from the
//! update thread only, so implementations need no internal locking.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Unique identifier for an online player
pub type PlayerId = String;

/// Unique identifier for a world entity
pub type EntityId = u64;

/// Position and orientation of a player
///
/// Yaw and pitch are in degrees. Yaw 0 faces +Z, yaw 90 faces -X. Pitch is
/// positive looking down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Translate without changing orientation
    pub fn add(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.x += dx;
        self.y += dy;
        self.z += dz;
        self
    }

    /// Unit look vector for the current yaw and pitch
    pub fn direction(&self) -> (f64, f64, f64) {
        let yaw = (self.yaw as f64).to_radians();
        let pitch = (self.pitch as f64).to_radians();
        let xz = pitch.cos();
        (-xz * yaw.sin(), -pitch.sin(), xz * yaw.cos())
    }

    /// Integer block coordinates containing this location
    pub fn block_pos(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

/// Integer block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Block data as seen by the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub material: String,
    /// `Some` when the block can be opened and closed (doors, trapdoors, gates)
    pub open: Option<bool>,
}

impl Block {
    pub fn solid(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            open: None,
        }
    }

    pub fn openable(material: impl Into<String>, open: bool) -> Self {
        Self {
            material: material.into(),
            open: Some(open),
        }
    }

    pub fn is_openable(&self) -> bool {
        self.open.is_some()
    }
}

/// Trait implemented by the host game
pub trait GameState: Send + 'static {
    /// Online players in the host's iteration order
    fn online_players(&self) -> Vec<PlayerId>;

    /// Current location of a player
    fn location(&self, player: &PlayerId) -> Result<Location>;

    /// Move a player, including orientation
    fn teleport(&mut self, player: &PlayerId, location: Location) -> Result<()>;

    /// Deliver a chat message to this player only
    fn send_message(&mut self, player: &PlayerId, message: &str) -> Result<()>;

    /// Block the player is looking at within `max_distance`, if any
    fn target_block(&self, player: &PlayerId, max_distance: f64) -> Option<BlockPos>;

    /// Block data at a position
    fn block(&self, pos: BlockPos) -> Option<Block>;

    /// Replace block data at a position
    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<()>;

    /// Play the main-hand swing animation
    fn swing_main_hand(&mut self, player: &PlayerId) -> Result<()>;

    /// Entity the player is looking at within `max_distance`, if any
    fn target_entity(&self, player: &PlayerId, max_distance: f64) -> Option<EntityId>;

    /// Melee-attack an entity
    fn attack(&mut self, player: &PlayerId, entity: EntityId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_follows_yaw() {
        let (x, y, z) = Location::default().direction();
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9 && (z - 1.0).abs() < 1e-9);

        let (x, _, z) = Location::default().with_rotation(90.0, 0.0).direction();
        assert!((x + 1.0).abs() < 1e-6 && z.abs() < 1e-6);

        let (_, y, _) = Location::default().with_rotation(0.0, 90.0).direction();
        assert!((y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_block_pos_floors() {
        let pos = Location::new(-0.5, 64.9, 3.2).block_pos();
        assert_eq!(pos, BlockPos::new(-1, 64, 3));
    }
}
