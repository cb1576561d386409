//! In-memory game world
//!
//! A small stand-in for a real game server: ordered online players, a sparse
//! block map and a few entities. Targeting ray-marches the player's look
//! vector from eye height. Every state change bumps a mutation counter so
//! callers can assert that nothing was touched.

use mc_bridge_core::{
    Block, BlockPos, BridgeError, EntityId, GameState, Location, PlayerId, Result,
};
use std::collections::{BTreeMap, HashMap};

/// Eye height above a player's feet
pub const EYE_HEIGHT: f64 = 1.62;

/// Damage dealt per melee hit
pub const ATTACK_DAMAGE: f64 = 1.0;

const RAY_STEP: f64 = 0.1;
const ENTITY_HALF_WIDTH: f64 = 0.3;
const ENTITY_HEIGHT: f64 = 1.8;

/// Online player state
#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub id: PlayerId,
    pub location: Location,
    /// Chat messages delivered to this player
    pub inbox: Vec<String>,
    /// Number of main-hand swings
    pub swings: u32,
}

/// Non-player entity
#[derive(Debug, Clone)]
pub struct SimEntity {
    pub kind: String,
    pub location: Location,
    pub health: f64,
}

/// In-memory [`GameState`]
#[derive(Debug, Default)]
pub struct SimWorld {
    players: Vec<SimPlayer>,
    blocks: HashMap<BlockPos, Block>,
    entities: BTreeMap<EntityId, SimEntity>,
    next_entity_id: EntityId,
    mutations: u64,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, id: impl Into<PlayerId>, location: Location) -> Self {
        self.add_player(id, location);
        self
    }

    pub fn with_block(mut self, pos: BlockPos, block: Block) -> Self {
        self.blocks.insert(pos, block);
        self
    }

    pub fn with_entity(mut self, kind: impl Into<String>, location: Location, health: f64) -> Self {
        self.spawn_entity(kind, location, health);
        self
    }

    /// Bring a player online at the end of the iteration order
    pub fn add_player(&mut self, id: impl Into<PlayerId>, location: Location) {
        self.players.push(SimPlayer {
            id: id.into(),
            location,
            inbox: Vec::new(),
            swings: 0,
        });
    }

    /// Take a player offline
    pub fn remove_player(&mut self, id: &str) -> Option<SimPlayer> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    pub fn spawn_entity(
        &mut self,
        kind: impl Into<String>,
        location: Location,
        health: f64,
    ) -> EntityId {
        self.next_entity_id += 1;
        let id = self.next_entity_id;
        self.entities.insert(
            id,
            SimEntity {
                kind: kind.into(),
                location,
                health,
            },
        );
        id
    }

    pub fn player(&self, id: &str) -> Option<&SimPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    /// Number of state changes made through [`GameState`]
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut SimPlayer> {
        self.players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| BridgeError::NoSuchPlayer(id.clone()))
    }

    /// Points along the player's line of sight, one per ray step
    fn sight_line(&self, player: &PlayerId, max_distance: f64) -> Vec<(f64, f64, f64)> {
        let Some(player) = self.player(player) else {
            return Vec::new();
        };
        let eye = player.location.add(0.0, EYE_HEIGHT, 0.0);
        let (dx, dy, dz) = eye.direction();
        let steps = (max_distance / RAY_STEP).floor() as usize;

        (1..=steps)
            .map(|i| {
                let t = i as f64 * RAY_STEP;
                (eye.x + dx * t, eye.y + dy * t, eye.z + dz * t)
            })
            .collect()
    }

    fn block_at(&self, point: (f64, f64, f64)) -> Option<BlockPos> {
        let pos = BlockPos::new(
            point.0.floor() as i32,
            point.1.floor() as i32,
            point.2.floor() as i32,
        );
        self.blocks.contains_key(&pos).then_some(pos)
    }
}

impl GameState for SimWorld {
    fn online_players(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    fn location(&self, player: &PlayerId) -> Result<Location> {
        self.player(player)
            .map(|p| p.location)
            .ok_or_else(|| BridgeError::NoSuchPlayer(player.clone()))
    }

    fn teleport(&mut self, player: &PlayerId, location: Location) -> Result<()> {
        self.player_mut(player)?.location = location;
        self.mutations += 1;
        Ok(())
    }

    fn send_message(&mut self, player: &PlayerId, message: &str) -> Result<()> {
        self.player_mut(player)?.inbox.push(message.to_string());
        self.mutations += 1;
        Ok(())
    }

    fn target_block(&self, player: &PlayerId, max_distance: f64) -> Option<BlockPos> {
        self.sight_line(player, max_distance)
            .into_iter()
            .find_map(|point| self.block_at(point))
    }

    fn block(&self, pos: BlockPos) -> Option<Block> {
        self.blocks.get(&pos).cloned()
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<()> {
        self.blocks.insert(pos, block);
        self.mutations += 1;
        Ok(())
    }

    fn swing_main_hand(&mut self, player: &PlayerId) -> Result<()> {
        self.player_mut(player)?.swings += 1;
        self.mutations += 1;
        Ok(())
    }

    fn target_entity(&self, player: &PlayerId, max_distance: f64) -> Option<EntityId> {
        for point in self.sight_line(player, max_distance) {
            let hit = self.entities.iter().find(|(_, e)| {
                let l = e.location;
                (point.0 - l.x).abs() <= ENTITY_HALF_WIDTH
                    && (point.2 - l.z).abs() <= ENTITY_HALF_WIDTH
                    && point.1 >= l.y
                    && point.1 <= l.y + ENTITY_HEIGHT
            });
            if let Some((id, _)) = hit {
                return Some(*id);
            }
            // Blocks obstruct line of sight
            if self.block_at(point).is_some() {
                return None;
            }
        }
        None
    }

    fn attack(&mut self, player: &PlayerId, entity: EntityId) -> Result<()> {
        self.player_mut(player)?;
        let target = self
            .entities
            .get_mut(&entity)
            .ok_or_else(|| BridgeError::Game(format!("No such entity: {}", entity)))?;
        target.health -= ATTACK_DAMAGE;
        if target.health <= 0.0 {
            self.entities.remove(&entity);
        }
        self.mutations += 1;
        Ok(())
    }
}
