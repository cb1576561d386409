//! Command dispatch against the game state
//!
//! Runs on the update thread only. The target is always the first online
//! player; with nobody online every command is a successful no-op.

use crate::scheduler::panic_message;
use mc_bridge_core::{
    BridgeError, Command, CommandResult, GameState, Location, PlayerId, Request, Result,
};
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Reach for `interact`
pub const INTERACT_REACH: f64 = 5.0;

/// Reach for `attack`
pub const ATTACK_REACH: f64 = 3.0;

const PITCH_LIMIT: f32 = 90.0;

/// Maps requests onto game-state mutations
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    interact_reach: f64,
    attack_reach: f64,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self {
            interact_reach: INTERACT_REACH,
            attack_reach: ATTACK_REACH,
        }
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a request and turn the outcome, including panics, into a reply
    pub fn dispatch<W: GameState>(&self, world: &mut W, request: &Request) -> CommandResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(world, request)))
            .unwrap_or_else(|panic| Err(BridgeError::Panicked(panic_message(panic.as_ref()))));

        match outcome {
            Ok(()) => CommandResult::Executed {
                command: request.command.clone(),
            },
            Err(e) => CommandResult::Failed {
                message: e.to_string(),
            },
        }
    }

    /// Execute a request against the first online player
    pub fn execute<W: GameState>(&self, world: &mut W, request: &Request) -> Result<()> {
        let Some(player) = world.online_players().into_iter().next() else {
            debug!("No players online, skipping '{}'", request.command);
            return Ok(());
        };

        let command = Command::from_request(request)?;
        debug!("Executing {:?} for {}", command, player);

        match command {
            Command::MoveForward { distance } => {
                let loc = world.location(&player)?;
                let rad = (loc.yaw as f64).to_radians();
                let dx = -rad.sin() * distance;
                let dz = rad.cos() * distance;
                world.teleport(&player, loc.add(dx, 0.0, dz))
            }
            Command::LookLeft { degrees } => {
                rotate(world, &player, |loc| loc.yaw -= degrees)
            }
            Command::LookRight { degrees } => {
                rotate(world, &player, |loc| loc.yaw += degrees)
            }
            Command::LookUp { degrees } => rotate(world, &player, |loc| {
                loc.pitch = (loc.pitch - degrees).max(-PITCH_LIMIT)
            }),
            Command::LookDown { degrees } => rotate(world, &player, |loc| {
                loc.pitch = (loc.pitch + degrees).min(PITCH_LIMIT)
            }),
            Command::CenterView => rotate(world, &player, |loc| {
                loc.yaw = 0.0;
                loc.pitch = 0.0;
            }),
            Command::Chat { message } => world.send_message(&player, &message),
            Command::Interact => {
                let Some(pos) = world.target_block(&player, self.interact_reach) else {
                    return Ok(());
                };
                match world.block(pos) {
                    Some(mut block) => match block.open {
                        Some(open) => {
                            block.open = Some(!open);
                            world.set_block(pos, block)
                        }
                        None => Ok(()),
                    },
                    None => Ok(()),
                }
            }
            Command::Attack => {
                world.swing_main_hand(&player)?;
                match world.target_entity(&player, self.attack_reach) {
                    Some(entity) => world.attack(&player, entity),
                    None => Ok(()),
                }
            }
            Command::Unknown(name) => {
                debug!("Ignoring unknown command '{}'", name);
                Ok(())
            }
        }
    }
}

fn rotate<W: GameState>(
    world: &mut W,
    player: &PlayerId,
    update: impl FnOnce(&mut Location),
) -> Result<()> {
    let mut loc = world.location(player)?;
    update(&mut loc);
    world.teleport(player, loc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWorld;
    use mc_bridge_core::{Block, BlockPos, Params};

    const TOLERANCE: f64 = 1e-6;

    fn world_facing(yaw: f32) -> SimWorld {
        SimWorld::new().with_player(
            "Steve",
            Location::new(0.5, 64.0, 0.5).with_rotation(yaw, 0.0),
        )
    }

    fn run(world: &mut SimWorld, command: &str, params: Params) -> CommandResult {
        CommandDispatcher::new().dispatch(world, &Request::new(command, params))
    }

    fn steve(world: &SimWorld) -> Location {
        world.player("Steve").unwrap().location
    }

    #[test]
    fn test_move_forward_yaw_zero() {
        let mut world = world_facing(0.0);
        let result = run(&mut world, "move_forward", Params::new().with("distance", 5));

        assert_eq!(result.to_frame(), "Command executed: move_forward");
        let loc = steve(&world);
        assert!((loc.x - 0.5).abs() < TOLERANCE);
        assert!((loc.y - 64.0).abs() < TOLERANCE);
        assert!((loc.z - 5.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_move_forward_yaw_ninety() {
        let mut world = world_facing(90.0);
        run(&mut world, "move_forward", Params::new().with("distance", 5));

        let loc = steve(&world);
        assert!((loc.x - -4.5).abs() < TOLERANCE);
        assert!((loc.y - 64.0).abs() < TOLERANCE);
        assert!((loc.z - 0.5).abs() < TOLERANCE);
        assert_eq!(loc.yaw, 90.0);
    }

    #[test]
    fn test_look_left_and_right() {
        let mut world = world_facing(10.0);
        run(&mut world, "look_left", Params::new().with("degrees", 30));
        assert_eq!(steve(&world).yaw, -20.0);

        run(&mut world, "look_right", Params::new().with("degrees", 45.5));
        assert_eq!(steve(&world).yaw, 25.5);
    }

    #[test]
    fn test_pitch_saturates() {
        let mut world = world_facing(0.0);
        for _ in 0..10 {
            run(&mut world, "look_up", Params::new().with("degrees", 25));
            assert!(steve(&world).pitch >= -90.0);
        }
        assert_eq!(steve(&world).pitch, -90.0);

        for _ in 0..10 {
            run(&mut world, "look_down", Params::new().with("degrees", 25));
            assert!(steve(&world).pitch <= 90.0);
        }
        assert_eq!(steve(&world).pitch, 90.0);
    }

    #[test]
    fn test_center_view() {
        let mut world = SimWorld::new().with_player(
            "Steve",
            Location::new(0.0, 64.0, 0.0).with_rotation(135.0, -40.0),
        );
        run(&mut world, "center_view", Params::new());

        let loc = steve(&world);
        assert_eq!((loc.yaw, loc.pitch), (0.0, 0.0));
    }

    #[test]
    fn test_chat_goes_to_target_only() {
        let mut world = world_facing(0.0).with_player("Alex", Location::default());
        run(&mut world, "chat", Params::new().with("message", "hello"));

        assert_eq!(world.player("Steve").unwrap().inbox, vec!["hello"]);
        assert!(world.player("Alex").unwrap().inbox.is_empty());
    }

    #[test]
    fn test_interact_toggles_door() {
        let door = BlockPos::new(0, 65, 2);
        let mut world = world_facing(0.0).with_block(door, Block::openable("oak_door", false));

        run(&mut world, "interact", Params::new());
        assert_eq!(world.block(door).unwrap().open, Some(true));

        run(&mut world, "interact", Params::new());
        assert_eq!(world.block(door).unwrap().open, Some(false));

        // Interacting never swings the arm
        assert_eq!(world.player("Steve").unwrap().swings, 0);
    }

    #[test]
    fn test_interact_ignores_solid_block() {
        let wall = BlockPos::new(0, 65, 2);
        let mut world = world_facing(0.0).with_block(wall, Block::solid("stone"));

        let result = run(&mut world, "interact", Params::new());
        assert!(result.is_success());
        assert_eq!(world.mutations(), 0);
    }

    #[test]
    fn test_attack_hits_entity_in_reach() {
        let mut world = world_facing(0.0);
        let near = world.spawn_entity("zombie", Location::new(0.5, 64.0, 2.5), 20.0);
        let result = run(&mut world, "attack", Params::new());

        assert!(result.is_success());
        assert_eq!(world.player("Steve").unwrap().swings, 1);
        assert_eq!(world.entity(near).unwrap().health, 19.0);
    }

    #[test]
    fn test_attack_out_of_reach_only_swings() {
        let mut world = world_facing(0.0);
        let far = world.spawn_entity("zombie", Location::new(0.5, 64.0, 4.5), 20.0);
        run(&mut world, "attack", Params::new());

        assert_eq!(world.player("Steve").unwrap().swings, 1);
        assert_eq!(world.entity(far).unwrap().health, 20.0);
    }

    #[test]
    fn test_bad_parameter_is_execution_error() {
        let mut world = world_facing(0.0);
        let result = run(&mut world, "move_forward", Params::new().with("distance", "far"));

        assert_eq!(
            result.to_frame(),
            "Error executing command: Parameter 'distance' must be a number"
        );
        assert_eq!(world.mutations(), 0);
    }

    #[test]
    fn test_unknown_command_reports_success() {
        let mut world = world_facing(0.0);
        let result = run(&mut world, "dance", Params::new());

        assert_eq!(result.to_frame(), "Command executed: dance");
        assert_eq!(world.mutations(), 0);
    }

    #[test]
    fn test_no_players_is_a_successful_no_op() {
        let mut world = SimWorld::new();
        for command in ["move_forward", "look_up", "chat", "interact", "attack", "dance"] {
            let result = run(&mut world, command, Params::new());
            assert_eq!(result.to_frame(), format!("Command executed: {}", command));
        }
        assert_eq!(world.mutations(), 0);
    }

    #[test]
    fn test_panic_becomes_error_reply() {
        struct Exploding;

        impl GameState for Exploding {
            fn online_players(&self) -> Vec<PlayerId> {
                vec!["Steve".into()]
            }
            fn location(&self, _: &PlayerId) -> Result<Location> {
                panic!("location lookup exploded")
            }
            fn teleport(&mut self, _: &PlayerId, _: Location) -> Result<()> {
                Ok(())
            }
            fn send_message(&mut self, _: &PlayerId, _: &str) -> Result<()> {
                Ok(())
            }
            fn target_block(&self, _: &PlayerId, _: f64) -> Option<BlockPos> {
                None
            }
            fn block(&self, _: BlockPos) -> Option<Block> {
                None
            }
            fn set_block(&mut self, _: BlockPos, _: Block) -> Result<()> {
                Ok(())
            }
            fn swing_main_hand(&mut self, _: &PlayerId) -> Result<()> {
                Ok(())
            }
            fn target_entity(&self, _: &PlayerId, _: f64) -> Option<mc_bridge_core::EntityId> {
                None
            }
            fn attack(&mut self, _: &PlayerId, _: mc_bridge_core::EntityId) -> Result<()> {
                Ok(())
            }
        }

        let result = CommandDispatcher::new().dispatch(
            &mut Exploding,
            &Request::new("center_view", Params::new()),
        );
        assert_eq!(
            result.to_frame(),
            "Error executing command: Command panicked: location lookup exploded"
        );
    }
}
