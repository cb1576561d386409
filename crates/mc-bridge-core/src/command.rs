//! Typed player-control commands

use crate::error::Result;
use crate::request::Request;

/// A validated command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Walk along the horizontal facing vector
    MoveForward { distance: f64 },
    LookLeft { degrees: f32 },
    LookRight { degrees: f32 },
    LookUp { degrees: f32 },
    LookDown { degrees: f32 },
    /// Reset yaw and pitch to zero
    CenterView,
    /// Send a chat message to the controlled player
    Chat { message: String },
    /// Toggle the openable block in reach
    Interact,
    /// Swing and hit the entity in reach
    Attack,
    /// Not in the command table
    Unknown(String),
}

impl Command {
    /// Decode a request, extracting the parameters its command needs
    pub fn from_request(request: &Request) -> Result<Self> {
        let params = &request.params;
        let command = match request.command.as_str() {
            "move_forward" => Command::MoveForward {
                distance: params.number("distance")?,
            },
            "look_left" => Command::LookLeft {
                degrees: params.number("degrees")? as f32,
            },
            "look_right" => Command::LookRight {
                degrees: params.number("degrees")? as f32,
            },
            "look_up" => Command::LookUp {
                degrees: params.number("degrees")? as f32,
            },
            "look_down" => Command::LookDown {
                degrees: params.number("degrees")? as f32,
            },
            "center_view" => Command::CenterView,
            "chat" => Command::Chat {
                message: params.text("message")?.to_string(),
            },
            "interact" => Command::Interact,
            "attack" => Command::Attack,
            other => Command::Unknown(other.to_string()),
        };
        Ok(command)
    }

    /// Wire name of the command
    pub fn name(&self) -> &str {
        match self {
            Command::MoveForward { .. } => "move_forward",
            Command::LookLeft { .. } => "look_left",
            Command::LookRight { .. } => "look_right",
            Command::LookUp { .. } => "look_up",
            Command::LookDown { .. } => "look_down",
            Command::CenterView => "center_view",
            Command::Chat { .. } => "chat",
            Command::Interact => "interact",
            Command::Attack => "attack",
            Command::Unknown(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::params::Params;

    #[test]
    fn test_decode_table_commands() {
        let cases = [
            (
                Request::new("move_forward", Params::new().with("distance", 2.5)),
                Command::MoveForward { distance: 2.5 },
            ),
            (
                Request::new("look_left", Params::new().with("degrees", 45)),
                Command::LookLeft { degrees: 45.0 },
            ),
            (
                Request::new("look_down", Params::new().with("degrees", 10)),
                Command::LookDown { degrees: 10.0 },
            ),
            (Request::new("center_view", Params::new()), Command::CenterView),
            (
                Request::new("chat", Params::new().with("message", "hello")),
                Command::Chat {
                    message: "hello".into(),
                },
            ),
            (Request::new("interact", Params::new()), Command::Interact),
            (Request::new("attack", Params::new()), Command::Attack),
        ];

        for (request, expected) in cases {
            let command = Command::from_request(&request).unwrap();
            assert_eq!(command.name(), request.command);
            assert_eq!(command, expected);
        }
    }

    #[test]
    fn test_unknown_command_is_not_an_error() {
        let request = Request::new("jump", Params::new());
        let command = Command::from_request(&request).unwrap();
        assert_eq!(command, Command::Unknown("jump".into()));
        assert_eq!(command.name(), "jump");
    }

    #[test]
    fn test_bad_parameters() {
        let request = Request::new("move_forward", Params::new().with("distance", "far"));
        assert!(matches!(
            Command::from_request(&request),
            Err(BridgeError::ParamType { .. })
        ));

        let request = Request::new("look_up", Params::new());
        assert!(matches!(
            Command::from_request(&request),
            Err(BridgeError::MissingParam(key)) if key == "degrees"
        ));
    }
}
