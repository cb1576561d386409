//! Outbound reply frames
//!
//! Replies are plain text, not JSON.

use std::fmt;

/// Sent once when a connection opens
pub const GREETING: &str = "Connected to Minecraft server";

/// Sent when a frame cannot be decoded as a request
pub const INVALID_FORMAT: &str = "Error: Invalid command format";

/// Outcome of dispatching one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Executed { command: String },
    Failed { message: String },
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Executed { .. })
    }

    /// Render as the reply frame sent to the client
    pub fn to_frame(&self) -> String {
        self.to_string()
    }

    /// Parse a reply frame; `None` for frames that are not command results
    pub fn from_frame(frame: &str) -> Option<Self> {
        if let Some(command) = frame.strip_prefix(EXECUTED_PREFIX) {
            Some(CommandResult::Executed {
                command: command.to_string(),
            })
        } else {
            frame
                .strip_prefix(FAILED_PREFIX)
                .map(|message| CommandResult::Failed {
                    message: message.to_string(),
                })
        }
    }
}

const EXECUTED_PREFIX: &str = "Command executed: ";
const FAILED_PREFIX: &str = "Error executing command: ";

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Executed { command } => write!(f, "{}{}", EXECUTED_PREFIX, command),
            CommandResult::Failed { message } => write!(f, "{}{}", FAILED_PREFIX, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_frames() {
        let ok = CommandResult::Executed {
            command: "look_left".into(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.to_frame(), "Command executed: look_left");

        let failed = CommandResult::Failed {
            message: "Missing parameter: degrees".into(),
        };
        assert!(!failed.is_success());
        assert_eq!(
            failed.to_frame(),
            "Error executing command: Missing parameter: degrees"
        );
    }

    #[test]
    fn test_parse_reply_frames() {
        assert_eq!(
            CommandResult::from_frame("Command executed: chat"),
            Some(CommandResult::Executed {
                command: "chat".into()
            })
        );
        assert_eq!(
            CommandResult::from_frame("Error executing command: Game error: no door"),
            Some(CommandResult::Failed {
                message: "Game error: no door".into()
            })
        );
        assert_eq!(CommandResult::from_frame(INVALID_FORMAT), None);
        assert_eq!(CommandResult::from_frame(GREETING), None);
    }
}
