//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    ListMembers = 0x01,
    AddMember = 0x02,
    AddAchievement = 0x03,
    Ping = 0x04,
}

/// Raw file carried inside a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    /// Client-side file name, used only for its extension
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields for creating a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub role: String,
    /// Falls back to the configured placeholder when absent
    pub avatar: Option<Upload>,
}

/// Fields for awarding an achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievement {
    pub member_id: u64,
    pub category: String,
    /// Required; `None` is rejected by the handler
    pub image: Option<Upload>,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all members with their achievements
    ListMembers,

    /// Create a member
    AddMember(NewMember),

    /// Award an achievement
    AddAchievement(NewAchievement),

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::ListMembers => CommandType::ListMembers,
            Command::AddMember(_) => CommandType::AddMember,
            Command::AddAchievement(_) => CommandType::AddAchievement,
            Command::Ping => CommandType::Ping,
        }
    }
}
