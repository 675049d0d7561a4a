use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type UserId = String;
pub type MessageId = String;
pub type SessionId = String;

/// Most recent chat messages kept per session
pub const MAX_MESSAGES: usize = 100;
/// Maximum chat message length in characters
pub const MAX_MESSAGE_CHARS: usize = 500;
/// Maximum username length in characters
pub const MAX_USERNAME_CHARS: usize = 20;
/// Length of a session code
pub const SESSION_ID_LENGTH: usize = 8;

/// Palette participants are colored from
pub const USER_COLORS: &[&str] = &[
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#14b8a6", "#3b82f6", "#8b5cf6", "#ec4899",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cursor {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// CSS color used for the avatar, cursor and chat name
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub username: String,
    pub color: String,
    pub content: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time spent in the executor, milliseconds
    pub execution_time: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Creator,
    Participant,
}

/// Record of how this client entered its session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionHandle {
    pub username: String,
    pub session_id: SessionId,
    pub role: SessionRole,
}

impl SessionHandle {
    /// Session creators get the admin controls
    pub fn is_admin(&self) -> bool {
        self.role == SessionRole::Creator
    }
}
