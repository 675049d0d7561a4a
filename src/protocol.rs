use crate::languages::Language;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Protocol version announced in the welcome message
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateSession {
        username: String,
    },
    JoinSession {
        username: String,
        session_id: SessionId,
    },
    LeaveSession,
    /// Editor content changed (typing or file upload)
    CodeChange {
        code: String,
    },
    SelectLanguage {
        language: String,
    },
    /// Restore the current language's sample and clear the last run
    ResetCode,
    RunCode,
    ChatMessage {
        content: String,
    },
    MoveCursor {
        line: u32,
        column: u32,
    },
    /// Creator only: remove another participant
    RemoveUser {
        user_id: UserId,
    },
    RequestDownload,
    RequestPreview,
    RequestState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
        languages: Vec<LanguageInfo>,
    },
    /// Sent after create/join with the handle the client should remember
    SessionEntered {
        handle: SessionHandle,
    },
    /// The transport confirmed the join
    SessionJoined {
        session_id: SessionId,
        users: Vec<User>,
    },
    SessionLeft,
    State {
        snapshot: SessionSnapshot,
    },
    CodeUpdated {
        code: String,
        language: String,
    },
    MessageReceived {
        message: Message,
    },
    UserRemoved {
        user_id: UserId,
    },
    CursorMoved {
        user_id: UserId,
        line: u32,
        column: u32,
    },
    ExecutionFinished {
        result: ExecutionResult,
    },
    Download {
        filename: String,
        contents: String,
    },
    Preview {
        html: Option<String>,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Everything a client needs to render its session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub is_connected: bool,
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub code: String,
    pub language: String,
    pub messages: Vec<Message>,
    pub execution_result: Option<ExecutionResult>,
}

/// Catalog entry sent to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageInfo {
    pub id: String,
    pub display_name: String,
    pub extension: String,
}

impl From<&Language> for LanguageInfo {
    fn from(l: &Language) -> Self {
        Self {
            id: l.id.to_string(),
            display_name: l.display_name.to_string(),
            extension: l.extension.to_string(),
        }
    }
}
