mod chat;
mod document;
mod roster;
mod session;

use crate::protocol::SessionSnapshot;
use crate::types::*;

/// Document every fresh store starts with
pub const WELCOME_CODE: &str = r#"// Welcome to CodeTribe!
// Start coding together in real-time

function hello(name) {
  return "Hello, " + name + "!";
}

console.log(hello("CodeTribe"));"#;

/// Language of the welcome document
pub const WELCOME_LANGUAGE: &str = "javascript";

/// Per-session collaboration state: who is here, what they are editing,
/// what they said and what the last run produced.
///
/// Mutators never fail. Whatever has to be rejected (removing yourself, an
/// unknown language, an empty message) is rejected before it gets here.
#[derive(Debug, Clone)]
pub struct CollaborationStore {
    session_id: Option<SessionId>,
    is_connected: bool,
    current_user: Option<User>,
    /// Roster in insertion order, unique by id
    users: Vec<User>,
    code: String,
    language: String,
    /// Oldest first, at most MAX_MESSAGES entries
    messages: Vec<Message>,
    execution_result: Option<ExecutionResult>,
}

impl CollaborationStore {
    pub fn new() -> Self {
        Self {
            session_id: None,
            is_connected: false,
            current_user: None,
            users: Vec::new(),
            code: WELCOME_CODE.to_string(),
            language: WELCOME_LANGUAGE.to_string(),
            messages: Vec::new(),
            execution_result: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn execution_result(&self) -> Option<&ExecutionResult> {
        self.execution_result.as_ref()
    }

    /// Full copy of the store for sending to a client
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            is_connected: self.is_connected,
            current_user: self.current_user.clone(),
            users: self.users.clone(),
            code: self.code.clone(),
            language: self.language.clone(),
            messages: self.messages.clone(),
            execution_result: self.execution_result.clone(),
        }
    }
}

impl Default for CollaborationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) fn test_user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        color: "#3b82f6".to_string(),
        cursor: None,
    }
}

#[cfg(test)]
pub(crate) fn test_message(n: usize) -> Message {
    Message {
        id: format!("m{}", n),
        user_id: "1".to_string(),
        username: "A".to_string(),
        color: "#3b82f6".to_string(),
        content: format!("message {}", n),
        timestamp: 1_700_000_000_000 + n as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_ids(store: &CollaborationStore) -> Vec<&str> {
        store.users().iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_initial_state() {
        let store = CollaborationStore::new();

        assert!(store.session_id().is_none());
        assert!(!store.is_connected());
        assert!(store.current_user().is_none());
        assert!(store.users().is_empty());
        assert!(store.messages().is_empty());
        assert!(store.execution_result().is_none());
        assert_eq!(store.language(), "javascript");
        assert!(store.code().contains("Welcome to CodeTribe"));
    }

    #[test]
    fn test_current_user_then_second_user_keeps_insertion_order() {
        let mut store = CollaborationStore::new();

        store.set_current_user(test_user("1", "A"));
        assert_eq!(roster_ids(&store), vec!["1"]);

        store.add_user(test_user("2", "B"));
        assert_eq!(roster_ids(&store), vec!["1", "2"]);
        assert_eq!(store.current_user().unwrap().id, "1");
    }

    #[test]
    fn test_leave_session_resets_everything_but_document_and_self() {
        let mut store = CollaborationStore::new();
        store.set_current_user(test_user("1", "A"));
        store.add_user(test_user("2", "B"));
        store.join_session("ABCD1234".to_string());
        for n in 0..5 {
            store.add_message(test_message(n));
        }
        store.set_execution_result(Some(ExecutionResult {
            success: true,
            output: "ok".to_string(),
            error: None,
            execution_time: 412,
        }));

        store.leave_session();

        assert!(store.session_id().is_none());
        assert!(!store.is_connected());
        assert!(store.users().is_empty());
        assert!(store.messages().is_empty());
        assert!(store.execution_result().is_none());
        assert_eq!(store.current_user().unwrap().id, "1");
        assert!(store.code().contains("Welcome to CodeTribe"));
    }

    #[test]
    fn test_leave_session_from_fresh_store() {
        let mut store = CollaborationStore::new();
        store.leave_session();

        let snapshot = store.snapshot();
        assert!(snapshot.session_id.is_none());
        assert!(!snapshot.is_connected);
        assert!(snapshot.users.is_empty());
        assert!(snapshot.messages.is_empty());
        assert!(snapshot.execution_result.is_none());
    }

    #[test]
    fn test_snapshot_mirrors_store() {
        let mut store = CollaborationStore::new();
        store.set_current_user(test_user("1", "A"));
        store.join_session("ZX81ZX81".to_string());
        store.set_language("python".to_string());
        store.set_code("print('hi')".to_string());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.session_id.as_deref(), Some("ZX81ZX81"));
        assert!(snapshot.is_connected);
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.language, "python");
        assert_eq!(snapshot.code, "print('hi')");
    }
}
