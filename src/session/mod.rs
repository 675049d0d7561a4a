//! One client's view of a collaboration session.
//!
//! `Session` is the boundary between client actions and the store: it
//! validates input, enforces the creator-only policies, talks to the
//! transport, and folds transport deliveries back into the store through
//! [`Session::apply`]. The store itself never rejects anything.

pub mod validate;

use crate::executor::Executor;
use crate::languages;
use crate::preview;
use crate::protocol::ServerMessage;
use crate::state::CollaborationStore;
use crate::transport::{EventKind, InboundEvent, MockTransport, OutboundEvent};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Rejections raised before anything reaches the store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter a username")]
    EmptyUsername,

    #[error("Username must be at most {} characters", MAX_USERNAME_CHARS)]
    UsernameTooLong,

    #[error("Please enter a session ID")]
    EmptySessionId,

    #[error("Session ID must be {} characters long", SESSION_ID_LENGTH)]
    InvalidSessionId,

    #[error("Not in a session")]
    NotInSession,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message must be at most {} characters", MAX_MESSAGE_CHARS)]
    MessageTooLong,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("No code to execute")]
    EmptyCode,

    #[error("Only the session creator can remove users")]
    NotCreator,

    #[error("Cannot remove yourself")]
    CannotRemoveSelf,

    #[error("User not found: {0}")]
    UnknownUser(UserId),
}

impl SessionError {
    /// Stable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::EmptyUsername => "EMPTY_USERNAME",
            SessionError::UsernameTooLong => "USERNAME_TOO_LONG",
            SessionError::EmptySessionId => "EMPTY_SESSION_ID",
            SessionError::InvalidSessionId => "INVALID_SESSION_ID",
            SessionError::NotInSession => "NOT_IN_SESSION",
            SessionError::EmptyMessage => "EMPTY_MESSAGE",
            SessionError::MessageTooLong => "MESSAGE_TOO_LONG",
            SessionError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            SessionError::EmptyCode => "EMPTY_CODE",
            SessionError::NotCreator => "UNAUTHORIZED",
            SessionError::CannotRemoveSelf => "CANNOT_REMOVE_SELF",
            SessionError::UnknownUser(_) => "UNKNOWN_USER",
        }
    }
}

impl From<SessionError> for ServerMessage {
    fn from(e: SessionError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}

pub struct Session {
    store: CollaborationStore,
    transport: MockTransport,
    executor: Arc<dyn Executor>,
    handle: Option<SessionHandle>,
    /// Code changes sent whose echo has not come back yet
    unacked_code_changes: usize,
    events: mpsc::UnboundedReceiver<InboundEvent>,
}

impl Session {
    /// Wire a fresh store to `transport`. Deliveries are queued and applied
    /// one at a time by whoever drives [`Session::next_event`].
    pub fn new(transport: MockTransport, executor: Arc<dyn Executor>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        for kind in [
            EventKind::SessionJoined,
            EventKind::CodeUpdated,
            EventKind::MessageReceived,
        ] {
            let tx = tx.clone();
            transport.on(kind, move |event| {
                // Receiver gone means the session is being torn down
                let _ = tx.send(event.clone());
            });
        }

        Self {
            store: CollaborationStore::new(),
            transport,
            executor,
            handle: None,
            unacked_code_changes: 0,
            events,
        }
    }

    pub fn store(&self) -> &CollaborationStore {
        &self.store
    }

    pub fn handle(&self) -> Option<&SessionHandle> {
        self.handle.as_ref()
    }

    pub fn transport(&self) -> &MockTransport {
        &self.transport
    }

    /// Start a new session with a generated code; the caller becomes its creator
    pub fn create(&mut self, username: &str) -> Result<SessionHandle, SessionError> {
        let username = validate::validate_username(username)?;
        let session_id = validate::generate_session_id();
        let handle = SessionHandle {
            username: username.clone(),
            session_id: session_id.clone(),
            role: SessionRole::Creator,
        };

        self.enter(handle.clone());
        // Nobody has to confirm a session we just made up
        self.store.join_session(session_id.clone());
        self.transport.emit(OutboundEvent::CreateSession {
            session_id,
            username,
        });

        Ok(handle)
    }

    /// Join an existing session by code. The store only counts as connected
    /// once the transport answers with `session-joined`.
    pub fn join(&mut self, username: &str, session_id: &str) -> Result<SessionHandle, SessionError> {
        let username = validate::validate_username(username)?;
        let session_id = validate::normalize_session_id(session_id)?;
        let handle = SessionHandle {
            username: username.clone(),
            session_id: session_id.clone(),
            role: SessionRole::Participant,
        };

        self.enter(handle.clone());
        self.transport.emit(OutboundEvent::JoinSession {
            session_id,
            username,
        });

        Ok(handle)
    }

    fn enter(&mut self, handle: SessionHandle) {
        if self.handle.is_some() {
            self.leave();
        }

        let user = User {
            id: ulid::Ulid::new().to_string(),
            username: handle.username.clone(),
            color: validate::pick_color(),
            cursor: None,
        };
        tracing::info!(
            "{} entering session {} as {:?}",
            user.username,
            handle.session_id,
            handle.role
        );

        self.store.set_current_user(user);
        self.transport.connect();
        self.handle = Some(handle);
    }

    /// Leave the session. Always succeeds, also when not in one.
    pub fn leave(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::info!("Leaving session {}", handle.session_id);
            self.transport.emit(OutboundEvent::LeaveSession);
        }
        self.transport.disconnect();
        self.store.leave_session();
        self.unacked_code_changes = 0;

        // Deliveries that fired before the disconnect belong to the old session
        while self.events.try_recv().is_ok() {}
    }

    /// Replace the document (typing or upload) and publish the change
    pub fn change_code(&mut self, code: String) {
        self.store.set_code(code.clone());
        self.publish_code(code);
    }

    /// Switch language and load its sample document
    pub fn select_language(&mut self, language: &str) -> Result<(), SessionError> {
        let entry = languages::find(language)
            .ok_or_else(|| SessionError::UnsupportedLanguage(language.to_string()))?;

        self.store.set_language(entry.id.to_string());
        self.change_code(entry.sample.to_string());
        Ok(())
    }

    /// Put the current language's sample back and forget the last run
    pub fn reset_code(&mut self) {
        let sample = languages::find(self.store.language()).map_or("", |l| l.sample);
        self.store.set_execution_result(None);
        self.change_code(sample.to_string());
    }

    /// Run the document through the executor and keep the result
    pub async fn run_code(&mut self) -> Result<ExecutionResult, SessionError> {
        if self.store.code().trim().is_empty() {
            return Err(SessionError::EmptyCode);
        }

        let code = self.store.code().to_string();
        let language = self.store.language().to_string();
        let result = self.executor.execute(&code, &language).await;

        tracing::info!(
            "Executed {} code in {}ms (success: {})",
            language,
            result.execution_time,
            result.success
        );

        self.store.set_execution_result(Some(result.clone()));
        Ok(result)
    }

    /// Send a chat message. It shows up in the log once the transport echoes it.
    pub fn send_chat(&mut self, content: &str) -> Result<Message, SessionError> {
        let user = self.participant()?.clone();
        let content = validate::validate_message(content)?;

        let message = Message {
            id: ulid::Ulid::new().to_string(),
            user_id: user.id,
            username: user.username,
            color: user.color,
            content,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        self.transport.emit(OutboundEvent::ChatMessage(message.clone()));
        Ok(message)
    }

    pub fn move_cursor(&mut self, cursor: Cursor) -> Result<UserId, SessionError> {
        let user_id = self.participant()?.id.clone();
        self.store.update_user_cursor(&user_id, cursor);
        Ok(user_id)
    }

    /// Creator only: drop another participant from the roster
    pub fn remove_user(&mut self, user_id: &str) -> Result<User, SessionError> {
        let handle = self.handle.as_ref().ok_or(SessionError::NotInSession)?;
        if !handle.is_admin() {
            return Err(SessionError::NotCreator);
        }
        if self.store.current_user().is_some_and(|u| u.id == user_id) {
            return Err(SessionError::CannotRemoveSelf);
        }

        let user = self
            .store
            .users()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownUser(user_id.to_string()))?;

        self.store.remove_user(user_id);
        tracing::info!("Removed {} from session", user.username);
        Ok(user)
    }

    /// File name and contents for saving the document
    pub fn download(&self) -> (String, String) {
        (
            languages::download_filename(self.store.language()),
            self.store.code().to_string(),
        )
    }

    pub fn preview(&self) -> Option<String> {
        preview::render(self.store.code(), self.store.language())
    }

    /// Wait for the next transport delivery
    pub async fn next_event(&mut self) -> Option<InboundEvent> {
        self.events.recv().await
    }

    /// Fold a transport delivery into the store. Returns what the client
    /// should be told, if anything.
    pub fn apply(&mut self, event: InboundEvent) -> Option<ServerMessage> {
        match event {
            InboundEvent::SessionJoined { session_id, users } => {
                let expected = self.handle.as_ref().map(|h| h.session_id.as_str());
                if expected != Some(session_id.as_str()) {
                    tracing::debug!("Ignoring stale join for session {}", session_id);
                    return None;
                }
                self.store.join_session(session_id.clone());
                for user in users.iter().cloned() {
                    self.store.add_user(user);
                }
                Some(ServerMessage::SessionJoined {
                    session_id,
                    users: self.store.users().to_vec(),
                })
            }
            InboundEvent::CodeUpdated { code, language } => {
                self.unacked_code_changes = self.unacked_code_changes.saturating_sub(1);
                // Older echoes would clobber edits made since
                if self.unacked_code_changes > 0 {
                    return None;
                }
                self.store.set_code(code.clone());
                self.store.set_language(language.clone());
                Some(ServerMessage::CodeUpdated { code, language })
            }
            InboundEvent::MessageReceived(message) => {
                self.handle.as_ref()?;
                self.store.add_message(message.clone());
                Some(ServerMessage::MessageReceived { message })
            }
            InboundEvent::Connect | InboundEvent::Disconnect => None,
        }
    }

    fn participant(&self) -> Result<&User, SessionError> {
        if self.handle.is_none() {
            return Err(SessionError::NotInSession);
        }
        self.store.current_user().ok_or(SessionError::NotInSession)
    }

    fn publish_code(&mut self, code: String) {
        self.unacked_code_changes += 1;
        self.transport.emit(OutboundEvent::CodeChange {
            code,
            language: self.store.language().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutorConfig, SimulatedExecutor};
    use crate::transport::TransportConfig;
    use std::time::Duration;

    fn new_session() -> Session {
        let executor = SimulatedExecutor::new(ExecutorConfig {
            min_latency: Duration::from_millis(300),
            max_latency: Duration::from_millis(300),
        });
        Session::new(MockTransport::new(TransportConfig::default()), Arc::new(executor))
    }

    /// Apply every delivery that arrives within `window`
    async fn pump(session: &mut Session, window: Duration) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        let deadline = tokio::time::Instant::now() + window;
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, session.next_event()).await {
            out.extend(session.apply(event));
        }
        out
    }

    #[tokio::test]
    async fn test_create_session() {
        let mut session = new_session();
        let handle = session.create("  ada ").unwrap();

        assert_eq!(handle.username, "ada");
        assert_eq!(handle.role, SessionRole::Creator);
        assert!(handle.is_admin());
        assert_eq!(handle.session_id.len(), SESSION_ID_LENGTH);

        let store = session.store();
        assert_eq!(store.session_id(), Some(handle.session_id.as_str()));
        assert!(store.is_connected());
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.current_user().unwrap().username, "ada");
        assert!(session.transport().is_connected());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_username() {
        let mut session = new_session();
        assert_eq!(session.create(" "), Err(SessionError::EmptyUsername));
        assert!(session.handle().is_none());
        assert!(session.store().current_user().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_join_connects_after_transport_answers() {
        let mut session = new_session();
        let handle = session.join("bob", "k3y9qw2m").unwrap();

        assert_eq!(handle.session_id, "K3Y9QW2M");
        assert_eq!(handle.role, SessionRole::Participant);
        assert!(!session.store().is_connected());

        let early = pump(&mut session, Duration::from_millis(400)).await;
        assert!(early.is_empty());
        assert!(!session.store().is_connected());

        let late = pump(&mut session, Duration::from_millis(200)).await;
        assert!(matches!(late.as_slice(), [ServerMessage::SessionJoined { .. }]));
        assert_eq!(session.store().session_id(), Some("K3Y9QW2M"));
        assert!(session.store().is_connected());
    }

    #[tokio::test]
    async fn test_join_rejects_short_code() {
        let mut session = new_session();
        assert_eq!(
            session.join("bob", "ABC"),
            Err(SessionError::InvalidSessionId)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_lands_in_store_after_echo() {
        let mut session = new_session();
        session.create("ada").unwrap();

        let sent = session.send_chat("  hello team ").unwrap();
        assert_eq!(sent.content, "hello team");
        assert!(session.store().messages().is_empty());

        let out = pump(&mut session, Duration::from_millis(150)).await;
        assert_eq!(out.len(), 1);
        assert_eq!(session.store().messages(), &[sent]);
    }

    #[tokio::test]
    async fn test_chat_requires_session() {
        let mut session = new_session();
        assert_eq!(session.send_chat("hi"), Err(SessionError::NotInSession));

        session.create("ada").unwrap();
        assert_eq!(session.send_chat("   "), Err(SessionError::EmptyMessage));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_cancels_pending_chat() {
        let mut session = new_session();
        session.create("ada").unwrap();
        session.send_chat("bye").unwrap();

        session.leave();
        assert_eq!(session.transport().pending_deliveries(), 0);

        let out = pump(&mut session, Duration::from_secs(1)).await;
        assert!(out.is_empty());
        assert!(session.store().messages().is_empty());
        assert!(session.store().session_id().is_none());
        assert!(session.handle().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_code_echo_is_applied() {
        let mut session = new_session();
        session.create("ada").unwrap();

        session.change_code("a".to_string());
        session.change_code("ab".to_string());
        session.change_code("abc".to_string());

        let out = pump(&mut session, Duration::from_millis(100)).await;
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], ServerMessage::CodeUpdated { code, .. } if code == "abc"));
        assert_eq!(session.store().code(), "abc");
    }

    #[tokio::test]
    async fn test_select_language_loads_sample() {
        let mut session = new_session();
        session.select_language("python").unwrap();

        assert_eq!(session.store().language(), "python");
        assert_eq!(
            session.store().code(),
            languages::find("python").unwrap().sample
        );
        assert_eq!(
            session.select_language("cobol"),
            Err(SessionError::UnsupportedLanguage("cobol".to_string()))
        );
        assert_eq!(session.store().language(), "python");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_code_stores_result() {
        let mut session = new_session();
        session.change_code(r#"console.log("ran");"#.to_string());

        let result = session.run_code().await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "ran");
        assert_eq!(session.store().execution_result(), Some(&result));
    }

    #[tokio::test]
    async fn test_run_code_rejects_blank_document() {
        let mut session = new_session();
        session.change_code("  \n ".to_string());

        assert_eq!(session.run_code().await, Err(SessionError::EmptyCode));
        assert!(session.store().execution_result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_code_restores_sample_and_clears_result() {
        let mut session = new_session();
        session.select_language("go").unwrap();
        session.change_code("fmt.Println(\"mine\")".to_string());
        session.run_code().await.unwrap();

        session.reset_code();

        assert_eq!(session.store().code(), languages::find("go").unwrap().sample);
        assert!(session.store().execution_result().is_none());
    }

    #[tokio::test]
    async fn test_remove_user_policies() {
        let mut session = new_session();
        assert_eq!(session.remove_user("x"), Err(SessionError::NotInSession));

        session.create("ada").unwrap();
        let me = session.store().current_user().unwrap().id.clone();
        assert_eq!(session.remove_user(&me), Err(SessionError::CannotRemoveSelf));
        assert_eq!(
            session.remove_user("ghost"),
            Err(SessionError::UnknownUser("ghost".to_string()))
        );

        session.store.add_user(User {
            id: "guest".to_string(),
            username: "bob".to_string(),
            color: "#22c55e".to_string(),
            cursor: None,
        });
        let removed = session.remove_user("guest").unwrap();
        assert_eq!(removed.username, "bob");
        assert_eq!(session.store().users().len(), 1);
    }

    #[tokio::test]
    async fn test_participant_cannot_remove_users() {
        let mut session = new_session();
        session.join("bob", "ABCD1234").unwrap();

        assert_eq!(session.remove_user("anyone"), Err(SessionError::NotCreator));
    }

    #[tokio::test]
    async fn test_move_cursor() {
        let mut session = new_session();
        session.create("ada").unwrap();

        let id = session.move_cursor(Cursor { line: 3, column: 9 }).unwrap();
        let me = session.store().users().iter().find(|u| u.id == id).unwrap();
        assert_eq!(me.cursor, Some(Cursor { line: 3, column: 9 }));
    }

    #[tokio::test]
    async fn test_download_and_preview() {
        let mut session = new_session();
        session.select_language("html").unwrap();

        let (filename, contents) = session.download();
        assert_eq!(filename, "codetribe-file.html");
        assert_eq!(contents, session.store().code());
        assert_eq!(session.preview().as_deref(), Some(session.store().code()));

        session.select_language("sql").unwrap();
        assert!(session.preview().is_none());
    }

    #[tokio::test]
    async fn test_creating_again_leaves_previous_session() {
        let mut session = new_session();
        let first = session.create("ada").unwrap();
        let second = session.create("ada").unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(session.store().session_id(), Some(second.session_id.as_str()));
        assert_eq!(session.store().users().len(), 1);
    }

    #[test]
    fn test_error_codes() {
        let msg: ServerMessage = SessionError::EmptyCode.into();
        match msg {
            ServerMessage::Error { code, msg } => {
                assert_eq!(code, "EMPTY_CODE");
                assert_eq!(msg, "No code to execute");
            }
            other => panic!("Unexpected message: {:?}", other),
        }
        assert_eq!(SessionError::NotCreator.code(), "UNAUTHORIZED");
    }
}
