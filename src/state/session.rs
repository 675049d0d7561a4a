use super::CollaborationStore;
use crate::types::SessionId;

impl CollaborationStore {
    /// Mark this store as part of a session. Nothing checks that the session exists.
    pub fn join_session(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
        self.is_connected = true;
    }

    /// Back to the pre-join state: no session, empty roster, chat and result.
    /// The document and the current user survive.
    pub fn leave_session(&mut self) {
        self.session_id = None;
        self.is_connected = false;
        self.users.clear();
        self.messages.clear();
        self.execution_result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_session() {
        let mut store = CollaborationStore::new();
        store.join_session("K3Y9QW2M".to_string());

        assert_eq!(store.session_id(), Some("K3Y9QW2M"));
        assert!(store.is_connected());
    }

    #[test]
    fn test_rejoin_replaces_session_id() {
        let mut store = CollaborationStore::new();
        store.join_session("AAAAAAAA".to_string());
        store.join_session("BBBBBBBB".to_string());

        assert_eq!(store.session_id(), Some("BBBBBBBB"));
    }

    #[test]
    fn test_leave_twice() {
        let mut store = CollaborationStore::new();
        store.join_session("AAAAAAAA".to_string());
        store.leave_session();
        store.leave_session();

        assert!(store.session_id().is_none());
        assert!(!store.is_connected());
    }
}
