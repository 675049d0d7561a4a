use super::CollaborationStore;
use crate::types::*;

impl CollaborationStore {
    /// Set who this client is, adding them to the roster if they are new
    pub fn set_current_user(&mut self, user: User) {
        self.add_user(user.clone());
        self.current_user = Some(user);
    }

    /// Insert a participant unless one with the same id is already present
    pub fn add_user(&mut self, user: User) {
        if !self.users.iter().any(|u| u.id == user.id) {
            self.users.push(user);
        }
    }

    /// Drop a participant from the roster. Unknown ids are ignored.
    pub fn remove_user(&mut self, user_id: &str) {
        self.users.retain(|u| u.id != user_id);
    }

    pub fn update_user_cursor(&mut self, user_id: &str, cursor: Cursor) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.cursor = Some(cursor);
        }
    }
}
