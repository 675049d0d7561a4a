use super::CollaborationStore;
use crate::types::*;

impl CollaborationStore {
    /// Append a chat message, evicting the oldest ones beyond MAX_MESSAGES
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}
