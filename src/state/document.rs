use super::CollaborationStore;
use crate::types::ExecutionResult;

impl CollaborationStore {
    /// Replace the shared document. Last writer wins.
    pub fn set_code(&mut self, code: String) {
        self.code = code;
    }

    pub fn set_language(&mut self, language: String) {
        self.language = language;
    }

    pub fn set_execution_result(&mut self, result: Option<ExecutionResult>) {
        self.execution_result = result;
    }
}
