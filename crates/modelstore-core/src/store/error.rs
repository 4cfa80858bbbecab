//! Store error types.

use modelstore_types::{LinearConstraintId, VariableId};

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStoreError {
    /// Variable id does not exist or was deleted.
    BadVariableId(VariableId),
    /// Linear constraint id does not exist or was deleted.
    BadLinearConstraintId(LinearConstraintId),
    /// An update tracker was used after being removed.
    UsedUpdateTrackerAfterRemoval,
    /// Tracker handle is not registered with this store.
    UnknownTracker,
}

impl ModelStoreError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelStoreError::BadVariableId(_) => "VARIABLE_BAD_ID",
            ModelStoreError::BadLinearConstraintId(_) => "LINEAR_CONSTRAINT_BAD_ID",
            ModelStoreError::UsedUpdateTrackerAfterRemoval => "TRACKER_USED_AFTER_REMOVAL",
            ModelStoreError::UnknownTracker => "TRACKER_UNKNOWN",
        }
    }
}

impl std::fmt::Display for ModelStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelStoreError::BadVariableId(id) => write!(
                f,
                "[{}] Variable id {} does not exist or was deleted",
                self.code(),
                id.inner()
            ),
            ModelStoreError::BadLinearConstraintId(id) => write!(
                f,
                "[{}] Linear constraint id {} does not exist or was deleted",
                self.code(),
                id.inner()
            ),
            ModelStoreError::UsedUpdateTrackerAfterRemoval => write!(
                f,
                "[{}] Update tracker was used after removal from its store",
                self.code()
            ),
            ModelStoreError::UnknownTracker => write!(
                f,
                "[{}] Tracker handle is not registered with this store",
                self.code()
            ),
        }
    }
}

impl std::error::Error for ModelStoreError {}
