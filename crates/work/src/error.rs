//! Work management errors.

use agencyops_core::{CoreError, UserId};
use agencyops_storage::StorageError;

/// Result type for work management.
pub type Result<T> = std::result::Result<T, WorkError>;

/// Errors raised while changing stored rows.
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    /// Row does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Row kind
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// Row belongs to another user
    #[error("{kind} {id} is not owned by {user}")]
    NotOwner {
        /// Row kind
        kind: &'static str,
        /// Row id
        id: String,
        /// Acting user
        user: UserId,
    },

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Invalid input
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl WorkError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }
}
