//! Errors for progress aggregation.

use agencyops_core::CoreError;
use agencyops_storage::StorageError;

/// Result type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors that can occur while loading or aggregating.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Rows could not be loaded; nothing was aggregated
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Caller contract violation
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
