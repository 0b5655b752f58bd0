//! Errors raised by the core rules.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Caller contract violations.
///
/// Everything else in this crate is total: empty inputs produce zero-valued
/// results rather than errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// An input value outside its valid domain
    #[error("Invalid input: {field} = {value}")]
    InvalidInput {
        /// Name of the offending parameter
        field: String,
        /// Rendered offending value
        value: String,
    },
}

impl CoreError {
    /// Build an [`CoreError::InvalidInput`] for `field`.
    pub fn invalid(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value: value.to_string(),
        }
    }
}
