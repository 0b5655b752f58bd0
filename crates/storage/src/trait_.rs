//! Storage trait abstraction.

use async_trait::async_trait;
use agencyops_core::{
    Category, Client, PedFilter, PedItem, PedItemId, StepId, TeamMember, TodoId, UserId,
    UserTodo, Work, WorkFilter, WorkId, WorkStep,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for AgencyOps rows.
///
/// Rows are keyed by primary id. Listing methods return complete scoped row
/// sets; an error means the caller has nothing to aggregate.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Work operations ===

    /// Save a work (create or update).
    async fn save_work(&mut self, work: &Work) -> Result<()>;

    /// Load a work by ID.
    async fn load_work(&self, id: WorkId) -> Result<Option<Work>>;

    /// List works matching the filter.
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<Work>>;

    /// Delete a work and its steps.
    async fn delete_work(&mut self, id: WorkId) -> Result<()>;

    // === Step operations ===

    /// Save a step (create or update).
    async fn save_step(&mut self, step: &WorkStep) -> Result<()>;

    /// Load a step by ID.
    async fn load_step(&self, id: StepId) -> Result<Option<WorkStep>>;

    /// List the steps of a work, in no particular order.
    async fn list_steps(&self, work_id: WorkId) -> Result<Vec<WorkStep>>;

    /// Delete a step.
    async fn delete_step(&mut self, id: StepId) -> Result<()>;

    // === Editorial plan operations ===

    /// Save a plan item (create or update).
    async fn save_ped_item(&mut self, item: &PedItem) -> Result<()>;

    /// Load a plan item by ID.
    async fn load_ped_item(&self, id: PedItemId) -> Result<Option<PedItem>>;

    /// List plan items matching the filter.
    async fn list_ped_items(&self, filter: &PedFilter) -> Result<Vec<PedItem>>;

    /// Delete a plan item.
    async fn delete_ped_item(&mut self, id: PedItemId) -> Result<()>;

    // === Todo operations ===

    /// Save a todo (create or update).
    async fn save_todo(&mut self, todo: &UserTodo) -> Result<()>;

    /// Load a todo by ID.
    async fn load_todo(&self, id: TodoId) -> Result<Option<UserTodo>>;

    /// List the todos owned by a user.
    async fn list_todos(&self, user_id: UserId) -> Result<Vec<UserTodo>>;

    /// Delete a todo.
    async fn delete_todo(&mut self, id: TodoId) -> Result<()>;

    // === Directory operations ===

    /// Save a category.
    async fn save_category(&mut self, category: &Category) -> Result<()>;

    /// List all categories.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Save a client.
    async fn save_client(&mut self, client: &Client) -> Result<()>;

    /// List all clients.
    async fn list_clients(&self) -> Result<Vec<Client>>;

    /// Save a team member.
    async fn save_member(&mut self, member: &TeamMember) -> Result<()>;

    /// List all team members.
    async fn list_members(&self) -> Result<Vec<TeamMember>>;

    // === Transaction support ===

    /// Commit pending changes with a message.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Rollback pending changes.
    async fn rollback(&mut self) -> Result<()>;
}
