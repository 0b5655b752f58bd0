//! Personal todo list entries.

use serde::{Deserialize, Serialize};
use crate::id::{TodoId, UserId};
use crate::ordering::Sequenced;
use crate::Time;

/// A todo private to a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTodo {
    /// Unique identifier
    pub id: TodoId,

    /// Exclusive owner
    pub user_id: UserId,

    /// Todo title
    pub title: String,

    /// Whether it has been ticked off
    pub completed: bool,

    /// When it was ticked off
    #[serde(default)]
    pub completed_at: Option<Time>,

    /// Position within the owner's list
    pub sort_order: i64,

    /// Creation timestamp
    pub created_at: Time,
}

impl UserTodo {
    /// Create an open todo.
    pub fn new(user_id: UserId, title: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: TodoId::new(),
            user_id,
            title: title.into(),
            completed: false,
            completed_at: None,
            sort_order,
            created_at: chrono::Utc::now(),
        }
    }

    /// Tick or untick the todo.
    pub fn set_completed(&mut self, completed: bool, now: Time) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }
}

impl Sequenced for UserTodo {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn created_at(&self) -> Time {
        self.created_at
    }
}
