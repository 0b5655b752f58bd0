//! AgencyOps core data models.
//!
//! Rows handed over by the storage collaborator (works, steps, editorial
//! plan items, todos) together with the rules that govern how they change
//! state and how they are sequenced within their scope.

#![warn(missing_docs)]

// Identities
mod id;
mod error;

// Deliverables
mod work;
mod step;

// Editorial plan and personal lists
mod ped;
mod todo;

// Directory rows resolved by the presentation layer
mod directory;

// Sequencing
mod ordering;

// Re-exports
pub use id::*;
pub use error::{CoreError, Result};

pub use work::{transition_work_status, TransitionKind, Work, WorkFilter, WorkStatus};
pub use step::{toggle_work_step_completion, StepCompletion, StepStatus, WorkStep};
pub use ped::{PedFilter, PedItem, PedKind, PedPriority, PedScope, PedStatus};
pub use todo::UserTodo;
pub use directory::{Category, Client, TeamMember};
pub use ordering::{next_sort_order, next_sort_order_in, sort_for_display, Sequenced};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
