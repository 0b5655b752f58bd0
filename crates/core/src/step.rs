//! Work steps - the checklist inside a work.

use serde::{Deserialize, Serialize};
use crate::id::{StepId, WorkId};
use crate::ordering::Sequenced;
use crate::Time;

/// A checklist step owned by a work.
///
/// Stored rows are read back through [`StoredStep`], so the status is always
/// rebuilt from `completed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredStep")]
pub struct WorkStep {
    /// Unique identifier
    pub id: StepId,

    /// Owning work
    pub work_id: WorkId,

    /// Step title
    pub title: String,

    /// Completion status, always consistent with `completed_at`
    status: StepStatus,

    /// Position within the owning work
    pub sort_order: i64,

    /// When the step was completed
    completed_at: Option<Time>,

    /// Creation timestamp
    pub created_at: Time,
}

impl WorkStep {
    /// Create an open step at `sort_order`.
    pub fn new(work_id: WorkId, title: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: StepId::new(),
            work_id,
            title: title.into(),
            status: StepStatus::Todo,
            sort_order,
            completed_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Current status.
    pub fn status(&self) -> StepStatus {
        self.status
    }

    /// Completion time, present exactly when the step is done.
    pub fn completed_at(&self) -> Option<Time> {
        self.completed_at
    }

    /// Whether the step is done.
    pub fn is_done(&self) -> bool {
        self.status == StepStatus::Done
    }

    /// Set or clear the completion time; the status follows.
    pub fn set_completed_at(&mut self, completed_at: Option<Time>) {
        let completion = toggle_work_step_completion(completed_at);
        self.status = completion.status;
        self.completed_at = completion.completed_at;
    }

    /// Flip the step: done steps reopen, open steps complete at `now`.
    pub fn toggle(&mut self, now: Time) -> StepStatus {
        if self.is_done() {
            self.set_completed_at(None);
        } else {
            self.set_completed_at(Some(now));
        }
        self.status
    }
}

/// On-disk shape of a step. A stored `status` is ignored.
#[derive(Deserialize)]
struct StoredStep {
    id: StepId,
    work_id: WorkId,
    title: String,
    sort_order: i64,
    #[serde(default)]
    completed_at: Option<Time>,
    created_at: Time,
}

impl From<StoredStep> for WorkStep {
    fn from(row: StoredStep) -> Self {
        let completion = toggle_work_step_completion(row.completed_at);
        Self {
            id: row.id,
            work_id: row.work_id,
            title: row.title,
            status: completion.status,
            sort_order: row.sort_order,
            completed_at: completion.completed_at,
            created_at: row.created_at,
        }
    }
}

impl Sequenced for WorkStep {
    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn is_completed(&self) -> bool {
        self.is_done()
    }

    fn created_at(&self) -> Time {
        self.created_at
    }
}

/// Step status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// Open
    Todo,
    /// Completed
    Done,
}

/// A consistent status/completion pair for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletion {
    /// Derived status
    pub status: StepStatus,
    /// Completion time
    pub completed_at: Option<Time>,
}

/// Derive the step status from a completion time.
pub fn toggle_work_step_completion(completed_at: Option<Time>) -> StepCompletion {
    let status = match completed_at {
        Some(_) => StepStatus::Done,
        None => StepStatus::Todo,
    };
    StepCompletion { status, completed_at }
}
