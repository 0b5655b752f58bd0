//! Work model - a billable deliverable and its status lifecycle.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::id::{CategoryId, ClientId, UserId, WorkId};
use crate::{CoreError, Time};

/// A work is a billable deliverable tracked through a status lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Work {
    /// Unique identifier
    pub id: WorkId,

    /// Work title
    pub title: String,

    /// Owning client
    pub client_id: ClientId,

    /// Work category
    pub category_id: CategoryId,

    /// Assigned user, if any
    #[serde(default)]
    pub assigned_to: Option<UserId>,

    /// Current status
    pub status: WorkStatus,

    /// Delivery deadline
    #[serde(default)]
    pub deadline: Option<Time>,

    /// State to return to when a paused work is resumed
    #[serde(default)]
    pub paused_from: Option<WorkStatus>,

    /// When the work reached `Done`
    #[serde(default)]
    pub completed_at: Option<Time>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl Work {
    /// Create a new work in `Todo` with no deadline and no assignee.
    pub fn new(title: impl Into<String>, client_id: ClientId, category_id: CategoryId) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: WorkId::new(),
            title: title.into(),
            client_id,
            category_id,
            assigned_to: None,
            status: WorkStatus::Todo,
            deadline: None,
            paused_from: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the deadline.
    pub fn with_deadline(mut self, deadline: Time) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the assignee.
    pub fn with_assignee(mut self, user: UserId) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// Set the status without lifecycle bookkeeping. Intended for building rows.
    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        if status.is_terminal() {
            self.completed_at = Some(self.updated_at);
        }
        self
    }

    /// Whether the work has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move the work to `requested`.
    ///
    /// Any target is accepted. Pausing remembers the state paused from,
    /// reaching `Done` stamps `completed_at` and leaving `Done` clears it.
    pub fn set_status(&mut self, requested: WorkStatus, now: Time) -> TransitionKind {
        let from = self.status;
        let kind = TransitionKind::between(from, requested);
        if kind == TransitionKind::Unchanged {
            return kind;
        }

        if requested == WorkStatus::Paused {
            if from.is_terminal() {
                warn!("Work {} paused while {}; resume will fall back to {}", self.id, from, WorkStatus::InProgress);
                self.paused_from = None;
            } else {
                self.paused_from = Some(from);
            }
        } else {
            self.paused_from = None;
        }

        if requested.is_terminal() {
            self.completed_at = Some(now);
        } else if from.is_terminal() {
            self.completed_at = None;
        }

        self.status = transition_work_status(from, requested);
        self.updated_at = now;
        kind
    }

    /// Pause the work.
    pub fn pause(&mut self, now: Time) -> TransitionKind {
        self.set_status(WorkStatus::Paused, now)
    }

    /// Resume a paused work to the state it was paused from.
    ///
    /// Falls back to `InProgress` when no prior state was recorded. A work
    /// that is not paused is left untouched.
    pub fn resume(&mut self, now: Time) -> TransitionKind {
        if self.status != WorkStatus::Paused {
            return TransitionKind::Unchanged;
        }
        let target = self.paused_from.unwrap_or(WorkStatus::InProgress);
        self.set_status(target, now)
    }

    /// Reopen a completed work: back to `InProgress`, completion cleared.
    ///
    /// Only a `Done` work is affected.
    pub fn reopen(&mut self, now: Time) -> TransitionKind {
        if !self.is_terminal() {
            return TransitionKind::Unchanged;
        }
        self.set_status(WorkStatus::InProgress, now)
    }
}

/// Work status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Internal review
    InReview,
    /// Waiting on client feedback
    WaitingClient,
    /// Put on hold
    Paused,
    /// Delivered
    Done,
}

impl WorkStatus {
    /// Every status, in lifecycle order with `Paused` before `Done`.
    pub const ALL: [WorkStatus; 6] = [
        WorkStatus::Todo,
        WorkStatus::InProgress,
        WorkStatus::InReview,
        WorkStatus::WaitingClient,
        WorkStatus::Paused,
        WorkStatus::Done,
    ];

    /// `Done` is the only terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkStatus::Done)
    }

    /// Statuses listed in the dashboard review queue.
    pub fn is_awaiting_review(self) -> bool {
        matches!(self, WorkStatus::InReview | WorkStatus::WaitingClient)
    }

    /// Position on the linear path; `Paused` sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            WorkStatus::Todo => Some(0),
            WorkStatus::InProgress => Some(1),
            WorkStatus::InReview => Some(2),
            WorkStatus::WaitingClient => Some(3),
            WorkStatus::Done => Some(4),
            WorkStatus::Paused => None,
        }
    }

    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::Todo => "TODO",
            WorkStatus::InProgress => "IN_PROGRESS",
            WorkStatus::InReview => "IN_REVIEW",
            WorkStatus::WaitingClient => "WAITING_CLIENT",
            WorkStatus::Paused => "PAUSED",
            WorkStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        WorkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| CoreError::invalid("status", s))
    }
}

/// How a status change relates to the linear lifecycle.
///
/// Informational only: no kind is ever rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Same status requested
    Unchanged,
    /// Later on the linear path (skips allowed)
    Forward,
    /// Earlier on the linear path
    Backward,
    /// Into `Paused`
    Pause,
    /// Out of `Paused`
    Resume,
    /// Into `Done`
    Complete,
    /// Out of `Done`
    Reopen,
}

impl TransitionKind {
    /// Classify the change from `from` to `to`.
    pub fn between(from: WorkStatus, to: WorkStatus) -> Self {
        if from == to {
            return Self::Unchanged;
        }
        if to.is_terminal() {
            return Self::Complete;
        }
        if from.is_terminal() {
            return Self::Reopen;
        }
        if to == WorkStatus::Paused {
            return Self::Pause;
        }
        if from == WorkStatus::Paused {
            return Self::Resume;
        }
        match (from.rank(), to.rank()) {
            (Some(a), Some(b)) if b < a => Self::Backward,
            _ => Self::Forward,
        }
    }
}

/// Filter for querying works.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkFilter {
    /// Filter by status
    pub status: Option<Vec<WorkStatus>>,

    /// Filter by assignee
    pub assigned_to: Option<UserId>,

    /// Filter by client
    pub client_id: Option<ClientId>,
}

impl WorkFilter {
    /// Whether `work` passes the filter.
    pub fn matches(&self, work: &Work) -> bool {
        self.status.as_ref().map_or(true, |s| s.contains(&work.status))
            && self.assigned_to.map_or(true, |u| work.assigned_to == Some(u))
            && self.client_id.map_or(true, |c| work.client_id == c)
    }
}

/// Resolve a requested status change.
///
/// Operators may correct a status freely, so every request is honoured and
/// the requested status is returned as is.
pub fn transition_work_status(current: WorkStatus, requested: WorkStatus) -> WorkStatus {
    let kind = TransitionKind::between(current, requested);
    if !matches!(kind, TransitionKind::Unchanged | TransitionKind::Forward) {
        debug!("Work status {} -> {} ({:?})", current, requested, kind);
    }
    requested
}
