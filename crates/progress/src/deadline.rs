//! Deadline window classification.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use agencyops_core::{Time, Work};

/// Look-ahead of the due-soon window, in days.
pub const DEADLINE_DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Largest accepted due-soon window, in days.
pub const MAX_DUE_SOON_WINDOW_DAYS: i64 = 36_500;

/// Where a deadline falls relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineBucket {
    /// No deadline, or the item is finished
    None,
    /// Deadline already passed
    Overdue,
    /// Deadline within the window (inclusive on both ends)
    DueSoon,
    /// Deadline beyond the window
    Normal,
}

/// Classifies deadlines against a fixed due-soon window.
///
/// Dashboards and per-user views share one instance so the boundary is the
/// same everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineClassifier {
    window: Duration,
}

impl DeadlineClassifier {
    /// Create a classifier with the given window.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Create a classifier with a window of `days`, clamped to
    /// [`MAX_DUE_SOON_WINDOW_DAYS`] either way.
    pub fn with_days(days: i64) -> Self {
        let days = days.clamp(-MAX_DUE_SOON_WINDOW_DAYS, MAX_DUE_SOON_WINDOW_DAYS);
        Self::new(Duration::days(days))
    }

    /// The due-soon window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Classify `deadline` at `now`.
    ///
    /// Finished items are never overdue. A deadline equal to `now` is due
    /// soon, not overdue.
    pub fn classify(&self, now: Time, deadline: Option<Time>, status_is_terminal: bool) -> DeadlineBucket {
        let Some(deadline) = deadline else {
            return DeadlineBucket::None;
        };
        if status_is_terminal {
            return DeadlineBucket::None;
        }
        if deadline < now {
            DeadlineBucket::Overdue
        } else if now
            .checked_add_signed(self.window)
            // A window end past the calendar covers every deadline
            .map_or(true, |end| deadline <= end)
        {
            DeadlineBucket::DueSoon
        } else {
            DeadlineBucket::Normal
        }
    }

    /// Classify a work's deadline at `now`.
    pub fn classify_work(&self, now: Time, work: &Work) -> DeadlineBucket {
        self.classify(now, work.deadline, work.is_terminal())
    }
}

impl Default for DeadlineClassifier {
    fn default() -> Self {
        Self::with_days(DEADLINE_DUE_SOON_WINDOW_DAYS)
    }
}

/// Classify with the default seven-day window.
pub fn classify(now: Time, deadline: Option<Time>, status_is_terminal: bool) -> DeadlineBucket {
    DeadlineClassifier::default().classify(now, deadline, status_is_terminal)
}
