//! Team dashboard: work counts, capacity and deadline previews.

use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use tracing::debug;
use agencyops_core::{Category, CategoryId, ClientId, CoreError, Time, UserId, Work, WorkId, WorkStatus};
use crate::capacity::{compute_capacity, team_load, CapacitySnapshot};
use crate::deadline::{DeadlineBucket, DeadlineClassifier};

/// Label for works whose category is not in the directory.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Work count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category name
    pub name: String,
    /// Works in the category
    pub count: usize,
}

/// Work count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status
    pub status: WorkStatus,
    /// Works in the status
    pub count: usize,
}

/// Work statistics for the team dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardWorkStats {
    /// Works in scope
    pub total: usize,
    /// Per category name, largest first
    pub by_category: Vec<CategoryCount>,
    /// Per status, in lifecycle order, zeros included
    pub by_status: Vec<StatusCount>,
    /// Non-finished works against the team ceiling
    pub capacity: CapacitySnapshot,
}

impl DashboardWorkStats {
    /// Count for `status`.
    pub fn count_for(&self, status: WorkStatus) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }
}

/// Aggregate the dashboard work statistics.
pub fn aggregate_dashboard(
    works: &[Work],
    categories: &[Category],
    max_capacity: i64,
) -> Result<DashboardWorkStats, CoreError> {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for work in works {
        let name = names.get(&work.category_id).copied().unwrap_or(UNCATEGORIZED);
        *per_category.entry(name).or_default() += 1;
    }
    let mut by_category: Vec<CategoryCount> = per_category
        .into_iter()
        .map(|(name, count)| CategoryCount { name: name.to_string(), count })
        .collect();
    // BTreeMap order is by name; stable sort keeps it for equal counts
    by_category.sort_by(|a, b| b.count.cmp(&a.count));

    let by_status = WorkStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: works.iter().filter(|w| w.status == status).count(),
        })
        .collect();

    let capacity = compute_capacity(max_capacity, team_load(works))?;

    Ok(DashboardWorkStats {
        total: works.len(),
        by_category,
        by_status,
        capacity,
    })
}

/// One work shown in a deadline preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineEntry {
    /// Work id
    pub work_id: WorkId,
    /// Work title
    pub title: String,
    /// Owning client
    pub client_id: ClientId,
    /// Assignee
    pub assigned_to: Option<UserId>,
    /// Current status
    pub status: WorkStatus,
    /// Deadline
    pub deadline: Option<Time>,
    /// Bucket at aggregation time
    pub bucket: DeadlineBucket,
}

/// A capped preview list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineList {
    /// Entries, at most the preview limit
    pub entries: Vec<DeadlineEntry>,
    /// Matches before capping
    pub total: usize,
}

impl DeadlineList {
    fn capped(mut entries: Vec<DeadlineEntry>, limit: usize) -> Self {
        let total = entries.len();
        entries.truncate(limit);
        Self { entries, total }
    }

    /// Number of entries shown.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is in the shown entries.
    pub fn contains(&self, id: WorkId) -> bool {
        self.entries.iter().any(|e| e.work_id == id)
    }
}

/// The three dashboard deadline previews.
///
/// The review list is independent of the deadline buckets, so a work can
/// appear in it and in one of the other two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDeadlines {
    /// Due within the window
    pub works_in_deadline: DeadlineList,
    /// Past their deadline
    pub expired_works: DeadlineList,
    /// In review or waiting on the client
    pub in_review_works: DeadlineList,
}

/// Build the deadline previews over the non-finished works in `works`.
pub fn collect_deadline_lists(
    works: &[Work],
    now: Time,
    classifier: &DeadlineClassifier,
    limit: usize,
) -> DashboardDeadlines {
    let mut due_soon = Vec::new();
    let mut expired = Vec::new();
    let mut in_review = Vec::new();

    for work in works.iter().filter(|w| !w.is_terminal()) {
        let bucket = classifier.classify_work(now, work);
        let entry = DeadlineEntry {
            work_id: work.id,
            title: work.title.clone(),
            client_id: work.client_id,
            assigned_to: work.assigned_to,
            status: work.status,
            deadline: work.deadline,
            bucket,
        };
        match bucket {
            DeadlineBucket::DueSoon => due_soon.push(entry.clone()),
            DeadlineBucket::Overdue => expired.push(entry.clone()),
            DeadlineBucket::Normal | DeadlineBucket::None => {}
        }
        if work.status.is_awaiting_review() {
            in_review.push(entry);
        }
    }

    // Every entry in these two lists has a deadline
    due_soon.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    expired.sort_by(|a, b| a.deadline.cmp(&b.deadline));
    // Works without a deadline go last
    in_review.sort_by(|a, b| match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    debug!(
        "Deadline lists: {} due soon, {} expired, {} in review",
        due_soon.len(),
        expired.len(),
        in_review.len()
    );

    DashboardDeadlines {
        works_in_deadline: DeadlineList::capped(due_soon, limit),
        expired_works: DeadlineList::capped(expired, limit),
        in_review_works: DeadlineList::capped(in_review, limit),
    }
}
