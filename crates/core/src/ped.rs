//! Editorial plan (PED) items - content scheduled on a specific day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{ClientId, PedItemId, UserId};
use crate::ordering::Sequenced;
use crate::{CoreError, Time};

/// An entry of the editorial plan.
///
/// `owner_id` is who planned the item and `assigned_to` who executes it;
/// the two are independent and aggregations pick one or the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedItem {
    /// Unique identifier
    pub id: PedItemId,

    /// Planner
    pub owner_id: UserId,

    /// Executor
    pub assigned_to: UserId,

    /// Client the content is for
    pub client_id: ClientId,

    /// Short description
    #[serde(default)]
    pub title: String,

    /// Plan day
    pub date: NaiveDate,

    /// Content or task
    pub kind: PedKind,

    /// Content category (post, reel, newsletter, ...)
    #[serde(rename = "type")]
    pub content_type: String,

    /// Priority
    pub priority: PedPriority,

    /// Current status
    pub status: PedStatus,

    /// Ad-hoc addition outside planned capacity
    #[serde(default)]
    pub is_extra: bool,

    /// Position within the (date, assignee) scope
    pub sort_order: i64,

    /// Creation timestamp
    pub created_at: Time,
}

impl PedItem {
    /// Create a planned, non-urgent content item.
    pub fn new(
        owner_id: UserId,
        assigned_to: UserId,
        client_id: ClientId,
        date: NaiveDate,
        content_type: impl Into<String>,
        sort_order: i64,
    ) -> Self {
        Self {
            id: PedItemId::new(),
            owner_id,
            assigned_to,
            client_id,
            title: String::new(),
            date,
            kind: PedKind::Content,
            content_type: content_type.into(),
            priority: PedPriority::NotUrgent,
            status: PedStatus::Todo,
            is_extra: false,
            sort_order,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether the item has been delivered.
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the item is urgent.
    pub fn is_urgent(&self) -> bool {
        self.priority == PedPriority::Urgent
    }

    /// Change the status. Any target is accepted.
    pub fn set_status(&mut self, status: PedStatus) {
        self.status = status;
    }
}

impl Sequenced for PedItem {
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

/// Which user relation of a plan item defines its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PedScope {
    /// Select by executor
    #[default]
    Assignee,
    /// Select by planner
    Owner,
}

impl PedScope {
    /// The user an item belongs to under this scope.
    pub fn user_of(self, item: &PedItem) -> UserId {
        match self {
            PedScope::Assignee => item.assigned_to,
            PedScope::Owner => item.owner_id,
        }
    }
}

/// Filter for querying plan items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PedFilter {
    /// First plan day included
    pub from: Option<NaiveDate>,

    /// First plan day excluded
    pub until: Option<NaiveDate>,

    /// Restrict to one user under `scope`
    pub user: Option<UserId>,

    /// Relation `user` is matched against
    #[serde(default)]
    pub scope: PedScope,

    /// Filter by client
    pub client_id: Option<ClientId>,
}

impl PedFilter {
    /// Whether `item` passes the filter.
    pub fn matches(&self, item: &PedItem) -> bool {
        self.from.map_or(true, |d| item.date >= d)
            && self.until.map_or(true, |d| item.date < d)
            && self.user.map_or(true, |u| self.scope.user_of(item) == u)
            && self.client_id.map_or(true, |c| item.client_id == c)
    }
}

/// Kind of plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PedKind {
    /// Publishable content
    Content,
    /// Supporting task
    Task,
}

/// Plan entry priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PedPriority {
    /// Must be handled first
    Urgent,
    /// Regular
    NotUrgent,
}

/// Plan entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PedStatus {
    /// Planned
    Todo,
    /// Being produced
    InProgress,
    /// Delivered
    Done,
}

impl PedStatus {
    /// `Done` is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, PedStatus::Done)
    }

    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PedStatus::Todo => "TODO",
            PedStatus::InProgress => "IN_PROGRESS",
            PedStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for PedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PedStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "TODO" => Ok(PedStatus::Todo),
            "IN_PROGRESS" => Ok(PedStatus::InProgress),
            "DONE" => Ok(PedStatus::Done),
            _ => Err(CoreError::invalid("ped status", s)),
        }
    }
}

impl std::str::FromStr for PedKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(PedKind::Content),
            "task" => Ok(PedKind::Task),
            _ => Err(CoreError::invalid("ped kind", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_and_assignee_stay_separate() {
        let owner = UserId::new();
        let assignee = UserId::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let item = PedItem::new(owner, assignee, ClientId::new(), date, "reel", 0);
        assert_eq!(item.owner_id, owner);
        assert_eq!(item.assigned_to, assignee);
    }

    #[test]
    fn test_type_field_serialized_as_type() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let item = PedItem::new(UserId::new(), UserId::new(), ClientId::new(), date, "post", 1);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "post");
        assert_eq!(json["priority"], "NOT_URGENT");
    }

    #[test]
    fn test_filter_by_owner_or_assignee() {
        let owner = UserId::new();
        let assignee = UserId::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let item = PedItem::new(owner, assignee, ClientId::new(), date, "post", 0);

        let by_assignee = PedFilter { user: Some(assignee), ..Default::default() };
        assert!(by_assignee.matches(&item));
        let owner_as_assignee = PedFilter { user: Some(owner), ..Default::default() };
        assert!(!owner_as_assignee.matches(&item));
        let by_owner = PedFilter { user: Some(owner), scope: PedScope::Owner, ..Default::default() };
        assert!(by_owner.matches(&item));
    }

    #[test]
    fn test_filter_date_range_is_half_open() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let item = PedItem::new(UserId::new(), UserId::new(), ClientId::new(), date, "post", 0);

        let filter = PedFilter { from: Some(date), until: date.succ_opt(), ..Default::default() };
        assert!(filter.matches(&item));
        let ends_on_day = PedFilter { until: Some(date), ..Default::default() };
        assert!(!ends_on_day.matches(&item));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("in progress".parse::<PedStatus>().unwrap(), PedStatus::InProgress);
        assert!("later".parse::<PedStatus>().is_err());
        assert_eq!("TASK".parse::<PedKind>().unwrap(), PedKind::Task);
    }
}
