//! Per-user weekly load.

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;
use agencyops_core::{PedItem, PedScope, TeamMember, UserId, Work};
use crate::period::PlanPeriod;

/// One user's load for a week.
///
/// `total` is always `task_count + work_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLoadRow {
    /// User
    pub user_id: UserId,
    /// Display name
    pub user_name: String,
    /// Plan items plus works
    pub total: usize,
    /// Plan items dated in the week
    pub task_count: usize,
    /// Works due in the week
    pub work_count: usize,
}

impl WeeklyLoadRow {
    /// Build a row; the total is derived.
    pub fn new(user_id: UserId, user_name: impl Into<String>, task_count: usize, work_count: usize) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            total: task_count + work_count,
            task_count,
            work_count,
        }
    }
}

/// The weekly load table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLoadOverview {
    /// Week the rows cover
    pub period: PlanPeriod,
    /// One row per user in scope
    pub rows: Vec<WeeklyLoadRow>,
    /// Largest row total, at least 1; only for relative bar lengths
    pub max_total: usize,
}

impl WeeklyLoadOverview {
    /// Row for `user`.
    pub fn row_for(&self, user: UserId) -> Option<&WeeklyLoadRow> {
        self.rows.iter().find(|r| r.user_id == user)
    }

    /// Bar length for `row` relative to the busiest user, in percent.
    pub fn relative_pct(&self, row: &WeeklyLoadRow) -> u32 {
        ((row.total.min(self.max_total) * 100) / self.max_total) as u32
    }
}

/// Group works by assignee. Unassigned works are left out.
pub fn group_works_by_assignee(works: &[Work]) -> HashMap<UserId, Vec<&Work>> {
    let mut grouped: HashMap<UserId, Vec<&Work>> = HashMap::new();
    for work in works {
        if let Some(user) = work.assigned_to {
            grouped.entry(user).or_default().push(work);
        }
    }
    grouped
}

/// Group plan items by the user relation selected by `scope`.
pub fn group_ped_items(items: &[PedItem], scope: PedScope) -> HashMap<UserId, Vec<&PedItem>> {
    let mut grouped: HashMap<UserId, Vec<&PedItem>> = HashMap::new();
    for item in items {
        grouped.entry(scope.user_of(item)).or_default().push(item);
    }
    grouped
}

/// Build the weekly load table.
///
/// Only open rows count: works that are not finished with a deadline in
/// `week`, and plan items not done dated in `week`. Rows follow `members`
/// order; users present in the groupings but missing from `members` are
/// appended under their id.
pub fn aggregate_weekly_load(
    members: &[TeamMember],
    works_by_user: &HashMap<UserId, Vec<&Work>>,
    ped_by_user: &HashMap<UserId, Vec<&PedItem>>,
    week: &PlanPeriod,
) -> WeeklyLoadOverview {
    let count_works = |user: &UserId| {
        works_by_user.get(user).map_or(0, |works| {
            works
                .iter()
                .filter(|w| !w.is_terminal())
                .filter(|w| w.deadline.is_some_and(|d| week.contains_instant(d)))
                .count()
        })
    };
    let count_tasks = |user: &UserId| {
        ped_by_user.get(user).map_or(0, |items| {
            items
                .iter()
                .filter(|i| !i.is_done() && week.contains_date(i.date))
                .count()
        })
    };

    let mut rows: Vec<WeeklyLoadRow> = members
        .iter()
        .map(|m| WeeklyLoadRow::new(m.id, m.name.clone(), count_tasks(&m.id), count_works(&m.id)))
        .collect();

    let known: HashSet<UserId> = members.iter().map(|m| m.id).collect();
    let mut unknown: Vec<UserId> = works_by_user
        .keys()
        .chain(ped_by_user.keys())
        .filter(|u| !known.contains(u))
        .copied()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    unknown.sort();
    for user in unknown {
        debug!("User {} has load but is not in the member list", user);
        rows.push(WeeklyLoadRow::new(user, user.to_string(), count_tasks(&user), count_works(&user)));
    }

    let max_total = rows.iter().map(|r| r.total).max().unwrap_or(0).max(1);

    WeeklyLoadOverview {
        period: week.clone(),
        rows,
        max_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agencyops_core::{CategoryId, ClientId, PedStatus, WorkStatus};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn week() -> PlanPeriod {
        PlanPeriod::week_containing(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap())
    }

    fn work_due(user: UserId, day: u32) -> Work {
        Work::new("Work", ClientId::new(), CategoryId::new())
            .with_assignee(user)
            .with_deadline(Utc.with_ymd_and_hms(2026, 3, day, 17, 0, 0).unwrap())
    }

    fn item_on(owner: UserId, assignee: UserId, day: u32) -> PedItem {
        let date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        PedItem::new(owner, assignee, ClientId::new(), date, "post", 0)
    }

    #[test]
    fn test_row_total_is_sum() {
        let row = WeeklyLoadRow::new(UserId::new(), "Ada", 3, 4);
        assert_eq!(row.total, 7);
    }

    #[test]
    fn test_counts_only_the_week() {
        let ada = TeamMember::new("Ada");
        let works = vec![
            work_due(ada.id, 2),
            work_due(ada.id, 8),
            work_due(ada.id, 9),
            work_due(ada.id, 5).with_status(WorkStatus::Done),
        ];
        let mut done_item = item_on(UserId::new(), ada.id, 4);
        done_item.set_status(PedStatus::Done);
        let items = vec![item_on(UserId::new(), ada.id, 3), item_on(UserId::new(), ada.id, 1), done_item];

        let overview = aggregate_weekly_load(
            &[ada.clone()],
            &group_works_by_assignee(&works),
            &group_ped_items(&items, PedScope::Assignee),
            &week(),
        );

        let row = overview.row_for(ada.id).unwrap();
        assert_eq!(row.work_count, 2);
        assert_eq!(row.task_count, 1);
        assert_eq!(row.total, row.task_count + row.work_count);
        assert_eq!(overview.max_total, 3);
    }

    #[test]
    fn test_scope_selects_owner_or_assignee() {
        let planner = TeamMember::new("Planner");
        let maker = TeamMember::new("Maker");
        let items = vec![item_on(planner.id, maker.id, 4)];
        let members = [planner.clone(), maker.clone()];

        let by_assignee = aggregate_weekly_load(
            &members,
            &HashMap::new(),
            &group_ped_items(&items, PedScope::Assignee),
            &week(),
        );
        assert_eq!(by_assignee.row_for(maker.id).unwrap().task_count, 1);
        assert_eq!(by_assignee.row_for(planner.id).unwrap().task_count, 0);

        let by_owner = aggregate_weekly_load(
            &members,
            &HashMap::new(),
            &group_ped_items(&items, PedScope::Owner),
            &week(),
        );
        assert_eq!(by_owner.row_for(planner.id).unwrap().task_count, 1);
    }

    #[test]
    fn test_idle_team_has_max_total_one() {
        let members = [TeamMember::new("Ada"), TeamMember::new("Linus")];
        let overview = aggregate_weekly_load(&members, &HashMap::new(), &HashMap::new(), &week());
        assert_eq!(overview.rows.len(), 2);
        assert!(overview.rows.iter().all(|r| r.total == 0));
        assert_eq!(overview.max_total, 1);
        assert_eq!(overview.relative_pct(&overview.rows[0]), 0);
    }

    #[test]
    fn test_unknown_users_are_appended() {
        let stranger = UserId::new();
        let works = vec![work_due(stranger, 4)];
        let overview = aggregate_weekly_load(
            &[TeamMember::new("Ada")],
            &group_works_by_assignee(&works),
            &HashMap::new(),
            &week(),
        );
        assert_eq!(overview.rows.len(), 2);
        assert_eq!(overview.rows[1].user_name, stranger.to_string());
    }

    #[test]
    fn test_totals_hold_for_many_shapes() {
        let members: Vec<TeamMember> = (0..6).map(|i| TeamMember::new(format!("user{}", i))).collect();
        let mut works = Vec::new();
        let mut items = Vec::new();
        for (i, member) in members.iter().enumerate() {
            for d in 0..(i as u32 * 2) {
                works.push(work_due(member.id, 2 + d % 9));
            }
            for d in 0..(i as u32 + 1) {
                items.push(item_on(members[0].id, member.id, 1 + d % 10));
            }
        }
        // An unassigned work never reaches a row
        works.push(
            Work::new("Unassigned", ClientId::new(), CategoryId::new())
                .with_deadline(Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap() + Duration::hours(1)),
        );

        let overview = aggregate_weekly_load(
            &members,
            &group_works_by_assignee(&works),
            &group_ped_items(&items, PedScope::Assignee),
            &week(),
        );
        for row in &overview.rows {
            assert_eq!(row.total, row.task_count + row.work_count);
        }
        assert_eq!(overview.rows.len(), members.len());
    }
}
