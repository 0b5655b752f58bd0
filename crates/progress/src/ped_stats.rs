//! Editorial plan statistics for the dashboard.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use agencyops_core::{CoreError, PedItem, PedStatus};
use crate::capacity::{compute_capacity, CapacitySnapshot};

/// One bar of the per-type chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBar {
    /// Content type
    #[serde(rename = "type")]
    pub content_type: String,
    /// Items of this type
    pub count: usize,
    /// Width relative to the largest type, in percent
    pub width_pct: u32,
}

/// Item count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedStatusCount {
    /// Status
    pub status: PedStatus,
    /// Items in the status
    pub count: usize,
}

/// Plan statistics for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTaskStats {
    /// Period label
    pub period_label: String,
    /// Items in the period
    pub total: usize,
    /// Per content type, largest first
    pub by_type: Vec<TypeBar>,
    /// Per status
    pub by_status: Vec<PedStatusCount>,
    /// Items that were planned
    pub planned: usize,
    /// Ad-hoc additions
    pub extra: usize,
    /// Urgent items
    pub urgent: usize,
    /// Planned items against the plan ceiling, when one is configured
    pub capacity: Option<CapacitySnapshot>,
}

impl DashboardTaskStats {
    /// Attach a capacity block measuring planned items against `max`.
    ///
    /// Extra items sit outside planned capacity and are not counted.
    pub fn with_capacity(mut self, max: i64) -> Result<Self, CoreError> {
        self.capacity = Some(compute_capacity(max, self.planned as i64)?);
        Ok(self)
    }
}

/// Width of a bar for `count` when the largest bar holds `max_count`.
///
/// Any nonzero count gets at least `min_width_pct`.
pub fn bar_width_pct(count: usize, max_count: usize, min_width_pct: u32) -> u32 {
    if count == 0 || max_count == 0 {
        return 0;
    }
    let count = count.min(max_count) as u64;
    let width = ((200 * count + max_count as u64) / (2 * max_count as u64)) as u32;
    width.max(min_width_pct).min(100)
}

/// Aggregate plan items already scoped to one period.
pub fn aggregate_ped_stats(items: &[PedItem], period_label: &str, min_bar_width_pct: u32) -> DashboardTaskStats {
    let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *per_type.entry(item.content_type.as_str()).or_default() += 1;
    }
    let max_count = per_type.values().copied().max().unwrap_or(0);

    let mut by_type: Vec<TypeBar> = per_type
        .into_iter()
        .map(|(content_type, count)| TypeBar {
            content_type: content_type.to_string(),
            count,
            width_pct: bar_width_pct(count, max_count, min_bar_width_pct),
        })
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count));

    let by_status = [PedStatus::Todo, PedStatus::InProgress, PedStatus::Done]
        .into_iter()
        .map(|status| PedStatusCount {
            status,
            count: items.iter().filter(|i| i.status == status).count(),
        })
        .collect();

    let extra = items.iter().filter(|i| i.is_extra).count();

    DashboardTaskStats {
        period_label: period_label.to_string(),
        total: items.len(),
        by_type,
        by_status,
        planned: items.len() - extra,
        extra,
        urgent: items.iter().filter(|i| i.is_urgent()).count(),
        capacity: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agencyops_core::{ClientId, PedPriority, UserId};
    use chrono::NaiveDate;

    fn create_test_item(content_type: &str) -> PedItem {
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        PedItem::new(UserId::new(), UserId::new(), ClientId::new(), date, content_type, 0)
    }

    #[test]
    fn test_empty_period() {
        let stats = aggregate_ped_stats(&[], "2026-03", 5);
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
        assert_eq!(stats.planned, 0);
        assert!(stats.capacity.is_none());
    }

    #[test]
    fn test_bar_widths_relative_to_largest() {
        let mut items = Vec::new();
        items.extend((0..20).map(|_| create_test_item("post")));
        items.extend((0..10).map(|_| create_test_item("reel")));
        items.push(create_test_item("newsletter"));

        let stats = aggregate_ped_stats(&items, "2026-03", 5);
        assert_eq!(stats.total, 31);
        let widths: Vec<(&str, u32)> = stats
            .by_type
            .iter()
            .map(|b| (b.content_type.as_str(), b.width_pct))
            .collect();
        assert_eq!(widths, vec![("post", 100), ("reel", 50), ("newsletter", 5)]);
    }

    #[test]
    fn test_min_width_applies_only_to_nonzero() {
        assert_eq!(bar_width_pct(0, 10, 5), 0);
        assert_eq!(bar_width_pct(1, 100, 5), 5);
        assert_eq!(bar_width_pct(10, 10, 5), 100);
    }

    #[test]
    fn test_extra_and_urgent_counts() {
        let mut extra = create_test_item("post");
        extra.is_extra = true;
        let mut urgent = create_test_item("post");
        urgent.priority = PedPriority::Urgent;
        let mut done = create_test_item("reel");
        done.set_status(PedStatus::Done);

        let stats = aggregate_ped_stats(&[extra, urgent, done], "Week of 2026-03-02", 5);
        assert_eq!(stats.planned, 2);
        assert_eq!(stats.extra, 1);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.by_status[2], PedStatusCount { status: PedStatus::Done, count: 1 });
    }

    #[test]
    fn test_capacity_counts_planned_items() {
        let mut extra = create_test_item("post");
        extra.is_extra = true;
        let items = vec![create_test_item("post"), create_test_item("post"), extra];

        let stats = aggregate_ped_stats(&items, "2026-03", 5).with_capacity(2).unwrap();
        let capacity = stats.capacity.unwrap();
        assert_eq!(capacity.current, 2);
        assert!(!capacity.is_overloaded);
    }
}
