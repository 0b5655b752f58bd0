//! The aggregation engine.

use serde::{Deserialize, Serialize};
use tracing::debug;
use agencyops_core::{Category, PedItem, PedScope, TeamMember, Time, Work};
use crate::config::EngineConfig;
use crate::dashboard::{aggregate_dashboard, collect_deadline_lists, DashboardDeadlines, DashboardWorkStats};
use crate::deadline::DeadlineClassifier;
use crate::period::PlanPeriod;
use crate::ped_stats::{aggregate_ped_stats, DashboardTaskStats};
use crate::weekly_load::{aggregate_weekly_load, group_ped_items, group_works_by_assignee, WeeklyLoadOverview};
use crate::Result;

/// Everything the team dashboard shows for works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Counts and capacity
    pub stats: DashboardWorkStats,
    /// Deadline previews
    pub deadlines: DashboardDeadlines,
    /// Instant the buckets were computed against
    pub generated_at: Time,
}

/// Turns scoped row sets into dashboard view models.
///
/// Stateless apart from its configuration: the same rows and `now` always
/// give the same view.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    config: EngineConfig,
    classifier: DeadlineClassifier,
}

impl AggregationEngine {
    /// Create an engine for `config`.
    pub fn new(config: EngineConfig) -> Self {
        let classifier = config.classifier();
        Self { config, classifier }
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deadline classifier in use.
    pub fn classifier(&self) -> &DeadlineClassifier {
        &self.classifier
    }

    /// Work statistics and deadline previews.
    pub fn dashboard(&self, works: &[Work], categories: &[Category], now: Time) -> Result<DashboardView> {
        let stats = aggregate_dashboard(works, categories, self.config.max_team_capacity)?;
        let deadlines = collect_deadline_lists(works, now, &self.classifier, self.config.deadline_preview_limit);
        debug!(
            "Dashboard over {} works: load {}/{}",
            stats.total, stats.capacity.current, stats.capacity.max
        );
        Ok(DashboardView {
            stats,
            deadlines,
            generated_at: now,
        })
    }

    /// Plan statistics for items already scoped to `period`.
    ///
    /// Items outside the period are ignored. A capacity block is attached
    /// when a plan ceiling is configured.
    pub fn ped_stats(&self, items: &[PedItem], period: &PlanPeriod) -> Result<DashboardTaskStats> {
        let in_period: Vec<PedItem> = items
            .iter()
            .filter(|i| period.contains_date(i.date))
            .cloned()
            .collect();
        let stats = aggregate_ped_stats(&in_period, &period.label, self.config.min_bar_width_pct);
        match self.config.max_ped_capacity {
            Some(max) => Ok(stats.with_capacity(max)?),
            None => Ok(stats),
        }
    }

    /// Weekly load for the week containing `now`.
    pub fn weekly_load(
        &self,
        members: &[TeamMember],
        works: &[Work],
        ped_items: &[PedItem],
        now: Time,
        scope: PedScope,
    ) -> WeeklyLoadOverview {
        let week = PlanPeriod::current_week(now);
        aggregate_weekly_load(
            members,
            &group_works_by_assignee(works),
            &group_ped_items(ped_items, scope),
            &week,
        )
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agencyops_core::{CategoryId, ClientId, UserId, WorkStatus};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use crate::ProgressError;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_dashboard_is_repeatable() {
        let engine = AggregationEngine::default();
        let works = vec![
            Work::new("A", ClientId::new(), CategoryId::new()).with_deadline(now() + Duration::days(2)),
            Work::new("B", ClientId::new(), CategoryId::new()).with_deadline(now() - Duration::days(1)),
        ];
        let first = engine.dashboard(&works, &[], now()).unwrap();
        let second = engine.dashboard(&works, &[], now()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.deadlines.works_in_deadline.len(), 1);
        assert_eq!(first.deadlines.expired_works.len(), 1);
    }

    #[test]
    fn test_preview_limit_from_config() {
        let engine = AggregationEngine::new(EngineConfig::default().with_deadline_preview_limit(2));
        let works: Vec<Work> = (1..=4)
            .map(|i| Work::new("W", ClientId::new(), CategoryId::new()).with_deadline(now() + Duration::hours(i)))
            .collect();
        let view = engine.dashboard(&works, &[], now()).unwrap();
        assert_eq!(view.deadlines.works_in_deadline.len(), 2);
        assert_eq!(view.deadlines.works_in_deadline.total, 4);
    }

    #[test]
    fn test_window_from_config() {
        let engine = AggregationEngine::new(EngineConfig::default().with_due_soon_window_days(1));
        let work = Work::new("W", ClientId::new(), CategoryId::new()).with_deadline(now() + Duration::days(3));
        let view = engine.dashboard(&[work], &[], now()).unwrap();
        assert!(view.deadlines.works_in_deadline.is_empty());
    }

    #[test]
    fn test_ped_stats_capacity_is_optional() {
        let period = PlanPeriod::current_week(now());
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let items = vec![
            PedItem::new(UserId::new(), UserId::new(), ClientId::new(), date, "post", 0),
            PedItem::new(UserId::new(), UserId::new(), ClientId::new(), date + Duration::days(14), "post", 0),
        ];

        let plain = AggregationEngine::default().ped_stats(&items, &period).unwrap();
        assert_eq!(plain.total, 1);
        assert!(plain.capacity.is_none());

        let capped = AggregationEngine::new(EngineConfig::default().with_max_ped_capacity(4))
            .ped_stats(&items, &period)
            .unwrap();
        assert_eq!(capped.capacity.unwrap().saturation_pct, 25);
    }

    #[test]
    fn test_negative_ceiling_surfaces_core_error() {
        let engine = AggregationEngine::new(EngineConfig::default().with_max_team_capacity(-1));
        let err = engine.dashboard(&[], &[], now()).unwrap_err();
        assert!(matches!(err, ProgressError::Core(_)));
    }

    #[test]
    fn test_weekly_load_uses_current_week() {
        let ada = TeamMember::new("Ada");
        let works = vec![
            Work::new("W", ClientId::new(), CategoryId::new())
                .with_assignee(ada.id)
                .with_deadline(now() + Duration::days(1)),
            Work::new("Done", ClientId::new(), CategoryId::new())
                .with_assignee(ada.id)
                .with_deadline(now() + Duration::days(1))
                .with_status(WorkStatus::Done),
        ];
        let overview = AggregationEngine::default().weekly_load(&[ada.clone()], &works, &[], now(), PedScope::Assignee);
        assert_eq!(overview.period.start, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(overview.row_for(ada.id).unwrap().work_count, 1);
    }
}
