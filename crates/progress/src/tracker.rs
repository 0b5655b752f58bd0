//! Dashboard tracking service.

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info};
use agencyops_core::{PedFilter, PedScope, Time, UserId, WorkFilter};
use agencyops_storage::Storage;
use crate::config::EngineConfig;
use crate::engine::{AggregationEngine, DashboardView};
use crate::period::PlanPeriod;
use crate::ped_stats::DashboardTaskStats;
use crate::weekly_load::{aggregate_weekly_load, group_ped_items, group_works_by_assignee, WeeklyLoadOverview, WeeklyLoadRow};
use crate::Result;

/// Dashboard tracking service.
#[async_trait]
pub trait DashboardTracker: Send + Sync {
    /// Team dashboard for all works.
    async fn dashboard(&self, now: Time) -> Result<DashboardView>;

    /// Plan statistics for a period.
    async fn ped_stats(&self, period: &PlanPeriod) -> Result<DashboardTaskStats>;

    /// Weekly load for every team member, rows ordered by member name.
    async fn weekly_load(&self, now: Time, scope: PedScope) -> Result<WeeklyLoadOverview>;

    /// Weekly load for one user.
    async fn user_load(&self, user: UserId, now: Time, scope: PedScope) -> Result<WeeklyLoadRow>;
}

/// Tracker that reads complete row sets from a [`Storage`].
///
/// A listing failure aborts the request; the engine never sees partial rows.
pub struct StorageDashboardTracker<S: Storage> {
    storage: Arc<S>,
    engine: AggregationEngine,
}

impl<S: Storage> StorageDashboardTracker<S> {
    /// Create a tracker over `storage`.
    pub fn new(storage: S, config: EngineConfig) -> Self {
        Self::with_shared(Arc::new(storage), config)
    }

    /// Create a tracker over storage shared with other services.
    pub fn with_shared(storage: Arc<S>, config: EngineConfig) -> Self {
        Self {
            storage,
            engine: AggregationEngine::new(config),
        }
    }

    /// The engine used for aggregation.
    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }
}

#[async_trait]
impl<S: Storage + 'static> DashboardTracker for StorageDashboardTracker<S> {
    async fn dashboard(&self, now: Time) -> Result<DashboardView> {
        let works = self.storage.list_works(&WorkFilter::default()).await?;
        let categories = self.storage.list_categories().await?;
        info!("Building dashboard over {} works", works.len());
        self.engine.dashboard(&works, &categories, now)
    }

    async fn ped_stats(&self, period: &PlanPeriod) -> Result<DashboardTaskStats> {
        let items = self.storage.list_ped_items(&period.filter()).await?;
        debug!("Plan stats for {}: {} items", period.label, items.len());
        self.engine.ped_stats(&items, period)
    }

    async fn weekly_load(&self, now: Time, scope: PedScope) -> Result<WeeklyLoadOverview> {
        let week = PlanPeriod::current_week(now);
        let mut members = self.storage.list_members().await?;
        // Storage order is arbitrary; rows are listed by name
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        let works = self.storage.list_works(&WorkFilter::default()).await?;
        let items = self.storage.list_ped_items(&week.filter()).await?;
        Ok(self.engine.weekly_load(&members, &works, &items, now, scope))
    }

    async fn user_load(&self, user: UserId, now: Time, scope: PedScope) -> Result<WeeklyLoadRow> {
        let week = PlanPeriod::current_week(now);
        let works = self
            .storage
            .list_works(&WorkFilter {
                assigned_to: Some(user),
                ..Default::default()
            })
            .await?;
        let items = self
            .storage
            .list_ped_items(&PedFilter {
                user: Some(user),
                scope,
                ..week.filter()
            })
            .await?;

        let name = self
            .storage
            .list_members()
            .await?
            .into_iter()
            .find(|m| m.id == user)
            .map(|m| m.name)
            .unwrap_or_else(|| user.to_string());

        let overview = aggregate_weekly_load(
            &[],
            &group_works_by_assignee(&works),
            &group_ped_items(&items, scope),
            &week,
        );
        let row = overview
            .row_for(user)
            .map(|r| WeeklyLoadRow::new(user, name.clone(), r.task_count, r.work_count))
            .unwrap_or_else(|| WeeklyLoadRow::new(user, name, 0, 0));
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agencyops_core::{Category, ClientId, PedItem, TeamMember, Work, WorkStatus};
    use agencyops_storage::JsonStorage;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn now() -> Time {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
    }

    async fn seeded_storage(dir: &std::path::Path) -> (JsonStorage, TeamMember) {
        let mut storage = JsonStorage::new(dir).await.unwrap();
        let ada = TeamMember::new("Ada");
        let social = Category::new("Social");
        storage.save_member(&ada).await.unwrap();
        storage.save_category(&social).await.unwrap();

        let due = Work::new("Launch", ClientId::new(), social.id)
            .with_assignee(ada.id)
            .with_deadline(now() + Duration::days(2));
        let late = Work::new("Report", ClientId::new(), social.id)
            .with_assignee(ada.id)
            .with_deadline(now() - Duration::days(1));
        let done = Work::new("Old", ClientId::new(), social.id).with_status(WorkStatus::Done);
        for work in [due, late, done] {
            storage.save_work(&work).await.unwrap();
        }

        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        storage
            .save_ped_item(&PedItem::new(UserId::new(), ada.id, ClientId::new(), date, "post", 0))
            .await
            .unwrap();
        storage
            .save_ped_item(&PedItem::new(UserId::new(), ada.id, ClientId::new(), date + Duration::days(30), "post", 0))
            .await
            .unwrap();
        (storage, ada)
    }

    #[tokio::test]
    async fn test_dashboard_from_storage() {
        let dir = tempfile::tempdir().unwrap();
        let (storage, _) = seeded_storage(dir.path()).await;
        let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());

        let view = tracker.dashboard(now()).await.unwrap();
        assert_eq!(view.stats.total, 3);
        assert_eq!(view.stats.capacity.current, 2);
        assert_eq!(view.deadlines.works_in_deadline.len(), 1);
        assert_eq!(view.deadlines.expired_works.len(), 1);
    }

    #[tokio::test]
    async fn test_ped_stats_scoped_to_period() {
        let dir = tempfile::tempdir().unwrap();
        let (storage, _) = seeded_storage(dir.path()).await;
        let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());

        let stats = tracker.ped_stats(&PlanPeriod::current_week(now())).await.unwrap();
        assert_eq!(stats.total, 1);
    }

    #[tokio::test]
    async fn test_weekly_and_user_load_agree() {
        let dir = tempfile::tempdir().unwrap();
        let (storage, ada) = seeded_storage(dir.path()).await;
        let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());

        let overview = tracker.weekly_load(now(), PedScope::Assignee).await.unwrap();
        let row = tracker.user_load(ada.id, now(), PedScope::Assignee).await.unwrap();
        assert_eq!(overview.row_for(ada.id), Some(&row));
        assert_eq!(row.user_name, "Ada");
        // Launch is due this week; Report was due on the 3rd, also this week
        assert_eq!(row.work_count, 2);
        assert_eq!(row.task_count, 1);
    }

    #[tokio::test]
    async fn test_weekly_rows_ordered_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        for name in ["Linus", "Ada", "Grace", "Barbara"] {
            storage.save_member(&TeamMember::new(name)).await.unwrap();
        }
        let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());

        let overview = tracker.weekly_load(now(), PedScope::Assignee).await.unwrap();
        let names: Vec<&str> = overview.rows.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Barbara", "Grace", "Linus"]);
    }

    #[tokio::test]
    async fn test_user_without_rows_gets_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let tracker = StorageDashboardTracker::new(storage, EngineConfig::default());

        let user = UserId::new();
        let row = tracker.user_load(user, now(), PedScope::Owner).await.unwrap();
        assert_eq!(row.total, 0);
        assert_eq!(row.user_name, user.to_string());
    }
}
