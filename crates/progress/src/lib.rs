//! Deadline classification, capacity and workload aggregation.
//!
//! Everything below [`tracker`] is a pure function of its inputs: rows go in,
//! read-only view models come out, and calling twice gives the same answer.
//! The tracker loads complete scoped row sets from storage and hands them to
//! the [`AggregationEngine`].

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod deadline;
pub mod capacity;
pub mod period;
pub mod dashboard;
pub mod ped_stats;
pub mod weekly_load;
pub mod engine;
pub mod tracker;

pub use config::EngineConfig;
pub use error::{ProgressError, Result};
pub use deadline::{
    classify, DeadlineBucket, DeadlineClassifier, DEADLINE_DUE_SOON_WINDOW_DAYS,
    MAX_DUE_SOON_WINDOW_DAYS,
};
pub use capacity::{compute_capacity, team_load, CapacitySnapshot};
pub use period::PlanPeriod;
pub use dashboard::{
    aggregate_dashboard, collect_deadline_lists, CategoryCount, DashboardDeadlines,
    DashboardWorkStats, DeadlineEntry, DeadlineList, StatusCount,
};
pub use ped_stats::{aggregate_ped_stats, bar_width_pct, DashboardTaskStats, PedStatusCount, TypeBar};
pub use weekly_load::{
    aggregate_weekly_load, group_ped_items, group_works_by_assignee, WeeklyLoadOverview,
    WeeklyLoadRow,
};
pub use engine::{AggregationEngine, DashboardView};
pub use tracker::{DashboardTracker, StorageDashboardTracker};
