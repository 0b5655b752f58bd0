//! Calendar periods used to scope plan items and weekly load.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use agencyops_core::{PedFilter, Time};

/// A half-open range of plan days `[start, end)` with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPeriod {
    /// Display label
    pub label: String,
    /// First day included
    pub start: NaiveDate,
    /// First day excluded
    pub end: NaiveDate,
}

impl PlanPeriod {
    /// The ISO week (Monday to Sunday) containing `date`.
    pub fn week_containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self {
            label: format!("Week of {}", start.format("%Y-%m-%d")),
            start,
            end: start + Duration::days(7),
        }
    }

    /// The week containing the UTC day of `now`.
    pub fn current_week(now: Time) -> Self {
        Self::week_containing(now.date_naive())
    }

    /// The calendar month containing `date`.
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        }
        .unwrap_or(start + Duration::days(31));
        Self {
            label: start.format("%Y-%m").to_string(),
            start,
            end,
        }
    }

    /// Whether `date` falls in the period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Whether the UTC day of `instant` falls in the period.
    pub fn contains_instant(&self, instant: Time) -> bool {
        self.contains_date(instant.date_naive())
    }

    /// A plan item filter selecting this period.
    pub fn filter(&self) -> PedFilter {
        PedFilter {
            from: Some(self.start),
            until: Some(self.end),
            ..Default::default()
        }
    }
}
