//! Engine configuration.
//!
//! Values come from defaults, then an optional JSON file, then `AGENCYOPS_*`
//! environment variables. The result is validated once and passed around
//! explicitly.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::deadline::{DeadlineClassifier, DEADLINE_DUE_SOON_WINDOW_DAYS, MAX_DUE_SOON_WINDOW_DAYS};
use crate::{ProgressError, Result};

/// Default global ceiling for non-finished works.
pub const DEFAULT_MAX_TEAM_CAPACITY: i64 = 40;

/// Default length of the dashboard deadline previews.
pub const DEFAULT_DEADLINE_PREVIEW_LIMIT: usize = 5;

/// Default minimum width of a nonzero bar, in percent.
pub const DEFAULT_MIN_BAR_WIDTH_PCT: u32 = 5;

/// Configuration for the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Due-soon look-ahead in days
    pub due_soon_window_days: i64,

    /// Team-wide ceiling for non-finished works
    pub max_team_capacity: i64,

    /// Ceiling for planned items in a plan period, if tracked
    pub max_ped_capacity: Option<i64>,

    /// Entries shown per dashboard deadline list
    pub deadline_preview_limit: usize,

    /// Minimum rendered width for any nonzero bar
    pub min_bar_width_pct: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            due_soon_window_days: DEADLINE_DUE_SOON_WINDOW_DAYS,
            max_team_capacity: DEFAULT_MAX_TEAM_CAPACITY,
            max_ped_capacity: None,
            deadline_preview_limit: DEFAULT_DEADLINE_PREVIEW_LIMIT,
            min_bar_width_pct: DEFAULT_MIN_BAR_WIDTH_PCT,
        }
    }
}

impl EngineConfig {
    /// Set the team capacity ceiling.
    pub fn with_max_team_capacity(mut self, max: i64) -> Self {
        self.max_team_capacity = max;
        self
    }

    /// Set the plan capacity ceiling.
    pub fn with_max_ped_capacity(mut self, max: i64) -> Self {
        self.max_ped_capacity = Some(max);
        self
    }

    /// Set the due-soon window.
    pub fn with_due_soon_window_days(mut self, days: i64) -> Self {
        self.due_soon_window_days = days;
        self
    }

    /// Set the deadline preview length.
    pub fn with_deadline_preview_limit(mut self, limit: usize) -> Self {
        self.deadline_preview_limit = limit;
        self
    }

    /// Load defaults, overlay `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ProgressError::Config(format!("{}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&raw)
            .map_err(|e| ProgressError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Overlay `AGENCYOPS_*` variables resolved through `lookup`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AGENCYOPS_DUE_SOON_WINDOW_DAYS") {
            self.due_soon_window_days = parse_var("AGENCYOPS_DUE_SOON_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = lookup("AGENCYOPS_MAX_TEAM_CAPACITY") {
            self.max_team_capacity = parse_var("AGENCYOPS_MAX_TEAM_CAPACITY", &v)?;
        }
        if let Some(v) = lookup("AGENCYOPS_MAX_PED_CAPACITY") {
            self.max_ped_capacity = Some(parse_var("AGENCYOPS_MAX_PED_CAPACITY", &v)?);
        }
        if let Some(v) = lookup("AGENCYOPS_DEADLINE_PREVIEW_LIMIT") {
            self.deadline_preview_limit = parse_var("AGENCYOPS_DEADLINE_PREVIEW_LIMIT", &v)?;
        }
        Ok(self)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_DUE_SOON_WINDOW_DAYS).contains(&self.due_soon_window_days) {
            return Err(ProgressError::Config(format!(
                "due_soon_window_days must be between 0 and {}, got {}",
                MAX_DUE_SOON_WINDOW_DAYS, self.due_soon_window_days
            )));
        }
        if self.max_team_capacity < 0 {
            return Err(ProgressError::Config(format!(
                "max_team_capacity must not be negative, got {}",
                self.max_team_capacity
            )));
        }
        if let Some(max) = self.max_ped_capacity.filter(|max| *max < 0) {
            return Err(ProgressError::Config(format!(
                "max_ped_capacity must not be negative, got {}",
                max
            )));
        }
        if self.min_bar_width_pct > 100 {
            return Err(ProgressError::Config(format!(
                "min_bar_width_pct must be at most 100, got {}",
                self.min_bar_width_pct
            )));
        }
        Ok(())
    }

    /// The classifier for this configuration's window.
    pub fn classifier(&self) -> DeadlineClassifier {
        DeadlineClassifier::with_days(self.due_soon_window_days)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ProgressError::Config(format!("{} = {:?} is not a valid number", key, value)))
}
