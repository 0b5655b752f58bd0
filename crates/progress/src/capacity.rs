//! Capacity model: load against a configured ceiling.

use serde::{Deserialize, Serialize};
use agencyops_core::{CoreError, Work};

/// Load and saturation for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    /// Configured ceiling
    pub max: u64,
    /// Current load
    pub current: u64,
    /// `current / max` as a rounded percentage, 0 when `max` is 0
    pub saturation_pct: u64,
    /// `current > max`
    pub is_overloaded: bool,
}

impl CapacitySnapshot {
    /// Load left before reaching the ceiling.
    pub fn remaining(&self) -> u64 {
        self.max.saturating_sub(self.current)
    }
}

/// Compute the capacity snapshot for `current_load` against `max_capacity`.
///
/// Negative inputs are rejected. Being exactly at capacity is not overloaded.
pub fn compute_capacity(max_capacity: i64, current_load: i64) -> Result<CapacitySnapshot, CoreError> {
    let max = u64::try_from(max_capacity).map_err(|_| CoreError::invalid("max_capacity", max_capacity))?;
    let current = u64::try_from(current_load).map_err(|_| CoreError::invalid("current_load", current_load))?;

    let saturation_pct = if max == 0 {
        0
    } else {
        // round half up
        let pct = (200 * u128::from(current) + u128::from(max)) / (2 * u128::from(max));
        u64::try_from(pct).unwrap_or(u64::MAX)
    };

    Ok(CapacitySnapshot {
        max,
        current,
        saturation_pct,
        is_overloaded: current > max,
    })
}

/// Team load: works in scope that are not finished.
pub fn team_load(works: &[Work]) -> i64 {
    works.iter().filter(|w| !w.is_terminal()).count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use agencyops_core::{CategoryId, ClientId, WorkStatus};

    #[test]
    fn test_zero_max_never_divides() {
        let snapshot = compute_capacity(0, 5).unwrap();
        assert_eq!(snapshot.saturation_pct, 0);
        assert!(snapshot.is_overloaded);
    }

    #[test]
    fn test_exactly_at_capacity_is_not_overloaded() {
        let snapshot = compute_capacity(40, 40).unwrap();
        assert_eq!(snapshot.saturation_pct, 100);
        assert!(!snapshot.is_overloaded);
        assert_eq!(snapshot.remaining(), 0);
    }

    #[test]
    fn test_one_over_is_overloaded() {
        assert!(compute_capacity(40, 41).unwrap().is_overloaded);
    }

    #[test]
    fn test_saturation_above_hundred() {
        let snapshot = compute_capacity(40, 44).unwrap();
        assert_eq!(snapshot.saturation_pct, 110);
        assert!(snapshot.is_overloaded);
    }

    #[test]
    fn test_saturation_rounds_half_up() {
        assert_eq!(compute_capacity(3, 1).unwrap().saturation_pct, 33);
        assert_eq!(compute_capacity(3, 2).unwrap().saturation_pct, 67);
        assert_eq!(compute_capacity(200, 1).unwrap().saturation_pct, 1);
    }

    #[test]
    fn test_empty_scope() {
        let snapshot = compute_capacity(40, 0).unwrap();
        assert_eq!(snapshot.saturation_pct, 0);
        assert!(!snapshot.is_overloaded);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(compute_capacity(-1, 0), Err(CoreError::InvalidInput { .. })));
        assert!(matches!(compute_capacity(10, -3), Err(CoreError::InvalidInput { .. })));
    }

    #[test]
    fn test_team_load_skips_done() {
        let client = ClientId::new();
        let category = CategoryId::new();
        let works = vec![
            Work::new("a", client, category),
            Work::new("b", client, category).with_status(WorkStatus::Paused),
            Work::new("c", client, category).with_status(WorkStatus::Done),
        ];
        assert_eq!(team_load(&works), 2);
    }
}
