//! Manual sort order within a scope.
//!
//! Items are appended at the end of their scope (steps per work, todos per
//! user, plan items per day and assignee). Gaps left by deletions are kept.

use crate::Time;

/// Rows that carry a manual position within their scope.
pub trait Sequenced {
    /// Position within the scope
    fn sort_order(&self) -> i64;

    /// Whether the row is completed (completed rows display last)
    fn is_completed(&self) -> bool;

    /// Creation timestamp, the final tie-breaker
    fn created_at(&self) -> Time;
}

/// Sort order for a row appended after `existing_max`.
///
/// Saturates at `i64::MAX`; display order then falls back to `created_at`.
pub fn next_sort_order(existing_max: Option<i64>) -> i64 {
    match existing_max {
        Some(max) => max.saturating_add(1),
        None => 0,
    }
}

/// Sort order for a row appended to `scope`.
pub fn next_sort_order_in<'a, T, I>(scope: I) -> i64
where
    T: Sequenced + 'a,
    I: IntoIterator<Item = &'a T>,
{
    next_sort_order(scope.into_iter().map(Sequenced::sort_order).max())
}

/// Order rows for display: open before completed, then by sort order, then
/// by creation time.
pub fn sort_for_display<T: Sequenced>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        a.is_completed()
            .cmp(&b.is_completed())
            .then_with(|| a.sort_order().cmp(&b.sort_order()))
            .then_with(|| a.created_at().cmp(&b.created_at()))
    });
}
