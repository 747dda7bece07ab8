//! Day-interval overlap and week-bucket arithmetic.
//!
//! All intervals in the engine are inclusive on both ends: a blackout from
//! Monday to Monday is one day, not zero.

use crate::time::Day;

/// Number of calendar days shared by two inclusive day ranges.
pub fn overlap_days(a_start: Day, a_end: Day, b_start: Day, b_end: Day) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    start.days_until(end) + 1
}

/// Clamped variant of [`overlap_days`]: disjoint ranges count zero.
pub fn overlap_days_clamped(a_start: Day, a_end: Day, b_start: Day, b_end: Day) -> i64 {
    overlap_days(a_start, a_end, b_start, b_end).max(0)
}

/// Monday keys for `horizon_weeks` consecutive weeks starting at the week
/// containing `reference`.
pub fn week_starts(reference: Day, horizon_weeks: usize) -> Vec<Day> {
    let monday = reference.week_start();
    (0..horizon_weeks)
        .map(|i| monday.add_days(7 * i as i64))
        .collect()
}
