//! Human-readable change notices between timeline snapshots.
//!
//! Phases are matched across snapshots by name. Duration changes take
//! priority over moves: a phase that grew and slid reports only the growth.
//! A change event is never silently dropped: when there is nothing to
//! compare against, or the diff comes up empty, a single generic notice is
//! emitted instead.

use crate::core::domain::{Phase, Snapshot};

/// Notice emitted when no specific change can be described.
pub const FALLBACK_NOTICE: &str = "schedule was updated";

fn phase_notice(previous: &Phase, current: &Phase) -> Option<String> {
    if let (Some(prev_duration), Some(curr_duration)) =
        (previous.duration_days(), current.duration_days())
    {
        let delta = curr_duration - prev_duration;
        if delta > 0 {
            return Some(format!(
                "{} was extended by {} day(s)",
                current.name, delta
            ));
        }
        if delta < 0 {
            return Some(format!(
                "{} was shortened by {} day(s)",
                current.name, -delta
            ));
        }
    }

    if let (Some(prev_start), Some(curr_start)) = (previous.start_date, current.start_date) {
        let moved = prev_start.days_until(curr_start);
        if moved > 0 {
            return Some(format!("{} was moved later by {} day(s)", current.name, moved));
        }
        if moved < 0 {
            return Some(format!(
                "{} was moved earlier by {} day(s)",
                current.name, -moved
            ));
        }
    }

    None
}

/// Diff two snapshots into an ordered list of notices.
///
/// Matched phases are reported in current-snapshot order, then additions,
/// then removals in previous-snapshot order.
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<String> {
    let Some(previous) = previous else {
        return vec![FALLBACK_NOTICE.to_string()];
    };

    let mut notices = Vec::new();

    for phase in &current.phases {
        match previous.phases.iter().find(|p| p.name == phase.name) {
            Some(prior) => {
                if let Some(notice) = phase_notice(prior, phase) {
                    notices.push(notice);
                }
            }
            None => notices.push(format!("{} was added to the schedule", phase.name)),
        }
    }

    for phase in &previous.phases {
        if !current.phases.iter().any(|p| p.name == phase.name) {
            notices.push(format!("{} was removed from the schedule", phase.name));
        }
    }

    if notices.is_empty() {
        notices.push(FALLBACK_NOTICE.to_string());
    }
    notices
}
