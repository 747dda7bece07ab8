//! Bounded timeline geometry for Gantt rendering.
//!
//! The rendering window spans from 30 days before the earliest schedule
//! date to 30 days after the latest, and each dated phase is positioned as
//! a fraction-of-window `{offset, width}` pair. The margin keeps bars off
//! the chart edges and leaves room to drag phases outward.

use serde::{Deserialize, Serialize};

use crate::core::domain::Phase;
use crate::time::Day;

/// Default padding on both ends of the window, in days.
pub const DEFAULT_WINDOW_MARGIN_DAYS: i64 = 30;

/// One phase bar, positioned as fractions of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttBar {
    pub name: String,
    /// Left edge, 0.0 at the window start.
    pub offset: f64,
    /// Bar width; a one-day phase still has positive width.
    pub width: f64,
}

/// Window bounds plus one bar per dated phase, in timeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub window_start: Day,
    pub window_end: Day,
    pub bars: Vec<GanttBar>,
}

/// Lay out the dated phases of a timeline.
///
/// Returns `None` when no phase carries any date, since there is no window
/// to anchor. Phases missing either date are skipped.
pub fn layout(phases: &[Phase], margin_days: i64) -> Option<TimelineLayout> {
    let earliest = phases
        .iter()
        .flat_map(|p| [p.start_date, p.end_date])
        .flatten()
        .min()?;
    let latest = phases
        .iter()
        .flat_map(|p| [p.start_date, p.end_date])
        .flatten()
        .max()?;

    let window_start = earliest.add_days(-margin_days);
    let window_end = latest.add_days(margin_days);
    let window_days = window_start.days_until(window_end) + 1;

    let bars = phases
        .iter()
        .filter_map(|phase| {
            let (start, end) = (phase.start_date?, phase.end_date?);
            Some(GanttBar {
                name: phase.name.clone(),
                offset: window_start.days_until(start) as f64 / window_days as f64,
                width: (start.days_until(end) + 1) as f64 / window_days as f64,
            })
        })
        .collect();

    Some(TimelineLayout {
        window_start,
        window_end,
        bars,
    })
}
