//! Current-phase and progress derivation.
//!
//! Given a project's phase list and a reference day, this service classifies
//! every phase as active, completed, upcoming, or unscheduled, and selects
//! the single phase (possibly synthetic) that represents the project's
//! current state together with a progress percentage. The computation is
//! pure and the result is cacheable per project and calendar day.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::domain::{Phase, ProjectId};
use crate::time::Day;

/// Canonical phase-name to progress-percent table, in build order.
///
/// The percentages are the portal's long-standing reporting convention, not
/// a derived quantity. Lookup is case-insensitive; unrecognized names map
/// to 0.
static PROGRESS_TABLE: Lazy<Vec<(&'static str, u8)>> = Lazy::new(|| {
    vec![
        ("Planning & Permits", 0),
        ("Preconstruction", 10),
        ("Site Preparation", 15),
        ("Excavation", 20),
        ("Foundation", 30),
        ("Framing", 40),
        ("Roofing", 50),
        ("Mechanical Rough-In", 55),
        ("Insulation", 60),
        ("Drywall", 70),
        ("Interior Finishes", 80),
        ("Exterior Finishes", 85),
        ("Punch List", 95),
        ("Final Inspection", 100),
    ]
});

/// Synthetic phase reported when every dated phase is still upcoming.
const UPCOMING_PHASE_NAME: &str = "Preconstruction";
const UPCOMING_PROGRESS_FLOOR: u8 = 10;

/// Phase reported for an empty or entirely unscheduled timeline.
const EMPTY_PHASE_NAME: &str = "Planning & Permits";

/// Progress percentage for a canonical phase name.
pub fn progress_for(name: &str) -> u8 {
    PROGRESS_TABLE
        .iter()
        .find(|(canonical, _)| canonical.eq_ignore_ascii_case(name))
        .map(|&(_, percent)| percent)
        .unwrap_or(0)
}

/// Classification of one phase relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    /// The reference day falls within `[start, end]`, bounds inclusive.
    Active,
    /// The reference day is after the end date.
    Completed,
    /// The reference day is before the start date.
    Upcoming,
    /// Start or end date missing; excluded from classification.
    Unscheduled,
}

/// Per-phase status row exposed to dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub name: String,
    pub sort_order: i32,
    pub state: PhaseState,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub progress_percent: u8,
}

/// Resolved view of a project's schedule for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleProgress {
    pub current_phase: String,
    pub progress_percent: u8,
    pub phases: Vec<PhaseStatus>,
}

/// Classify a single phase against `today`.
pub fn classify(phase: &Phase, today: Day) -> PhaseState {
    match (phase.start_date, phase.end_date) {
        (Some(start), Some(end)) => {
            if today < start {
                PhaseState::Upcoming
            } else if today > end {
                PhaseState::Completed
            } else {
                PhaseState::Active
            }
        }
        _ => PhaseState::Unscheduled,
    }
}

/// Derive the current phase, progress percentage, and per-phase statuses.
///
/// Selection policy, in order:
/// 1. a single active phase is current;
/// 2. among several active phases, the first one carrying the largest
///    `sort_order` wins;
/// 3. with no active phase, the completed phase with the latest end date
///    wins (equal end dates resolve to the later list position);
/// 4. with only upcoming phases, a synthetic "Preconstruction" phase is
///    reported at a 10% floor;
/// 5. otherwise the schedule is still in "Planning & Permits" at 0%.
pub fn resolve(phases: &[Phase], today: Day) -> ScheduleProgress {
    let statuses: Vec<PhaseStatus> = phases
        .iter()
        .map(|phase| PhaseStatus {
            name: phase.name.clone(),
            sort_order: phase.sort_order,
            state: classify(phase, today),
            start_date: phase.start_date,
            end_date: phase.end_date,
            progress_percent: progress_for(&phase.name),
        })
        .collect();

    let mut best_active: Option<&PhaseStatus> = None;
    for status in statuses.iter().filter(|s| s.state == PhaseState::Active) {
        match best_active {
            Some(best) if status.sort_order <= best.sort_order => {}
            _ => best_active = Some(status),
        }
    }

    if let Some(active) = best_active {
        let current_phase = active.name.clone();
        let progress_percent = active.progress_percent;
        return ScheduleProgress {
            current_phase,
            progress_percent,
            phases: statuses,
        };
    }

    let mut best_completed: Option<&PhaseStatus> = None;
    for status in statuses.iter().filter(|s| s.state == PhaseState::Completed) {
        match (best_completed, status.end_date) {
            (Some(best), Some(end)) => {
                // >= keeps the later list position on equal end dates.
                if best.end_date.map_or(true, |best_end| end >= best_end) {
                    best_completed = Some(status);
                }
            }
            (None, Some(_)) => best_completed = Some(status),
            _ => {}
        }
    }

    if let Some(completed) = best_completed {
        let current_phase = completed.name.clone();
        let progress_percent = completed.progress_percent;
        return ScheduleProgress {
            current_phase,
            progress_percent,
            phases: statuses,
        };
    }

    let any_upcoming = statuses.iter().any(|s| s.state == PhaseState::Upcoming);
    if any_upcoming {
        return ScheduleProgress {
            current_phase: UPCOMING_PHASE_NAME.to_string(),
            progress_percent: UPCOMING_PROGRESS_FLOOR,
            phases: statuses,
        };
    }

    ScheduleProgress {
        current_phase: EMPTY_PHASE_NAME.to_string(),
        progress_percent: progress_for(EMPTY_PHASE_NAME),
        phases: statuses,
    }
}

/// Memo of resolved schedules keyed by project and calendar day.
///
/// Batch dashboards resolve many projects for the same day; the computation
/// is deterministic per `(project, day)`, so the first result can be shared.
/// Invalidate a project's entries after committing a schedule edit.
#[derive(Default)]
pub struct ResolverCache {
    inner: RwLock<HashMap<(ProjectId, Day), Arc<ScheduleProgress>>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve through the cache.
    pub fn resolve(&self, project: ProjectId, phases: &[Phase], today: Day) -> Arc<ScheduleProgress> {
        if let Some(hit) = self
            .inner
            .read()
            .unwrap()
            .get(&(project, today))
        {
            return Arc::clone(hit);
        }

        let computed = Arc::new(resolve(phases, today));
        self.inner
            .write()
            .unwrap()
            .insert((project, today), Arc::clone(&computed));
        computed
    }

    /// Drop every cached day for one project.
    pub fn invalidate_project(&self, project: ProjectId) {
        self.inner
            .write()
            .unwrap()
            .retain(|(cached, _), _| *cached != project);
    }
}
