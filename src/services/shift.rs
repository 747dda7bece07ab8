//! Bulk date shifts with optional dependency cascade.
//!
//! Planning a shift is a pure computation: it validates the request, walks
//! the dependency graph when cascading, and produces the new snapshot plus
//! one audit entry per phase actually moved. Nothing is persisted here; the
//! service layer commits the plan atomically or not at all.

use chrono::{DateTime, Utc};

use crate::algorithms::cascade;
use crate::core::arena::{PhaseArena, PhaseGraphError};
use crate::core::domain::{AuditEntry, ProjectId, Snapshot};

/// Errors that reject a bulk shift before any write happens.
#[derive(Debug, thiserror::Error)]
pub enum ShiftError {
    #[error("shift amount must be a whole number of days, got '{0}'")]
    InvalidDelta(String),

    #[error("selected phase index {0} is not in the timeline")]
    UnknownPhase(usize),

    #[error("phase '{0}' has no start or end date and cannot be shifted")]
    UnscheduledPhase(String),

    #[error(transparent)]
    Graph(#[from] PhaseGraphError),
}

/// The outcome of planning a bulk shift.
#[derive(Debug, Clone)]
pub struct ShiftPlan {
    /// The new timeline snapshot with shifted dates applied.
    pub snapshot: Snapshot,
    /// One entry per phase actually shifted, in timeline order.
    pub audit: Vec<AuditEntry>,
}

impl ShiftPlan {
    /// `true` when the plan changes nothing (zero-day shift).
    pub fn is_noop(&self) -> bool {
        self.audit.is_empty()
    }
}

/// Validate a form-supplied shift amount.
///
/// Accepts optionally signed whole numbers; anything else (empty input,
/// fractions, stray text) is rejected before the schedule is touched.
pub fn parse_delta_days(input: &str) -> Result<i64, ShiftError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ShiftError::InvalidDelta(input.to_string()))
}

/// Plan a bulk shift of `delta_days` for the selected phases.
///
/// A zero delta yields a no-op plan with no audit entries. Every directly
/// selected phase must exist and carry both dates. With `cascade` set, the
/// dependency graph is checked for cycles up front and every phase whose
/// dependency chain reaches a selected phase is shifted by the same delta;
/// cascade-reached phases without dates are left untouched.
pub fn plan_bulk_shift(
    project: ProjectId,
    snapshot: &Snapshot,
    selected: &[usize],
    delta_days: i64,
    cascade: bool,
    actor: &str,
    at: DateTime<Utc>,
) -> Result<ShiftPlan, ShiftError> {
    for &index in selected {
        let phase = snapshot
            .phases
            .get(index)
            .ok_or(ShiftError::UnknownPhase(index))?;
        if !phase.is_dated() {
            return Err(ShiftError::UnscheduledPhase(phase.name.clone()));
        }
    }

    if delta_days == 0 {
        return Ok(ShiftPlan {
            snapshot: Snapshot::new(snapshot.phases.clone(), snapshot.captured_at),
            audit: Vec::new(),
        });
    }

    let shift_set: Vec<usize> = if cascade {
        let arena = PhaseArena::build(&snapshot.phases)?;
        arena.ensure_acyclic()?;
        cascade::closure(&arena, selected)
    } else {
        let mut direct = selected.to_vec();
        direct.sort_unstable();
        direct.dedup();
        direct
    };

    let mut phases = snapshot.phases.clone();
    let mut audit = Vec::new();

    for &index in &shift_set {
        let phase = &mut phases[index];
        let (Some(start), Some(end)) = (phase.start_date, phase.end_date) else {
            // Reached only through a cascade; undated dependents stay put.
            continue;
        };

        let start_after = start.add_days(delta_days);
        let end_after = end.add_days(delta_days);
        phase.start_date = Some(start_after);
        phase.end_date = Some(end_after);

        audit.push(AuditEntry {
            project,
            phase_name: phase.name.clone(),
            delta_days,
            cascade,
            start_before: start,
            start_after,
            end_before: end,
            end_after,
            actor: actor.to_string(),
            recorded_at: at,
        });
    }

    Ok(ShiftPlan {
        snapshot: Snapshot::new(phases, at),
        audit,
    })
}
