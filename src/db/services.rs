//! High-level engine service layer.
//!
//! These functions tie the pure schedule computations to the persistence
//! collaborator and work with any repository implementation. Business rules
//! that must hold regardless of storage backend live here: per-project
//! serialization of bulk shifts, all-or-nothing commits, and per-milestone
//! fault isolation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Portal request handlers (dashboards, schedule editor)  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (this module)                            │
//! │  - per-project shift serialization                      │
//! │  - milestone fault isolation                            │
//! │  - change-notice derivation                             │
//! └───────┬───────────────────────────────┬─────────────────┘
//!         │                               │
//! ┌───────▼────────────────┐   ┌──────────▼──────────────┐
//! │  Pure services          │   │  Repository traits      │
//! │  (progress, shift, ...) │   │  (external storage)     │
//! └─────────────────────────┘   └─────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Utc;
use log::{info, warn};

use crate::core::domain::{AuditEntry, ProjectId, Snapshot};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::services::capacity::{self, CapacityError, CapacityGrid};
use crate::services::layout::{self, TimelineLayout};
use crate::services::milestones::{self, ExternalEvents};
use crate::services::notify;
use crate::services::progress::{self, ScheduleProgress};
use crate::services::shift::{self, ShiftError};
use crate::services::validation;
use crate::time::Day;

/// Errors surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Shift(#[from] ShiftError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no phase named '{0}' in the current schedule")]
    UnknownPhaseName(String),
}

/// Result of a committed (or no-op) bulk shift.
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    /// The authoritative snapshot after the operation.
    pub snapshot: Snapshot,
    /// One entry per shifted phase; empty for a zero-day no-op.
    pub audit: Vec<AuditEntry>,
    /// Change notices against the previous snapshot; empty for a no-op.
    pub notices: Vec<String>,
}

/// Outcome of a milestone recompute: every derived date plus the rules
/// whose persistence failed.
#[derive(Debug, Clone)]
pub struct MilestoneReport {
    pub dates: BTreeMap<String, Option<Day>>,
    /// `(milestone_key, error)` for each failed write.
    pub failures: Vec<(String, String)>,
}

// Bulk shifts against one project read the pre-shift graph before writing,
// so two interleaved shifts could cascade over stale dates. One async mutex
// per project serializes them; separate projects proceed in parallel.
static PROJECT_LOCKS: OnceLock<Mutex<HashMap<ProjectId, Arc<tokio::sync::Mutex<()>>>>> =
    OnceLock::new();

fn project_lock(project: ProjectId) -> Arc<tokio::sync::Mutex<()>> {
    let locks = PROJECT_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = locks.lock().unwrap();
    Arc::clone(map.entry(project).or_default())
}

/// Check if the storage backend is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Resolve a project's current phase and per-phase statuses for `today`.
///
/// A timeline failing data-integrity checks (inverted dates, broken
/// dependency graph) is surfaced as a validation error rather than being
/// silently classified.
pub async fn project_progress<R: FullRepository + ?Sized>(
    repo: &R,
    project: ProjectId,
    today: Day,
) -> RepositoryResult<ScheduleProgress> {
    let phases = repo.load_phases(project).await?;

    let issues = validation::validate_timeline(&phases);
    if validation::has_errors(&issues) {
        let summary: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == validation::Severity::Error)
            .map(|i| i.description.clone())
            .collect();
        return Err(RepositoryError::ValidationError(format!(
            "project {}: {}",
            project,
            summary.join("; ")
        )));
    }

    Ok(progress::resolve(&phases, today))
}

/// Apply a bulk shift to the named phases and commit it atomically.
///
/// Phase names must match the current snapshot exactly. The shift is
/// planned against the head snapshot, committed together with its audit
/// entries, and diffed against the prior head for change notices. A
/// zero-day delta returns the unchanged snapshot and writes nothing.
pub async fn bulk_shift_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    project: ProjectId,
    phase_names: &[String],
    delta_days: i64,
    cascade: bool,
    actor: &str,
) -> Result<ShiftOutcome, EngineError> {
    let lock = project_lock(project);
    let _guard = lock.lock().await;

    let snapshots = repo.load_snapshots(project).await?;
    let head = snapshots
        .first()
        .ok_or_else(|| RepositoryError::NotFound(format!("project {project}")))?;

    let selected: Vec<usize> = phase_names
        .iter()
        .map(|name| {
            head.phase_index(name)
                .ok_or_else(|| EngineError::UnknownPhaseName(name.clone()))
        })
        .collect::<Result<_, _>>()?;

    let plan = shift::plan_bulk_shift(
        project,
        head,
        &selected,
        delta_days,
        cascade,
        actor,
        Utc::now(),
    )?;

    if plan.is_noop() {
        info!(
            "Service layer: zero-day shift for project {} is a no-op",
            project
        );
        return Ok(ShiftOutcome {
            snapshot: plan.snapshot,
            audit: Vec::new(),
            notices: Vec::new(),
        });
    }

    repo.commit_bulk_shift(project, &plan.snapshot, &plan.audit)
        .await?;

    let notices = notify::diff(Some(head), &plan.snapshot);
    info!(
        "Service layer: shifted {} phase(s) of project {} by {} day(s) (cascade={})",
        plan.audit.len(),
        project,
        delta_days,
        cascade,
    );

    Ok(ShiftOutcome {
        snapshot: plan.snapshot,
        audit: plan.audit,
        notices,
    })
}

/// Recompute every milestone date from the project's anchor rules.
///
/// Each milestone is persisted independently: a failed write is logged,
/// recorded in the report, and does not stop the remaining milestones.
pub async fn recompute_milestones<R: FullRepository + ?Sized>(
    repo: &R,
    project: ProjectId,
    external: &ExternalEvents,
) -> RepositoryResult<MilestoneReport> {
    let phases = repo.load_phases(project).await?;
    let rules = repo.load_anchor_rules(project).await?;
    let dates = milestones::evaluate_rules(&phases, &rules, external);

    let mut failures = Vec::new();
    for (milestone_key, due) in &dates {
        if let Err(err) = repo.save_milestone_date(project, milestone_key, *due).await {
            warn!(
                "Service layer: failed to persist milestone '{}' for project {}: {}",
                milestone_key, project, err
            );
            failures.push((milestone_key.clone(), err.to_string()));
        }
    }

    info!(
        "Service layer: recomputed {} milestone(s) for project {} ({} write failure(s))",
        dates.len(),
        project,
        failures.len(),
    );

    Ok(MilestoneReport { dates, failures })
}

/// Compute the weekly utilization grid over the configured horizon.
pub async fn utilization_grid<R: FullRepository + ?Sized>(
    repo: &R,
    horizon_weeks: usize,
    reference_week_start: Day,
) -> Result<CapacityGrid, EngineError> {
    let resources = repo.load_resources().await?;
    let blackouts = repo.load_blackouts(None).await?;

    let horizon_end = reference_week_start
        .week_start()
        .add_days(7 * horizon_weeks as i64 - 1);
    let allocations = repo
        .load_allocations(None, Some((reference_week_start.week_start(), horizon_end)))
        .await?;

    Ok(capacity::compute_utilization(
        &resources,
        &blackouts,
        &allocations,
        horizon_weeks,
        reference_week_start,
    )?)
}

/// Change notices for the most recent schedule edit.
///
/// Diffs the two newest snapshots; a project with a single snapshot yields
/// the generic fallback notice.
pub async fn change_notices<R: FullRepository + ?Sized>(
    repo: &R,
    project: ProjectId,
) -> RepositoryResult<Vec<String>> {
    let snapshots = repo.load_snapshots(project).await?;
    let head = snapshots
        .first()
        .ok_or_else(|| RepositoryError::NotFound(format!("project {project}")))?;
    Ok(notify::diff(snapshots.get(1), head))
}

/// Gantt layout for the current snapshot, or `None` when nothing is dated.
pub async fn timeline_layout<R: FullRepository + ?Sized>(
    repo: &R,
    project: ProjectId,
    margin_days: i64,
) -> RepositoryResult<Option<TimelineLayout>> {
    let phases = repo.load_phases(project).await?;
    Ok(layout::layout(&phases, margin_days))
}
