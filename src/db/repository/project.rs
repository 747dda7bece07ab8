//! Project timeline repository trait.
//!
//! Covers the snapshot lifecycle: loading the authoritative phase list,
//! reading snapshot history for diffing, committing bulk shifts, and
//! reading the audit trail those shifts produced.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::core::domain::{AuditEntry, Phase, ProjectId, Snapshot};

/// Repository trait for project timelines and their edit history.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All projects with at least one stored snapshot.
    async fn list_projects(&self) -> RepositoryResult<Vec<ProjectId>>;

    /// The latest snapshot's phases, in timeline order.
    ///
    /// # Returns
    /// * `Ok(Vec<Phase>)` - Phases of the authoritative snapshot
    /// * `Err(RepositoryError::NotFound)` - If the project has no snapshot
    async fn load_phases(&self, project: ProjectId) -> RepositoryResult<Vec<Phase>>;

    /// Snapshot history, newest first.
    async fn load_snapshots(&self, project: ProjectId) -> RepositoryResult<Vec<Snapshot>>;

    /// Store a snapshot as the new head of a project's history.
    ///
    /// Storing a snapshot whose content matches the current head is a no-op,
    /// so re-seeding identical data cannot grow the history.
    async fn store_snapshot(
        &self,
        project: ProjectId,
        snapshot: &Snapshot,
    ) -> RepositoryResult<()>;

    /// Atomically persist the outcome of a bulk shift.
    ///
    /// The snapshot becomes the new head and every audit entry is appended,
    /// all-or-nothing: on error the previous snapshot stays authoritative
    /// and no audit entry is recorded.
    async fn commit_bulk_shift(
        &self,
        project: ProjectId,
        snapshot: &Snapshot,
        audit: &[AuditEntry],
    ) -> RepositoryResult<()>;

    /// Audit entries for a project, oldest first.
    async fn list_audit_entries(&self, project: ProjectId) -> RepositoryResult<Vec<AuditEntry>>;
}
