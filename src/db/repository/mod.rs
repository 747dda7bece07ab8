//! Repository trait definitions for the persistence collaborator.
//!
//! Persistent storage of projects, phases, resources, and milestones is an
//! external concern; the engine only consumes it through these traits.
//! Responsibilities are split across focused traits so implementations stay
//! small and each concern can be mocked independently.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`project`]: Timeline snapshots, bulk-shift commits, audit reads
//! - [`resources`]: Resources, blackout intervals, allocations
//! - [`milestones`]: Anchor-rule configuration and milestone due dates
//!
//! # Atomicity contract
//!
//! [`ProjectRepository::commit_bulk_shift`] must persist the new snapshot
//! and its audit entries together or not at all; a partial write would leave
//! an edit without its explanation. Milestone writes are the deliberate
//! opposite: [`MilestoneRepository::save_milestone_date`] is called once per
//! milestone and one failed write must not block the others.
//!
//! # Convenience Trait Bound
//!
//! For functions needing every capability, use the [`FullRepository`] bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let phases = repo.load_phases(project).await?;
//!     let resources = repo.load_resources().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod milestones;
pub mod project;
pub mod resources;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use milestones::MilestoneRepository;
pub use project::ProjectRepository;
pub use resources::ResourceRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: ProjectRepository + ResourceRepository + MilestoneRepository {}

impl<T> FullRepository for T where T: ProjectRepository + ResourceRepository + MilestoneRepository {}
