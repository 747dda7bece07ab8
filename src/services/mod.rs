//! Pure schedule computations.
//!
//! Every function in this layer is a deterministic computation over inputs
//! the caller provides; persistence and logging live in [`crate::db`]. The
//! services are safe to run in parallel across projects.
//!
//! - [`progress`]: current phase and progress percentage derivation
//! - [`shift`]: bulk date shifts with optional dependency cascade
//! - [`milestones`]: financial milestone dates from anchor rules
//! - [`capacity`]: weekly resource utilization and overbooking
//! - [`notify`]: human-readable change notices between snapshots
//! - [`layout`]: bounded timeline geometry for Gantt rendering
//! - [`validation`]: data-integrity checks over timelines and resources

pub mod capacity;
pub mod layout;
pub mod milestones;
pub mod notify;
pub mod progress;
pub mod shift;
pub mod validation;
