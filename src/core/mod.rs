//! Core domain model for construction schedules.
//!
//! This module provides the data structures that represent a project's
//! construction schedule: date-ranged phases, immutable timeline snapshots,
//! crew/equipment resources with blackout intervals, milestone anchor rules,
//! and the append-only audit trail of schedule edits.

pub mod arena;
pub mod domain;

pub use arena::{PhaseArena, PhaseGraphError};
pub use domain::{
    Allocation, AnchorKind, AnchorRule, AuditEntry, Blackout, Phase, ProjectId, Resource,
    ResourceId, Snapshot,
};
