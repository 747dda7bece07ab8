//! Resource repository trait.
//!
//! Resources, blackout intervals, and allocations are managed by other
//! parts of the portal; the engine only reads them when computing the
//! utilization grid.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::core::domain::{Allocation, Blackout, Resource, ResourceId};
use crate::time::Day;

/// Repository trait for resource, blackout, and allocation reads.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// All known resources, active and retired.
    async fn load_resources(&self) -> RepositoryResult<Vec<Resource>>;

    /// Blackout intervals, optionally limited to one resource.
    async fn load_blackouts(
        &self,
        resource: Option<ResourceId>,
    ) -> RepositoryResult<Vec<Blackout>>;

    /// Allocations, optionally limited to one resource and/or a date range
    /// (inclusive; an allocation qualifies when it overlaps the range).
    async fn load_allocations(
        &self,
        resource: Option<ResourceId>,
        range: Option<(Day, Day)>,
    ) -> RepositoryResult<Vec<Allocation>>;
}
