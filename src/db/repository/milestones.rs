//! Milestone repository trait.
//!
//! Anchor rules are configuration owned by the portal's finance module;
//! derived due dates are written back one milestone at a time so a single
//! failing write never blocks the remaining milestones.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::core::domain::{AnchorRule, ProjectId};
use crate::time::Day;

/// Repository trait for anchor rules and milestone due dates.
#[async_trait]
pub trait MilestoneRepository: Send + Sync {
    /// The project's configured anchor rules, in configuration order.
    async fn load_anchor_rules(&self, project: ProjectId) -> RepositoryResult<Vec<AnchorRule>>;

    /// Persist one milestone's derived due date; `None` clears it.
    async fn save_milestone_date(
        &self,
        project: ProjectId,
        milestone_key: &str,
        due: Option<Day>,
    ) -> RepositoryResult<()>;

    /// All persisted milestone dates for a project, keyed by milestone.
    async fn load_milestone_dates(
        &self,
        project: ProjectId,
    ) -> RepositoryResult<BTreeMap<String, Option<Day>>>;
}
