//! Persistence boundary and engine service layer.
//!
//! The engine never talks to storage directly; it goes through the
//! repository traits so the portal can supply whatever backend it runs on
//! while tests and local development use the in-memory implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Portal request handlers                                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services.rs) - engine business rules    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - abstract interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Local repository (in-memory)                           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```no_run
//! use sitetrack_engine::core::domain::ProjectId;
//! use sitetrack_engine::db::{services, repositories::LocalRepository};
//! use sitetrack_engine::time::Day;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let today = Day::parse("2024-04-03")?;
//!     let progress = services::project_progress(&repo, ProjectId(1), today).await?;
//!     println!("current phase: {}", progress.current_phase);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// ==================== Service Layer ====================

pub use services::{
    bulk_shift_schedule, change_notices, health_check, project_progress, recompute_milestones,
    timeline_layout, utilization_grid, EngineError, MilestoneReport, ShiftOutcome,
};

// ==================== Repository Pattern Exports ====================

pub use checksum::snapshot_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{EngineConfig, EngineSettings};
pub use repositories::LocalRepository;
pub use repository::{
    FullRepository, MilestoneRepository, ProjectRepository, RepositoryError, RepositoryResult,
    ResourceRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    match EngineConfig::from_default_location() {
        Ok(config) => {
            let repo_type = config
                .repository_type()
                .map_err(RepositoryError::ConfigurationError)?;
            RepositoryFactory::create(repo_type)
        }
        // No config file: fall back to the environment, then to local.
        Err(_) => RepositoryFactory::from_env(),
    }
}

/// Initialize the global repository singleton for the configured backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
