//! Repository factory for dependency injection.
//!
//! The engine ships only the in-memory backend; the factory exists so
//! request handlers select a backend by configuration rather than by type,
//! and portal-side implementations can slot in without touching callers.

use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryResult};

/// Repository backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory backend for tests and local development.
    Local,
}

impl RepositoryType {
    /// Parse a backend name from configuration.
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }

    /// Backend from the `REPOSITORY_TYPE` environment variable, defaulting
    /// to the local backend when unset or unrecognized.
    pub fn from_env() -> Self {
        std::env::var("REPOSITORY_TYPE")
            .ok()
            .and_then(|s| Self::from_str(&s).ok())
            .unwrap_or(Self::Local)
    }

    /// Human-readable backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryType::Local => "local",
        }
    }
}

/// Factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository for the given backend type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a repository from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::create(RepositoryType::from_env())
    }
}
