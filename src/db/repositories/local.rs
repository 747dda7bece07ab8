//! In-memory local repository implementation.
//!
//! Implements every repository trait over plain `HashMap`/`Vec` state for
//! unit tests and local development: fast, deterministic, and isolated.
//! The health flag and the per-milestone failure hook exist so tests can
//! exercise the engine's persistence-failure paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::core::domain::{
    Allocation, AnchorRule, AuditEntry, Blackout, Phase, ProjectId, Resource, ResourceId,
    Snapshot,
};
use crate::db::checksum::snapshot_checksum;
use crate::db::repository::{
    MilestoneRepository, ProjectRepository, RepositoryError, RepositoryResult,
    ResourceRepository,
};
use crate::time::Day;

/// In-memory repository backing tests and local development.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    // Snapshot history per project, oldest first; the last entry is the head.
    snapshots: HashMap<ProjectId, Vec<StoredSnapshot>>,
    audit_log: Vec<AuditEntry>,

    resources: Vec<Resource>,
    blackouts: Vec<Blackout>,
    allocations: Vec<Allocation>,

    anchor_rules: HashMap<ProjectId, Vec<AnchorRule>>,
    milestone_dates: HashMap<ProjectId, BTreeMap<String, Option<Day>>>,

    // Failure simulation for tests.
    is_healthy: bool,
    failing_milestone_keys: HashSet<String>,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            snapshots: HashMap::new(),
            audit_log: Vec::new(),
            resources: Vec::new(),
            blackouts: Vec::new(),
            allocations: Vec::new(),
            anchor_rules: HashMap::new(),
            milestone_dates: HashMap::new(),
            is_healthy: true,
            failing_milestone_keys: HashSet::new(),
        }
    }
}

struct StoredSnapshot {
    snapshot: Snapshot,
    checksum: String,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project with an initial timeline snapshot.
    pub fn seed_project(&self, project: ProjectId, snapshot: Snapshot) {
        let checksum = snapshot_checksum(&snapshot.phases);
        let mut data = self.data.write().unwrap();
        data.snapshots
            .entry(project)
            .or_default()
            .push(StoredSnapshot { snapshot, checksum });
    }

    /// Register a resource.
    pub fn add_resource(&self, resource: Resource) {
        self.data.write().unwrap().resources.push(resource);
    }

    /// Register a blackout interval.
    pub fn add_blackout(&self, blackout: Blackout) {
        self.data.write().unwrap().blackouts.push(blackout);
    }

    /// Register an allocation.
    pub fn add_allocation(&self, allocation: Allocation) {
        self.data.write().unwrap().allocations.push(allocation);
    }

    /// Replace a project's anchor-rule configuration.
    pub fn set_anchor_rules(&self, project: ProjectId, rules: Vec<AnchorRule>) {
        self.data.write().unwrap().anchor_rules.insert(project, rules);
    }

    /// Toggle connection health for testing failure paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Make `save_milestone_date` fail for one milestone key.
    pub fn fail_milestone_key(&self, key: &str) {
        self.data
            .write()
            .unwrap()
            .failing_milestone_keys
            .insert(key.to_string());
    }

    /// Number of stored snapshots for a project.
    pub fn snapshot_count(&self, project: ProjectId) -> usize {
        self.data
            .read()
            .unwrap()
            .snapshots
            .get(&project)
            .map_or(0, Vec::len)
    }

    /// Drop all stored data, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }

    fn ensure_healthy(data: &LocalData) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::ConnectionError(
                "local repository marked unhealthy".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ProjectRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<ProjectId>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        let mut projects: Vec<ProjectId> = data.snapshots.keys().copied().collect();
        projects.sort();
        Ok(projects)
    }

    async fn load_phases(&self, project: ProjectId) -> RepositoryResult<Vec<Phase>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        data.snapshots
            .get(&project)
            .and_then(|history| history.last())
            .map(|stored| stored.snapshot.phases.clone())
            .ok_or_else(|| RepositoryError::NotFound(format!("project {project}")))
    }

    async fn load_snapshots(&self, project: ProjectId) -> RepositoryResult<Vec<Snapshot>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        let history = data
            .snapshots
            .get(&project)
            .ok_or_else(|| RepositoryError::NotFound(format!("project {project}")))?;
        Ok(history
            .iter()
            .rev()
            .map(|stored| stored.snapshot.clone())
            .collect())
    }

    async fn store_snapshot(
        &self,
        project: ProjectId,
        snapshot: &Snapshot,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        Self::ensure_healthy(&data)?;
        let checksum = snapshot_checksum(&snapshot.phases);
        let history = data.snapshots.entry(project).or_default();
        if history.last().is_some_and(|head| head.checksum == checksum) {
            return Ok(());
        }
        history.push(StoredSnapshot {
            snapshot: snapshot.clone(),
            checksum,
        });
        Ok(())
    }

    async fn commit_bulk_shift(
        &self,
        project: ProjectId,
        snapshot: &Snapshot,
        audit: &[AuditEntry],
    ) -> RepositoryResult<()> {
        // One write lock spans both the snapshot and the audit entries, so
        // the commit is observed all-or-nothing.
        let mut data = self.data.write().unwrap();
        Self::ensure_healthy(&data)?;

        let checksum = snapshot_checksum(&snapshot.phases);
        match data.snapshots.get_mut(&project) {
            Some(history) => history.push(StoredSnapshot {
                snapshot: snapshot.clone(),
                checksum,
            }),
            None => return Err(RepositoryError::NotFound(format!("project {project}"))),
        }
        data.audit_log.extend_from_slice(audit);
        Ok(())
    }

    async fn list_audit_entries(&self, project: ProjectId) -> RepositoryResult<Vec<AuditEntry>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data
            .audit_log
            .iter()
            .filter(|entry| entry.project == project)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResourceRepository for LocalRepository {
    async fn load_resources(&self) -> RepositoryResult<Vec<Resource>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data.resources.clone())
    }

    async fn load_blackouts(
        &self,
        resource: Option<ResourceId>,
    ) -> RepositoryResult<Vec<Blackout>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data
            .blackouts
            .iter()
            .filter(|b| resource.map_or(true, |id| b.resource == id))
            .cloned()
            .collect())
    }

    async fn load_allocations(
        &self,
        resource: Option<ResourceId>,
        range: Option<(Day, Day)>,
    ) -> RepositoryResult<Vec<Allocation>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data
            .allocations
            .iter()
            .filter(|a| resource.map_or(true, |id| a.resource == id))
            .filter(|a| {
                range.map_or(true, |(from, to)| {
                    a.start_date <= to && a.end_date >= from
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MilestoneRepository for LocalRepository {
    async fn load_anchor_rules(&self, project: ProjectId) -> RepositoryResult<Vec<AnchorRule>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data.anchor_rules.get(&project).cloned().unwrap_or_default())
    }

    async fn save_milestone_date(
        &self,
        project: ProjectId,
        milestone_key: &str,
        due: Option<Day>,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write().unwrap();
        Self::ensure_healthy(&data)?;
        if data.failing_milestone_keys.contains(milestone_key) {
            return Err(RepositoryError::QueryError(format!(
                "simulated write failure for milestone '{milestone_key}'"
            )));
        }
        data.milestone_dates
            .entry(project)
            .or_default()
            .insert(milestone_key.to_string(), due);
        Ok(())
    }

    async fn load_milestone_dates(
        &self,
        project: ProjectId,
    ) -> RepositoryResult<BTreeMap<String, Option<Day>>> {
        let data = self.data.read().unwrap();
        Self::ensure_healthy(&data)?;
        Ok(data.milestone_dates.get(&project).cloned().unwrap_or_default())
    }
}
