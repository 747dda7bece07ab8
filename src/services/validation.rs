//! Data-integrity validation for timelines and resource data.
//!
//! Validation runs when schedule data enters the engine and before derived
//! views are computed. Issues carry a severity and category so callers can
//! decide what blocks an operation and what is merely surfaced to users.

use crate::core::arena::PhaseArena;
use crate::core::domain::{Allocation, Blackout, Phase, Resource};

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Suspicious but workable data.
    Warning,
    /// Data the engine refuses to compute over.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// What part of the data an issue concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    Dates,
    Dependency,
    Resource,
    Naming,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Dates => "dates",
            IssueCategory::Dependency => "dependency",
            IssueCategory::Resource => "resource",
            IssueCategory::Naming => "naming",
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Phase name when the issue is phase-scoped.
    pub phase: Option<String>,
    pub category: IssueCategory,
    pub severity: Severity,
    pub description: String,
}

impl ValidationIssue {
    fn error(phase: Option<&str>, category: IssueCategory, description: String) -> Self {
        Self {
            phase: phase.map(str::to_string),
            category,
            severity: Severity::Error,
            description,
        }
    }

    fn warning(phase: Option<&str>, category: IssueCategory, description: String) -> Self {
        Self {
            phase: phase.map(str::to_string),
            category,
            severity: Severity::Warning,
            description,
        }
    }
}

/// `true` when any issue is a hard error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Validate a timeline's phases: date order, dependency structure, and
/// name uniqueness (names are the cross-snapshot matching key, so
/// duplicates degrade diffing but do not block computation).
pub fn validate_timeline(phases: &[Phase]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for phase in phases {
        if let (Some(start), Some(end)) = (phase.start_date, phase.end_date) {
            if end < start {
                issues.push(ValidationIssue::error(
                    Some(&phase.name),
                    IssueCategory::Dates,
                    format!("ends {} before it starts {}", end, start),
                ));
            }
        }
    }

    match PhaseArena::build(phases) {
        Ok(arena) => {
            if let Err(err) = arena.ensure_acyclic() {
                issues.push(ValidationIssue::error(
                    None,
                    IssueCategory::Dependency,
                    err.to_string(),
                ));
            }
        }
        Err(err) => {
            issues.push(ValidationIssue::error(
                None,
                IssueCategory::Dependency,
                err.to_string(),
            ));
        }
    }

    for (idx, phase) in phases.iter().enumerate() {
        if phases[..idx].iter().any(|p| p.name == phase.name) {
            issues.push(ValidationIssue::warning(
                Some(&phase.name),
                IssueCategory::Naming,
                "duplicate phase name; schedule diffs will be unreliable".to_string(),
            ));
        }
    }

    issues
}

/// Validate resource, blackout, and allocation records.
pub fn validate_resources(
    resources: &[Resource],
    blackouts: &[Blackout],
    allocations: &[Allocation],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for resource in resources {
        if resource.capacity_per_day < 0.0 {
            issues.push(ValidationIssue::error(
                None,
                IssueCategory::Resource,
                format!(
                    "resource '{}' has negative daily capacity {}",
                    resource.name, resource.capacity_per_day
                ),
            ));
        }
    }

    for blackout in blackouts {
        if blackout.end_date < blackout.start_date {
            issues.push(ValidationIssue::error(
                None,
                IssueCategory::Dates,
                format!(
                    "blackout for resource {} ends {} before it starts {}",
                    blackout.resource, blackout.end_date, blackout.start_date
                ),
            ));
        }
        if !resources.iter().any(|r| r.id == blackout.resource) {
            issues.push(ValidationIssue::warning(
                None,
                IssueCategory::Resource,
                format!("blackout references unknown resource {}", blackout.resource),
            ));
        }
    }

    for allocation in allocations {
        if allocation.end_date < allocation.start_date {
            issues.push(ValidationIssue::error(
                Some(&allocation.phase_name),
                IssueCategory::Dates,
                format!(
                    "allocation ends {} before it starts {}",
                    allocation.end_date, allocation.start_date
                ),
            ));
        }
        if !resources.iter().any(|r| r.id == allocation.resource) {
            issues.push(ValidationIssue::warning(
                Some(&allocation.phase_name),
                IssueCategory::Resource,
                format!(
                    "allocation references unknown resource {}",
                    allocation.resource
                ),
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::ResourceId;
    use crate::time::Day;

    fn day(s: &str) -> Day {
        Day::parse(s).unwrap()
    }

    fn phase(name: &str, start: Option<&str>, end: Option<&str>, dep: Option<usize>) -> Phase {
        Phase {
            name: name.to_string(),
            sort_order: 0,
            start_date: start.map(day),
            end_date: end.map(day),
            dependency: dep,
            resource: None,
        }
    }

    #[test]
    fn clean_timeline_has_no_issues() {
        let phases = vec![
            phase("Foundation", Some("2024-01-01"), Some("2024-01-31"), None),
            phase("Framing", Some("2024-02-01"), Some("2024-02-14"), Some(0)),
        ];
        assert!(validate_timeline(&phases).is_empty());
    }

    #[test]
    fn inverted_dates_are_an_error() {
        let phases = vec![phase("Framing", Some("2024-02-14"), Some("2024-02-01"), None)];
        let issues = validate_timeline(&phases);
        assert!(has_errors(&issues));
        assert_eq!(issues[0].category, IssueCategory::Dates);
        assert_eq!(issues[0].phase.as_deref(), Some("Framing"));
    }

    #[test]
    fn dependency_cycle_is_an_error() {
        let phases = vec![phase("A", None, None, Some(1)), phase("B", None, None, Some(0))];
        let issues = validate_timeline(&phases);
        assert!(has_errors(&issues));
        assert_eq!(issues[0].category, IssueCategory::Dependency);
    }

    #[test]
    fn duplicate_names_warn_without_blocking() {
        let phases = vec![
            phase("Framing", None, None, None),
            phase("Framing", None, None, None),
        ];
        let issues = validate_timeline(&phases);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn resource_checks_cover_capacity_and_references() {
        let resources = vec![Resource {
            id: ResourceId(1),
            name: "Crew".to_string(),
            capacity_per_day: -1.0,
            active: true,
        }];
        let blackouts = vec![Blackout {
            resource: ResourceId(9),
            start_date: day("2024-04-01"),
            end_date: day("2024-04-05"),
        }];
        let issues = validate_resources(&resources, &blackouts, &[]);

        assert_eq!(issues.len(), 2);
        assert!(has_errors(&issues));
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.description.contains("unknown resource")));
    }
}
