//! Domain models for project schedules, resources, and milestone anchors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::Day;

/// Identifier of a project in the portal.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProjectId(pub i64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProjectId {
    fn from(v: i64) -> Self {
        ProjectId(v)
    }
}

/// Identifier of a crew or equipment resource.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ResourceId(pub i64);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ResourceId {
    fn from(v: i64) -> Self {
        ResourceId(v)
    }
}

/// A named, date-ranged segment of a project's construction schedule.
///
/// Phase names are the semi-stable key used to match phases across snapshots
/// and by milestone anchor rules. Dependencies are arena indices into the
/// owning snapshot's phase list, resolved once when the timeline is loaded.
///
/// Invariant: when both dates are set, `end_date >= start_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub sort_order: i32,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    /// Index of the phase this one depends on, within the same snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceId>,
}

impl Phase {
    /// `true` when both the start and end date are set.
    pub fn is_dated(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Day-count duration (`end - start`), or `None` when either date is missing.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(start.days_until(end)),
            _ => None,
        }
    }
}

/// One immutable, timestamped version of a project's full phase list.
///
/// Every schedule edit produces a new snapshot; prior snapshots are retained
/// so changes can be diffed and explained. Only the latest snapshot is
/// authoritative for derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phases: Vec<Phase>,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(phases: Vec<Phase>, captured_at: DateTime<Utc>) -> Self {
        Self {
            phases,
            captured_at,
        }
    }

    /// Position of the phase with the given name, if present.
    pub fn phase_index(&self, name: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.name == name)
    }
}

/// A crew or equipment resource with a daily capacity in work units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub capacity_per_day: f64,
    pub active: bool,
}

/// A capacity-reducing unavailability interval for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blackout {
    pub resource: ResourceId,
    pub start_date: Day,
    pub end_date: Day,
}

/// A date-ranged booking of a resource against a phase of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub resource: ResourceId,
    pub phase_name: String,
    pub start_date: Day,
    pub end_date: Day,
}

/// How a financial milestone's due date is derived from the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    /// Due on the end date of the first phase matching `phase_match`.
    PhaseEnd,
    /// Due `offset_days` before the start of the first phase matching `phase_match`.
    PhaseStartMinusN,
    /// Due on the latest end date across all phases.
    ProjectFinalEnd,
    /// Due on a caller-supplied date that is not part of the timeline.
    ExternalEvent,
}

/// A configured mapping from a financial milestone to a schedule-derived date.
///
/// `phase_match` is a case-insensitive substring matched against phase names;
/// rule configuration is inherently name-based, so name matching is accepted
/// at this one boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub milestone_key: String,
    pub phase_match: String,
    pub anchor_kind: AnchorKind,
    /// Only consulted for [`AnchorKind::PhaseStartMinusN`].
    #[serde(default)]
    pub offset_days: i64,
}

/// Record of one phase shifted by a bulk schedule edit. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub project: ProjectId,
    pub phase_name: String,
    pub delta_days: i64,
    pub cascade: bool,
    pub start_before: Day,
    pub start_after: Day,
    pub end_before: Day,
    pub end_after: Day,
    pub actor: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        Day::parse(s).unwrap()
    }

    #[test]
    fn phase_duration_requires_both_dates() {
        let mut phase = Phase {
            name: "Framing".to_string(),
            sort_order: 4,
            start_date: Some(day("2024-02-01")),
            end_date: Some(day("2024-02-14")),
            dependency: None,
            resource: None,
        };
        assert!(phase.is_dated());
        assert_eq!(phase.duration_days(), Some(13));

        phase.end_date = None;
        assert!(!phase.is_dated());
        assert_eq!(phase.duration_days(), None);
    }

    #[test]
    fn snapshot_finds_phases_by_name() {
        let snapshot = Snapshot::new(
            vec![
                Phase {
                    name: "Foundation".to_string(),
                    sort_order: 1,
                    start_date: None,
                    end_date: None,
                    dependency: None,
                    resource: None,
                },
                Phase {
                    name: "Framing".to_string(),
                    sort_order: 2,
                    start_date: None,
                    end_date: None,
                    dependency: Some(0),
                    resource: None,
                },
            ],
            Utc::now(),
        );

        assert_eq!(snapshot.phase_index("Framing"), Some(1));
        assert_eq!(snapshot.phase_index("framing"), None);
        assert_eq!(snapshot.phase_index("Drywall"), None);
    }

    #[test]
    fn anchor_kind_uses_snake_case_wire_names() {
        let rule = AnchorRule {
            milestone_key: "Draw5".to_string(),
            phase_match: "insulation".to_string(),
            anchor_kind: AnchorKind::PhaseStartMinusN,
            offset_days: 1,
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"phase_start_minus_n\""));
        let back: AnchorRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
