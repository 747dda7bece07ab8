use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::domain::{AnchorKind, AnchorRule, Phase, ProjectId, ResourceId};
use crate::time::Day;

/// Raw JSON structure for one phase row.
///
/// Dates arrive as `YYYY-MM-DD` strings and the dependency is a phase name;
/// both are resolved here, once, so the rest of the engine works with typed
/// days and integer indices.
#[derive(Debug, Deserialize)]
struct PhaseRecord {
    name: String,
    #[serde(rename = "sortOrder")]
    sort_order: i32,
    #[serde(rename = "startDate", default)]
    start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    end_date: Option<String>,
    #[serde(rename = "dependsOn", default)]
    depends_on: Option<String>,
    #[serde(rename = "resourceId", default)]
    resource_id: Option<i64>,
}

/// Raw JSON structure for a timeline document.
#[derive(Debug, Deserialize)]
struct TimelineDocument {
    #[serde(rename = "projectId")]
    project_id: i64,
    phases: Vec<PhaseRecord>,
}

/// Raw JSON structure for one anchor rule.
#[derive(Debug, Deserialize)]
struct AnchorRuleRecord {
    #[serde(rename = "milestoneKey")]
    milestone_key: String,
    #[serde(rename = "phaseMatch", default)]
    phase_match: String,
    #[serde(rename = "anchorKind")]
    anchor_kind: AnchorKind,
    #[serde(rename = "offsetDays", default)]
    offset_days: i64,
}

fn parse_date(value: &Option<String>, phase: &str, field: &str) -> Result<Option<Day>> {
    match value {
        Some(raw) => {
            let day = Day::parse(raw)
                .with_context(|| format!("phase '{}': invalid {}", phase, field))?;
            Ok(Some(day))
        }
        None => Ok(None),
    }
}

fn resolve_phases(records: Vec<PhaseRecord>) -> Result<Vec<Phase>> {
    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();

    let mut phases = Vec::with_capacity(records.len());
    for record in records {
        let dependency = match &record.depends_on {
            Some(target) => match names.iter().position(|n| n == target) {
                Some(index) => Some(index),
                None => bail!(
                    "phase '{}' depends on unknown phase '{}'",
                    record.name,
                    target
                ),
            },
            None => None,
        };

        phases.push(Phase {
            start_date: parse_date(&record.start_date, &record.name, "startDate")?,
            end_date: parse_date(&record.end_date, &record.name, "endDate")?,
            name: record.name,
            sort_order: record.sort_order,
            dependency,
            resource: record.resource_id.map(ResourceId),
        });
    }
    Ok(phases)
}

/// Parse a timeline document from a JSON string.
///
/// Deserialization errors carry the JSON path of the offending field.
pub fn parse_timeline_str(json: &str) -> Result<(ProjectId, Vec<Phase>)> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let document: TimelineDocument = serde_path_to_error::deserialize(&mut deserializer)
        .context("Failed to parse timeline document")?;

    let phases = resolve_phases(document.phases)?;
    Ok((ProjectId(document.project_id), phases))
}

/// Parse a timeline document from a file.
pub fn parse_timeline_file(path: &Path) -> Result<(ProjectId, Vec<Phase>)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read timeline file {}", path.display()))?;
    parse_timeline_str(&json)
}

/// Parse an anchor-rule list from a JSON string.
pub fn parse_anchor_rules_str(json: &str) -> Result<Vec<AnchorRule>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let records: Vec<AnchorRuleRecord> = serde_path_to_error::deserialize(&mut deserializer)
        .context("Failed to parse anchor rules")?;

    Ok(records
        .into_iter()
        .map(|record| AnchorRule {
            milestone_key: record.milestone_key,
            phase_match: record.phase_match,
            anchor_kind: record.anchor_kind,
            offset_days: record.offset_days,
        })
        .collect())
}
