//! Financial milestone dates derived from anchor rules.
//!
//! Draw schedules and payment milestones are anchored to schedule events
//! through configured rules. Evaluation is pure and idempotent: re-running
//! against an unchanged timeline and unchanged external inputs yields
//! bit-identical output. A rule that matches nothing leaves its milestone
//! unset; that is an answer, not an error.

use std::collections::{BTreeMap, HashMap};

use crate::core::domain::{AnchorKind, AnchorRule, Phase};
use crate::time::Day;

/// Dates supplied by the caller for [`AnchorKind::ExternalEvent`] rules,
/// keyed by milestone key. Approval timestamps and similar events live
/// outside the timeline entirely.
pub type ExternalEvents = HashMap<String, Day>;

/// First phase (in list order) whose name contains `pattern`,
/// case-insensitively.
fn match_phase<'a>(phases: &'a [Phase], pattern: &str) -> Option<&'a Phase> {
    let needle = pattern.to_lowercase();
    phases
        .iter()
        .find(|phase| phase.name.to_lowercase().contains(&needle))
}

/// Evaluate one rule against the timeline.
pub fn evaluate_rule(
    phases: &[Phase],
    rule: &AnchorRule,
    external: &ExternalEvents,
) -> Option<Day> {
    match rule.anchor_kind {
        AnchorKind::PhaseEnd => match_phase(phases, &rule.phase_match)?.end_date,
        AnchorKind::PhaseStartMinusN => match_phase(phases, &rule.phase_match)?
            .start_date
            .map(|start| start.add_days(-rule.offset_days)),
        AnchorKind::ProjectFinalEnd => phases.iter().filter_map(|p| p.end_date).max(),
        AnchorKind::ExternalEvent => external.get(&rule.milestone_key).copied(),
    }
}

/// Evaluate every rule, returning each milestone's derived due date.
///
/// The map is keyed by milestone key and ordered, so repeated runs over the
/// same inputs serialize identically. `None` means the milestone is unset.
pub fn evaluate_rules(
    phases: &[Phase],
    rules: &[AnchorRule],
    external: &ExternalEvents,
) -> BTreeMap<String, Option<Day>> {
    rules
        .iter()
        .map(|rule| {
            (
                rule.milestone_key.clone(),
                evaluate_rule(phases, rule, external),
            )
        })
        .collect()
}
