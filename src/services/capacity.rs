//! Weekly resource capacity, allocation, and overbooking.
//!
//! The ledger is always recomputed from the current resources, blackouts,
//! and allocations; nothing is maintained incrementally, so it cannot
//! drift. Each week bucket covers 5 working days keyed by its Monday.

use serde::{Deserialize, Serialize};

use crate::algorithms::intervals;
use crate::core::domain::{Allocation, Blackout, Resource, ResourceId};
use crate::time::Day;

/// Working days per week bucket.
pub const WORKING_DAYS_PER_WEEK: i64 = 5;

/// Default rolling horizon, in weeks.
pub const DEFAULT_HORIZON_WEEKS: usize = 12;

/// Data-integrity failures in ledger inputs. Malformed intervals are
/// rejected, never coerced.
#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("blackout for resource {resource} ends {end} before it starts {start}")]
    InvalidBlackout {
        resource: ResourceId,
        start: Day,
        end: Day,
    },

    #[error("allocation of resource {resource} to '{phase}' ends {end} before it starts {start}")]
    InvalidAllocation {
        resource: ResourceId,
        phase: String,
        start: Day,
        end: Day,
    },
}

/// One cell of the utilization grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUtilization {
    pub resource: ResourceId,
    pub resource_name: String,
    pub week_start: Day,
    pub total_capacity: f64,
    pub allocated: f64,
    pub utilization_percent: f64,
    pub is_overbooked: bool,
}

/// An overbooked cell, extracted for alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverbookedCell {
    pub week_start: Day,
    pub resource_name: String,
    pub allocated: f64,
    pub total_capacity: f64,
}

/// Dense utilization grid over the horizon, plus the overbooked cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityGrid {
    /// Monday keys for every week in the horizon, ascending.
    pub weeks: Vec<Day>,
    /// One cell per active resource per week, resources in input order.
    pub cells: Vec<WeeklyUtilization>,
    /// Cells where allocation exceeds capacity, by week then resource name.
    pub overbooked: Vec<OverbookedCell>,
}

fn check_inputs(blackouts: &[Blackout], allocations: &[Allocation]) -> Result<(), CapacityError> {
    for blackout in blackouts {
        if blackout.end_date < blackout.start_date {
            return Err(CapacityError::InvalidBlackout {
                resource: blackout.resource,
                start: blackout.start_date,
                end: blackout.end_date,
            });
        }
    }
    for allocation in allocations {
        if allocation.end_date < allocation.start_date {
            return Err(CapacityError::InvalidAllocation {
                resource: allocation.resource,
                phase: allocation.phase_name.clone(),
                start: allocation.start_date,
                end: allocation.end_date,
            });
        }
    }
    Ok(())
}

/// Compute the weekly utilization grid for all active resources.
///
/// For each resource and week:
/// `total_capacity = max(capacity_per_day * 5 - blackout_days, 0)` and
/// `allocated = sum(min(overlap_days, 5))` over the resource's allocations,
/// counting each overlapping calendar day once. The overbooked flag compares
/// raw allocation against capacity, so a zero-capacity week with any
/// allocation is still flagged rather than hidden behind a zero percentage.
pub fn compute_utilization(
    resources: &[Resource],
    blackouts: &[Blackout],
    allocations: &[Allocation],
    horizon_weeks: usize,
    reference_week_start: Day,
) -> Result<CapacityGrid, CapacityError> {
    check_inputs(blackouts, allocations)?;

    let weeks = intervals::week_starts(reference_week_start, horizon_weeks);
    let mut cells = Vec::with_capacity(resources.len() * weeks.len());

    for resource in resources.iter().filter(|r| r.active) {
        for &week_start in &weeks {
            let week_end = week_start.add_days(6);

            let blackout_days: i64 = blackouts
                .iter()
                .filter(|b| b.resource == resource.id)
                .map(|b| {
                    intervals::overlap_days_clamped(
                        b.start_date,
                        b.end_date,
                        week_start,
                        week_end,
                    )
                })
                .sum();

            let total_capacity = (resource.capacity_per_day * WORKING_DAYS_PER_WEEK as f64
                - blackout_days as f64)
                .max(0.0);

            let allocated: f64 = allocations
                .iter()
                .filter(|a| a.resource == resource.id)
                .map(|a| {
                    intervals::overlap_days_clamped(
                        a.start_date,
                        a.end_date,
                        week_start,
                        week_end,
                    )
                    .min(WORKING_DAYS_PER_WEEK) as f64
                })
                .sum();

            let utilization_percent = if total_capacity > 0.0 {
                allocated / total_capacity * 100.0
            } else {
                0.0
            };

            cells.push(WeeklyUtilization {
                resource: resource.id,
                resource_name: resource.name.clone(),
                week_start,
                total_capacity,
                allocated,
                utilization_percent,
                is_overbooked: allocated > total_capacity,
            });
        }
    }

    let mut overbooked: Vec<OverbookedCell> = cells
        .iter()
        .filter(|cell| cell.is_overbooked)
        .map(|cell| OverbookedCell {
            week_start: cell.week_start,
            resource_name: cell.resource_name.clone(),
            allocated: cell.allocated,
            total_capacity: cell.total_capacity,
        })
        .collect();
    overbooked.sort_by(|a, b| {
        a.week_start
            .cmp(&b.week_start)
            .then_with(|| a.resource_name.cmp(&b.resource_name))
    });

    Ok(CapacityGrid {
        weeks,
        cells,
        overbooked,
    })
}
