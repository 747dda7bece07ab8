//! Apply a bulk shift to a timeline file and print the result.
//!
//! Usage:
//!   shift_schedule <timeline.json> <phase[,phase...]> <delta_days> [--cascade] [--actor NAME]
//!
//! Loads the timeline into an in-memory repository, runs the shift through
//! the engine, and prints the audit trail and change notices.

use anyhow::{bail, Context, Result};
use chrono::Utc;

use sitetrack_engine::core::domain::Snapshot;
use sitetrack_engine::db::{get_repository, services, ProjectRepository};
use sitetrack_engine::parsing::parse_timeline_file;
use sitetrack_engine::services::shift::parse_delta_days;

struct Args {
    timeline_path: std::path::PathBuf,
    phase_names: Vec<String>,
    delta_days: i64,
    cascade: bool,
    actor: String,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut cascade = false;
    let mut actor = "cli".to_string();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cascade" => cascade = true,
            "--actor" => {
                actor = args
                    .next()
                    .context("--actor requires a value")?;
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 3 {
        bail!(
            "usage: shift_schedule <timeline.json> <phase[,phase...]> <delta_days> [--cascade] [--actor NAME]"
        );
    }

    let delta_days =
        parse_delta_days(&positional[2]).context("delta_days must be a whole number of days")?;

    Ok(Args {
        timeline_path: positional[0].clone().into(),
        phase_names: positional[1]
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        delta_days,
        cascade,
        actor,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let (project, phases) = parse_timeline_file(&args.timeline_path)?;
    println!(
        "Loaded project {} with {} phase(s) from {}",
        project,
        phases.len(),
        args.timeline_path.display()
    );

    let repo = get_repository()?;
    repo.store_snapshot(project, &Snapshot::new(phases, Utc::now()))
        .await
        .context("failed to store the loaded timeline")?;

    let outcome = services::bulk_shift_schedule(
        repo.as_ref(),
        project,
        &args.phase_names,
        args.delta_days,
        args.cascade,
        &args.actor,
    )
    .await
    .context("bulk shift failed")?;

    if outcome.audit.is_empty() {
        println!("No phases were shifted.");
        return Ok(());
    }

    println!("\nShifted {} phase(s):", outcome.audit.len());
    for entry in &outcome.audit {
        println!(
            "  {}: {} .. {}  ->  {} .. {}  ({:+} day(s), cascade={})",
            entry.phase_name,
            entry.start_before,
            entry.end_before,
            entry.start_after,
            entry.end_after,
            entry.delta_days,
            entry.cascade,
        );
    }

    println!("\nChange notices:");
    for notice in &outcome.notices {
        println!("  - {}", notice);
    }

    Ok(())
}
