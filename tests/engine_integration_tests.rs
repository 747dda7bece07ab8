//! End-to-end tests of the engine service layer over the local repository.

use chrono::Utc;
use sitetrack_engine::core::domain::{
    Allocation, AnchorKind, AnchorRule, Blackout, Phase, ProjectId, Resource, ResourceId,
    Snapshot,
};
use sitetrack_engine::db::{services, EngineError, LocalRepository, ProjectRepository};
use sitetrack_engine::services::shift::ShiftError;
use sitetrack_engine::time::Day;

fn day(s: &str) -> Day {
    Day::parse(s).unwrap()
}

fn phase(name: &str, sort_order: i32, start: &str, end: &str, dep: Option<usize>) -> Phase {
    Phase {
        name: name.to_string(),
        sort_order,
        start_date: Some(day(start)),
        end_date: Some(day(end)),
        dependency: dep,
        resource: None,
    }
}

/// Foundation <- Framing <- Roofing, plus an independent Insulation phase.
fn seeded_repo(project: ProjectId) -> LocalRepository {
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![
                phase("Foundation", 1, "2024-01-02", "2024-01-31", None),
                phase("Framing", 2, "2024-02-01", "2024-02-14", Some(0)),
                phase("Roofing", 3, "2024-02-15", "2024-02-28", Some(1)),
                phase("Insulation", 4, "2024-03-01", "2024-03-10", None),
            ],
            Utc::now(),
        ),
    );
    repo
}

#[tokio::test]
async fn progress_reflects_the_reference_day() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    let progress = services::project_progress(&repo, project, day("2024-02-05"))
        .await
        .unwrap();
    assert_eq!(progress.current_phase, "Framing");
    assert_eq!(progress.progress_percent, 40);

    let later = services::project_progress(&repo, project, day("2024-04-01"))
        .await
        .unwrap();
    assert_eq!(later.current_phase, "Insulation");
    assert_eq!(later.progress_percent, 60);
}

#[tokio::test]
async fn corrupt_timeline_is_rejected_as_a_validation_error() {
    let project = ProjectId(8);
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![phase("Framing", 1, "2024-02-14", "2024-02-01", None)],
            Utc::now(),
        ),
    );

    let result = services::project_progress(&repo, project, day("2024-02-05")).await;
    assert!(matches!(
        result,
        Err(sitetrack_engine::db::RepositoryError::ValidationError(_))
    ));
}

#[tokio::test]
async fn cascade_shift_moves_dependents_and_writes_audit() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    let outcome = services::bulk_shift_schedule(
        &repo,
        project,
        &["Foundation".to_string()],
        5,
        true,
        "pm",
    )
    .await
    .unwrap();

    // Foundation, Framing, and Roofing move; Insulation is independent.
    assert_eq!(outcome.audit.len(), 3);
    let phases = repo.load_phases(project).await.unwrap();
    assert_eq!(phases[0].start_date, Some(day("2024-01-07")));
    assert_eq!(phases[1].start_date, Some(day("2024-02-06")));
    assert_eq!(phases[2].start_date, Some(day("2024-02-20")));
    assert_eq!(phases[3].start_date, Some(day("2024-03-01")));

    // Each shifted phase reports a move notice.
    assert_eq!(outcome.notices.len(), 3);
    assert!(outcome
        .notices
        .contains(&"Framing was moved later by 5 day(s)".to_string()));
}

#[tokio::test]
async fn non_cascade_shift_moves_only_the_selected_phase() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    services::bulk_shift_schedule(&repo, project, &["Foundation".to_string()], 5, false, "pm")
        .await
        .unwrap();

    let phases = repo.load_phases(project).await.unwrap();
    assert_eq!(phases[0].start_date, Some(day("2024-01-07")));
    assert_eq!(phases[1].start_date, Some(day("2024-02-01")));
}

#[tokio::test]
async fn shift_round_trip_restores_the_original_timeline() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);
    let original = repo.load_phases(project).await.unwrap();

    for delta in [9, -9] {
        services::bulk_shift_schedule(
            &repo,
            project,
            &["Framing".to_string(), "Insulation".to_string()],
            delta,
            false,
            "pm",
        )
        .await
        .unwrap();
    }

    assert_eq!(repo.load_phases(project).await.unwrap(), original);
    // Both edits are retained in history and the audit trail.
    assert_eq!(repo.load_snapshots(project).await.unwrap().len(), 3);
    assert_eq!(repo.list_audit_entries(project).await.unwrap().len(), 4);
}

#[tokio::test]
async fn zero_delta_writes_nothing() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    let outcome =
        services::bulk_shift_schedule(&repo, project, &["Framing".to_string()], 0, true, "pm")
            .await
            .unwrap();

    assert!(outcome.audit.is_empty());
    assert!(outcome.notices.is_empty());
    assert_eq!(repo.load_snapshots(project).await.unwrap().len(), 1);
}

#[tokio::test]
async fn dependency_cycle_aborts_without_writing() {
    let project = ProjectId(1);
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![
                phase("Framing", 1, "2024-02-01", "2024-02-14", Some(1)),
                phase("Roofing", 2, "2024-02-15", "2024-02-28", Some(0)),
            ],
            Utc::now(),
        ),
    );

    let result =
        services::bulk_shift_schedule(&repo, project, &["Framing".to_string()], 5, true, "pm")
            .await;
    assert!(matches!(
        result,
        Err(EngineError::Shift(ShiftError::Graph(_)))
    ));

    let phases = repo.load_phases(project).await.unwrap();
    assert_eq!(phases[0].start_date, Some(day("2024-02-01")));
    assert!(repo.list_audit_entries(project).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_phase_name_is_rejected_before_writing() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    let result =
        services::bulk_shift_schedule(&repo, project, &["Sitework".to_string()], 5, false, "pm")
            .await;
    assert!(matches!(result, Err(EngineError::UnknownPhaseName(name)) if name == "Sitework"));
    assert_eq!(repo.load_snapshots(project).await.unwrap().len(), 1);
}

#[tokio::test]
async fn milestones_follow_the_schedule() {
    let project = ProjectId(2);
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![
                phase("Framing Crew", 1, "2024-02-01", "2024-02-14", None),
                phase("Insulation", 2, "2024-03-01", "2024-03-10", None),
            ],
            Utc::now(),
        ),
    );
    repo.set_anchor_rules(
        project,
        vec![
            AnchorRule {
                milestone_key: "Draw5".to_string(),
                phase_match: "insulation".to_string(),
                anchor_kind: AnchorKind::PhaseStartMinusN,
                offset_days: 1,
            },
            AnchorRule {
                milestone_key: "Draw7".to_string(),
                phase_match: String::new(),
                anchor_kind: AnchorKind::ProjectFinalEnd,
                offset_days: 0,
            },
        ],
    );

    let report = services::recompute_milestones(&repo, project, &Default::default())
        .await
        .unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.dates["Draw5"], Some(day("2024-02-29")));
    assert_eq!(report.dates["Draw7"], Some(day("2024-03-10")));

    // Re-running over the unchanged timeline derives the same dates.
    let again = services::recompute_milestones(&repo, project, &Default::default())
        .await
        .unwrap();
    assert_eq!(again.dates, report.dates);
}

#[tokio::test]
async fn one_failed_milestone_write_does_not_block_the_rest() {
    let project = ProjectId(2);
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![phase("Insulation", 1, "2024-03-01", "2024-03-10", None)],
            Utc::now(),
        ),
    );
    repo.set_anchor_rules(
        project,
        vec![
            AnchorRule {
                milestone_key: "Draw5".to_string(),
                phase_match: "insulation".to_string(),
                anchor_kind: AnchorKind::PhaseEnd,
                offset_days: 0,
            },
            AnchorRule {
                milestone_key: "Draw7".to_string(),
                phase_match: String::new(),
                anchor_kind: AnchorKind::ProjectFinalEnd,
                offset_days: 0,
            },
        ],
    );
    repo.fail_milestone_key("Draw5");

    let report = services::recompute_milestones(&repo, project, &Default::default())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "Draw5");

    use sitetrack_engine::db::MilestoneRepository;
    let persisted = repo.load_milestone_dates(project).await.unwrap();
    assert_eq!(persisted.get("Draw7"), Some(&Some(day("2024-03-10"))));
    assert!(!persisted.contains_key("Draw5"));
}

#[tokio::test]
async fn utilization_grid_flags_overbooked_weeks() {
    let repo = LocalRepository::new();
    repo.add_resource(Resource {
        id: ResourceId(1),
        name: "Framing Crew".to_string(),
        capacity_per_day: 1.0,
        active: true,
    });
    repo.add_blackout(Blackout {
        resource: ResourceId(1),
        start_date: day("2024-04-01"),
        end_date: day("2024-04-07"),
    });
    repo.add_allocation(Allocation {
        resource: ResourceId(1),
        phase_name: "Framing".to_string(),
        start_date: day("2024-04-02"),
        end_date: day("2024-04-03"),
    });

    let grid = services::utilization_grid(&repo, 2, day("2024-04-01"))
        .await
        .unwrap();

    assert_eq!(grid.weeks.len(), 2);
    assert_eq!(grid.cells.len(), 2);

    let blacked_out = &grid.cells[0];
    assert_eq!(blacked_out.total_capacity, 0.0);
    assert_eq!(blacked_out.allocated, 2.0);
    assert!(blacked_out.is_overbooked);

    let open_week = &grid.cells[1];
    assert_eq!(open_week.total_capacity, 5.0);
    assert_eq!(open_week.allocated, 0.0);
    assert!(!open_week.is_overbooked);

    assert_eq!(grid.overbooked.len(), 1);
    assert_eq!(grid.overbooked[0].week_start, day("2024-04-01"));
}

#[tokio::test]
async fn change_notices_describe_the_latest_edit() {
    let project = ProjectId(3);
    let repo = LocalRepository::new();
    repo.seed_project(
        project,
        Snapshot::new(
            vec![phase("Drywall", 1, "2024-04-01", "2024-04-10", None)],
            Utc::now(),
        ),
    );

    // Single snapshot: nothing to diff against.
    let initial = services::change_notices(&repo, project).await.unwrap();
    assert_eq!(initial, vec!["schedule was updated".to_string()]);

    services::bulk_shift_schedule(&repo, project, &["Drywall".to_string()], 2, false, "pm")
        .await
        .unwrap();

    let notices = services::change_notices(&repo, project).await.unwrap();
    assert_eq!(notices, vec!["Drywall was moved later by 2 day(s)".to_string()]);
}

#[tokio::test]
async fn timeline_layout_spans_the_padded_window() {
    let project = ProjectId(1);
    let repo = seeded_repo(project);

    let layout = services::timeline_layout(&repo, project, 30)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(layout.window_start, day("2023-12-03"));
    assert_eq!(layout.window_end, day("2024-04-09"));
    assert_eq!(layout.bars.len(), 4);
    assert!(layout.bars.iter().all(|b| b.offset >= 0.0 && b.width > 0.0));
    assert!(layout
        .bars
        .iter()
        .all(|b| b.offset + b.width <= 1.0 + 1e-12));
}

#[tokio::test]
async fn concurrent_shifts_on_one_project_serialize_cleanly() {
    let project = ProjectId(9);
    let repo = std::sync::Arc::new(seeded_repo(project));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let repo = std::sync::Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            services::bulk_shift_schedule(
                &*repo,
                project,
                &["Foundation".to_string()],
                1,
                true,
                "pm",
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Four one-day cascading shifts applied in some order: net +4 days.
    let phases = repo.load_phases(project).await.unwrap();
    assert_eq!(phases[0].start_date, Some(day("2024-01-06")));
    assert_eq!(phases[1].start_date, Some(day("2024-02-05")));
    assert_eq!(phases[2].start_date, Some(day("2024-02-19")));
    assert_eq!(repo.load_snapshots(project).await.unwrap().len(), 5);
}
