// ABOUTME: Integration tests for goal-to-plan expansion and plan structure checks
// ABOUTME: Covers deterministic ids, contiguous phase blocks, block lookup and ramp warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, NaiveDate};
use common::{block, date, fitness_goal, morning, periodized_plan, race_goal};
use peakform::errors::ErrorCode;
use peakform::intelligence::{
    FeasibilityAssessor, FeasibilityState, PeriodizationPlanner, PlanWarningLevel, SafetyState,
    StructureIssue,
};
use peakform::models::{
    MinimalGoal, PlanStructure, SessionRange, TrainingBlock, TrainingPhase, TrainingPlan,
    TssRange,
};
use uuid::Uuid;

const TODAY: (i32, u32, u32) = (2025, 1, 6);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

fn twenty_week_plan(athlete: Uuid) -> TrainingPlan {
    PeriodizationPlanner::default()
        .expand_minimal_goal_to_plan(
            athlete,
            &[race_goal("Spring marathon", today() + Duration::days(139), 9)],
            today(),
            45.0,
        )
        .unwrap()
}

fn blocks_mut(plan: &mut TrainingPlan) -> &mut Vec<TrainingBlock> {
    match &mut plan.structure {
        PlanStructure::Periodized { blocks, .. } => blocks,
        PlanStructure::Maintenance { .. } => panic!("expected a periodized plan"),
    }
}

#[test]
fn test_expansion_is_deterministic() {
    let athlete = Uuid::new_v4();
    let planner = PeriodizationPlanner::default();
    let goals = vec![
        race_goal("Spring marathon", today() + Duration::days(139), 9),
        fitness_goal("Base block", today() + Duration::days(60), 70.0),
    ];
    let reversed: Vec<MinimalGoal> = goals.iter().rev().cloned().collect();

    let first = planner
        .expand_minimal_goal_to_plan(athlete, &goals, today(), 45.0)
        .unwrap();
    let second = planner
        .expand_minimal_goal_to_plan(athlete, &reversed, today(), 45.0)
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.blocks(), second.blocks());
    assert_eq!(first.goals(), second.goals());
    assert_eq!(first.fitness_progression(), second.fitness_progression());

    let other_day = planner
        .expand_minimal_goal_to_plan(athlete, &goals, today() + Duration::days(1), 45.0)
        .unwrap();
    assert_ne!(first.id, other_day.id);

    let other_athlete = planner
        .expand_minimal_goal_to_plan(Uuid::new_v4(), &goals, today(), 45.0)
        .unwrap();
    assert_ne!(first.id, other_athlete.id);
}

#[test]
fn test_blocks_are_contiguous_and_end_on_goal_date() {
    let plan = twenty_week_plan(Uuid::new_v4());
    let blocks = plan.blocks();

    assert_eq!(blocks[0].start_date, today());
    assert_eq!(
        blocks.last().unwrap().end_date,
        today() + Duration::days(139)
    );
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].start_date, pair[0].end_date + Duration::days(1));
    }
    assert!(blocks.iter().all(|b| b.duration_days() <= 28));
    assert_eq!(blocks[0].phase, TrainingPhase::Base);
    assert_eq!(blocks.last().unwrap().phase, TrainingPhase::Taper);
    assert!(blocks.iter().all(|b| b.target_weekly_tss.min <= b.target_weekly_tss.max));
    assert!(PeriodizationPlanner::validate_plan_structure(&plan).is_valid());
    assert!(!plan.is_active);
    assert_eq!(plan.version, 1);
}

#[test]
fn test_taper_drops_below_peak_load() {
    let plan = twenty_week_plan(Uuid::new_v4());
    let blocks = plan.blocks();
    let taper = blocks.last().unwrap();
    let peak = &blocks[blocks.len() - 2];
    assert_eq!(peak.phase, TrainingPhase::Peak);
    assert!(taper.target_weekly_tss.midpoint() < peak.target_weekly_tss.midpoint());
}

#[test]
fn test_find_block_for_date_is_inclusive() {
    let plan = twenty_week_plan(Uuid::new_v4());
    let first = &plan.blocks()[0];

    let at_start = PeriodizationPlanner::find_block_for_date(&plan, first.start_date).unwrap();
    assert_eq!(at_start.name, first.name);
    let at_end = PeriodizationPlanner::find_block_for_date(&plan, first.end_date).unwrap();
    assert_eq!(at_end.name, first.name);
    let next = PeriodizationPlanner::find_block_for_date(
        &plan,
        first.end_date + Duration::days(1),
    )
    .unwrap();
    assert_ne!(next.name, first.name);

    assert!(
        PeriodizationPlanner::find_block_for_date(&plan, today() - Duration::days(1)).is_none()
    );
    assert!(PeriodizationPlanner::find_block_for_date(
        &plan,
        today() + Duration::days(140)
    )
    .is_none());
}

#[test]
fn test_expansion_rejects_invalid_requests() {
    let planner = PeriodizationPlanner::default();
    let athlete = Uuid::new_v4();

    let empty = planner
        .expand_minimal_goal_to_plan(athlete, &[], today(), 40.0)
        .unwrap_err();
    assert_eq!(empty.code, ErrorCode::MissingRequiredField);

    let past = planner
        .expand_minimal_goal_to_plan(
            athlete,
            &[race_goal("Last year", today() - Duration::days(3), 5)],
            today(),
            40.0,
        )
        .unwrap_err();
    assert_eq!(past.code, ErrorCode::InvalidInput);

    let priority = planner
        .expand_minimal_goal_to_plan(
            athlete,
            &[race_goal("Too important", today() + Duration::days(90), 11)],
            today(),
            40.0,
        )
        .unwrap_err();
    assert_eq!(priority.code, ErrorCode::ValueOutOfRange);

    let ctl = planner
        .expand_minimal_goal_to_plan(
            athlete,
            &[race_goal("Race", today() + Duration::days(90), 5)],
            today(),
            f64::NAN,
        )
        .unwrap_err();
    assert_eq!(ctl.code, ErrorCode::ValueOutOfRange);
    assert_eq!(ctl.http_status(), 400);
}

#[test]
fn test_goal_on_today_yields_single_taper_day() {
    let plan = PeriodizationPlanner::default()
        .expand_minimal_goal_to_plan(
            Uuid::new_v4(),
            &[race_goal("Time trial", today(), 6)],
            today(),
            50.0,
        )
        .unwrap();
    let blocks = plan.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].phase, TrainingPhase::Taper);
    assert_eq!(blocks[0].start_date, today());
    assert_eq!(blocks[0].end_date, today());
}

#[test]
fn test_structure_check_reports_every_issue() {
    let mut plan = twenty_week_plan(Uuid::new_v4());
    {
        let blocks = blocks_mut(&mut plan);
        blocks[1].start_date += Duration::days(2);
        blocks[2].target_weekly_tss = TssRange {
            min: 500.0,
            max: 100.0,
        };
        blocks[3].target_sessions = SessionRange { min: 6, max: 2 };
        blocks.swap(0, 4);
    }

    let validation = PeriodizationPlanner::validate_plan_structure(&plan);
    assert!(!validation.is_valid());
    let issues = validation.issues();
    assert!(issues
        .iter()
        .any(|i| matches!(i, StructureIssue::InvalidTssRange { .. })));
    assert!(issues
        .iter()
        .any(|i| matches!(i, StructureIssue::InvalidSessionRange { .. })));
    assert!(issues
        .iter()
        .any(|i| matches!(i, StructureIssue::PhaseOutOfOrder { .. })));
    assert!(issues
        .iter()
        .any(|i| matches!(i, StructureIssue::Overlap { .. } | StructureIssue::Gap { .. })));
}

#[test]
fn test_structure_check_flags_empty_plan_and_stray_goal() {
    let mut plan = twenty_week_plan(Uuid::new_v4());
    blocks_mut(&mut plan).clear();
    let validation = PeriodizationPlanner::validate_plan_structure(&plan);
    assert_eq!(validation.issues(), &[StructureIssue::NoBlocks]);

    let mut shortened = twenty_week_plan(Uuid::new_v4());
    blocks_mut(&mut shortened).pop();
    let validation = PeriodizationPlanner::validate_plan_structure(&shortened);
    assert!(validation
        .issues()
        .iter()
        .any(|i| matches!(i, StructureIssue::GoalOutsidePlan { .. })));
}

#[test]
fn test_block_ramp_warnings() {
    let start = date(2025, 2, 3);
    let plan = periodized_plan(
        Uuid::new_v4(),
        vec![
            block("Base", TrainingPhase::Base, start, 28, 300.0),
            block("Build 1", TrainingPhase::Build, start + Duration::days(28), 28, 360.0),
            block("Build 2", TrainingPhase::Build, start + Duration::days(56), 28, 480.0),
            block("Taper", TrainingPhase::Taper, start + Duration::days(84), 7, 250.0),
        ],
    );
    assert!(PeriodizationPlanner::validate_plan_structure(&plan).is_valid());

    let warnings = PeriodizationPlanner::default().validate_plan_feasibility(&plan);
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].level, PlanWarningLevel::Caution);
    assert_eq!(warnings[0].to_block, "Build 1");
    assert!((warnings[0].increase_percent - 20.0).abs() < 1e-9);
    assert_eq!(warnings[0].reason_code(), "block_ramp_caution");
    assert_eq!(warnings[1].level, PlanWarningLevel::Excessive);
    assert!((warnings[1].increase_percent - 33.3).abs() < 1e-9);
}

#[test]
fn test_default_expansions_pass_their_own_ramp_check() {
    let planner = PeriodizationPlanner::default();
    let assessor = FeasibilityAssessor::default();

    for starting_ctl in [0.0, 20.0, 40.0, 60.0] {
        for weeks in [9_i64, 12, 20, 30] {
            let goal = race_goal("Target race", today() + Duration::days(weeks * 7 - 1), 5);
            let plan = planner
                .expand_minimal_goal_to_plan(Uuid::new_v4(), &[goal], today(), starting_ctl)
                .unwrap();
            let context = format!("CTL {starting_ctl}, {weeks} weeks");

            assert!(
                planner.validate_plan_feasibility(&plan).is_empty(),
                "{context}"
            );
            let assessment = assessor.assess_plan(&plan, today(), Some(starting_ctl));
            assert_eq!(assessment.safety.state, SafetyState::Safe, "{context}");
            assert_eq!(
                assessment.feasibility.state,
                FeasibilityState::Feasible,
                "{context}"
            );

            let blocks = plan.blocks();
            let taper = blocks.last().unwrap();
            let peak = &blocks[blocks.len() - 2];
            assert_eq!(taper.phase, TrainingPhase::Taper, "{context}");
            assert!(
                taper.target_weekly_tss.midpoint() < peak.target_weekly_tss.midpoint(),
                "{context}"
            );
        }
    }
}

#[test]
fn test_maintenance_plan_validation() {
    let athlete = Uuid::new_v4();
    let now = morning(today());

    let plan =
        PeriodizationPlanner::maintenance_plan(athlete, 420.0, SessionRange { min: 3, max: 5 }, now)
            .unwrap();
    assert!(plan.blocks().is_empty());
    assert!(plan.fitness_progression().is_none());
    assert!(PeriodizationPlanner::validate_plan_structure(&plan).is_valid());

    let negative =
        PeriodizationPlanner::maintenance_plan(athlete, -1.0, SessionRange { min: 3, max: 5 }, now)
            .unwrap_err();
    assert_eq!(negative.code, ErrorCode::ValueOutOfRange);

    let inverted =
        PeriodizationPlanner::maintenance_plan(athlete, 300.0, SessionRange { min: 5, max: 3 }, now)
            .unwrap_err();
    assert_eq!(inverted.code, ErrorCode::ValueOutOfRange);
}
