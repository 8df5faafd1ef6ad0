// ABOUTME: Integration tests for the ideal versus scheduled versus actual adherence timeline
// ABOUTME: Covers scoring, boundary states, future days, windows and the insights service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use common::{block, date, morning, periodized_plan, scored_activity};
use peakform::errors::ErrorCode;
use peakform::intelligence::{
    AdherenceAnalyzer, BoundaryReason, BoundaryState, IntelligenceConfig, PeriodizationPlanner,
};
use peakform::memory::InMemoryStore;
use peakform::models::{
    ActivityCategory, PlannedActivity, SessionRange, TrainingPhase, TrainingPlan,
};
use peakform::providers::PlanStore;
use peakform::services::InsightsService;
use uuid::Uuid;

fn maintenance(athlete: Uuid, weekly: f64, created: NaiveDate) -> TrainingPlan {
    PeriodizationPlanner::maintenance_plan(
        athlete,
        weekly,
        SessionRange { min: 4, max: 6 },
        morning(created),
    )
    .unwrap()
}

fn planned(athlete: Uuid, day: NaiveDate, tss: Option<f64>) -> PlannedActivity {
    PlannedActivity {
        id: Uuid::new_v4(),
        athlete_id: athlete,
        date: day,
        template_name: Some("Tempo intervals".to_owned()),
        category: ActivityCategory::Run,
        estimated_tss: tss,
    }
}

#[test]
fn test_matching_loads_score_full_marks() {
    let athlete = Uuid::new_v4();
    let day = date(2025, 6, 10);
    let plan = maintenance(athlete, 700.0, day);

    let timeline = AdherenceAnalyzer::default()
        .insight_timeline(
            Some(&plan),
            day,
            day,
            &[planned(athlete, day, Some(100.0))],
            &[scored_activity(athlete, day, 100.0, 0.75)],
            day,
        )
        .unwrap();

    assert_eq!(timeline.len(), 1);
    let row = &timeline[0];
    assert!((row.ideal_tss - 100.0).abs() < 1e-9);
    assert!((row.scheduled_tss - 100.0).abs() < 1e-9);
    assert!((row.actual_tss - 100.0).abs() < 1e-9);
    assert!((row.adherence_score - 100.0).abs() < 1e-9);
    assert_eq!(row.boundary_state, BoundaryState::Safe);
    assert!(row.boundary_reasons.is_empty());
}

#[test]
fn test_overshoot_raises_boundaries() {
    let athlete = Uuid::new_v4();
    let day = date(2025, 6, 10);
    let plan = maintenance(athlete, 700.0, day);
    let analyzer = AdherenceAnalyzer::default();

    let caution = analyzer
        .insight_timeline(
            Some(&plan),
            day,
            day,
            &[planned(athlete, day, Some(120.0))],
            &[scored_activity(athlete, day, 140.0, 0.8)],
            day,
        )
        .unwrap();
    let row = &caution[0];
    assert_eq!(row.boundary_state, BoundaryState::Caution);
    assert_eq!(
        row.boundary_reasons,
        vec![
            BoundaryReason::ScheduledExceedsIdeal,
            BoundaryReason::ActualExceedsScheduled
        ]
    );
    assert!((row.adherence_score - 82.3).abs() < 1e-9);

    let exceeded = analyzer
        .insight_timeline(
            Some(&plan),
            day,
            day,
            &[planned(athlete, day, Some(100.0))],
            &[scored_activity(athlete, day, 150.0, 0.9)],
            day,
        )
        .unwrap();
    assert_eq!(exceeded[0].boundary_state, BoundaryState::Exceeded);
    assert_eq!(
        exceeded[0].boundary_reasons,
        vec![BoundaryReason::ActualExceedsScheduled]
    );
}

#[test]
fn test_future_days_score_schedule_only() {
    let athlete = Uuid::new_v4();
    let today = date(2025, 6, 10);
    let plan = maintenance(athlete, 700.0, today);
    let tomorrow = today + Duration::days(1);

    let timeline = AdherenceAnalyzer::default()
        .insight_timeline(
            Some(&plan),
            today,
            tomorrow,
            &[
                planned(athlete, today, Some(100.0)),
                planned(athlete, tomorrow, Some(100.0)),
            ],
            &[],
            today,
        )
        .unwrap();

    assert_eq!(timeline.len(), 2);
    // Today was skipped, tomorrow is on schedule
    assert!((timeline[0].adherence_score - 30.0).abs() < 1e-9);
    assert!((timeline[1].adherence_score - 100.0).abs() < 1e-9);
    assert_eq!(timeline[1].boundary_state, BoundaryState::Safe);
}

#[test]
fn test_days_without_plan_or_schedule() {
    let athlete = Uuid::new_v4();
    let day = date(2025, 6, 10);

    let timeline = AdherenceAnalyzer::default()
        .insight_timeline(
            None,
            day,
            day + Duration::days(1),
            &[planned(athlete, day, None)],
            &[scored_activity(athlete, day + Duration::days(1), 60.0, 0.7)],
            day + Duration::days(1),
        )
        .unwrap();

    assert!((timeline[0].adherence_score - 100.0).abs() < 1e-9);
    // Unplanned work against a zero baseline
    assert!((timeline[1].adherence_score - 65.0).abs() < 1e-9);
    assert_eq!(timeline[1].boundary_state, BoundaryState::Safe);
    assert!(timeline
        .iter()
        .all(|row| (0.0..=100.0).contains(&row.adherence_score)));
}

#[test]
fn test_ideal_follows_plan_blocks() {
    let athlete = Uuid::new_v4();
    let start = date(2025, 6, 2);
    let plan = periodized_plan(
        athlete,
        vec![
            block("Base", TrainingPhase::Base, start, 7, 350.0),
            block("Build", TrainingPhase::Build, start + Duration::days(7), 7, 420.0),
        ],
    );

    assert!((AdherenceAnalyzer::ideal_daily_tss(Some(&plan), start) - 50.0).abs() < 1e-9);
    assert!(
        (AdherenceAnalyzer::ideal_daily_tss(Some(&plan), start + Duration::days(7)) - 60.0).abs()
            < 1e-9
    );
    assert!(
        AdherenceAnalyzer::ideal_daily_tss(Some(&plan), start + Duration::days(14)).abs()
            < f64::EPSILON
    );
    assert!(AdherenceAnalyzer::ideal_daily_tss(None, start).abs() < f64::EPSILON);
}

#[test]
fn test_timeline_window_is_validated() {
    let analyzer = AdherenceAnalyzer::default();
    let day = date(2025, 6, 10);

    let reversed = analyzer
        .insight_timeline(None, day, day - Duration::days(1), &[], &[], day)
        .unwrap_err();
    assert_eq!(reversed.code, ErrorCode::InvalidInput);

    let oversized = analyzer
        .insight_timeline(None, day, day + Duration::days(400), &[], &[], day)
        .unwrap_err();
    assert_eq!(oversized.code, ErrorCode::InvalidInput);

    let full = analyzer
        .insight_timeline(None, day, day + Duration::days(399), &[], &[], day)
        .unwrap();
    assert_eq!(full.len(), 400);
}

#[tokio::test]
async fn test_service_timeline_heals_duplicate_active_plans() {
    let athlete = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    let day = date(2025, 6, 10);

    let mut older = maintenance(athlete, 350.0, day - Duration::days(30));
    older.is_active = true;
    let mut newer = maintenance(athlete, 700.0, day - Duration::days(2));
    newer.is_active = true;
    let newer_id = newer.id;
    store.save_plan(older).await.unwrap();
    store.save_plan(newer).await.unwrap();

    store.insert_planned(planned(athlete, day, Some(100.0))).await;
    store
        .insert_activity(scored_activity(athlete, day, 100.0, 0.75))
        .await
        .unwrap();

    let service = InsightsService::new(Arc::clone(&store), &IntelligenceConfig::default());
    let timeline = service
        .insight_timeline(athlete, day, day + Duration::days(2), day)
        .await
        .unwrap();

    assert_eq!(timeline.len(), 3);
    assert!(timeline.iter().all(|row| (row.ideal_tss - 100.0).abs() < 1e-9));
    assert!((timeline[0].adherence_score - 100.0).abs() < 1e-9);

    let active: Vec<Uuid> = store
        .plans_for(athlete)
        .await
        .into_iter()
        .filter(|plan| plan.is_active)
        .map(|plan| plan.id)
        .collect();
    assert_eq!(active, vec![newer_id]);
}

#[tokio::test]
async fn test_service_timeline_reports_athlete_on_bad_window() {
    let athlete = Uuid::new_v4();
    let service = InsightsService::new(
        Arc::new(InMemoryStore::new()),
        &IntelligenceConfig::default(),
    );
    let day = date(2025, 6, 10);
    let error = service
        .insight_timeline(athlete, day, day - Duration::days(3), day)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.athlete_id, Some(athlete));
}
