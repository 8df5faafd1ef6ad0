// ABOUTME: Integration tests for baseline lookup, estimation and athlete onboarding
// ABOUTME: Covers as-of resolution, category fallback, estimate provenance and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{date, morning};
use peakform::errors::ErrorCode;
use peakform::intelligence::{
    ExperienceLevel, IntelligenceConfig, MetricEstimator, OnboardingProfile,
};
use peakform::memory::InMemoryStore;
use peakform::models::{
    ActivityCategory, AthleteBaseline, AthleteThresholds, BaselineKind, BaselineSource,
    MetricConfidence,
};
use peakform::providers::{BaselineMetricReader, BaselineMetricWriter};
use peakform::services::ActivityMetricsService;
use uuid::Uuid;

fn entry(
    athlete: Uuid,
    kind: BaselineKind,
    category: ActivityCategory,
    value: f64,
    recorded_at: DateTime<Utc>,
) -> AthleteBaseline {
    AthleteBaseline {
        id: Uuid::new_v4(),
        athlete_id: athlete,
        kind,
        category,
        value,
        recorded_at,
    }
}

#[test]
fn test_lookup_never_returns_future_entries() {
    let athlete = Uuid::new_v4();
    let as_of = morning(date(2025, 3, 1));
    let ftp = |value, at| entry(athlete, BaselineKind::Ftp, ActivityCategory::Other, value, at);
    let entries = vec![
        ftp(230.0, as_of - Duration::days(60)),
        ftp(245.0, as_of),
        ftp(280.0, as_of + Duration::seconds(1)),
    ];

    let found = MetricEstimator::most_recent_at_or_before(
        &entries,
        BaselineKind::Ftp,
        ActivityCategory::Bike,
        as_of,
    )
    .unwrap();
    assert!((found.value - 245.0).abs() < f64::EPSILON);

    let before_any = MetricEstimator::most_recent_at_or_before(
        &entries,
        BaselineKind::Ftp,
        ActivityCategory::Bike,
        as_of - Duration::days(61),
    );
    assert!(before_any.is_none());
}

#[test]
fn test_category_entries_win_over_general_ones() {
    let athlete = Uuid::new_v4();
    let as_of = morning(date(2025, 3, 1));
    let lthr = |category, value, days_ago| {
        entry(
            athlete,
            BaselineKind::Lthr,
            category,
            value,
            as_of - Duration::days(days_ago),
        )
    };
    let entries = vec![
        lthr(ActivityCategory::Other, 168.0, 1),
        lthr(ActivityCategory::Run, 174.0, 30),
    ];

    let run = MetricEstimator::thresholds_as_of(&entries, ActivityCategory::Run, as_of);
    assert_eq!(run.lthr, Some(174.0));
    let ride = MetricEstimator::thresholds_as_of(&entries, ActivityCategory::Bike, as_of);
    assert_eq!(ride.lthr, Some(168.0));
    assert!(ride.ftp.is_none());
}

#[test]
fn test_known_history_beats_onboarding_answers() {
    let known = AthleteThresholds {
        ftp: Some(300.0),
        ..AthleteThresholds::default()
    };
    let profile = OnboardingProfile {
        ftp: Some(180.0),
        weight_kg: Some(70.0),
        ..OnboardingProfile::default()
    };
    let estimate = MetricEstimator::default().estimate_baselines(&profile, &known);
    assert!((estimate.ftp.value - 300.0).abs() < f64::EPSILON);
    assert_eq!(estimate.ftp.source, BaselineSource::Measured);
    assert_eq!(estimate.confidence, MetricConfidence::Low);
    assert!(estimate.defaults_applied().contains(&BaselineKind::Lthr));
    assert!(!estimate.defaults_applied().contains(&BaselineKind::Ftp));
}

#[test]
fn test_log_entries_skip_defaults() {
    let athlete = Uuid::new_v4();
    let now = morning(date(2025, 3, 1));
    let profile = OnboardingProfile {
        weight_kg: Some(80.0),
        experience: Some(ExperienceLevel::Beginner),
        ..OnboardingProfile::default()
    };
    let estimate =
        MetricEstimator::default().estimate_baselines(&profile, &AthleteThresholds::default());
    let entries = estimate.to_log_entries(athlete, ActivityCategory::Other, now);

    let kinds: Vec<BaselineKind> = entries.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&BaselineKind::Ftp));
    assert!(kinds.contains(&BaselineKind::ThresholdPace));
    assert!(!kinds.contains(&BaselineKind::MaxHeartRate));
    assert!(!kinds.contains(&BaselineKind::Lthr));
    assert!(entries.iter().all(|e| e.recorded_at == now && e.athlete_id == athlete));
}

#[tokio::test]
async fn test_store_rejects_non_positive_baselines() {
    let store = InMemoryStore::new();
    let athlete = Uuid::new_v4();
    let error = store
        .record_baselines(vec![entry(
            athlete,
            BaselineKind::Ftp,
            ActivityCategory::Other,
            0.0,
            morning(date(2025, 3, 1)),
        )])
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);

    let nothing = store
        .baseline_as_of(
            athlete,
            BaselineKind::Ftp,
            ActivityCategory::Other,
            morning(date(2025, 4, 1)),
        )
        .await
        .unwrap();
    assert!(nothing.is_none());
}

#[tokio::test]
async fn test_onboarding_logs_estimates_once() {
    let athlete = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    let service = ActivityMetricsService::new(Arc::clone(&store), &IntelligenceConfig::default());
    let now = morning(date(2025, 3, 1));
    let profile = OnboardingProfile {
        age: Some(40.0),
        weight_kg: Some(70.0),
        experience: Some(ExperienceLevel::Advanced),
        resting_heart_rate: Some(50.0),
        ..OnboardingProfile::default()
    };

    let estimate = service.onboard_athlete(athlete, &profile, now).await.unwrap();
    assert_eq!(estimate.confidence, MetricConfidence::High);
    assert_eq!(estimate.max_heart_rate.source, BaselineSource::Estimated);
    assert!(estimate.vo2max.is_some());

    let thresholds = service
        .thresholds_for(athlete, ActivityCategory::Run, now)
        .await
        .unwrap();
    assert_eq!(thresholds, estimate.thresholds());

    // Nothing is in force before onboarding
    let earlier = service
        .thresholds_for(athlete, ActivityCategory::Run, now - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(earlier, AthleteThresholds::default());

    let again = service
        .onboard_athlete(athlete, &OnboardingProfile::default(), now + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(again.ftp.source, BaselineSource::Measured);
    assert!((again.ftp.value - estimate.ftp.value).abs() < f64::EPSILON);
    assert_eq!(again.confidence, MetricConfidence::High);
}

#[tokio::test]
async fn test_onboarding_empty_profile_logs_nothing() {
    let athlete = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    let service = ActivityMetricsService::new(Arc::clone(&store), &IntelligenceConfig::default());
    let now = morning(date(2025, 3, 1));

    let estimate = service
        .onboard_athlete(athlete, &OnboardingProfile::default(), now)
        .await
        .unwrap();
    assert_eq!(estimate.confidence, MetricConfidence::Low);
    assert_eq!(estimate.defaults_applied().len(), 5);

    let thresholds = service
        .thresholds_for(athlete, ActivityCategory::Bike, now)
        .await
        .unwrap();
    assert_eq!(thresholds, AthleteThresholds::default());
}
