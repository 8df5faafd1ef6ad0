// ABOUTME: Integration tests for intensity zone classification and distributions
// ABOUTME: Validates zone ordering, percentage apportionment and per-sample zone seconds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{date, scored_activity};
use peakform::intelligence::{IntelligenceConfig, IntensityZoneClassifier};
use peakform::memory::InMemoryStore;
use peakform::models::{ActivityMetrics, IntensityZone};
use peakform::services::TrainingLoadService;
use uuid::Uuid;

#[test]
fn test_zone_lookup_is_monotonic() {
    let classifier = IntensityZoneClassifier::default();
    let mut previous = classifier.training_intensity_zone(-1.0);
    assert_eq!(previous, IntensityZone::Recovery);
    for step in -100..=300 {
        let intensity = f64::from(step) / 100.0;
        let zone = classifier.training_intensity_zone(intensity);
        assert!(zone >= previous, "zone dropped at IF {intensity}");
        previous = zone;
    }
    assert_eq!(previous, IntensityZone::Neuromuscular);
}

#[test]
fn test_zone_boundaries() {
    let classifier = IntensityZoneClassifier::default();
    let cases = [
        (0.54, IntensityZone::Recovery),
        (0.55, IntensityZone::Endurance),
        (0.749, IntensityZone::Endurance),
        (0.75, IntensityZone::Tempo),
        (0.90, IntensityZone::Threshold),
        (1.05, IntensityZone::Vo2max),
        (1.20, IntensityZone::Anaerobic),
        (1.49, IntensityZone::Anaerobic),
        (1.50, IntensityZone::Neuromuscular),
    ];
    for (intensity, expected) in cases {
        assert_eq!(classifier.training_intensity_zone(intensity), expected);
    }
    assert_eq!(
        classifier.training_intensity_zone(f64::NAN),
        IntensityZone::Recovery
    );
}

#[test]
fn test_distribution_sums_to_one_hundred() {
    let classifier = IntensityZoneClassifier::default();
    let athlete = Uuid::new_v4();
    let day = date(2025, 2, 1);

    for set in 1..40_u32 {
        let activities: Vec<_> = (0..set)
            .map(|i| {
                let tss = f64::from((i * 31 + set * 7) % 97 + 1) / 3.0;
                let intensity = f64::from((i * 17 + set) % 160) / 100.0;
                scored_activity(athlete, day + Duration::days(i64::from(i)), tss, intensity)
            })
            .collect();
        let distribution = classifier.zone_distribution(&activities);
        assert_eq!(distribution.zones.len(), 7);
        assert!(
            (distribution.total_percent() - 100.0).abs() <= 0.1 + 1e-9,
            "set {set} sums to {}",
            distribution.total_percent()
        );
    }
}

#[test]
fn test_unscored_activities_are_left_out_of_the_distribution() {
    let classifier = IntensityZoneClassifier::default();
    let athlete = Uuid::new_v4();
    let day = date(2025, 2, 1);
    let unscored = scored_activity(athlete, day, 0.0, 0.0).with_metrics(ActivityMetrics {
        unscored: true,
        ..ActivityMetrics::default()
    });

    let empty = classifier.zone_distribution([&unscored]);
    assert!(empty.total_percent().abs() < f64::EPSILON);
    assert!(empty.total_tss.abs() < f64::EPSILON);

    let activities = [
        unscored,
        scored_activity(athlete, day, 60.0, 0.7),
        scored_activity(athlete, day, 40.0, 0.95),
    ];
    let distribution = classifier.zone_distribution(&activities);
    assert!((distribution.percent(IntensityZone::Endurance) - 60.0).abs() < 1e-9);
    assert!((distribution.percent(IntensityZone::Threshold) - 40.0).abs() < 1e-9);
}

#[test]
fn test_hr_zone_seconds_cover_every_sample() {
    let classifier = IntensityZoneClassifier::default();
    let mut samples = vec![120.0; 100];
    samples.extend(vec![150.0; 50]);
    samples.extend(vec![175.0; 25]);
    samples.push(0.0);

    let zones = classifier.hr_zone_seconds(&samples, 170.0);
    assert_eq!(zones, [100, 50, 0, 0, 25]);
}

#[test]
fn test_power_zone_seconds_count_coasting_in_zone_one() {
    let classifier = IntensityZoneClassifier::default();
    let mut samples = vec![0.0; 10];
    samples.extend(vec![200.0; 20]);
    samples.extend(vec![260.0; 5]);
    samples.extend(vec![400.0; 3]);

    let zones = classifier.power_zone_seconds(&samples, 250.0);
    assert_eq!(zones, [10, 0, 20, 5, 0, 3]);
}

#[tokio::test]
async fn test_service_distribution_uses_window_activities() {
    let athlete = Uuid::new_v4();
    let store = Arc::new(InMemoryStore::new());
    let day = date(2025, 7, 1);
    store
        .insert_activity(scored_activity(athlete, day, 80.0, 0.65))
        .await
        .unwrap();
    store
        .insert_activity(scored_activity(athlete, day + Duration::days(1), 20.0, 1.1))
        .await
        .unwrap();
    store
        .insert_activity(scored_activity(athlete, day + Duration::days(30), 500.0, 1.6))
        .await
        .unwrap();
    let service = TrainingLoadService::new(store, &IntelligenceConfig::default());

    let distribution = service
        .zone_distribution(athlete, day, day + Duration::days(6))
        .await
        .unwrap();
    assert!((distribution.total_tss - 100.0).abs() < 1e-9);
    assert!((distribution.percent(IntensityZone::Endurance) - 80.0).abs() < 1e-9);
    assert!((distribution.percent(IntensityZone::Vo2max) - 20.0).abs() < 1e-9);
    assert!(distribution.percent(IntensityZone::Neuromuscular).abs() < f64::EPSILON);
}
