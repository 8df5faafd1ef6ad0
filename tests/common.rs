// ABOUTME: Shared fixtures for integration tests
// ABOUTME: Dates, scored activities, synthetic streams, goals and a seeded in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `peakform`

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use peakform::memory::InMemoryStore;
use peakform::models::{
    Activity, ActivityCategory, ActivityMetrics, ActivityStreams, FitnessProgression, GoalTarget,
    MinimalGoal, PlanStructure, SessionRange, StreamSample, TrainingBlock, TrainingPhase,
    TrainingPlan, TssRange, TssSource,
};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 07:00 UTC on `day`
pub fn morning(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(7, 0, 0).unwrap())
}

/// One-hour ride already carrying a TSS and intensity factor
pub fn scored_activity(athlete_id: Uuid, day: NaiveDate, tss: f64, intensity: f64) -> Activity {
    Activity::new(
        athlete_id,
        "Endurance ride",
        ActivityCategory::Bike,
        morning(day),
        3600.0,
    )
    .unwrap()
    .with_metrics(ActivityMetrics {
        tss: Some(tss),
        tss_source: Some(TssSource::Power),
        intensity_factor: Some(intensity),
        ..ActivityMetrics::default()
    })
}

/// Raw activity without metrics
pub fn raw_activity(
    athlete_id: Uuid,
    category: ActivityCategory,
    day: NaiveDate,
    seconds: f64,
) -> Activity {
    Activity::new(athlete_id, "Session", category, morning(day), seconds).unwrap()
}

/// 1 Hz stream of `seconds` samples built by `sample`
pub fn stream<F>(seconds: u32, sample: F) -> ActivityStreams
where
    F: Fn(u32) -> StreamSample,
{
    ActivityStreams::new((0..seconds).map(sample).collect())
}

/// Constant heart rate only
pub fn heart_rate_stream(seconds: u32, bpm: f64) -> ActivityStreams {
    stream(seconds, |t| StreamSample {
        elapsed_seconds: t,
        heart_rate: Some(bpm),
        ..StreamSample::default()
    })
}

/// Constant power and heart rate
pub fn power_stream(seconds: u32, watts: f64, bpm: f64) -> ActivityStreams {
    stream(seconds, |t| StreamSample {
        elapsed_seconds: t,
        power: Some(watts),
        heart_rate: Some(bpm),
        ..StreamSample::default()
    })
}

/// Flat constant-speed run with cumulative distance
pub fn pace_stream(seconds: u32, speed: f64) -> ActivityStreams {
    stream(seconds, |t| StreamSample {
        elapsed_seconds: t,
        speed: Some(speed),
        distance: Some(speed * f64::from(t)),
        altitude: Some(100.0),
        ..StreamSample::default()
    })
}

pub fn race_goal(name: &str, target_date: NaiveDate, priority: u8) -> MinimalGoal {
    MinimalGoal {
        name: name.to_owned(),
        target_date,
        priority,
        targets: vec![GoalTarget::RacePerformance {
            distance_meters: 42_195.0,
            target_time_seconds: 12_600.0,
        }],
    }
}

pub fn fitness_goal(name: &str, target_date: NaiveDate, target_ctl: f64) -> MinimalGoal {
    MinimalGoal {
        name: name.to_owned(),
        target_date,
        priority: 5,
        targets: vec![GoalTarget::Fitness { target_ctl }],
    }
}

/// Block of `days` days from `start` with a weekly TSS band around `weekly_mid`
pub fn block(
    name: &str,
    phase: TrainingPhase,
    start: NaiveDate,
    days: i64,
    weekly_mid: f64,
) -> TrainingBlock {
    TrainingBlock {
        name: name.to_owned(),
        phase,
        start_date: start,
        end_date: start + Duration::days(days - 1),
        target_weekly_tss: TssRange {
            min: weekly_mid * 0.9,
            max: weekly_mid * 1.1,
        },
        target_sessions: SessionRange { min: 4, max: 5 },
    }
}

/// Hand-built periodized plan without goals
pub fn periodized_plan(athlete_id: Uuid, blocks: Vec<TrainingBlock>) -> TrainingPlan {
    let peak_date = blocks.last().map(|b| b.end_date).unwrap();
    TrainingPlan {
        id: Uuid::new_v4(),
        athlete_id,
        name: "Hand-built plan".to_owned(),
        version: 1,
        is_active: false,
        created_at: morning(blocks[0].start_date),
        structure: PlanStructure::Periodized {
            blocks,
            goals: Vec::new(),
            fitness_progression: FitnessProgression {
                starting_ctl: 45.0,
                target_ctl: 60.0,
                weekly_ramp_rate: 3.0,
                peak_date,
            },
        },
    }
}

/// Store holding `days` consecutive daily rides of `tss` ending the day before `end`
pub async fn store_with_daily_load(
    athlete_id: Uuid,
    end: NaiveDate,
    days: i64,
    tss: f64,
) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for offset in 1..=days {
        let day = end - Duration::days(offset);
        store
            .insert_activity(scored_activity(athlete_id, day, tss, 0.7))
            .await
            .unwrap();
    }
    store
}
