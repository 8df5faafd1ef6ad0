// ABOUTME: Domain model module declarations and re-exports
// ABOUTME: Activities, stream samples, athlete baselines, goals and training plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Activities and the typed metrics bag
pub mod activity;
/// Athlete physiological baselines
pub mod baseline;
/// Goals, periodized and maintenance plans, planned sessions
pub mod plan;
/// Raw per-sample stream records
pub mod stream;
/// Intensity zones and training effect labels
pub mod zones;

pub use activity::{
    Activity, ActivityCategory, ActivityMetrics, BestEffort, MetricConfidence, TssSource,
};
pub use baseline::{AthleteBaseline, AthleteThresholds, BaselineKind, BaselineSource};
pub use plan::{
    FitnessProgression, Goal, GoalTarget, MinimalGoal, PlanStructure, PlannedActivity,
    SessionRange, TrainingBlock, TrainingPhase, TrainingPlan, TssRange,
};
pub use stream::{ActivityStreams, GeoPoint, StreamSample};
pub use zones::{IntensityZone, TrainingEffect, TrainingEffectClass};
