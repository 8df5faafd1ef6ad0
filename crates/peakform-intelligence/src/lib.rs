// ABOUTME: Training-load modeling and periodization engine for endurance athletes
// ABOUTME: Stream metrics, CTL/ATL/TSB, zones, plan synthesis, feasibility and adherence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![deny(unsafe_code)]

//! # Peakform Intelligence
//!
//! Pure, synchronous engine behind the peakform services. Every component
//! takes its thresholds from [`config::IntelligenceConfig`] at construction
//! and performs no I/O.
//!
//! ## Modules
//!
//! - **`stream_metrics`**: NP, NGS, IF, TSS, EF, decoupling, best efforts and zone time
//! - **estimator**: Baseline resolution, onboarding estimates and cold-start defaults
//! - **`training_load`**: CTL/ATL/TSB recursion, seeding, projection and form status
//! - **zones**: Intensity zone classification and TSS-weighted distributions
//! - **periodization**: Goal-to-plan expansion, structure checks and block ramps
//! - **feasibility**: Goal and plan feasibility and safety rollups
//! - **adherence**: Ideal versus scheduled versus actual timelines

/// Pure numeric building blocks
pub mod algorithms;

/// Engine configuration with environment overrides
pub mod config;

/// Named physiological constants backing configuration defaults
pub mod physiological_constants;

/// Baseline estimation and cold-start defaults
pub mod estimator;

/// Per-activity metrics from raw streams
pub mod stream_metrics;

/// Intensity zones
pub mod zones;

/// Fitness, fatigue and form
pub mod training_load;

/// Periodized plan synthesis and validation
pub mod periodization;

/// Feasibility and safety assessment
pub mod feasibility;

/// Adherence timeline
pub mod adherence;

pub use adherence::{AdherenceAnalyzer, AdherenceDay, BoundaryReason, BoundaryState};
pub use config::{ConfigError, IntelligenceConfig};
pub use estimator::{
    BaselineEstimate, EstimatedBaseline, ExperienceLevel, MetricEstimator, OnboardingProfile,
};
pub use feasibility::{
    Assessment, FeasibilityAssessor, FeasibilityState, GoalAssessment, PlanAssessment, ReasonCode,
    SafetyState,
};
pub use periodization::{
    PeriodizationPlanner, PlanValidation, PlanWarning, PlanWarningLevel, StructureIssue,
};
pub use stream_metrics::StreamMetricsCalculator;
pub use training_load::{
    DailyTss, FormStatus, SeedSource, TrainingLoadPoint, TrainingLoadSeries, TrainingLoadState,
    TrainingLoadTracker,
};
pub use zones::{IntensityZoneClassifier, ZoneDistribution, ZoneShare};
