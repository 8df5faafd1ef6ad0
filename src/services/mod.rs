// ABOUTME: Async service layer orchestrating collaborator reads and engine calls
// ABOUTME: Activity metrics back-fill, training load history, plan lifecycle and adherence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

//! Domain service layer
//!
//! Services are stateless per call: each request reads what it needs through
//! the provider traits, runs the synchronous engine and returns serializable
//! results. Training load is recomputed on every query and never cached.

/// Metrics back-fill from raw streams and athlete onboarding
pub mod activity_metrics;

/// Adherence timeline against the active plan
pub mod insights;

/// Plan creation, self-healing active plan lookup, updates and assessment
pub mod plans;

/// CTL/ATL/TSB history, current form, projection and zone distribution
pub mod training_load;

pub use activity_metrics::ActivityMetricsService;
pub use insights::InsightsService;
pub use plans::PlanService;
pub use training_load::{FitnessSnapshot, TrainingLoadService};
