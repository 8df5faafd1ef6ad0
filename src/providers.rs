// ABOUTME: Collaborator traits the services read history from and write results to
// ABOUTME: Activity history, planned sessions, baselines, raw streams and training plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

//! # Collaborator Interfaces
//!
//! The engine is storage-agnostic. Services depend on these traits and any
//! backing store (relational, document, remote API) plugs in behind them.
//! [`crate::memory::InMemoryStore`] implements every trait for tests.
//!
//! All implementations return `AppResult<T>`. Storage failures surface as
//! `ErrorCode::StorageError`, unknown ids as `ErrorCode::ResourceNotFound`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    Activity, ActivityCategory, ActivityMetrics, ActivityStreams, AthleteBaseline, BaselineKind,
    PlannedActivity, TrainingPlan,
};

/// Read access to completed activities
#[async_trait]
pub trait ActivityHistoryReader: Send + Sync {
    /// Activities of `athlete_id` whose UTC start day falls in `start..=end`
    async fn activities_between(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Activity>>;
}

/// Single-activity access and metrics back-fill
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Fetch one activity
    async fn activity(&self, activity_id: Uuid) -> AppResult<Activity>;

    /// Merge `metrics` into the stored bag and return the updated activity
    ///
    /// Present fields overwrite, absent fields keep their stored value.
    async fn merge_metrics(
        &self,
        activity_id: Uuid,
        metrics: ActivityMetrics,
    ) -> AppResult<Activity>;
}

/// Read access to scheduled sessions
#[async_trait]
pub trait PlannedActivityReader: Send + Sync {
    /// Sessions of `athlete_id` scheduled in `start..=end`
    async fn planned_between(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<PlannedActivity>>;
}

/// Baseline log lookups
#[async_trait]
pub trait BaselineMetricReader: Send + Sync {
    /// Most recent entry at or before `as_of`; never a future-dated one
    async fn baseline_as_of(
        &self,
        athlete_id: Uuid,
        kind: BaselineKind,
        category: ActivityCategory,
        as_of: DateTime<Utc>,
    ) -> AppResult<Option<AthleteBaseline>>;
}

/// Append-only baseline log writes
#[async_trait]
pub trait BaselineMetricWriter: Send + Sync {
    /// Append entries; existing entries are never replaced
    async fn record_baselines(&self, entries: Vec<AthleteBaseline>) -> AppResult<()>;
}

/// Raw sample streams, loaded on demand and never persisted by the engine
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Load the streams behind an opaque file handle
    async fn load_streams(&self, file_handle: &str) -> AppResult<ActivityStreams>;
}

/// Training plan persistence
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Every plan of `athlete_id` currently flagged active
    async fn active_plans(&self, athlete_id: Uuid) -> AppResult<Vec<TrainingPlan>>;

    /// Fetch one plan
    async fn plan(&self, plan_id: Uuid) -> AppResult<TrainingPlan>;

    /// Insert or replace a plan by id
    async fn save_plan(&self, plan: TrainingPlan) -> AppResult<()>;

    /// Clear the active flag of one plan
    async fn deactivate(&self, plan_id: Uuid) -> AppResult<()>;
}
