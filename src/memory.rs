// ABOUTME: In-memory implementation of every collaborator trait for tests and benchmarks
// ABOUTME: Tokio RwLock-guarded maps of activities, sessions, baselines, streams and plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::intelligence::MetricEstimator;
use crate::models::{
    Activity, ActivityCategory, ActivityMetrics, ActivityStreams, AthleteBaseline, BaselineKind,
    PlannedActivity, TrainingPlan,
};
use crate::providers::{
    ActivityHistoryReader, ActivityStore, BaselineMetricReader, BaselineMetricWriter,
    PlanStore, PlannedActivityReader, StreamProvider,
};

/// Process-local store backing all collaborator traits
///
/// Share it between services with `Arc<InMemoryStore>`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    activities: RwLock<HashMap<Uuid, Activity>>,
    planned: RwLock<Vec<PlannedActivity>>,
    baselines: RwLock<Vec<AthleteBaseline>>,
    streams: RwLock<HashMap<String, ActivityStreams>>,
    plans: RwLock<HashMap<Uuid, TrainingPlan>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a completed activity after checking ingestion invariants
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the activity fails validation.
    pub async fn insert_activity(&self, activity: Activity) -> AppResult<()> {
        activity.validate()?;
        self.activities.write().await.insert(activity.id, activity);
        Ok(())
    }

    /// Insert a scheduled session
    pub async fn insert_planned(&self, session: PlannedActivity) {
        self.planned.write().await.push(session);
    }

    /// Register streams under a file handle
    pub async fn insert_streams(&self, file_handle: impl Into<String>, streams: ActivityStreams) {
        self.streams.write().await.insert(file_handle.into(), streams);
    }

    /// Every stored plan of an athlete, active or not
    pub async fn plans_for(&self, athlete_id: Uuid) -> Vec<TrainingPlan> {
        self.plans
            .read()
            .await
            .values()
            .filter(|plan| plan.athlete_id == athlete_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ActivityHistoryReader for InMemoryStore {
    async fn activities_between(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Activity>> {
        let mut found: Vec<Activity> = self
            .activities
            .read()
            .await
            .values()
            .filter(|a| a.athlete_id == athlete_id && a.day() >= start && a.day() <= end)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.started_at, a.id));
        Ok(found)
    }
}

#[async_trait]
impl ActivityStore for InMemoryStore {
    async fn activity(&self, activity_id: Uuid) -> AppResult<Activity> {
        self.activities
            .read()
            .await
            .get(&activity_id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!("Activity {activity_id}"))
                    .with_resource_id(activity_id.to_string())
            })
    }

    async fn merge_metrics(
        &self,
        activity_id: Uuid,
        metrics: ActivityMetrics,
    ) -> AppResult<Activity> {
        let mut activities = self.activities.write().await;
        let activity = activities.get_mut(&activity_id).ok_or_else(|| {
            AppError::not_found(format!("Activity {activity_id}"))
                .with_resource_id(activity_id.to_string())
        })?;
        activity.metrics.merge(metrics);
        debug!(%activity_id, "Merged activity metrics");
        Ok(activity.clone())
    }
}

#[async_trait]
impl PlannedActivityReader for InMemoryStore {
    async fn planned_between(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<PlannedActivity>> {
        Ok(self
            .planned
            .read()
            .await
            .iter()
            .filter(|s| s.athlete_id == athlete_id && s.date >= start && s.date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaselineMetricReader for InMemoryStore {
    async fn baseline_as_of(
        &self,
        athlete_id: Uuid,
        kind: BaselineKind,
        category: ActivityCategory,
        as_of: DateTime<Utc>,
    ) -> AppResult<Option<AthleteBaseline>> {
        let entries: Vec<AthleteBaseline> = self
            .baselines
            .read()
            .await
            .iter()
            .filter(|entry| entry.athlete_id == athlete_id)
            .cloned()
            .collect();
        Ok(MetricEstimator::most_recent_at_or_before(&entries, kind, category, as_of).cloned())
    }
}

#[async_trait]
impl BaselineMetricWriter for InMemoryStore {
    async fn record_baselines(&self, entries: Vec<AthleteBaseline>) -> AppResult<()> {
        if let Some(bad) = entries.iter().find(|e| !e.value.is_finite() || e.value <= 0.0) {
            return Err(AppError::out_of_range(format!(
                "Baseline {} must be a positive number, got {}",
                bad.kind, bad.value
            ))
            .with_athlete_id(bad.athlete_id));
        }
        self.baselines.write().await.extend(entries);
        Ok(())
    }
}

#[async_trait]
impl StreamProvider for InMemoryStore {
    async fn load_streams(&self, file_handle: &str) -> AppResult<ActivityStreams> {
        self.streams
            .read()
            .await
            .get(file_handle)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!("Stream file {file_handle}"))
                    .with_resource_id(file_handle)
            })
    }
}

#[async_trait]
impl PlanStore for InMemoryStore {
    async fn active_plans(&self, athlete_id: Uuid) -> AppResult<Vec<TrainingPlan>> {
        Ok(self
            .plans
            .read()
            .await
            .values()
            .filter(|plan| plan.athlete_id == athlete_id && plan.is_active)
            .cloned()
            .collect())
    }

    async fn plan(&self, plan_id: Uuid) -> AppResult<TrainingPlan> {
        self.plans
            .read()
            .await
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| {
                AppError::not_found(format!("Training plan {plan_id}"))
                    .with_resource_id(plan_id.to_string())
            })
    }

    async fn save_plan(&self, plan: TrainingPlan) -> AppResult<()> {
        self.plans.write().await.insert(plan.id, plan);
        Ok(())
    }

    async fn deactivate(&self, plan_id: Uuid) -> AppResult<()> {
        let mut plans = self.plans.write().await;
        let plan = plans.get_mut(&plan_id).ok_or_else(|| {
            AppError::not_found(format!("Training plan {plan_id}"))
                .with_resource_id(plan_id.to_string())
        })?;
        plan.is_active = false;
        Ok(())
    }
}
