// ABOUTME: Activity metrics service back-filling TSS and derived metrics from raw streams
// ABOUTME: Resolves baselines as of the activity start and onboards athletes with estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    BaselineEstimate, IntelligenceConfig, MetricEstimator, OnboardingProfile,
    StreamMetricsCalculator,
};
use crate::models::{Activity, ActivityCategory, AthleteThresholds, BaselineKind};
use crate::providers::{ActivityStore, BaselineMetricReader, BaselineMetricWriter, StreamProvider};

const THRESHOLD_KINDS: [BaselineKind; 5] = [
    BaselineKind::Ftp,
    BaselineKind::Lthr,
    BaselineKind::MaxHeartRate,
    BaselineKind::RestingHeartRate,
    BaselineKind::ThresholdPace,
];

/// Computes per-activity metrics and manages baseline estimates
pub struct ActivityMetricsService<S> {
    store: Arc<S>,
    calculator: StreamMetricsCalculator,
    estimator: MetricEstimator,
}

impl<S> ActivityMetricsService<S>
where
    S: ActivityStore + StreamProvider + BaselineMetricReader + BaselineMetricWriter,
{
    /// Create a service over `store` with the engine configuration
    #[must_use]
    pub fn new(store: Arc<S>, config: &IntelligenceConfig) -> Self {
        Self {
            store,
            calculator: StreamMetricsCalculator::from_config(config),
            estimator: MetricEstimator::new(config.stream_metrics.cold_start),
        }
    }

    /// Thresholds in force for `category` at `as_of`
    ///
    /// Kinds without an entry stay `None`; the calculator substitutes
    /// cold-start defaults for them.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    pub async fn thresholds_for(
        &self,
        athlete_id: Uuid,
        category: ActivityCategory,
        as_of: DateTime<Utc>,
    ) -> AppResult<AthleteThresholds> {
        let mut thresholds = AthleteThresholds::default();
        for kind in THRESHOLD_KINDS {
            let entry = self
                .store
                .baseline_as_of(athlete_id, kind, category, as_of)
                .await?;
            thresholds.set(kind, entry.map(|e| e.value));
        }
        Ok(thresholds)
    }

    /// Compute metrics for one activity from its streams and merge them in
    ///
    /// # Errors
    ///
    /// Returns `AppError::PermissionDenied` when the activity belongs to
    /// another athlete, `AppError::InvalidInput` when the activity fails
    /// ingestion checks, and propagates not-found and storage failures.
    pub async fn process_activity(
        &self,
        athlete_id: Uuid,
        activity_id: Uuid,
        file_handle: &str,
    ) -> AppResult<Activity> {
        let activity = self.store.activity(activity_id).await?;
        if activity.athlete_id != athlete_id {
            return Err(
                AppError::permission_denied("Activity belongs to another athlete")
                    .with_athlete_id(athlete_id)
                    .with_resource_id(activity_id.to_string()),
            );
        }

        let thresholds = self
            .thresholds_for(athlete_id, activity.category, activity.started_at)
            .await?;
        let streams = self.store.load_streams(file_handle).await?;
        let metrics = self
            .calculator
            .calculate(&activity, &streams, &thresholds)
            .map_err(|e| e.with_athlete_id(athlete_id))?;

        if metrics.unscored {
            warn!(%athlete_id, %activity_id, "Activity left unscored after stream processing");
        }
        let updated = self.store.merge_metrics(activity_id, metrics).await?;
        info!(
            %athlete_id,
            %activity_id,
            tss = ?updated.metrics.tss,
            source = ?updated.metrics.tss_source,
            "Processed activity metrics"
        );
        Ok(updated)
    }

    /// Estimate every baseline for an athlete and log the new values
    ///
    /// Kinds the athlete already has an entry for are not logged again.
    /// Cold-start defaults are never logged.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    pub async fn onboard_athlete(
        &self,
        athlete_id: Uuid,
        profile: &OnboardingProfile,
        now: DateTime<Utc>,
    ) -> AppResult<BaselineEstimate> {
        let known = self
            .thresholds_for(athlete_id, ActivityCategory::Other, now)
            .await?;
        let estimate = self.estimator.estimate_baselines(profile, &known);

        let mut entries = Vec::new();
        for entry in estimate.to_log_entries(athlete_id, ActivityCategory::Other, now) {
            let logged = self
                .store
                .baseline_as_of(athlete_id, entry.kind, ActivityCategory::Other, now)
                .await?;
            if logged.is_none() {
                entries.push(entry);
            }
        }
        let recorded = entries.len();
        if !entries.is_empty() {
            self.store.record_baselines(entries).await?;
        }
        info!(
            %athlete_id,
            recorded,
            confidence = ?estimate.confidence,
            "Onboarded athlete baselines"
        );
        Ok(estimate)
    }
}
