// ABOUTME: Training load service computing CTL/ATL/TSB curves from stored activity history
// ABOUTME: History, weekly rollup, current form snapshot, plan projection and zone distribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    AdherenceAnalyzer, FormStatus, IntelligenceConfig, IntensityZoneClassifier,
    TrainingLoadPoint, TrainingLoadSeries, TrainingLoadTracker, ZoneDistribution,
};
use crate::models::TrainingPlan;
use crate::providers::ActivityHistoryReader;

/// Days of history replayed to answer "how fit am I today"
const CURRENT_STATE_LOOKBACK_DAYS: i64 = 90;

/// Fitness, fatigue and form on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSnapshot {
    /// Day the snapshot describes
    pub date: NaiveDate,
    /// Chronic training load, 1 dp
    pub ctl: f64,
    /// Acute training load, 1 dp
    pub atl: f64,
    /// Training stress balance, 1 dp
    pub tsb: f64,
    /// Form classification of `tsb`
    pub form: FormStatus,
    /// CTL change over the last seven days
    pub weekly_ramp: Option<f64>,
}

/// Reads activity history and runs the fitness/fatigue recursion
pub struct TrainingLoadService<S> {
    store: Arc<S>,
    tracker: TrainingLoadTracker,
    zones: IntensityZoneClassifier,
}

impl<S: ActivityHistoryReader> TrainingLoadService<S> {
    /// Create a service over `store` with the engine configuration
    #[must_use]
    pub fn new(store: Arc<S>, config: &IntelligenceConfig) -> Self {
        Self {
            store,
            tracker: TrainingLoadTracker::new(config.training_load.clone()),
            zones: IntensityZoneClassifier::new(config.zones.clone()),
        }
    }

    /// Daily CTL/ATL/TSB from `start` to `end` inclusive
    ///
    /// History before `start` is read to seed the recursion.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a reversed or oversized window and
    /// propagates collaborator failures.
    pub async fn history(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<TrainingLoadSeries> {
        self.tracker
            .validate_window(start, end)
            .map_err(|e| e.with_athlete_id(athlete_id))?;
        let fetch_start = start - Duration::days(self.tracker.config().seed_window_days);
        let activities = self
            .store
            .activities_between(athlete_id, fetch_start, end)
            .await?;
        debug!(
            %athlete_id,
            activities = activities.len(),
            %start,
            %end,
            "Loaded activity history for training load"
        );
        self.tracker
            .series(&activities, start, end)
            .map_err(|e| e.with_athlete_id(athlete_id))
    }

    /// Week-ending points (Monday to Sunday weeks) of the daily history
    ///
    /// # Errors
    ///
    /// Same as [`Self::history`].
    pub async fn weekly_history(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<TrainingLoadPoint>> {
        let series = self.history(athlete_id, start, end).await?;
        Ok(TrainingLoadTracker::weekly(&series.points))
    }

    /// Fitness, fatigue and form as of the end of `today`
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    pub async fn current_state(
        &self,
        athlete_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<FitnessSnapshot> {
        let start = today - Duration::days(CURRENT_STATE_LOOKBACK_DAYS - 1);
        let series = self.history(athlete_id, start, today).await?;
        let last = series.points.last().copied().ok_or_else(|| {
            AppError::internal("Training load series is empty").with_athlete_id(athlete_id)
        })?;
        Ok(FitnessSnapshot {
            date: last.date,
            ctl: last.ctl,
            atl: last.atl,
            tsb: last.tsb,
            form: self.tracker.form_status(series.final_state.tsb),
            weekly_ramp: TrainingLoadTracker::ramp_rate(&series.points),
        })
    }

    /// Project the athlete's current state `days` days forward
    ///
    /// Each future day receives the plan's ideal daily TSS, or zero without a
    /// plan. The first projected day is the day after `today`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when `days` exceeds the window cap and
    /// propagates collaborator failures.
    pub async fn project(
        &self,
        athlete_id: Uuid,
        today: NaiveDate,
        plan: Option<&TrainingPlan>,
        days: u32,
    ) -> AppResult<Vec<TrainingLoadPoint>> {
        if let Some(plan) = plan {
            plan.ensure_owned_by(athlete_id)?;
        }
        let start = today - Duration::days(CURRENT_STATE_LOOKBACK_DAYS - 1);
        let series = self.history(athlete_id, start, today).await?;
        let first_day = today + Duration::days(1);
        let hypothetical: Vec<f64> = first_day
            .iter_days()
            .take(days as usize)
            .map(|date| AdherenceAnalyzer::ideal_daily_tss(plan, date))
            .collect();
        let points = self
            .tracker
            .project(series.final_state, first_day, &hypothetical)
            .map_err(|e| e.with_athlete_id(athlete_id))?;
        info!(
            %athlete_id,
            days,
            plan_id = ?plan.map(|p| p.id),
            "Projected training load"
        );
        Ok(points)
    }

    /// TSS-weighted intensity zone distribution of activities in the window
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a reversed or oversized window and
    /// propagates collaborator failures.
    pub async fn zone_distribution(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<ZoneDistribution> {
        self.tracker
            .validate_window(start, end)
            .map_err(|e| e.with_athlete_id(athlete_id))?;
        let activities = self.store.activities_between(athlete_id, start, end).await?;
        Ok(self.zones.zone_distribution(&activities))
    }
}
