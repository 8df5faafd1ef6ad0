// ABOUTME: Insights service producing the ideal versus scheduled versus actual timeline
// ABOUTME: Joins the active plan, planned sessions and completed activities per day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use super::plans::resolve_active_plan;
use crate::errors::AppResult;
use crate::intelligence::{AdherenceAnalyzer, AdherenceDay, BoundaryState, IntelligenceConfig};
use crate::providers::{ActivityHistoryReader, PlanStore, PlannedActivityReader};

/// Adherence timeline over stored plans, sessions and activities
pub struct InsightsService<S> {
    store: Arc<S>,
    analyzer: AdherenceAnalyzer,
}

impl<S> InsightsService<S>
where
    S: ActivityHistoryReader + PlannedActivityReader + PlanStore,
{
    /// Create a service over `store` with the engine configuration
    #[must_use]
    pub fn new(store: Arc<S>, config: &IntelligenceConfig) -> Self {
        Self {
            store,
            analyzer: AdherenceAnalyzer::from_config(config),
        }
    }

    /// One row per day from `start` to `end` inclusive
    ///
    /// The ideal load comes from the athlete's active plan; without one every
    /// day's ideal is zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a reversed or oversized window and
    /// propagates collaborator failures.
    pub async fn insight_timeline(
        &self,
        athlete_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<Vec<AdherenceDay>> {
        let plan = resolve_active_plan(self.store.as_ref(), athlete_id).await?;
        let planned = self.store.planned_between(athlete_id, start, end).await?;
        let completed = self.store.activities_between(athlete_id, start, end).await?;

        let timeline = self
            .analyzer
            .insight_timeline(plan.as_ref(), start, end, &planned, &completed, today)
            .map_err(|e| e.with_athlete_id(athlete_id))?;

        let flagged = timeline
            .iter()
            .filter(|day| day.boundary_state > BoundaryState::Safe)
            .count();
        info!(
            %athlete_id,
            days = timeline.len(),
            flagged,
            plan_id = ?plan.as_ref().map(|p| p.id),
            "Built insight timeline"
        );
        Ok(timeline)
    }
}
