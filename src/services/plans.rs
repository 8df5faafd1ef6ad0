// ABOUTME: Training plan service for goal expansion, activation, updates and assessment
// ABOUTME: Self-heals duplicate active plans so each athlete keeps exactly one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::intelligence::{
    FeasibilityAssessor, IntelligenceConfig, PeriodizationPlanner, PlanAssessment,
};
use crate::models::{MinimalGoal, SessionRange, TrainingPlan};
use crate::providers::PlanStore;

/// The athlete's single active plan, deactivating any extras
///
/// When several plans are flagged active the most recently created one (ties
/// broken by the larger id) is kept and the others are deactivated.
pub(crate) async fn resolve_active_plan<S: PlanStore + ?Sized>(
    store: &S,
    athlete_id: Uuid,
) -> AppResult<Option<TrainingPlan>> {
    let mut active = store.active_plans(athlete_id).await?;
    active.sort_by_key(|plan| (plan.created_at, plan.id));
    let Some(keep) = active.pop() else {
        return Ok(None);
    };
    if !active.is_empty() {
        let stale: Vec<Uuid> = active.iter().map(|plan| plan.id).collect();
        warn!(
            %athlete_id,
            kept = %keep.id,
            deactivated = ?stale,
            "Multiple active training plans, keeping the most recent"
        );
        for plan_id in stale {
            store.deactivate(plan_id).await?;
        }
    }
    Ok(Some(keep))
}

async fn deactivate_others<S: PlanStore + ?Sized>(
    store: &S,
    athlete_id: Uuid,
    keep: Uuid,
) -> AppResult<()> {
    for plan in store.active_plans(athlete_id).await? {
        if plan.id != keep {
            store.deactivate(plan.id).await?;
        }
    }
    Ok(())
}

/// Plan lifecycle over a [`PlanStore`]
pub struct PlanService<S> {
    store: Arc<S>,
    planner: PeriodizationPlanner,
    assessor: FeasibilityAssessor,
}

impl<S: PlanStore> PlanService<S> {
    /// Create a service over `store` with the engine configuration
    #[must_use]
    pub fn new(store: Arc<S>, config: &IntelligenceConfig) -> Self {
        Self {
            store,
            planner: PeriodizationPlanner::from_config(config),
            assessor: FeasibilityAssessor::from_config(config),
        }
    }

    /// Expand goals into a plan without persisting it
    ///
    /// # Errors
    ///
    /// Returns validation errors for empty or invalid goals, a non-finite
    /// starting CTL, or goals entirely in the past.
    pub fn preview(
        &self,
        athlete_id: Uuid,
        goals: &[MinimalGoal],
        today: NaiveDate,
        starting_ctl: f64,
    ) -> AppResult<TrainingPlan> {
        self.planner
            .expand_minimal_goal_to_plan(athlete_id, goals, today, starting_ctl)
            .map_err(|e| e.with_athlete_id(athlete_id))
    }

    /// Expand goals into a plan, persist it and make it the active plan
    ///
    /// Repeating the call with the same goals on the same day returns the
    /// stored plan instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Same as [`Self::preview`], plus storage failures.
    pub async fn create_from_goals(
        &self,
        athlete_id: Uuid,
        goals: &[MinimalGoal],
        today: NaiveDate,
        starting_ctl: f64,
    ) -> AppResult<TrainingPlan> {
        let mut plan = self.preview(athlete_id, goals, today, starting_ctl)?;

        match self.store.plan(plan.id).await {
            Ok(mut existing) => {
                existing.ensure_owned_by(athlete_id)?;
                info!(%athlete_id, plan_id = %existing.id, "Training plan already exists");
                if !existing.is_active {
                    existing.is_active = true;
                    self.store.save_plan(existing.clone()).await?;
                }
                deactivate_others(self.store.as_ref(), athlete_id, existing.id).await?;
                return Ok(existing);
            }
            Err(e) if e.code == ErrorCode::ResourceNotFound => {}
            Err(e) => return Err(e),
        }

        deactivate_others(self.store.as_ref(), athlete_id, plan.id).await?;
        plan.is_active = true;
        self.store.save_plan(plan.clone()).await?;
        info!(
            %athlete_id,
            plan_id = %plan.id,
            blocks = plan.blocks().len(),
            "Created training plan from goals"
        );
        Ok(plan)
    }

    /// Create and activate an open-ended maintenance plan
    ///
    /// # Errors
    ///
    /// Returns validation errors for a negative weekly target or an inverted
    /// session range, plus storage failures.
    pub async fn create_maintenance_plan(
        &self,
        athlete_id: Uuid,
        weekly_tss_target: f64,
        sessions_per_week: SessionRange,
        now: DateTime<Utc>,
    ) -> AppResult<TrainingPlan> {
        let mut plan = PeriodizationPlanner::maintenance_plan(
            athlete_id,
            weekly_tss_target,
            sessions_per_week,
            now,
        )?;
        deactivate_others(self.store.as_ref(), athlete_id, plan.id).await?;
        plan.is_active = true;
        self.store.save_plan(plan.clone()).await?;
        info!(%athlete_id, plan_id = %plan.id, weekly_tss_target, "Created maintenance plan");
        Ok(plan)
    }

    /// The athlete's active plan, if any
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn active_plan(&self, athlete_id: Uuid) -> AppResult<Option<TrainingPlan>> {
        resolve_active_plan(self.store.as_ref(), athlete_id).await
    }

    /// Fetch a plan on behalf of an athlete
    ///
    /// # Errors
    ///
    /// Returns `AppError::ResourceNotFound` for an unknown id and
    /// `AppError::PermissionDenied` when the plan belongs to someone else.
    pub async fn plan_for_athlete(
        &self,
        athlete_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<TrainingPlan> {
        let plan = self.store.plan(plan_id).await?;
        plan.ensure_owned_by(athlete_id)?;
        Ok(plan)
    }

    /// Replace a stored plan's body and bump its version
    ///
    /// Activation state and creation time always come from the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` with the structural issues when the
    /// update is malformed, plus the errors of [`Self::plan_for_athlete`].
    pub async fn update_plan(
        &self,
        athlete_id: Uuid,
        update: TrainingPlan,
    ) -> AppResult<TrainingPlan> {
        let existing = self.plan_for_athlete(athlete_id, update.id).await?;
        if update.athlete_id != athlete_id {
            return Err(AppError::permission_denied(
                "Training plan cannot be reassigned to another athlete",
            )
            .with_athlete_id(athlete_id)
            .with_resource_id(update.id.to_string()));
        }

        let validation = PeriodizationPlanner::validate_plan_structure(&update);
        if !validation.is_valid() {
            let issues: Vec<String> = validation.issues().iter().map(ToString::to_string).collect();
            return Err(AppError::invalid_input("Training plan structure is invalid")
                .with_athlete_id(athlete_id)
                .with_resource_id(update.id.to_string())
                .with_details(json!({ "issues": issues })));
        }

        let plan = TrainingPlan {
            version: existing.version.saturating_add(1),
            is_active: existing.is_active,
            created_at: existing.created_at,
            ..update
        };
        self.store.save_plan(plan.clone()).await?;
        info!(%athlete_id, plan_id = %plan.id, version = plan.version, "Updated training plan");
        Ok(plan)
    }

    /// Feasibility and safety report for a stored plan
    ///
    /// Without `current_ctl` the CTL-based checks are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::plan_for_athlete`].
    pub async fn assess_plan(
        &self,
        athlete_id: Uuid,
        plan_id: Uuid,
        reference_date: NaiveDate,
        current_ctl: Option<f64>,
    ) -> AppResult<PlanAssessment> {
        let plan = self.plan_for_athlete(athlete_id, plan_id).await?;
        let assessment = self.assessor.assess_plan(&plan, reference_date, current_ctl);
        info!(
            %athlete_id,
            %plan_id,
            feasibility = ?assessment.feasibility.state,
            safety = ?assessment.safety.state,
            "Assessed training plan"
        );
        Ok(assessment)
    }
}
