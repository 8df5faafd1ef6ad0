// ABOUTME: Day-by-day ideal versus scheduled versus actual TSS timeline with adherence scores
// ABOUTME: Ratio-to-score curve penalizes under- and overshoot; boundary states flag excess load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::collections::BTreeMap;

use chrono::NaiveDate;
use peakform_core::constants::rounding::round1;
use peakform_core::constants::time_constants::DAYS_PER_WEEK_F64;
use peakform_core::models::{Activity, PlanStructure, PlannedActivity, TrainingPlan};
use peakform_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AdherenceConfig, IntelligenceConfig};
use crate::periodization::PeriodizationPlanner;

/// Load relative to its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryState {
    /// Within the caution ratio
    Safe,
    /// Above the caution ratio
    Caution,
    /// Above the exceeded ratio
    Exceeded,
}

/// Which comparison tripped a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryReason {
    /// Scheduled load above the plan's ideal
    ScheduledExceedsIdeal,
    /// Completed load above what was scheduled
    ActualExceedsScheduled,
    /// Completed load above the ideal on an unscheduled day
    ActualExceedsIdeal,
}

/// One row of the adherence timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceDay {
    /// Calendar day
    pub date: NaiveDate,
    /// Plan target for the day
    pub ideal_tss: f64,
    /// Sum of planned session estimates
    pub scheduled_tss: f64,
    /// Sum of completed activity TSS
    pub actual_tss: f64,
    /// 0-100
    pub adherence_score: f64,
    /// Worst boundary state of the day
    pub boundary_state: BoundaryState,
    /// Comparisons that exceeded the caution ratio
    pub boundary_reasons: Vec<BoundaryReason>,
}

/// Builds adherence timelines against a plan
#[derive(Debug, Clone, Default)]
pub struct AdherenceAnalyzer {
    config: AdherenceConfig,
}

impl AdherenceAnalyzer {
    /// Create an analyzer with the given scoring parameters
    #[must_use]
    pub const fn new(config: AdherenceConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer from the engine configuration
    #[must_use]
    pub fn from_config(config: &IntelligenceConfig) -> Self {
        Self::new(config.adherence.clone())
    }

    /// Score how closely `value` matches `baseline`, 0-100
    ///
    /// Undershoot loses one point per percent; overshoot loses one point per
    /// percent up to the soft band and the steep penalty beyond it. Two zeros
    /// score 100 and a positive value over a zero baseline scores the
    /// configured zero-baseline score.
    #[must_use]
    pub fn ratio_score(&self, value: f64, baseline: f64) -> f64 {
        let value = value.max(0.0);
        if baseline <= 0.0 {
            return if value <= 0.0 {
                100.0
            } else {
                self.config.zero_baseline_score
            };
        }
        let ratio = value / baseline;
        let penalty = if ratio <= 1.0 {
            (1.0 - ratio) * 100.0
        } else {
            let over = ratio - 1.0;
            let soft = over.min(self.config.soft_overshoot);
            let steep = (over - self.config.soft_overshoot).max(0.0);
            (steep * self.config.steep_overshoot_penalty).mul_add(100.0, soft * 100.0)
        };
        (100.0 - penalty).clamp(0.0, 100.0)
    }

    /// Ideal daily TSS on `date`: the containing block's weekly midpoint or
    /// the maintenance target, divided by seven; zero outside any block
    #[must_use]
    pub fn ideal_daily_tss(plan: Option<&TrainingPlan>, date: NaiveDate) -> f64 {
        let Some(plan) = plan else {
            return 0.0;
        };
        match &plan.structure {
            PlanStructure::Maintenance {
                weekly_tss_target, ..
            } => weekly_tss_target.max(0.0) / DAYS_PER_WEEK_F64,
            PlanStructure::Periodized { .. } => {
                PeriodizationPlanner::find_block_for_date(plan, date)
                    .map_or(0.0, |block| block.target_weekly_tss.midpoint() / DAYS_PER_WEEK_F64)
            }
        }
    }

    fn boundary(&self, value: f64, baseline: f64) -> BoundaryState {
        if baseline <= 0.0 {
            return BoundaryState::Safe;
        }
        let ratio = value / baseline;
        if ratio > self.config.exceeded_ratio {
            BoundaryState::Exceeded
        } else if ratio > self.config.caution_ratio {
            BoundaryState::Caution
        } else {
            BoundaryState::Safe
        }
    }

    /// Per-day timeline from `start` to `end` inclusive
    ///
    /// Days after `today` are scored on scheduled versus ideal only and carry
    /// no actual-load boundary check.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when `end` precedes `start` or the
    /// window exceeds the configured cap.
    pub fn insight_timeline(
        &self,
        plan: Option<&TrainingPlan>,
        start: NaiveDate,
        end: NaiveDate,
        planned: &[PlannedActivity],
        completed: &[Activity],
        today: NaiveDate,
    ) -> AppResult<Vec<AdherenceDay>> {
        if end < start {
            return Err(AppError::invalid_input(format!(
                "Date range end {end} is before start {start}"
            )));
        }
        let days = (end - start).num_days() + 1;
        if days > self.config.max_window_days {
            return Err(AppError::invalid_input(format!(
                "Date range of {days} days exceeds the maximum of {} days",
                self.config.max_window_days
            )));
        }

        let mut scheduled: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for session in planned {
            *scheduled.entry(session.date).or_insert(0.0) += session.tss_contribution();
        }
        let mut actual: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for activity in completed {
            *actual.entry(activity.day()).or_insert(0.0) += activity.metrics.tss_contribution();
        }

        let timeline: Vec<AdherenceDay> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| {
                let ideal = Self::ideal_daily_tss(plan, date);
                let scheduled_tss = scheduled.get(&date).copied().unwrap_or(0.0);
                let actual_tss = actual.get(&date).copied().unwrap_or(0.0);
                self.score_day(date, ideal, scheduled_tss, actual_tss, date > today)
            })
            .collect();

        debug!(
            days = timeline.len(),
            plan_id = ?plan.map(|p| p.id),
            "Built adherence timeline"
        );
        Ok(timeline)
    }

    fn score_day(
        &self,
        date: NaiveDate,
        ideal: f64,
        scheduled: f64,
        actual: f64,
        is_future: bool,
    ) -> AdherenceDay {
        let plan_score = self.ratio_score(scheduled, ideal);
        let adherence_score = if is_future {
            plan_score
        } else {
            self.config.actual_weight.mul_add(
                self.ratio_score(actual, scheduled),
                self.config.scheduled_weight * plan_score,
            )
        };

        let mut boundary_state = BoundaryState::Safe;
        let mut boundary_reasons = Vec::new();
        let scheduled_state = self.boundary(scheduled, ideal);
        if scheduled_state > BoundaryState::Safe {
            boundary_state = boundary_state.max(scheduled_state);
            boundary_reasons.push(BoundaryReason::ScheduledExceedsIdeal);
        }
        if !is_future {
            let (baseline, reason) = if scheduled > 0.0 {
                (scheduled, BoundaryReason::ActualExceedsScheduled)
            } else {
                (ideal, BoundaryReason::ActualExceedsIdeal)
            };
            let actual_state = self.boundary(actual, baseline);
            if actual_state > BoundaryState::Safe {
                boundary_state = boundary_state.max(actual_state);
                boundary_reasons.push(reason);
            }
        }

        AdherenceDay {
            date,
            ideal_tss: round1(ideal),
            scheduled_tss: round1(scheduled),
            actual_tss: round1(actual),
            adherence_score: round1(adherence_score),
            boundary_state,
            boundary_reasons,
        }
    }
}
