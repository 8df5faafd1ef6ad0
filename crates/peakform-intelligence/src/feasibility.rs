// ABOUTME: Goal and plan feasibility (feasible/aggressive/unsafe) and safety (safe/caution/exceeded)
// ABOUTME: Timeline and required-ramp heuristics with a worst-state plan rollup and reason codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use chrono::NaiveDate;
use peakform_core::constants::rounding::round1;
use peakform_core::constants::time_constants::DAYS_PER_WEEK_F64;
use peakform_core::models::{Goal, TrainingPlan};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{FeasibilityConfig, IntelligenceConfig};
use crate::periodization::{
    PeriodizationPlanner, PlanValidation, PlanWarning, PlanWarningLevel,
};

/// Whether a goal can realistically be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityState {
    /// Achievable with normal progression
    Feasible,
    /// Achievable only with compressed preparation
    Aggressive,
    /// Not achievable safely
    Unsafe,
}

/// Whether the load needed stays within physiological limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyState {
    /// Within limits
    Safe,
    /// Near limits
    Caution,
    /// Beyond limits
    Exceeded,
}

/// Stable reason codes attached to non-best states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Goal date precedes the reference date
    GoalDateInPast,
    /// Fewer days than the minimum preparation
    GoalTimelineTooShort,
    /// Fewer days than comfortable preparation
    LimitedPreparationWindow,
    /// Required CTL ramp is unsafe
    RequiredRampUnsafe,
    /// Required CTL ramp is aggressive
    RequiredRampAggressive,
    /// High-priority goal inside the compressed window
    HighPriorityCompressedTimeline,
    /// Goal less than two weeks away
    #[serde(rename = "timeline_under_14_days")]
    TimelineUnder14Days,
    /// Goal less than five weeks away
    #[serde(rename = "timeline_under_35_days")]
    TimelineUnder35Days,
    /// Required ramp beyond the safe limit
    RampExceedsSafeLimit,
    /// Required ramp elevated
    RampElevated,
    /// A block-to-block increase warrants caution
    BlockRampCaution,
    /// A block-to-block increase is excessive
    BlockRampExcessive,
    /// Plan structure failed validation
    PlanStructureInvalid,
}

impl ReasonCode {
    /// Code as emitted on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoalDateInPast => "goal_date_in_past",
            Self::GoalTimelineTooShort => "goal_timeline_too_short",
            Self::LimitedPreparationWindow => "limited_preparation_window",
            Self::RequiredRampUnsafe => "required_ramp_unsafe",
            Self::RequiredRampAggressive => "required_ramp_aggressive",
            Self::HighPriorityCompressedTimeline => "high_priority_compressed_timeline",
            Self::TimelineUnder14Days => "timeline_under_14_days",
            Self::TimelineUnder35Days => "timeline_under_35_days",
            Self::RampExceedsSafeLimit => "ramp_exceeds_safe_limit",
            Self::RampElevated => "ramp_elevated",
            Self::BlockRampCaution => "block_ramp_caution",
            Self::BlockRampExcessive => "block_ramp_excessive",
            Self::PlanStructureInvalid => "plan_structure_invalid",
        }
    }
}

/// State plus the reasons that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment<S> {
    /// Worst state reached
    pub state: S,
    /// Reasons in first-seen order, without duplicates
    pub reasons: Vec<ReasonCode>,
}

impl<S: Ord + Copy> Assessment<S> {
    const fn new(best: S) -> Self {
        Self {
            state: best,
            reasons: Vec::new(),
        }
    }

    /// Raise the state to at least `state` and record the reason
    fn escalate(&mut self, state: S, reason: ReasonCode) {
        self.state = self.state.max(state);
        self.note(reason);
    }

    fn note(&mut self, reason: ReasonCode) {
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.state = self.state.max(other.state);
        for reason in &other.reasons {
            self.note(*reason);
        }
    }
}

/// Assessment of one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAssessment {
    /// Goal identifier
    pub goal_id: Uuid,
    /// Goal name
    pub goal_name: String,
    /// Target date minus reference date, whole days
    pub days_until_goal: i64,
    /// CTL per week needed to reach a fitness target, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_weekly_ramp: Option<f64>,
    /// Feasibility
    pub feasibility: Assessment<FeasibilityState>,
    /// Safety
    pub safety: Assessment<SafetyState>,
}

/// Plan-level rollup of goals, block ramps and structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAssessment {
    /// Plan identifier
    pub plan_id: Uuid,
    /// Worst feasibility across all parts
    pub feasibility: Assessment<FeasibilityState>,
    /// Worst safety across all parts
    pub safety: Assessment<SafetyState>,
    /// Per-goal assessments in plan order
    pub goals: Vec<GoalAssessment>,
    /// Block-to-block ramp warnings
    pub block_warnings: Vec<PlanWarning>,
    /// Structure check result
    pub structure: PlanValidation,
}

/// Classifies goals and plans against timeline and ramp limits
#[derive(Debug, Clone, Default)]
pub struct FeasibilityAssessor {
    config: FeasibilityConfig,
    planner: PeriodizationPlanner,
}

impl FeasibilityAssessor {
    /// Create an assessor from thresholds and the planner used for block checks
    #[must_use]
    pub const fn new(config: FeasibilityConfig, planner: PeriodizationPlanner) -> Self {
        Self { config, planner }
    }

    /// Create an assessor from the engine configuration
    #[must_use]
    pub fn from_config(config: &IntelligenceConfig) -> Self {
        Self::new(
            config.feasibility.clone(),
            PeriodizationPlanner::from_config(config),
        )
    }

    /// Required CTL ramp per week to reach `target_ctl` in `days`
    #[must_use]
    pub fn required_weekly_ramp(current_ctl: f64, target_ctl: f64, days: i64) -> Option<f64> {
        (days > 0 && current_ctl.is_finite() && target_ctl.is_finite())
            .then(|| (target_ctl - current_ctl) / (days as f64 / DAYS_PER_WEEK_F64))
    }

    /// Assess one goal against a reference date and current fitness
    #[must_use]
    pub fn assess_goal(
        &self,
        goal: &Goal,
        reference_date: NaiveDate,
        current_ctl: Option<f64>,
    ) -> GoalAssessment {
        let cfg = &self.config;
        let days = (goal.target_date - reference_date).num_days();
        let ramp = current_ctl
            .zip(goal.target_ctl())
            .and_then(|(current, target)| Self::required_weekly_ramp(current, target, days));

        let mut feasibility = Assessment::new(FeasibilityState::Feasible);
        if days < 0 {
            feasibility.escalate(FeasibilityState::Unsafe, ReasonCode::GoalDateInPast);
        } else if days < cfg.min_preparation_days {
            feasibility.escalate(FeasibilityState::Unsafe, ReasonCode::GoalTimelineTooShort);
        } else if days < cfg.comfortable_preparation_days {
            feasibility.escalate(
                FeasibilityState::Aggressive,
                ReasonCode::LimitedPreparationWindow,
            );
        }
        if let Some(ramp) = ramp {
            if ramp > cfg.ramp_unsafe {
                feasibility.escalate(FeasibilityState::Unsafe, ReasonCode::RequiredRampUnsafe);
            } else if ramp > cfg.ramp_aggressive {
                feasibility.escalate(
                    FeasibilityState::Aggressive,
                    ReasonCode::RequiredRampAggressive,
                );
            }
        }
        if feasibility.state == FeasibilityState::Feasible
            && goal.priority >= cfg.high_priority
            && days < cfg.high_priority_window_days
        {
            feasibility.escalate(
                FeasibilityState::Aggressive,
                ReasonCode::HighPriorityCompressedTimeline,
            );
        }

        let mut safety = Assessment::new(SafetyState::Safe);
        if days >= 0 {
            if days < cfg.safety_exceeded_days {
                safety.escalate(SafetyState::Exceeded, ReasonCode::TimelineUnder14Days);
            } else if days < cfg.safety_caution_days {
                safety.escalate(SafetyState::Caution, ReasonCode::TimelineUnder35Days);
            }
        }
        if let Some(ramp) = ramp {
            if ramp > cfg.ramp_exceeded {
                safety.escalate(SafetyState::Exceeded, ReasonCode::RampExceedsSafeLimit);
            } else if ramp > cfg.ramp_caution {
                safety.escalate(SafetyState::Caution, ReasonCode::RampElevated);
            }
        }

        GoalAssessment {
            goal_id: goal.id,
            goal_name: goal.name.clone(),
            days_until_goal: days,
            required_weekly_ramp: ramp.map(round1),
            feasibility,
            safety,
        }
    }

    /// Assess a plan: worst state across goals, block ramps and structure
    #[must_use]
    pub fn assess_plan(
        &self,
        plan: &TrainingPlan,
        reference_date: NaiveDate,
        current_ctl: Option<f64>,
    ) -> PlanAssessment {
        let goals: Vec<GoalAssessment> = plan
            .goals()
            .iter()
            .map(|goal| self.assess_goal(goal, reference_date, current_ctl))
            .collect();

        let mut feasibility = Assessment::new(FeasibilityState::Feasible);
        let mut safety = Assessment::new(SafetyState::Safe);
        for goal in &goals {
            feasibility.absorb(&goal.feasibility);
            safety.absorb(&goal.safety);
        }

        let block_warnings = self.planner.validate_plan_feasibility(plan);
        for warning in &block_warnings {
            match warning.level {
                PlanWarningLevel::Caution => {
                    safety.escalate(SafetyState::Caution, ReasonCode::BlockRampCaution);
                }
                PlanWarningLevel::Excessive => {
                    safety.escalate(SafetyState::Exceeded, ReasonCode::BlockRampExcessive);
                    feasibility.escalate(
                        FeasibilityState::Aggressive,
                        ReasonCode::BlockRampExcessive,
                    );
                }
            }
        }

        let structure = PeriodizationPlanner::validate_plan_structure(plan);
        if !structure.is_valid() {
            feasibility.escalate(FeasibilityState::Unsafe, ReasonCode::PlanStructureInvalid);
        }

        debug!(
            plan_id = %plan.id,
            feasibility = ?feasibility.state,
            safety = ?safety.state,
            "Assessed plan"
        );

        PlanAssessment {
            plan_id: plan.id,
            feasibility,
            safety,
            goals,
            block_warnings,
            structure,
        }
    }
}
