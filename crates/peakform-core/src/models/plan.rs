// ABOUTME: Goals, periodized and maintenance training plans, and scheduled sessions
// ABOUTME: Block date ranges are inclusive on both ends and must be contiguous
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::ActivityCategory;
use crate::errors::{AppError, AppResult};

/// Lowest accepted goal priority
pub const MIN_GOAL_PRIORITY: u8 = 1;
/// Highest accepted goal priority
pub const MAX_GOAL_PRIORITY: u8 = 10;

/// Periodization phase label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    /// Aerobic base building
    Base,
    /// Specific build
    Build,
    /// Race-specific peak
    Peak,
    /// Pre-event load reduction
    Taper,
    /// Unloading block
    Recovery,
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Base => "base",
            Self::Build => "build",
            Self::Peak => "peak",
            Self::Taper => "taper",
            Self::Recovery => "recovery",
        };
        f.write_str(label)
    }
}

/// Weekly TSS target range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TssRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl TssRange {
    /// Midpoint of the range
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Whether both bounds are finite, non-negative and ordered
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

/// Sessions-per-week target range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRange {
    /// Fewest sessions
    pub min: u32,
    /// Most sessions
    pub max: u32,
}

/// One phase-labelled block of a periodized plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingBlock {
    /// Display name
    pub name: String,
    /// Phase label
    pub phase: TrainingPhase,
    /// First day of the block (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the block (inclusive)
    pub end_date: NaiveDate,
    /// Weekly TSS target
    pub target_weekly_tss: TssRange,
    /// Weekly session count target
    pub target_sessions: SessionRange,
}

impl TrainingBlock {
    /// Whether `date` falls inside the block, both ends inclusive
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Number of calendar days covered
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Planned CTL trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessProgression {
    /// CTL when the plan starts
    pub starting_ctl: f64,
    /// CTL targeted at the end of the peak phase
    pub target_ctl: f64,
    /// Planned CTL gain per week
    pub weekly_ramp_rate: f64,
    /// Last day before the taper (plan start for taper-only plans)
    pub peak_date: NaiveDate,
}

/// Typed goal target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalTarget {
    /// Finish a distance within a time
    RacePerformance {
        /// Race distance in meters
        distance_meters: f64,
        /// Goal finish time in seconds
        target_time_seconds: f64,
    },
    /// Reach a threshold running speed
    PaceThreshold {
        /// Threshold speed in m/s
        speed_mps: f64,
    },
    /// Reach a functional threshold power
    PowerThreshold {
        /// Threshold power in watts
        watts: f64,
    },
    /// Reach a lactate threshold heart rate
    HeartRateThreshold {
        /// Threshold heart rate in bpm
        bpm: f64,
    },
    /// Reach a chronic training load
    Fitness {
        /// Target CTL
        target_ctl: f64,
    },
}

impl GoalTarget {
    /// CTL target carried by fitness-typed targets
    #[must_use]
    pub const fn target_ctl(&self) -> Option<f64> {
        match self {
            Self::Fitness { target_ctl } => Some(*target_ctl),
            _ => None,
        }
    }

    /// Canonical text used for deterministic identifiers
    #[must_use]
    pub fn identity_key(&self) -> String {
        match self {
            Self::RacePerformance {
                distance_meters,
                target_time_seconds,
            } => format!("race:{distance_meters}:{target_time_seconds}"),
            Self::PaceThreshold { speed_mps } => format!("pace:{speed_mps}"),
            Self::PowerThreshold { watts } => format!("power:{watts}"),
            Self::HeartRateThreshold { bpm } => format!("hr:{bpm}"),
            Self::Fitness { target_ctl } => format!("ctl:{target_ctl}"),
        }
    }

    fn values(&self) -> [f64; 2] {
        match self {
            Self::RacePerformance {
                distance_meters,
                target_time_seconds,
            } => [*distance_meters, *target_time_seconds],
            Self::PaceThreshold { speed_mps } => [*speed_mps, *speed_mps],
            Self::PowerThreshold { watts } => [*watts, *watts],
            Self::HeartRateThreshold { bpm } => [*bpm, *bpm],
            Self::Fitness { target_ctl } => [*target_ctl, *target_ctl],
        }
    }

    /// Check that every numeric value is finite and positive
    ///
    /// # Errors
    ///
    /// Returns `AppError::ValueOutOfRange` naming the target when a value is
    /// not a positive finite number.
    pub fn validate(&self) -> AppResult<()> {
        if self.values().iter().all(|v| v.is_finite() && *v > 0.0) {
            Ok(())
        } else {
            Err(AppError::out_of_range(format!(
                "Goal target values must be positive numbers: {}",
                self.identity_key()
            )))
        }
    }
}

/// Goal as submitted before a plan exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalGoal {
    /// Display name
    pub name: String,
    /// Event or deadline date
    pub target_date: NaiveDate,
    /// Importance, 1 (low) to 10 (high)
    pub priority: u8,
    /// One or more typed targets
    pub targets: Vec<GoalTarget>,
}

impl MinimalGoal {
    /// Validate name, priority and targets
    ///
    /// # Errors
    ///
    /// Returns `AppError::MissingRequiredField` for an empty name or target
    /// list, and `AppError::ValueOutOfRange` for a priority outside 1-10 or a
    /// non-positive target value.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field("goal.name"));
        }
        if !(MIN_GOAL_PRIORITY..=MAX_GOAL_PRIORITY).contains(&self.priority) {
            return Err(AppError::out_of_range(format!(
                "Goal priority must be between {MIN_GOAL_PRIORITY} and {MAX_GOAL_PRIORITY}, got {}",
                self.priority
            )));
        }
        if self.targets.is_empty() {
            return Err(AppError::missing_field("goal.targets"));
        }
        self.targets.iter().try_for_each(GoalTarget::validate)
    }

    /// Canonical text used for deterministic identifiers
    #[must_use]
    pub fn identity_key(&self) -> String {
        let targets: Vec<String> = self.targets.iter().map(GoalTarget::identity_key).collect();
        format!(
            "{}|{}|{}|{}",
            self.name.trim(),
            self.target_date,
            self.priority,
            targets.join(",")
        )
    }
}

/// Goal embedded in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Event or deadline date
    pub target_date: NaiveDate,
    /// Importance, 1 (low) to 10 (high)
    pub priority: u8,
    /// One or more typed targets
    pub targets: Vec<GoalTarget>,
}

impl Goal {
    /// Attach an identifier to a minimal goal
    #[must_use]
    pub fn from_minimal(id: Uuid, goal: MinimalGoal) -> Self {
        Self {
            id,
            name: goal.name,
            target_date: goal.target_date,
            priority: goal.priority,
            targets: goal.targets,
        }
    }

    /// Highest CTL target among fitness-typed targets
    #[must_use]
    pub fn target_ctl(&self) -> Option<f64> {
        self.targets
            .iter()
            .filter_map(GoalTarget::target_ctl)
            .reduce(f64::max)
    }

    /// Whether the priority is inside 1-10
    #[must_use]
    pub fn has_valid_priority(&self) -> bool {
        (MIN_GOAL_PRIORITY..=MAX_GOAL_PRIORITY).contains(&self.priority)
    }
}

/// Plan body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanStructure {
    /// Phased blocks leading to one or more goals
    Periodized {
        /// Ordered, contiguous blocks
        blocks: Vec<TrainingBlock>,
        /// Goals the plan is built for
        goals: Vec<Goal>,
        /// Planned CTL trajectory
        fitness_progression: FitnessProgression,
    },
    /// Flat weekly target with no end date
    Maintenance {
        /// Weekly TSS target
        weekly_tss_target: f64,
        /// Weekly session count target
        sessions_per_week: SessionRange,
    },
}

/// Versioned training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    /// Identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Display name
    pub name: String,
    /// Incremented on every explicit update
    pub version: u32,
    /// At most one plan per athlete is active
    pub is_active: bool,
    /// Creation instant
    pub created_at: DateTime<Utc>,
    /// Plan body
    pub structure: PlanStructure,
}

impl TrainingPlan {
    /// Blocks of a periodized plan; empty for maintenance plans
    #[must_use]
    pub fn blocks(&self) -> &[TrainingBlock] {
        match &self.structure {
            PlanStructure::Periodized { blocks, .. } => blocks,
            PlanStructure::Maintenance { .. } => &[],
        }
    }

    /// Goals of a periodized plan; empty for maintenance plans
    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        match &self.structure {
            PlanStructure::Periodized { goals, .. } => goals,
            PlanStructure::Maintenance { .. } => &[],
        }
    }

    /// Fitness progression of a periodized plan
    #[must_use]
    pub const fn fitness_progression(&self) -> Option<&FitnessProgression> {
        match &self.structure {
            PlanStructure::Periodized {
                fitness_progression,
                ..
            } => Some(fitness_progression),
            PlanStructure::Maintenance { .. } => None,
        }
    }

    /// Check the caller owns this plan
    ///
    /// # Errors
    ///
    /// Returns `AppError::PermissionDenied` when `athlete_id` does not match.
    pub fn ensure_owned_by(&self, athlete_id: Uuid) -> AppResult<()> {
        if self.athlete_id == athlete_id {
            Ok(())
        } else {
            Err(
                AppError::permission_denied("Training plan belongs to another athlete")
                    .with_athlete_id(athlete_id)
                    .with_resource_id(self.id.to_string()),
            )
        }
    }
}

/// Scheduled session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedActivity {
    /// Identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Scheduled day
    pub date: NaiveDate,
    /// Linked workout template, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    /// Session category
    pub category: ActivityCategory,
    /// Estimated stress of the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_tss: Option<f64>,
}

impl PlannedActivity {
    /// Estimated TSS, counting missing or non-finite estimates as zero
    #[must_use]
    pub fn tss_contribution(&self) -> f64 {
        self.estimated_tss
            .filter(|tss| tss.is_finite() && *tss >= 0.0)
            .unwrap_or(0.0)
    }
}
