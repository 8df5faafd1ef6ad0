// ABOUTME: Periodized plan synthesis from minimal goals, structure checks and block-ramp warnings
// ABOUTME: Deterministic plan ids from goal identity so previews and commits agree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use peakform_core::constants::rounding::round1;
use peakform_core::constants::time_constants::{DAYS_PER_WEEK, DAYS_PER_WEEK_F64};
use peakform_core::models::{
    FitnessProgression, Goal, MinimalGoal, PlanStructure, SessionRange, TrainingBlock,
    TrainingPhase, TrainingPlan, TssRange,
};
use peakform_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{IntelligenceConfig, PeriodizationConfig};

/// Namespace for deterministic plan and goal identifiers
const PLAN_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_9b7d_4e58_a0c4_d2f1_8e3b_7c56);

/// Step used to keep a rounded weekly band under the ramp cap
const BAND_ROUNDING_SLACK: f64 = 0.05;

/// Severity of a block-to-block load increase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanWarningLevel {
    /// Above the caution threshold
    Caution,
    /// Above the excessive threshold
    Excessive,
}

/// Block-to-block weekly TSS increase above a safety threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// Severity
    pub level: PlanWarningLevel,
    /// Block the increase starts from
    pub from_block: String,
    /// Block the increase lands on
    pub to_block: String,
    /// Increase of the weekly TSS midpoint, percent
    pub increase_percent: f64,
}

impl PlanWarning {
    /// Stable reason code
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self.level {
            PlanWarningLevel::Caution => "block_ramp_caution",
            PlanWarningLevel::Excessive => "block_ramp_excessive",
        }
    }
}

/// One structural defect of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum StructureIssue {
    /// Periodized plan without blocks
    NoBlocks,
    /// Block ends before it starts
    InvertedDates {
        /// Block name
        block: String,
    },
    /// Consecutive blocks leave days uncovered
    Gap {
        /// Earlier block
        after: String,
        /// Later block
        before: String,
    },
    /// Consecutive blocks share days or are out of order
    Overlap {
        /// Earlier block
        after: String,
        /// Later block
        before: String,
    },
    /// Phase sequence goes backwards
    PhaseOutOfOrder {
        /// Offending block
        block: String,
    },
    /// Weekly TSS range is negative, unordered or not finite
    InvalidTssRange {
        /// Block name
        block: String,
    },
    /// Session range is empty or unordered
    InvalidSessionRange {
        /// Block name, or `maintenance`
        block: String,
    },
    /// Goal priority outside 1-10
    InvalidPriority {
        /// Goal name
        goal: String,
        /// Submitted priority
        priority: u8,
    },
    /// Goal has no targets or a non-positive target value
    InvalidGoalTarget {
        /// Goal name
        goal: String,
    },
    /// Goal date outside the block span
    GoalOutsidePlan {
        /// Goal name
        goal: String,
    },
    /// Progression carries non-finite or negative CTL
    InvalidProgression,
    /// Maintenance weekly target is negative or not finite
    InvalidMaintenanceTarget,
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBlocks => write!(f, "periodized plan has no blocks"),
            Self::InvertedDates { block } => write!(f, "block '{block}' ends before it starts"),
            Self::Gap { after, before } => {
                write!(f, "days uncovered between '{after}' and '{before}'")
            }
            Self::Overlap { after, before } => write!(f, "blocks '{after}' and '{before}' overlap"),
            Self::PhaseOutOfOrder { block } => write!(f, "block '{block}' is out of phase order"),
            Self::InvalidTssRange { block } => write!(f, "block '{block}' has an invalid TSS range"),
            Self::InvalidSessionRange { block } => {
                write!(f, "'{block}' has an invalid session range")
            }
            Self::InvalidPriority { goal, priority } => {
                write!(f, "goal '{goal}' has priority {priority} outside 1-10")
            }
            Self::InvalidGoalTarget { goal } => write!(f, "goal '{goal}' has invalid targets"),
            Self::GoalOutsidePlan { goal } => {
                write!(f, "goal '{goal}' falls outside the plan blocks")
            }
            Self::InvalidProgression => write!(f, "fitness progression has invalid CTL values"),
            Self::InvalidMaintenanceTarget => write!(f, "maintenance weekly target is invalid"),
        }
    }
}

/// Result of a structure check, listing every issue found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanValidation {
    /// No issues
    Valid,
    /// One or more issues
    Invalid {
        /// All issues in discovery order
        issues: Vec<StructureIssue>,
    },
}

impl PlanValidation {
    /// Whether the plan passed
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Issues found, empty when valid
    #[must_use]
    pub fn issues(&self) -> &[StructureIssue] {
        match self {
            Self::Valid => &[],
            Self::Invalid { issues } => issues,
        }
    }
}

const fn phase_rank(phase: TrainingPhase) -> Option<u8> {
    match phase {
        TrainingPhase::Base => Some(0),
        TrainingPhase::Build => Some(1),
        TrainingPhase::Peak => Some(2),
        TrainingPhase::Taper => Some(3),
        TrainingPhase::Recovery => None,
    }
}

const fn sessions_for(phase: TrainingPhase) -> SessionRange {
    match phase {
        TrainingPhase::Base => SessionRange { min: 4, max: 5 },
        TrainingPhase::Build | TrainingPhase::Peak => SessionRange { min: 5, max: 6 },
        TrainingPhase::Taper => SessionRange { min: 3, max: 4 },
        TrainingPhase::Recovery => SessionRange { min: 2, max: 3 },
    }
}

fn phase_label(phase: TrainingPhase) -> &'static str {
    match phase {
        TrainingPhase::Base => "Base",
        TrainingPhase::Build => "Build",
        TrainingPhase::Peak => "Peak",
        TrainingPhase::Taper => "Taper",
        TrainingPhase::Recovery => "Recovery",
    }
}

/// Phase with its inclusive day span
#[derive(Debug, Clone, Copy)]
struct PhaseSpan {
    phase: TrainingPhase,
    start: NaiveDate,
    end: NaiveDate,
}

/// Linear CTL trajectory from plan start to peak, flat afterwards
#[derive(Debug, Clone, Copy)]
struct CtlTrajectory {
    start: NaiveDate,
    starting_ctl: f64,
    target_ctl: f64,
    weekly_ramp: f64,
}

impl CtlTrajectory {
    fn ctl_at(&self, date: NaiveDate) -> f64 {
        let weeks = (date - self.start).num_days() as f64 / DAYS_PER_WEEK_F64;
        let ctl = self.weekly_ramp.mul_add(weeks, self.starting_ctl);
        if self.weekly_ramp >= 0.0 {
            ctl.min(self.target_ctl)
        } else {
            ctl.max(self.target_ctl)
        }
    }
}

/// Builds and checks periodized training plans
#[derive(Debug, Clone, Default)]
pub struct PeriodizationPlanner {
    config: PeriodizationConfig,
}

impl PeriodizationPlanner {
    /// Create a planner with the given parameters
    #[must_use]
    pub const fn new(config: PeriodizationConfig) -> Self {
        Self { config }
    }

    /// Create a planner from the engine configuration
    #[must_use]
    pub fn from_config(config: &IntelligenceConfig) -> Self {
        Self::new(config.periodization.clone())
    }

    /// Deterministic plan id for a goal set and reference date
    #[must_use]
    pub fn plan_id(athlete_id: Uuid, goals: &[MinimalGoal], today: NaiveDate) -> Uuid {
        let mut keys: Vec<String> = goals.iter().map(MinimalGoal::identity_key).collect();
        keys.sort();
        let canonical = format!("{athlete_id}#{today}#{}", keys.join(";"));
        Uuid::new_v5(&PLAN_NAMESPACE, canonical.as_bytes())
    }

    /// Expand one or more minimal goals into a periodized plan
    ///
    /// Blocks run base, build, peak, taper from `today` through the latest
    /// goal date, contiguous and inclusive. The same goals, date and athlete
    /// always yield the same id and block structure.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no goals are given, a goal is
    /// malformed, every goal date precedes `today`, or `starting_ctl` is
    /// negative or not finite.
    pub fn expand_minimal_goal_to_plan(
        &self,
        athlete_id: Uuid,
        goals: &[MinimalGoal],
        today: NaiveDate,
        starting_ctl: f64,
    ) -> AppResult<TrainingPlan> {
        if goals.is_empty() {
            return Err(AppError::missing_field("goals"));
        }
        for goal in goals {
            goal.validate()?;
        }
        if !starting_ctl.is_finite() || starting_ctl < 0.0 {
            return Err(AppError::out_of_range(format!(
                "Starting CTL must be a non-negative number, got {starting_ctl}"
            )));
        }
        let end = goals
            .iter()
            .map(|goal| goal.target_date)
            .max()
            .ok_or_else(|| AppError::missing_field("goals"))?;
        if end < today {
            return Err(AppError::invalid_input(format!(
                "Latest goal date {end} is before {today}"
            ))
            .with_athlete_id(athlete_id));
        }

        let plan_id = Self::plan_id(athlete_id, goals, today);
        let mut ordered: Vec<&MinimalGoal> = goals.iter().collect();
        ordered.sort_by(|a, b| {
            a.target_date
                .cmp(&b.target_date)
                .then_with(|| a.identity_key().cmp(&b.identity_key()))
        });
        let plan_goals: Vec<Goal> = ordered
            .into_iter()
            .map(|goal| {
                let id = Uuid::new_v5(&plan_id, goal.identity_key().as_bytes());
                Goal::from_minimal(id, goal.clone())
            })
            .collect();

        let phases = self.allocate_phases(today, end);
        let peak_date = phases
            .iter()
            .rev()
            .find(|span| span.phase != TrainingPhase::Taper)
            .map_or(today, |span| span.end);
        let weeks_to_peak = (peak_date - today).num_days() as f64 / DAYS_PER_WEEK_F64;

        let mut target_ctl = self
            .config
            .default_ramp_ctl_per_week
            .mul_add(weeks_to_peak, starting_ctl);
        if let Some(goal_ctl) = plan_goals.iter().filter_map(Goal::target_ctl).reduce(f64::max) {
            target_ctl = target_ctl.min(goal_ctl.max(starting_ctl));
        }
        let weekly_ramp = if weeks_to_peak > 0.0 {
            (target_ctl - starting_ctl) / weeks_to_peak
        } else {
            0.0
        };
        let trajectory = CtlTrajectory {
            start: today,
            starting_ctl,
            target_ctl,
            weekly_ramp,
        };

        let blocks = self.build_blocks(&phases, &trajectory);
        let name = plan_goals
            .last()
            .map_or_else(|| "Training plan".to_owned(), |goal| format!("{} plan", goal.name));

        info!(
            athlete_id = %athlete_id,
            plan_id = %plan_id,
            blocks = blocks.len(),
            target_ctl = round1(target_ctl),
            "Expanded goals into periodized plan"
        );

        Ok(TrainingPlan {
            id: plan_id,
            athlete_id,
            name,
            version: 1,
            is_active: false,
            created_at: Utc::now(),
            structure: PlanStructure::Periodized {
                blocks,
                goals: plan_goals,
                fitness_progression: FitnessProgression {
                    starting_ctl: round1(starting_ctl),
                    target_ctl: round1(target_ctl),
                    weekly_ramp_rate: round1(weekly_ramp),
                    peak_date,
                },
            },
        })
    }

    /// Flat maintenance plan
    ///
    /// # Errors
    ///
    /// Returns `AppError::ValueOutOfRange` for a negative or non-finite weekly
    /// target or an empty session range.
    pub fn maintenance_plan(
        athlete_id: Uuid,
        weekly_tss_target: f64,
        sessions_per_week: SessionRange,
        created_at: DateTime<Utc>,
    ) -> AppResult<TrainingPlan> {
        if !weekly_tss_target.is_finite() || weekly_tss_target < 0.0 {
            return Err(AppError::out_of_range(format!(
                "Weekly TSS target must be a non-negative number, got {weekly_tss_target}"
            )));
        }
        if sessions_per_week.max == 0 || sessions_per_week.min > sessions_per_week.max {
            return Err(AppError::out_of_range("Sessions per week range is invalid"));
        }
        Ok(TrainingPlan {
            id: Uuid::new_v4(),
            athlete_id,
            name: "Maintenance".to_owned(),
            version: 1,
            is_active: false,
            created_at,
            structure: PlanStructure::Maintenance {
                weekly_tss_target,
                sessions_per_week,
            },
        })
    }

    /// Flag block-to-block weekly TSS increases above the ramp thresholds
    #[must_use]
    pub fn validate_plan_feasibility(&self, plan: &TrainingPlan) -> Vec<PlanWarning> {
        plan.blocks()
            .windows(2)
            .filter_map(|pair| {
                let previous = pair[0].target_weekly_tss.midpoint();
                let next = pair[1].target_weekly_tss.midpoint();
                if previous <= 0.0 || !next.is_finite() {
                    return None;
                }
                let increase = (next - previous) / previous;
                let level = if increase > self.config.block_ramp_excessive {
                    PlanWarningLevel::Excessive
                } else if increase > self.config.block_ramp_caution {
                    PlanWarningLevel::Caution
                } else {
                    return None;
                };
                Some(PlanWarning {
                    level,
                    from_block: pair[0].name.clone(),
                    to_block: pair[1].name.clone(),
                    increase_percent: round1(increase * 100.0),
                })
            })
            .collect()
    }

    /// Check block contiguity, ordering, ranges and goal priorities
    #[must_use]
    pub fn validate_plan_structure(plan: &TrainingPlan) -> PlanValidation {
        let mut issues = Vec::new();
        match &plan.structure {
            PlanStructure::Periodized {
                blocks,
                goals,
                fitness_progression,
            } => {
                Self::check_blocks(blocks, &mut issues);
                Self::check_goals(blocks, goals, &mut issues);
                let progression = [fitness_progression.starting_ctl, fitness_progression.target_ctl];
                if progression.iter().any(|ctl| !ctl.is_finite() || *ctl < 0.0)
                    || !fitness_progression.weekly_ramp_rate.is_finite()
                {
                    issues.push(StructureIssue::InvalidProgression);
                }
            }
            PlanStructure::Maintenance {
                weekly_tss_target,
                sessions_per_week,
            } => {
                if !weekly_tss_target.is_finite() || *weekly_tss_target < 0.0 {
                    issues.push(StructureIssue::InvalidMaintenanceTarget);
                }
                if sessions_per_week.max == 0 || sessions_per_week.min > sessions_per_week.max {
                    issues.push(StructureIssue::InvalidSessionRange {
                        block: "maintenance".to_owned(),
                    });
                }
            }
        }
        if issues.is_empty() {
            PlanValidation::Valid
        } else {
            debug!(plan_id = %plan.id, issues = issues.len(), "Plan structure invalid");
            PlanValidation::Invalid { issues }
        }
    }

    /// Block whose inclusive date range contains `date`
    #[must_use]
    pub fn find_block_for_date(plan: &TrainingPlan, date: NaiveDate) -> Option<&TrainingBlock> {
        plan.blocks().iter().find(|block| block.contains(date))
    }

    fn check_blocks(blocks: &[TrainingBlock], issues: &mut Vec<StructureIssue>) {
        if blocks.is_empty() {
            issues.push(StructureIssue::NoBlocks);
            return;
        }
        for block in blocks {
            if block.end_date < block.start_date {
                issues.push(StructureIssue::InvertedDates {
                    block: block.name.clone(),
                });
            }
            if !block.target_weekly_tss.is_valid() {
                issues.push(StructureIssue::InvalidTssRange {
                    block: block.name.clone(),
                });
            }
            let sessions = block.target_sessions;
            if sessions.max == 0 || sessions.min > sessions.max {
                issues.push(StructureIssue::InvalidSessionRange {
                    block: block.name.clone(),
                });
            }
        }
        let mut highest_rank = None;
        for (index, block) in blocks.iter().enumerate() {
            if let Some(rank) = phase_rank(block.phase) {
                if highest_rank.is_some_and(|highest| rank < highest) {
                    issues.push(StructureIssue::PhaseOutOfOrder {
                        block: block.name.clone(),
                    });
                }
                highest_rank = highest_rank.max(Some(rank));
            }
            if index == 0 {
                continue;
            }
            let previous = &blocks[index - 1];
            let expected_start = previous.end_date + Duration::days(1);
            if block.start_date > expected_start {
                issues.push(StructureIssue::Gap {
                    after: previous.name.clone(),
                    before: block.name.clone(),
                });
            } else if block.start_date < expected_start {
                issues.push(StructureIssue::Overlap {
                    after: previous.name.clone(),
                    before: block.name.clone(),
                });
            }
        }
    }

    fn check_goals(blocks: &[TrainingBlock], goals: &[Goal], issues: &mut Vec<StructureIssue>) {
        let span = blocks.first().zip(blocks.last());
        for goal in goals {
            if !goal.has_valid_priority() {
                issues.push(StructureIssue::InvalidPriority {
                    goal: goal.name.clone(),
                    priority: goal.priority,
                });
            }
            if goal.targets.is_empty() || goal.targets.iter().any(|t| t.validate().is_err()) {
                issues.push(StructureIssue::InvalidGoalTarget {
                    goal: goal.name.clone(),
                });
            }
            if let Some((first, last)) = span {
                if goal.target_date < first.start_date || goal.target_date > last.end_date {
                    issues.push(StructureIssue::GoalOutsidePlan {
                        goal: goal.name.clone(),
                    });
                }
            }
        }
    }

    /// Phase spans from `start` through `end`, allocated backwards from the
    /// goal date so the taper always ends on it
    fn allocate_phases(&self, start: NaiveDate, end: NaiveDate) -> Vec<PhaseSpan> {
        let cfg = &self.config;
        let total_days = (end - start).num_days() + 1;
        let total_weeks = (total_days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;

        let taper_weeks = if total_weeks >= cfg.long_taper_min_weeks { 2 } else { 1 };
        let peak_weeks = if total_weeks >= cfg.long_peak_min_weeks {
            2
        } else if total_weeks >= cfg.peak_min_weeks {
            1
        } else {
            0
        };
        let remaining = (total_weeks - taper_weeks - peak_weeks).max(0);
        let (base_weeks, build_weeks) = if total_weeks < cfg.base_min_weeks {
            (0, remaining)
        } else {
            let build = (remaining as f64 * cfg.build_share).round() as i64;
            (remaining - build, build)
        };

        let mut spans = Vec::new();
        let mut cursor = end;
        for (phase, weeks) in [
            (TrainingPhase::Taper, taper_weeks),
            (TrainingPhase::Peak, peak_weeks),
            (TrainingPhase::Build, build_weeks),
            (TrainingPhase::Base, base_weeks),
        ] {
            if weeks == 0 || cursor < start {
                continue;
            }
            let phase_start = (cursor - Duration::days(weeks * DAYS_PER_WEEK - 1)).max(start);
            spans.push(PhaseSpan {
                phase,
                start: phase_start,
                end: cursor,
            });
            cursor = phase_start - Duration::days(1);
        }
        spans.reverse();
        spans
    }

    /// Split phases into blocks of at most `max_block_weeks`
    ///
    /// Weekly load follows the CTL trajectory, but each block's midpoint is
    /// held to the caution threshold over the block before it so the plan
    /// never trips its own block-ramp check. The taper is a fraction of the
    /// load actually reached before it.
    fn build_blocks(&self, phases: &[PhaseSpan], trajectory: &CtlTrajectory) -> Vec<TrainingBlock> {
        let max_days = self.config.max_block_weeks * DAYS_PER_WEEK;
        let mut blocks: Vec<TrainingBlock> = Vec::new();
        let mut reached_weekly: Option<f64> = None;

        for span in phases {
            let total = (span.end - span.start).num_days() + 1;
            let parts = (total + max_days - 1) / max_days;
            let mut block_start = span.start;
            for part in 1..=parts {
                let block_end = (block_start + Duration::days(max_days - 1)).min(span.end);
                let weekly = if span.phase == TrainingPhase::Taper {
                    reached_weekly.unwrap_or(trajectory.target_ctl * DAYS_PER_WEEK_F64)
                        * self.config.taper_load_factor
                } else {
                    let mean_ctl =
                        (trajectory.ctl_at(block_start) + trajectory.ctl_at(block_end)) / 2.0;
                    let planned = mean_ctl * DAYS_PER_WEEK_F64;
                    let capped = blocks
                        .last()
                        .map_or(planned, |previous| self.cap_block_ramp(planned, previous));
                    reached_weekly = Some(capped);
                    capped
                };
                let label = phase_label(span.phase);
                let name = if parts > 1 {
                    format!("{label} {part}")
                } else {
                    label.to_owned()
                };
                blocks.push(TrainingBlock {
                    name,
                    phase: span.phase,
                    start_date: block_start,
                    end_date: block_end,
                    target_weekly_tss: self.weekly_band(weekly),
                    target_sessions: sessions_for(span.phase),
                });
                block_start = block_end + Duration::days(1);
            }
        }
        blocks
    }

    fn weekly_band(&self, weekly: f64) -> TssRange {
        let band = self.config.weekly_tss_band;
        TssRange {
            min: round1(weekly * (1.0 - band)),
            max: round1(weekly * (1.0 + band)),
        }
    }

    /// Largest weekly load within the caution ramp over `previous`
    fn cap_block_ramp(&self, planned: f64, previous: &TrainingBlock) -> f64 {
        let previous_mid = previous.target_weekly_tss.midpoint();
        if previous_mid <= 0.0 {
            return planned;
        }
        let caution = self.config.block_ramp_caution;
        let exceeds = |weekly: f64| {
            (self.weekly_band(weekly).midpoint() - previous_mid) / previous_mid > caution
        };
        if !exceeds(planned) {
            return planned;
        }
        // Rounding the band to 0.1 can lift its midpoint by up to 0.05
        let mut capped = previous_mid * (1.0 + caution);
        while capped > previous_mid && exceeds(capped) {
            capped -= BAND_ROUNDING_SLACK;
        }
        capped.max(previous_mid)
    }
}
