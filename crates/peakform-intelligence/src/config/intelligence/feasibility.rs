// ABOUTME: Goal feasibility, safety and adherence scoring configuration types
// ABOUTME: Timeline and ramp thresholds plus the adherence score curve parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::{adherence, feasibility};
use serde::{Deserialize, Serialize};

/// Configuration for `FeasibilityAssessor`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibilityConfig {
    /// Goals closer than this are unsafe
    pub min_preparation_days: i64,
    /// Goals closer than this are aggressive
    pub comfortable_preparation_days: i64,
    /// Required ramp above this is unsafe
    pub ramp_unsafe: f64,
    /// Required ramp above this is aggressive
    pub ramp_aggressive: f64,
    /// Priority at or above this is high priority
    pub high_priority: u8,
    /// High-priority goals closer than this are escalated
    pub high_priority_window_days: i64,
    /// Goals closer than this exceed safe limits
    pub safety_exceeded_days: i64,
    /// Goals closer than this warrant caution
    pub safety_caution_days: i64,
    /// Ramp above this exceeds safe limits
    pub ramp_exceeded: f64,
    /// Ramp above this warrants caution
    pub ramp_caution: f64,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            min_preparation_days: feasibility::MIN_PREPARATION_DAYS,
            comfortable_preparation_days: feasibility::COMFORTABLE_PREPARATION_DAYS,
            ramp_unsafe: feasibility::RAMP_UNSAFE_CTL_PER_WEEK,
            ramp_aggressive: feasibility::RAMP_AGGRESSIVE_CTL_PER_WEEK,
            high_priority: feasibility::HIGH_PRIORITY,
            high_priority_window_days: feasibility::HIGH_PRIORITY_WINDOW_DAYS,
            safety_exceeded_days: feasibility::SAFETY_EXCEEDED_DAYS,
            safety_caution_days: feasibility::SAFETY_CAUTION_DAYS,
            ramp_exceeded: feasibility::RAMP_EXCEEDED_CTL_PER_WEEK,
            ramp_caution: feasibility::RAMP_CAUTION_CTL_PER_WEEK,
        }
    }
}

/// Configuration for the adherence timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceConfig {
    /// Weight of actual-versus-scheduled
    pub actual_weight: f64,
    /// Weight of scheduled-versus-ideal
    pub scheduled_weight: f64,
    /// Overshoot fraction penalized at one point per percent
    pub soft_overshoot: f64,
    /// Points lost per percent beyond the soft band
    pub steep_overshoot_penalty: f64,
    /// Score when a positive load meets a zero baseline
    pub zero_baseline_score: f64,
    /// Load ratio above which the state is caution
    pub caution_ratio: f64,
    /// Load ratio above which the state is exceeded
    pub exceeded_ratio: f64,
    /// Longest timeline window in days
    pub max_window_days: i64,
}

impl Default for AdherenceConfig {
    fn default() -> Self {
        Self {
            actual_weight: adherence::ACTUAL_WEIGHT,
            scheduled_weight: adherence::SCHEDULED_WEIGHT,
            soft_overshoot: adherence::SOFT_OVERSHOOT,
            steep_overshoot_penalty: adherence::STEEP_OVERSHOOT_PENALTY,
            zero_baseline_score: adherence::ZERO_BASELINE_SCORE,
            caution_ratio: adherence::CAUTION_RATIO,
            exceeded_ratio: adherence::EXCEEDED_RATIO,
            max_window_days: adherence::MAX_WINDOW_DAYS,
        }
    }
}
