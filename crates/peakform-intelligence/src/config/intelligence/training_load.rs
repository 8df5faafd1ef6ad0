// ABOUTME: Training load model configuration types
// ABOUTME: EWMA time constants, seeding, window cap and form classification cut points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::{form, training_load};
use serde::{Deserialize, Serialize};

/// Configuration for the CTL/ATL/TSB recursion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingLoadConfig {
    /// CTL time constant in days
    pub ctl_time_constant_days: f64,
    /// ATL time constant in days
    pub atl_time_constant_days: f64,
    /// Seed CTL used when the trailing window has no activities
    pub default_seed_ctl: f64,
    /// Seed ATL used when the trailing window has no activities
    pub default_seed_atl: f64,
    /// Trailing days averaged into the CTL seed
    pub seed_window_days: i64,
    /// Final trailing days averaged into the ATL seed
    pub seed_atl_window_days: i64,
    /// Longest window a single query may iterate
    pub max_window_days: i64,
    /// Form classification cut points
    pub form: FormThresholds,
}

impl Default for TrainingLoadConfig {
    fn default() -> Self {
        Self {
            ctl_time_constant_days: training_load::CTL_TIME_CONSTANT_DAYS,
            atl_time_constant_days: training_load::ATL_TIME_CONSTANT_DAYS,
            default_seed_ctl: training_load::DEFAULT_SEED_CTL,
            default_seed_atl: training_load::DEFAULT_SEED_ATL,
            seed_window_days: training_load::SEED_WINDOW_DAYS,
            seed_atl_window_days: training_load::SEED_ATL_WINDOW_DAYS,
            max_window_days: training_load::MAX_WINDOW_DAYS,
            form: FormThresholds::default(),
        }
    }
}

/// TSB cut points shared by every form classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormThresholds {
    /// TSB above this is detraining
    pub detraining_above: f64,
    /// TSB above this is fresh
    pub fresh_above: f64,
    /// TSB at or above this is grey zone
    pub grey_zone_floor: f64,
    /// TSB at or above this is fatigued, below is overreaching
    pub fatigued_floor: f64,
}

impl Default for FormThresholds {
    fn default() -> Self {
        Self {
            detraining_above: form::DETRAINING_TSB,
            fresh_above: form::FRESH_TSB,
            grey_zone_floor: form::GREY_ZONE_FLOOR_TSB,
            fatigued_floor: form::FATIGUED_FLOOR_TSB,
        }
    }
}
