// ABOUTME: Periodization planner configuration types
// ABOUTME: Ramp defaults, phase allocation thresholds, load bands and block ramp limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::periodization;
use serde::{Deserialize, Serialize};

/// Configuration for `PeriodizationPlanner`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodizationConfig {
    /// Planned CTL gain per week
    pub default_ramp_ctl_per_week: f64,
    /// Longest block before a phase is split
    pub max_block_weeks: i64,
    /// Share of the remaining weeks given to build
    pub build_share: f64,
    /// Taper weekly load as fraction of peak
    pub taper_load_factor: f64,
    /// Half-width of the weekly TSS band
    pub weekly_tss_band: f64,
    /// Plans at least this long get a two-week taper
    pub long_taper_min_weeks: i64,
    /// Plans at least this long get a peak phase
    pub peak_min_weeks: i64,
    /// Plans at least this long get a two-week peak
    pub long_peak_min_weeks: i64,
    /// Plans shorter than this have no base phase
    pub base_min_weeks: i64,
    /// Block-to-block increase flagged as caution
    pub block_ramp_caution: f64,
    /// Block-to-block increase flagged as excessive
    pub block_ramp_excessive: f64,
}

impl Default for PeriodizationConfig {
    fn default() -> Self {
        Self {
            default_ramp_ctl_per_week: periodization::DEFAULT_RAMP_CTL_PER_WEEK,
            max_block_weeks: periodization::MAX_BLOCK_WEEKS,
            build_share: periodization::BUILD_SHARE,
            taper_load_factor: periodization::TAPER_LOAD_FACTOR,
            weekly_tss_band: periodization::WEEKLY_TSS_BAND,
            long_taper_min_weeks: periodization::LONG_TAPER_MIN_WEEKS,
            peak_min_weeks: periodization::PEAK_MIN_WEEKS,
            long_peak_min_weeks: periodization::LONG_PEAK_MIN_WEEKS,
            base_min_weeks: periodization::BASE_MIN_WEEKS,
            block_ramp_caution: periodization::BLOCK_RAMP_CAUTION,
            block_ramp_excessive: periodization::BLOCK_RAMP_EXCESSIVE,
        }
    }
}
