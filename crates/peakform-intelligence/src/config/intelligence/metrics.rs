// ABOUTME: Per-activity stream metrics configuration types
// ABOUTME: Smoothing windows, best-effort durations, TRIMP weighting and cold-start defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::{cold_start, stream, training_effect, trimp};
use serde::{Deserialize, Serialize};

/// Configuration for `StreamMetricsCalculator`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamMetricsConfig {
    /// Rolling window for normalized power and graded speed, seconds
    pub rolling_window_seconds: usize,
    /// Minimum seconds of power before normalized power is computed
    pub min_power_seconds: usize,
    /// Longest recording gap bridged by holding the previous value, seconds
    pub max_hold_gap_seconds: u32,
    /// Longest accepted distance between the first and last sample, seconds
    pub max_stream_span_seconds: u32,
    /// Grades beyond this magnitude are clamped
    pub max_abs_grade: f64,
    /// Best-effort window lengths, seconds
    pub best_effort_durations: Vec<u32>,
    /// Banister TRIMP multiplier
    pub trimp_weighting_a: f64,
    /// Banister TRIMP exponent
    pub trimp_weighting_b: f64,
    /// Training effect cut points
    pub training_effect: TrainingEffectThresholds,
    /// Values substituted for missing baselines
    pub cold_start: ColdStartDefaults,
}

impl Default for StreamMetricsConfig {
    fn default() -> Self {
        Self {
            rolling_window_seconds: stream::ROLLING_WINDOW_SECONDS,
            min_power_seconds: stream::MIN_POWER_SECONDS,
            max_hold_gap_seconds: stream::MAX_HOLD_GAP_SECONDS,
            max_stream_span_seconds: stream::MAX_STREAM_SPAN_SECONDS,
            max_abs_grade: stream::MAX_ABS_GRADE,
            best_effort_durations: stream::BEST_EFFORT_DURATIONS.to_vec(),
            trimp_weighting_a: trimp::WEIGHTING_A,
            trimp_weighting_b: trimp::WEIGHTING_B,
            training_effect: TrainingEffectThresholds::default(),
            cold_start: ColdStartDefaults::default(),
        }
    }
}

/// TSS cut points for the session training effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingEffectThresholds {
    /// Below this TSS a session is recovery
    pub recovery_max_tss: f64,
    /// Below this TSS a session maintains fitness
    pub maintaining_max_tss: f64,
    /// Below this TSS a session improves fitness
    pub improving_max_tss: f64,
    /// At or above this TSS a session is overreaching
    pub overreaching_min_tss: f64,
    /// Threshold-or-harder sessions with at least this TSS are highly improving
    pub high_intensity_min_tss: f64,
}

impl Default for TrainingEffectThresholds {
    fn default() -> Self {
        Self {
            recovery_max_tss: training_effect::RECOVERY_MAX_TSS,
            maintaining_max_tss: training_effect::MAINTAINING_MAX_TSS,
            improving_max_tss: training_effect::IMPROVING_MAX_TSS,
            overreaching_min_tss: training_effect::OVERREACHING_MIN_TSS,
            high_intensity_min_tss: training_effect::HIGH_INTENSITY_MIN_TSS,
        }
    }
}

/// Population defaults used when an athlete has no applicable baseline
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColdStartDefaults {
    /// Functional threshold power, watts
    pub ftp: f64,
    /// Lactate threshold heart rate, bpm
    pub lthr: f64,
    /// Maximum heart rate, bpm
    pub max_heart_rate: f64,
    /// Resting heart rate, bpm
    pub resting_heart_rate: f64,
    /// Threshold running speed, m/s
    pub threshold_speed: f64,
}

impl Default for ColdStartDefaults {
    fn default() -> Self {
        Self {
            ftp: cold_start::FTP_WATTS,
            lthr: cold_start::LTHR_BPM,
            max_heart_rate: cold_start::MAX_HR_BPM,
            resting_heart_rate: cold_start::RESTING_HR_BPM,
            threshold_speed: cold_start::THRESHOLD_SPEED_MPS,
        }
    }
}
