// ABOUTME: Banister training impulse (TRIMP) from heart-rate reserve
// ABOUTME: Integrates per-second HR samples or uses session average HR
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use peakform_core::constants::time_constants::SECONDS_PER_MINUTE_F64;

/// Banister weighting parameters and heart-rate anchors
#[derive(Debug, Clone, Copy)]
pub struct TrimpModel {
    /// Resting heart rate, bpm
    pub resting_hr: f64,
    /// Maximum heart rate, bpm
    pub max_hr: f64,
    /// Weighting multiplier
    pub weighting_a: f64,
    /// Weighting exponent
    pub weighting_b: f64,
}

impl TrimpModel {
    /// Fraction of heart-rate reserve, clamped to 0-1
    #[must_use]
    pub fn reserve_fraction(&self, heart_rate: f64) -> f64 {
        let reserve = self.max_hr - self.resting_hr;
        if reserve <= 0.0 {
            return 0.0;
        }
        ((heart_rate - self.resting_hr) / reserve).clamp(0.0, 1.0)
    }

    /// TRIMP per minute spent at `heart_rate`
    #[must_use]
    pub fn per_minute(&self, heart_rate: f64) -> f64 {
        let fraction = self.reserve_fraction(heart_rate);
        fraction * self.weighting_a * (self.weighting_b * fraction).exp()
    }

    /// TRIMP of a 1 Hz heart-rate series
    #[must_use]
    pub fn from_samples(&self, heart_rate_1hz: &[f64]) -> f64 {
        heart_rate_1hz
            .iter()
            .filter(|hr| **hr > 0.0)
            .map(|hr| self.per_minute(*hr) / SECONDS_PER_MINUTE_F64)
            .sum()
    }

    /// TRIMP from session average heart rate and duration
    #[must_use]
    pub fn from_average(&self, average_hr: f64, duration_minutes: f64) -> f64 {
        duration_minutes * self.per_minute(average_hr)
    }

    /// TRIMP of one hour at lactate threshold
    #[must_use]
    pub fn threshold_hour(&self, lthr: f64) -> f64 {
        self.from_average(lthr, SECONDS_PER_MINUTE_F64)
    }
}
