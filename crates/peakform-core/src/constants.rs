// ABOUTME: Unit conversion and calendar constants shared across the workspace
// ABOUTME: Pure data constants organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Time conversion constants
pub mod time_constants {
    /// Seconds in one minute
    pub const SECONDS_PER_MINUTE: u32 = 60;
    /// Seconds in one hour
    pub const SECONDS_PER_HOUR: u32 = 3600;
    /// Seconds in one hour as float for duration math
    pub const SECONDS_PER_HOUR_F64: f64 = 3600.0;
    /// Seconds in one minute as float
    pub const SECONDS_PER_MINUTE_F64: f64 = 60.0;
    /// Days in one training week
    pub const DAYS_PER_WEEK: i64 = 7;
    /// Days in one training week as float
    pub const DAYS_PER_WEEK_F64: f64 = 7.0;
}

/// Ingestion limits
pub mod limits {
    /// Longest accepted activity, seconds (one week)
    pub const MAX_ACTIVITY_DURATION_SECONDS: f64 = 604_800.0;
}

/// Distance and speed conversions
pub mod units {
    /// Meters in one kilometer
    pub const METERS_PER_KILOMETER: f64 = 1000.0;
}

/// Output rounding helpers used for every exposed series
pub mod rounding {
    /// Round to one decimal place, the precision of every exposed load value
    #[must_use]
    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    /// Round to two decimal places (intensity factor, efficiency factor)
    #[must_use]
    pub fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }
}
