// ABOUTME: Physiological constants used as defaults for the injected engine configuration
// ABOUTME: Time constants, zone boundaries, cold-start baselines, ramp and adherence limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

//! Physiological constants based on sports science practice
//!
//! Components never read these directly; they are the `Default` values of
//! the configuration structs in [`crate::config`], which are passed to the
//! component constructors.

/// Performance Manager Chart constants
///
/// References:
/// - Coggan, A. (2003). Training and Racing Using a Power Meter
/// - Banister, E.W. (1991). Modeling elite athletic performance
pub mod training_load {
    /// Chronic training load time constant in days
    pub const CTL_TIME_CONSTANT_DAYS: f64 = 42.0;
    /// Acute training load time constant in days
    pub const ATL_TIME_CONSTANT_DAYS: f64 = 7.0;
    /// Seed CTL when no trailing history exists
    pub const DEFAULT_SEED_CTL: f64 = 40.0;
    /// Seed ATL when no trailing history exists
    pub const DEFAULT_SEED_ATL: f64 = 40.0;
    /// Trailing days averaged to seed CTL
    pub const SEED_WINDOW_DAYS: i64 = 42;
    /// Final trailing days averaged to seed ATL
    pub const SEED_ATL_WINDOW_DAYS: i64 = 7;
    /// Longest window a single query may iterate
    pub const MAX_WINDOW_DAYS: i64 = 400;
}

/// Form (TSB) classification cut points
pub mod form {
    /// Above this TSB the athlete is losing fitness
    pub const DETRAINING_TSB: f64 = 25.0;
    /// Above this TSB the athlete is fresh
    pub const FRESH_TSB: f64 = 10.0;
    /// At or above this TSB the athlete is in the grey zone
    pub const GREY_ZONE_FLOOR_TSB: f64 = -10.0;
    /// At or above this TSB fatigue is still productive
    pub const FATIGUED_FLOOR_TSB: f64 = -30.0;
}

/// Intensity factor upper bounds for the seven training zones
///
/// Reference: Coggan power levels, extended with a neuromuscular band
pub mod intensity_zones {
    /// Recovery below this IF
    pub const RECOVERY_MAX_IF: f64 = 0.55;
    /// Endurance below this IF
    pub const ENDURANCE_MAX_IF: f64 = 0.75;
    /// Tempo below this IF
    pub const TEMPO_MAX_IF: f64 = 0.90;
    /// Threshold below this IF
    pub const THRESHOLD_MAX_IF: f64 = 1.05;
    /// VO2max below this IF
    pub const VO2MAX_MAX_IF: f64 = 1.20;
    /// Anaerobic below this IF, neuromuscular at or above
    pub const ANAEROBIC_MAX_IF: f64 = 1.50;
}

/// Zone boundaries for seconds-in-zone extraction
pub mod zone_boundaries {
    /// Heart-rate zone upper bounds as fraction of LTHR (zones 1-4; zone 5 is open)
    ///
    /// Reference: Friel, J. (2009). The Triathlete's Training Bible
    pub const HR_ZONE_UPPER_FRACTIONS: [f64; 4] = [0.81, 0.90, 0.94, 1.00];
    /// Power zone upper bounds as fraction of FTP (zones 1-5; zone 6 is open)
    ///
    /// Reference: Coggan, A. & Allen, H. (2010). Training and Racing with a Power Meter
    pub const POWER_ZONE_UPPER_FRACTIONS: [f64; 5] = [0.55, 0.75, 0.90, 1.05, 1.20];
}

/// Cold-start population defaults substituted for missing baselines
pub mod cold_start {
    /// Functional threshold power, watts
    pub const FTP_WATTS: f64 = 200.0;
    /// Lactate threshold heart rate, bpm
    pub const LTHR_BPM: f64 = 170.0;
    /// Maximum heart rate, bpm
    pub const MAX_HR_BPM: f64 = 190.0;
    /// Resting heart rate, bpm
    pub const RESTING_HR_BPM: f64 = 60.0;
    /// Threshold running speed, m/s (5:00 min/km)
    pub const THRESHOLD_SPEED_MPS: f64 = 3.33;
}

/// Stream smoothing and signal thresholds
pub mod stream {
    /// Rolling window for normalized power and graded speed, seconds
    pub const ROLLING_WINDOW_SECONDS: usize = 30;
    /// Minimum seconds of power data before normalized power is computed
    pub const MIN_POWER_SECONDS: usize = 30;
    /// Longest recording gap bridged by holding the previous value, seconds
    pub const MAX_HOLD_GAP_SECONDS: u32 = 5;
    /// Longest stream resampled onto the 1 Hz grid, seconds (one week)
    pub const MAX_STREAM_SPAN_SECONDS: u32 = 604_800;
    /// Grades outside this magnitude are treated as GPS noise
    pub const MAX_ABS_GRADE: f64 = 0.45;
    /// Standard best-effort durations, seconds
    pub const BEST_EFFORT_DURATIONS: [u32; 12] =
        [5, 15, 30, 60, 120, 300, 600, 1200, 1800, 3600, 5400, 7200];
}

/// Grade-adjusted pace coefficients
///
/// Reference: Minetti, A.E. et al. (2002). Energy cost of walking and running
/// at extreme uphill and downhill slopes, normalised to flat-ground cost.
pub mod grade_adjustment {
    /// Cost of running on the flat, J/kg/m
    pub const FLAT_COST: f64 = 3.6;
    /// Polynomial coefficients from the fifth power down to the constant term
    pub const COST_POLYNOMIAL: [f64; 6] = [155.4, -30.4, -43.3, 46.3, 19.5, 3.6];
}

/// Banister TRIMP weighting
///
/// Reference: Banister, E.W. (1991). Modeling elite athletic performance
pub mod trimp {
    /// Multiplier of the exponential weighting
    pub const WEIGHTING_A: f64 = 0.64;
    /// Exponent of the exponential weighting
    pub const WEIGHTING_B: f64 = 1.92;
}

/// Session training effect cut points
pub mod training_effect {
    /// Below this TSS a session is recovery
    pub const RECOVERY_MAX_TSS: f64 = 20.0;
    /// Below this TSS a session maintains fitness
    pub const MAINTAINING_MAX_TSS: f64 = 60.0;
    /// Below this TSS a session improves fitness
    pub const IMPROVING_MAX_TSS: f64 = 150.0;
    /// At or above this TSS a session is overreaching
    pub const OVERREACHING_MIN_TSS: f64 = 300.0;
    /// Sessions at or above threshold intensity with this TSS are highly improving
    pub const HIGH_INTENSITY_MIN_TSS: f64 = 100.0;
}

/// Baseline estimation from onboarding input
pub mod estimation {
    /// Tanaka max heart rate intercept
    pub const TANAKA_INTERCEPT: f64 = 208.0;
    /// Tanaka max heart rate age slope
    pub const TANAKA_AGE_SLOPE: f64 = 0.7;
    /// LTHR as fraction of max HR
    pub const LTHR_FRACTION: f64 = 0.88;
    /// LTHR as fraction of max HR for advanced and elite athletes
    pub const LTHR_FRACTION_TRAINED: f64 = 0.90;
    /// Uth-Sorensen VO2max coefficient
    pub const UTH_COEFFICIENT: f64 = 15.3;
    /// FTP in W/kg by experience level
    pub const FTP_WATTS_PER_KG: [f64; 4] = [2.0, 2.8, 3.5, 4.3];
    /// Threshold running speed in m/s by experience level
    pub const THRESHOLD_SPEED_MPS: [f64; 4] = [2.8, 3.3, 3.9, 4.6];
    /// Plausible age range
    pub const AGE_RANGE: (f64, f64) = (10.0, 100.0);
    /// Plausible body weight range, kg
    pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 200.0);
    /// Plausible resting heart rate range, bpm
    pub const RESTING_HR_RANGE: (f64, f64) = (30.0, 110.0);
}

/// Periodization defaults
///
/// Reference: Bompa, T. & Buzzichelli, C. (2019). Periodization: Theory and Methodology of Training
pub mod periodization {
    /// Planned CTL gain per week
    pub const DEFAULT_RAMP_CTL_PER_WEEK: f64 = 3.0;
    /// Longest block before a phase is split
    pub const MAX_BLOCK_WEEKS: i64 = 4;
    /// Share of the non-peak, non-taper weeks given to build
    pub const BUILD_SHARE: f64 = 0.4;
    /// Taper weekly load as fraction of peak
    pub const TAPER_LOAD_FACTOR: f64 = 0.6;
    /// Half-width of the weekly TSS band around the block target
    pub const WEEKLY_TSS_BAND: f64 = 0.10;
    /// Plans at least this long get a two-week taper
    pub const LONG_TAPER_MIN_WEEKS: i64 = 16;
    /// Plans at least this long get a peak phase
    pub const PEAK_MIN_WEEKS: i64 = 8;
    /// Plans at least this long get a two-week peak
    pub const LONG_PEAK_MIN_WEEKS: i64 = 20;
    /// Plans shorter than this have no base phase
    pub const BASE_MIN_WEEKS: i64 = 4;
    /// Block-to-block weekly TSS increase flagged as caution
    pub const BLOCK_RAMP_CAUTION: f64 = 0.15;
    /// Block-to-block weekly TSS increase flagged as excessive
    pub const BLOCK_RAMP_EXCESSIVE: f64 = 0.25;
}

/// Goal feasibility and safety thresholds
///
/// Reference: Gabbett, T.J. (2016). The training-injury prevention paradox
pub mod feasibility {
    /// Goals closer than this are unsafe to prepare for
    pub const MIN_PREPARATION_DAYS: i64 = 21;
    /// Goals closer than this are aggressive
    pub const COMFORTABLE_PREPARATION_DAYS: i64 = 56;
    /// Required ramp above this is unsafe
    pub const RAMP_UNSAFE_CTL_PER_WEEK: f64 = 8.0;
    /// Required ramp above this is aggressive
    pub const RAMP_AGGRESSIVE_CTL_PER_WEEK: f64 = 5.0;
    /// Priority at or above this is high priority
    pub const HIGH_PRIORITY: u8 = 8;
    /// High-priority goals closer than this are escalated to aggressive
    pub const HIGH_PRIORITY_WINDOW_DAYS: i64 = 84;
    /// Goals closer than this exceed safe limits
    pub const SAFETY_EXCEEDED_DAYS: i64 = 14;
    /// Goals closer than this warrant caution
    pub const SAFETY_CAUTION_DAYS: i64 = 35;
    /// Ramp above this exceeds safe limits
    pub const RAMP_EXCEEDED_CTL_PER_WEEK: f64 = 7.0;
    /// Ramp above this warrants caution
    pub const RAMP_CAUTION_CTL_PER_WEEK: f64 = 4.0;
}

/// Adherence scoring
pub mod adherence {
    /// Weight of actual-versus-scheduled in the adherence score
    pub const ACTUAL_WEIGHT: f64 = 0.7;
    /// Weight of scheduled-versus-ideal in the adherence score
    pub const SCHEDULED_WEIGHT: f64 = 0.3;
    /// Overshoot fraction penalized at one point per percent
    pub const SOFT_OVERSHOOT: f64 = 0.20;
    /// Points lost per percent of overshoot beyond the soft band
    pub const STEEP_OVERSHOOT_PENALTY: f64 = 2.5;
    /// Score when a positive load meets a zero baseline
    pub const ZERO_BASELINE_SCORE: f64 = 50.0;
    /// Load ratio above which the boundary state is caution
    pub const CAUTION_RATIO: f64 = 1.15;
    /// Load ratio above which the boundary state is exceeded
    pub const EXCEEDED_RATIO: f64 = 1.35;
    /// Longest timeline window in days
    pub const MAX_WINDOW_DAYS: i64 = 400;
}
