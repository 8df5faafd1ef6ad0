// ABOUTME: Tests for engine configuration defaults, validation and environment overrides
// ABOUTME: Validates that injected parameters reach the calculators that use them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use peakform::errors::{AppError, ErrorCode};
use peakform::intelligence::config::TrainingLoadConfig;
use peakform::intelligence::{ConfigError, IntelligenceConfig, TrainingLoadTracker};
use serial_test::serial;

const OVERRIDE_VARS: [&str; 4] = [
    "PEAKFORM_CTL_TIME_CONSTANT_DAYS",
    "PEAKFORM_ATL_TIME_CONSTANT_DAYS",
    "PEAKFORM_COLD_START_FTP",
    "PEAKFORM_ADHERENCE_CAUTION_RATIO",
];

fn clear_overrides() {
    for var in OVERRIDE_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_default_config_matches_published_constants() {
    let config = IntelligenceConfig::default();
    assert!(config.validate().is_ok());
    assert!((config.training_load.ctl_time_constant_days - 42.0).abs() < f64::EPSILON);
    assert!((config.training_load.atl_time_constant_days - 7.0).abs() < f64::EPSILON);
    assert_eq!(config.training_load.max_window_days, 400);
    assert!((config.stream_metrics.cold_start.ftp - 200.0).abs() < f64::EPSILON);
    assert!((config.stream_metrics.cold_start.lthr - 170.0).abs() < f64::EPSILON);
    assert!((config.adherence.actual_weight - 0.7).abs() < f64::EPSILON);
    assert!((config.adherence.scheduled_weight - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_invalid_configs_are_rejected() {
    let mut swapped = IntelligenceConfig::default();
    swapped.training_load.atl_time_constant_days = 50.0;
    assert!(matches!(
        swapped.validate(),
        Err(ConfigError::InvalidRange(_))
    ));

    let mut weights = IntelligenceConfig::default();
    weights.adherence.actual_weight = 0.9;
    assert!(matches!(
        weights.validate(),
        Err(ConfigError::InvalidWeights(_))
    ));

    let mut cold = IntelligenceConfig::default();
    cold.stream_metrics.cold_start.resting_heart_rate = 200.0;
    assert!(matches!(
        cold.validate(),
        Err(ConfigError::ValueOutOfRange(_))
    ));
}

#[test]
fn test_config_errors_map_to_internal_app_errors() {
    let error: AppError = ConfigError::Parse("Invalid PEAKFORM_COLD_START_FTP".to_owned()).into();
    assert_eq!(error.code, ErrorCode::ConfigError);
    assert_eq!(error.http_status(), 500);
}

#[test]
#[serial]
fn test_environment_overrides_apply() {
    clear_overrides();
    env::set_var("PEAKFORM_CTL_TIME_CONSTANT_DAYS", "28");
    env::set_var("PEAKFORM_COLD_START_FTP", "240");

    let config = IntelligenceConfig::load().unwrap();
    assert!((config.training_load.ctl_time_constant_days - 28.0).abs() < f64::EPSILON);
    assert!((config.stream_metrics.cold_start.ftp - 240.0).abs() < f64::EPSILON);
    assert!((config.training_load.atl_time_constant_days - 7.0).abs() < f64::EPSILON);

    clear_overrides();
}

#[test]
#[serial]
fn test_unparsable_override_fails_load() {
    clear_overrides();
    env::set_var("PEAKFORM_COLD_START_FTP", "two hundred");

    let result = IntelligenceConfig::load();
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    clear_overrides();
}

#[test]
#[serial]
fn test_override_that_breaks_ordering_fails_load() {
    clear_overrides();
    env::set_var("PEAKFORM_ADHERENCE_CAUTION_RATIO", "1.5");

    let result = IntelligenceConfig::load();
    assert!(matches!(result, Err(ConfigError::InvalidRange(_))));

    clear_overrides();
}

#[test]
fn test_injected_time_constants_change_the_recursion() {
    let default_tracker = TrainingLoadTracker::default();
    let fast_tracker = TrainingLoadTracker::new(TrainingLoadConfig {
        ctl_time_constant_days: 21.0,
        ..TrainingLoadConfig::default()
    });

    let slow = default_tracker.calculate_ctl(40.0, 100.0);
    let fast = fast_tracker.calculate_ctl(40.0, 100.0);
    assert!((slow - (40.0 + (100.0 - 40.0) / 42.0)).abs() < 1e-9);
    assert!((fast - (40.0 + (100.0 - 40.0) / 21.0)).abs() < 1e-9);
    assert!(fast > slow);
}
