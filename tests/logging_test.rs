// ABOUTME: Tests for logging configuration read from the environment
// ABOUTME: Validates format selection, production defaults and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use peakform::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const LOGGING_VARS: [&str; 7] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_THREAD",
    "LOG_INCLUDE_SPANS",
];

fn clear_logging_env() {
    for var in LOGGING_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
    assert_eq!(LogFormat::from_env_value(Some("compact")), LogFormat::Compact);
    assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Pretty);
    assert_eq!(LogFormat::from_env_value(Some("xml")), LogFormat::Pretty);
    assert_eq!(LogFormat::from_env_value(None), LogFormat::Pretty);
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_logging_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "peakform-test");

    let config = LoggingConfig::from_env();
    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.service_name, "peakform-test");
    // Production turns on every detail
    assert!(config.include_location);
    assert!(config.include_thread);
    assert!(config.include_spans);

    clear_logging_env();
}

#[test]
#[serial]
fn test_development_details_are_opt_in() {
    clear_logging_env();
    env::set_var("LOG_INCLUDE_THREAD", "1");

    let config = LoggingConfig::from_env();
    assert_eq!(config.level, "info");
    assert_eq!(config.environment, "development");
    assert!(config.include_thread);
    assert!(!config.include_location);
    assert!(!config.include_spans);

    clear_logging_env();
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "peakform");
    assert!(!config.include_location);
}
