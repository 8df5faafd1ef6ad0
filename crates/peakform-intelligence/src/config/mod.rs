// ABOUTME: Configuration module for peakform-intelligence crate
// ABOUTME: Re-exports the injected engine configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Engine configuration (load model, zones, metrics, planning, feasibility)
pub mod intelligence;

pub use intelligence::{
    AdherenceConfig, ColdStartDefaults, ConfigError, FeasibilityConfig, FormThresholds,
    HrZoneFractions, IntelligenceConfig, IntensityZoneBounds, PeriodizationConfig,
    PowerZoneFractions, StreamMetricsConfig, TrainingEffectThresholds, TrainingLoadConfig,
    ZoneConfig,
};
