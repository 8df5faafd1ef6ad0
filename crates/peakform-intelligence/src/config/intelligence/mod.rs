// ABOUTME: Engine configuration container with environment overrides and validation
// ABOUTME: Aggregates per-component configs injected into calculator and planner constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Configuration error types
pub mod error;
/// Feasibility, safety and adherence thresholds
pub mod feasibility;
/// Stream metrics, training effect and cold-start defaults
pub mod metrics;
/// Periodization planner parameters
pub mod planning;
/// Training load model parameters
pub mod training_load;
/// Zone boundaries
pub mod zones;

pub use error::ConfigError;
pub use feasibility::{AdherenceConfig, FeasibilityConfig};
pub use metrics::{ColdStartDefaults, StreamMetricsConfig, TrainingEffectThresholds};
pub use planning::PeriodizationConfig;
pub use training_load::{FormThresholds, TrainingLoadConfig};
pub use zones::{HrZoneFractions, IntensityZoneBounds, PowerZoneFractions, ZoneConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static INTELLIGENCE_CONFIG: OnceLock<IntelligenceConfig> = OnceLock::new();

/// Main engine configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// CTL/ATL/TSB recursion
    pub training_load: TrainingLoadConfig,
    /// Intensity and seconds-in-zone boundaries
    pub zones: ZoneConfig,
    /// Per-activity stream metrics
    pub stream_metrics: StreamMetricsConfig,
    /// Plan synthesis
    pub periodization: PeriodizationConfig,
    /// Goal feasibility and safety
    pub feasibility: FeasibilityConfig,
    /// Adherence timeline scoring
    pub adherence: AdherenceConfig,
}

impl IntelligenceConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        INTELLIGENCE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load intelligence config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load defaults, apply `PEAKFORM_*` environment overrides, then validate
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparsable value
    /// or the resulting configuration fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let load = &self.training_load;
        if load.ctl_time_constant_days < 1.0 || load.atl_time_constant_days < 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "training load time constants must be at least one day",
            ));
        }
        if load.atl_time_constant_days >= load.ctl_time_constant_days {
            return Err(ConfigError::InvalidRange(
                "ATL time constant must be shorter than CTL time constant",
            ));
        }
        if load.seed_atl_window_days < 1 || load.seed_atl_window_days > load.seed_window_days {
            return Err(ConfigError::InvalidRange(
                "ATL seed window must be within the CTL seed window",
            ));
        }
        if load.max_window_days < 1 {
            return Err(ConfigError::ValueOutOfRange(
                "max_window_days must be positive",
            ));
        }
        let form = &load.form;
        if !(form.fatigued_floor < form.grey_zone_floor
            && form.grey_zone_floor < form.fresh_above
            && form.fresh_above < form.detraining_above)
        {
            return Err(ConfigError::InvalidRange(
                "form thresholds must be in ascending order",
            ));
        }

        if !is_strictly_ascending(&self.zones.intensity.as_array()) {
            return Err(ConfigError::InvalidRange(
                "intensity zone bounds must be in ascending order",
            ));
        }
        if !is_strictly_ascending(&self.zones.hr_zone_fractions.0)
            || !is_strictly_ascending(&self.zones.power_zone_fractions.0)
        {
            return Err(ConfigError::InvalidRange(
                "heart rate and power zones must be in ascending order",
            ));
        }

        let metrics = &self.stream_metrics;
        if metrics.rolling_window_seconds == 0 || metrics.max_stream_span_seconds == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "rolling_window_seconds and max_stream_span_seconds must be positive",
            ));
        }
        let cold = &metrics.cold_start;
        if [cold.ftp, cold.lthr, cold.max_heart_rate, cold.threshold_speed]
            .iter()
            .any(|v| *v <= 0.0)
            || cold.resting_heart_rate >= cold.max_heart_rate
        {
            return Err(ConfigError::ValueOutOfRange(
                "cold-start defaults must be positive with resting HR below max HR",
            ));
        }

        let plan = &self.periodization;
        if plan.max_block_weeks < 1 || !(0.0..=1.0).contains(&plan.build_share) {
            return Err(ConfigError::ValueOutOfRange(
                "block length must be positive and build share within 0-1",
            ));
        }
        if plan.block_ramp_caution >= plan.block_ramp_excessive {
            return Err(ConfigError::InvalidRange(
                "block ramp caution must be below excessive",
            ));
        }

        let goals = &self.feasibility;
        if goals.min_preparation_days >= goals.comfortable_preparation_days
            || goals.safety_exceeded_days >= goals.safety_caution_days
        {
            return Err(ConfigError::InvalidRange(
                "goal timeline thresholds must be in ascending order",
            ));
        }
        if goals.ramp_aggressive >= goals.ramp_unsafe || goals.ramp_caution >= goals.ramp_exceeded
        {
            return Err(ConfigError::InvalidRange(
                "ramp thresholds must be in ascending order",
            ));
        }

        let adherence = &self.adherence;
        if (adherence.actual_weight + adherence.scheduled_weight - 1.0).abs() > 1e-6 {
            return Err(ConfigError::InvalidWeights(
                "adherence weights must sum to 1.0",
            ));
        }
        if adherence.caution_ratio >= adherence.exceeded_ratio || adherence.caution_ratio <= 1.0 {
            return Err(ConfigError::InvalidRange(
                "adherence boundary ratios must satisfy 1 < caution < exceeded",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            "PEAKFORM_CTL_TIME_CONSTANT_DAYS",
            &mut self.training_load.ctl_time_constant_days,
        )?;
        Self::apply_env_var(
            "PEAKFORM_ATL_TIME_CONSTANT_DAYS",
            &mut self.training_load.atl_time_constant_days,
        )?;
        Self::apply_env_var(
            "PEAKFORM_DEFAULT_SEED_CTL",
            &mut self.training_load.default_seed_ctl,
        )?;
        Self::apply_env_var(
            "PEAKFORM_DEFAULT_SEED_ATL",
            &mut self.training_load.default_seed_atl,
        )?;
        Self::apply_env_var(
            "PEAKFORM_MAX_WINDOW_DAYS",
            &mut self.training_load.max_window_days,
        )?;

        Self::apply_env_var(
            "PEAKFORM_COLD_START_FTP",
            &mut self.stream_metrics.cold_start.ftp,
        )?;
        Self::apply_env_var(
            "PEAKFORM_COLD_START_LTHR",
            &mut self.stream_metrics.cold_start.lthr,
        )?;
        Self::apply_env_var(
            "PEAKFORM_COLD_START_MAX_HR",
            &mut self.stream_metrics.cold_start.max_heart_rate,
        )?;
        Self::apply_env_var(
            "PEAKFORM_COLD_START_RESTING_HR",
            &mut self.stream_metrics.cold_start.resting_heart_rate,
        )?;

        Self::apply_env_var(
            "PEAKFORM_DEFAULT_RAMP_CTL_PER_WEEK",
            &mut self.periodization.default_ramp_ctl_per_week,
        )?;
        Self::apply_env_var(
            "PEAKFORM_BLOCK_RAMP_CAUTION",
            &mut self.periodization.block_ramp_caution,
        )?;
        Self::apply_env_var(
            "PEAKFORM_BLOCK_RAMP_EXCESSIVE",
            &mut self.periodization.block_ramp_excessive,
        )?;

        Self::apply_env_var(
            "PEAKFORM_RAMP_CAUTION_CTL_PER_WEEK",
            &mut self.feasibility.ramp_caution,
        )?;
        Self::apply_env_var(
            "PEAKFORM_RAMP_EXCEEDED_CTL_PER_WEEK",
            &mut self.feasibility.ramp_exceeded,
        )?;

        Self::apply_env_var(
            "PEAKFORM_ADHERENCE_CAUTION_RATIO",
            &mut self.adherence.caution_ratio,
        )?;
        Self::apply_env_var(
            "PEAKFORM_ADHERENCE_EXCEEDED_RATIO",
            &mut self.adherence.exceeded_ratio,
        )?;

        Ok(self)
    }
}

fn is_strictly_ascending(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(IntelligenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unordered_intensity_bounds_rejected() {
        let mut config = IntelligenceConfig::default();
        config.zones.intensity.tempo_max = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_adherence_weights_must_sum_to_one() {
        let mut config = IntelligenceConfig::default();
        config.adherence.actual_weight = 0.9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeights(_))
        ));
    }
}
