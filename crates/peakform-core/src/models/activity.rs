// ABOUTME: Activity record and the typed derived-metrics bag
// ABOUTME: Ingestion validation, additive metric merging, and TSS source tagging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::baseline::BaselineKind;
use super::zones::TrainingEffect;
use crate::constants::limits::MAX_ACTIVITY_DURATION_SECONDS;
use crate::constants::time_constants::SECONDS_PER_HOUR_F64;
use crate::errors::{AppError, AppResult};

/// Declared activity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    /// Running, including treadmill
    Run,
    /// Cycling, including indoor trainer
    Bike,
    /// Swimming
    Swim,
    /// Strength and conditioning
    Strength,
    /// Anything else
    #[default]
    Other,
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Run => "run",
            Self::Bike => "bike",
            Self::Swim => "swim",
            Self::Strength => "strength",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

impl FromStr for ActivityCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" | "running" | "virtual_run" => Ok(Self::Run),
            "bike" | "ride" | "cycling" | "virtual_ride" => Ok(Self::Bike),
            "swim" | "swimming" => Ok(Self::Swim),
            "strength" | "strength_training" => Ok(Self::Strength),
            "other" => Ok(Self::Other),
            other => Err(AppError::invalid_input(format!(
                "Unknown activity category: '{other}'"
            ))),
        }
    }
}

/// Signal that produced an activity's TSS and intensity factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TssSource {
    /// Normalized power against FTP
    Power,
    /// Heart-rate TRIMP normalized against one hour at LTHR
    HeartRate,
    /// Normalized graded speed against threshold pace
    Pace,
}

/// Confidence in derived metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricConfidence {
    /// All thresholds came from the athlete's own history
    High,
    /// At least one cold-start default was substituted
    Low,
}

/// Best sustained value over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestEffort {
    /// Window length in seconds
    pub duration_seconds: u32,
    /// Highest window mean (watts or m/s)
    pub value: f64,
}

/// Typed derived-metrics bag attached to an activity
///
/// Every metric is optional: `tss: None` means "could not be scored", which
/// is deliberately distinct from `Some(0.0)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    /// Training stress score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tss: Option<f64>,
    /// Signal the TSS was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tss_source: Option<TssSource>,
    /// Intensity factor on the decimal scale (1.00 = threshold)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity_factor: Option<f64>,
    /// Normalized power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_power: Option<f64>,
    /// Normalized graded speed in m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_graded_speed: Option<f64>,
    /// Mean power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_power: Option<f64>,
    /// Mean heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<f64>,
    /// Peak heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<f64>,
    /// Mean speed in m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// Normalized output per heartbeat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_factor: Option<f64>,
    /// Output-to-HR drift between halves, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aerobic_decoupling: Option<f64>,
    /// Banister training impulse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trimp: Option<f64>,
    /// Mechanical work in kilojoules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_kj: Option<f64>,
    /// Seconds in each of the five heart-rate zones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_zone_seconds: Option<[u32; 5]>,
    /// Seconds in each of the six power zones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_zone_seconds: Option<[u32; 6]>,
    /// Power best-effort curve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub power_best_efforts: Vec<BestEffort>,
    /// Speed best-effort curve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speed_best_efforts: Vec<BestEffort>,
    /// Session training effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_effect: Option<TrainingEffect>,
    /// Confidence in the thresholds used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<MetricConfidence>,
    /// Baselines that were replaced by cold-start defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaults_applied: Vec<BaselineKind>,
    /// No power, heart-rate or pace signal could score this activity
    #[serde(default)]
    pub unscored: bool,
}

fn merge_option<T>(slot: &mut Option<T>, update: Option<T>) {
    if update.is_some() {
        *slot = update;
    }
}

impl ActivityMetrics {
    /// TSS contribution to daily aggregation; unscored activities count as zero
    #[must_use]
    pub fn tss_contribution(&self) -> f64 {
        self.tss.filter(|tss| tss.is_finite()).unwrap_or(0.0)
    }

    /// Whether the activity carries a usable TSS value
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        self.tss.is_some()
    }

    /// Merge a back-filled bag into this one
    ///
    /// Metrics present in `update` overwrite, absent metrics keep their prior
    /// value. Nothing is ever cleared by a merge.
    pub fn merge(&mut self, update: Self) {
        merge_option(&mut self.tss, update.tss);
        merge_option(&mut self.tss_source, update.tss_source);
        merge_option(&mut self.intensity_factor, update.intensity_factor);
        merge_option(&mut self.normalized_power, update.normalized_power);
        merge_option(
            &mut self.normalized_graded_speed,
            update.normalized_graded_speed,
        );
        merge_option(&mut self.average_power, update.average_power);
        merge_option(&mut self.average_heart_rate, update.average_heart_rate);
        merge_option(&mut self.max_heart_rate, update.max_heart_rate);
        merge_option(&mut self.average_speed, update.average_speed);
        merge_option(&mut self.efficiency_factor, update.efficiency_factor);
        merge_option(&mut self.aerobic_decoupling, update.aerobic_decoupling);
        merge_option(&mut self.trimp, update.trimp);
        merge_option(&mut self.work_kj, update.work_kj);
        merge_option(&mut self.hr_zone_seconds, update.hr_zone_seconds);
        merge_option(&mut self.power_zone_seconds, update.power_zone_seconds);
        merge_option(&mut self.training_effect, update.training_effect);
        merge_option(&mut self.confidence, update.confidence);

        if !update.power_best_efforts.is_empty() {
            self.power_best_efforts = update.power_best_efforts;
        }
        if !update.speed_best_efforts.is_empty() {
            self.speed_best_efforts = update.speed_best_efforts;
        }
        for kind in update.defaults_applied {
            if !self.defaults_applied.contains(&kind) {
                self.defaults_applied.push(kind);
            }
        }

        self.unscored = self.tss.is_none() && (self.unscored || update.unscored);
    }
}

/// One completed training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Display name
    pub name: String,
    /// Declared category
    pub category: ActivityCategory,
    /// Start instant
    pub started_at: DateTime<Utc>,
    /// End instant
    pub ended_at: DateTime<Utc>,
    /// Elapsed duration in seconds
    pub duration_seconds: f64,
    /// Distance covered, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Derived metrics
    #[serde(default)]
    pub metrics: ActivityMetrics,
}

impl Activity {
    /// Create a validated activity with an empty metrics bag
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the duration is zero, negative,
    /// not finite or longer than one week, or when the end instant cannot be
    /// represented.
    pub fn new(
        athlete_id: Uuid,
        name: impl Into<String>,
        category: ActivityCategory,
        started_at: DateTime<Utc>,
        duration_seconds: f64,
    ) -> AppResult<Self> {
        let mut activity = Self {
            id: Uuid::new_v4(),
            athlete_id,
            name: name.into(),
            category,
            started_at,
            ended_at: started_at,
            duration_seconds,
            distance_meters: None,
            metrics: ActivityMetrics::default(),
        };
        activity.validate()?;
        activity.ended_at = Duration::try_milliseconds((duration_seconds * 1000.0) as i64)
            .and_then(|elapsed| started_at.checked_add_signed(elapsed))
            .ok_or_else(|| {
                AppError::invalid_input("Activity end time is out of range")
                    .with_resource_id(activity.id.to_string())
            })?;
        Ok(activity)
    }

    /// Set the distance
    #[must_use]
    pub fn with_distance(mut self, distance_meters: f64) -> Self {
        self.distance_meters = Some(distance_meters);
        self
    }

    /// Replace the metrics bag
    #[must_use]
    pub fn with_metrics(mut self, metrics: ActivityMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Validate ingestion invariants
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for non-positive, non-finite or
    /// over-long durations, end-before-start timestamps, or negative distances.
    pub fn validate(&self) -> AppResult<()> {
        if !self.duration_seconds.is_finite() {
            return Err(AppError::invalid_input("Activity duration must be a finite number")
                .with_resource_id(self.id.to_string()));
        }
        if self.duration_seconds <= 0.0 {
            return Err(AppError::invalid_input(format!(
                "Activity duration must be greater than zero, got {}",
                self.duration_seconds
            ))
            .with_resource_id(self.id.to_string()));
        }
        if self.duration_seconds > MAX_ACTIVITY_DURATION_SECONDS {
            return Err(AppError::invalid_input(format!(
                "Activity duration of {} seconds exceeds the {MAX_ACTIVITY_DURATION_SECONDS} second limit",
                self.duration_seconds
            ))
            .with_resource_id(self.id.to_string()));
        }
        if self.ended_at < self.started_at {
            return Err(AppError::invalid_input("Activity ends before it starts")
                .with_resource_id(self.id.to_string()));
        }
        if let Some(distance) = self.distance_meters {
            if !distance.is_finite() || distance < 0.0 {
                return Err(AppError::invalid_input(
                    "Activity distance must be a non-negative number",
                )
                .with_resource_id(self.id.to_string()));
            }
        }
        Ok(())
    }

    /// Duration in hours
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / SECONDS_PER_HOUR_F64
    }

    /// Calendar day (UTC) the activity is attributed to
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}
