// ABOUTME: Athlete physiological baselines (FTP, LTHR, heart rates, VO2max, threshold pace)
// ABOUTME: Time-stamped, category-scoped log entries plus the resolved threshold set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::ActivityCategory;

/// Kind of physiological reference value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    /// Functional threshold power, watts
    Ftp,
    /// Lactate threshold heart rate, bpm
    Lthr,
    /// Maximum heart rate, bpm
    MaxHeartRate,
    /// Resting heart rate, bpm
    RestingHeartRate,
    /// Maximal oxygen uptake, ml/kg/min
    Vo2max,
    /// Threshold running speed, m/s
    ThresholdPace,
}

impl fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ftp => "ftp",
            Self::Lthr => "lthr",
            Self::MaxHeartRate => "max_heart_rate",
            Self::RestingHeartRate => "resting_heart_rate",
            Self::Vo2max => "vo2max",
            Self::ThresholdPace => "threshold_pace",
        };
        f.write_str(label)
    }
}

/// Where a resolved baseline value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Logged or tested by the athlete
    Measured,
    /// Derived from onboarding input
    Estimated,
    /// Cold-start population default
    Default,
}

/// One log entry; newer entries supersede older ones without replacing them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteBaseline {
    /// Entry identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Metric kind
    pub kind: BaselineKind,
    /// Category scope (`Other` means applies to every category)
    pub category: ActivityCategory,
    /// Recorded value
    pub value: f64,
    /// When the value became effective
    pub recorded_at: DateTime<Utc>,
}

/// Threshold set handed to metric calculations
///
/// `None` means the athlete has no applicable entry; calculators substitute
/// cold-start defaults and report lower confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteThresholds {
    /// Functional threshold power, watts
    pub ftp: Option<f64>,
    /// Lactate threshold heart rate, bpm
    pub lthr: Option<f64>,
    /// Maximum heart rate, bpm
    pub max_heart_rate: Option<f64>,
    /// Resting heart rate, bpm
    pub resting_heart_rate: Option<f64>,
    /// Threshold running speed, m/s
    pub threshold_speed: Option<f64>,
}

impl AthleteThresholds {
    /// Value for a given kind
    #[must_use]
    pub const fn get(&self, kind: BaselineKind) -> Option<f64> {
        match kind {
            BaselineKind::Ftp => self.ftp,
            BaselineKind::Lthr => self.lthr,
            BaselineKind::MaxHeartRate => self.max_heart_rate,
            BaselineKind::RestingHeartRate => self.resting_heart_rate,
            BaselineKind::ThresholdPace => self.threshold_speed,
            BaselineKind::Vo2max => None,
        }
    }

    /// Set a value for a given kind; `Vo2max` is not a threshold and is ignored
    pub fn set(&mut self, kind: BaselineKind, value: Option<f64>) {
        match kind {
            BaselineKind::Ftp => self.ftp = value,
            BaselineKind::Lthr => self.lthr = value,
            BaselineKind::MaxHeartRate => self.max_heart_rate = value,
            BaselineKind::RestingHeartRate => self.resting_heart_rate = value,
            BaselineKind::ThresholdPace => self.threshold_speed = value,
            BaselineKind::Vo2max => {}
        }
    }
}
