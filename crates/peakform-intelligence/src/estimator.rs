// ABOUTME: Fills missing athlete baselines from onboarding input or cold-start defaults
// ABOUTME: Resolves most-recent-at-or-before baseline lookups and tags every value with its source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use chrono::{DateTime, Utc};
use peakform_core::models::{
    ActivityCategory, AthleteBaseline, AthleteThresholds, BaselineKind, BaselineSource,
    MetricConfidence,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ColdStartDefaults;
use crate::physiological_constants::estimation::{
    AGE_RANGE, FTP_WATTS_PER_KG, LTHR_FRACTION, LTHR_FRACTION_TRAINED, RESTING_HR_RANGE,
    TANAKA_AGE_SLOPE, TANAKA_INTERCEPT, THRESHOLD_SPEED_MPS, UTH_COEFFICIENT, WEIGHT_RANGE_KG,
};

/// Self-reported training background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Less than a year of structured training
    Beginner,
    /// Regular recreational training
    Intermediate,
    /// Competitive amateur
    Advanced,
    /// Elite or professional
    Elite,
}

impl ExperienceLevel {
    const fn index(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Elite => 3,
        }
    }

    const fn is_trained(self) -> bool {
        matches!(self, Self::Advanced | Self::Elite)
    }
}

/// Minimal onboarding answers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingProfile {
    /// Age in years
    pub age: Option<f64>,
    /// Body weight in kg
    pub weight_kg: Option<f64>,
    /// Training background
    pub experience: Option<ExperienceLevel>,
    /// Known resting heart rate, bpm
    pub resting_heart_rate: Option<f64>,
    /// Known maximum heart rate, bpm
    pub max_heart_rate: Option<f64>,
    /// Known lactate threshold heart rate, bpm
    pub lthr: Option<f64>,
    /// Known functional threshold power, watts
    pub ftp: Option<f64>,
    /// Known threshold running speed, m/s
    pub threshold_speed: Option<f64>,
}

/// One resolved baseline with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedBaseline {
    /// Metric kind
    pub kind: BaselineKind,
    /// Resolved value
    pub value: f64,
    /// Where the value came from
    pub source: BaselineSource,
}

/// Complete baseline set produced for a new or sparse athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEstimate {
    /// Functional threshold power
    pub ftp: EstimatedBaseline,
    /// Lactate threshold heart rate
    pub lthr: EstimatedBaseline,
    /// Maximum heart rate
    pub max_heart_rate: EstimatedBaseline,
    /// Resting heart rate
    pub resting_heart_rate: EstimatedBaseline,
    /// Threshold running speed
    pub threshold_speed: EstimatedBaseline,
    /// VO2max, only when both heart-rate anchors are non-default
    pub vo2max: Option<EstimatedBaseline>,
    /// Low when any value is a cold-start default
    pub confidence: MetricConfidence,
}

impl BaselineEstimate {
    fn all(&self) -> impl Iterator<Item = &EstimatedBaseline> {
        [
            &self.ftp,
            &self.lthr,
            &self.max_heart_rate,
            &self.resting_heart_rate,
            &self.threshold_speed,
        ]
        .into_iter()
        .chain(self.vo2max.as_ref())
    }

    /// Kinds that fell back to cold-start defaults
    #[must_use]
    pub fn defaults_applied(&self) -> Vec<BaselineKind> {
        self.all()
            .filter(|b| b.source == BaselineSource::Default)
            .map(|b| b.kind)
            .collect()
    }

    /// Threshold set for metric calculations
    #[must_use]
    pub const fn thresholds(&self) -> AthleteThresholds {
        AthleteThresholds {
            ftp: Some(self.ftp.value),
            lthr: Some(self.lthr.value),
            max_heart_rate: Some(self.max_heart_rate.value),
            resting_heart_rate: Some(self.resting_heart_rate.value),
            threshold_speed: Some(self.threshold_speed.value),
        }
    }

    /// Log entries for every non-default value, ready to persist
    #[must_use]
    pub fn to_log_entries(
        &self,
        athlete_id: Uuid,
        category: ActivityCategory,
        recorded_at: DateTime<Utc>,
    ) -> Vec<AthleteBaseline> {
        self.all()
            .filter(|b| b.source != BaselineSource::Default)
            .map(|b| AthleteBaseline {
                id: Uuid::new_v4(),
                athlete_id,
                kind: b.kind,
                category,
                value: b.value,
                recorded_at,
            })
            .collect()
    }
}

/// Baseline estimator backed by injected cold-start defaults
#[derive(Debug, Clone, Default)]
pub struct MetricEstimator {
    cold_start: ColdStartDefaults,
}

fn plausible(value: Option<f64>, (low, high): (f64, f64), field: &'static str) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && (low..=high).contains(&v) => Some(v),
        Some(v) => {
            warn!(field, value = v, "Ignoring implausible onboarding value");
            None
        }
        None => None,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

const fn measured(kind: BaselineKind, value: f64) -> EstimatedBaseline {
    EstimatedBaseline {
        kind,
        value,
        source: BaselineSource::Measured,
    }
}

const fn estimated(kind: BaselineKind, value: f64) -> EstimatedBaseline {
    EstimatedBaseline {
        kind,
        value,
        source: BaselineSource::Estimated,
    }
}

impl MetricEstimator {
    /// Create an estimator with the given cold-start defaults
    #[must_use]
    pub const fn new(cold_start: ColdStartDefaults) -> Self {
        Self { cold_start }
    }

    /// Cold-start default for a threshold kind
    #[must_use]
    pub const fn cold_start_value(&self, kind: BaselineKind) -> Option<f64> {
        match kind {
            BaselineKind::Ftp => Some(self.cold_start.ftp),
            BaselineKind::Lthr => Some(self.cold_start.lthr),
            BaselineKind::MaxHeartRate => Some(self.cold_start.max_heart_rate),
            BaselineKind::RestingHeartRate => Some(self.cold_start.resting_heart_rate),
            BaselineKind::ThresholdPace => Some(self.cold_start.threshold_speed),
            BaselineKind::Vo2max => None,
        }
    }

    fn default_for(&self, kind: BaselineKind) -> EstimatedBaseline {
        EstimatedBaseline {
            kind,
            value: self.cold_start_value(kind).unwrap_or_default(),
            source: BaselineSource::Default,
        }
    }

    /// Resolve a threshold, substituting the cold-start default when absent
    ///
    /// Returns the value and whether the default was used.
    #[must_use]
    pub fn resolve(&self, kind: BaselineKind, known: Option<f64>) -> (f64, bool) {
        positive(known).map_or_else(
            || (self.cold_start_value(kind).unwrap_or_default(), true),
            |value| (value, false),
        )
    }

    /// Fill every baseline from known history, onboarding answers, derivation
    /// formulas or cold-start defaults, in that order of preference
    #[must_use]
    pub fn estimate_baselines(
        &self,
        profile: &OnboardingProfile,
        known: &AthleteThresholds,
    ) -> BaselineEstimate {
        let age = plausible(profile.age, AGE_RANGE, "age");
        let weight = plausible(profile.weight_kg, WEIGHT_RANGE_KG, "weight_kg");
        let level = profile.experience;

        let max_heart_rate = positive(known.max_heart_rate)
            .or_else(|| positive(profile.max_heart_rate))
            .map(|v| measured(BaselineKind::MaxHeartRate, v))
            .or_else(|| {
                age.map(|a| {
                    estimated(
                        BaselineKind::MaxHeartRate,
                        TANAKA_AGE_SLOPE.mul_add(-a, TANAKA_INTERCEPT),
                    )
                })
            })
            .unwrap_or_else(|| self.default_for(BaselineKind::MaxHeartRate));

        let resting_heart_rate = positive(known.resting_heart_rate)
            .or_else(|| plausible(profile.resting_heart_rate, RESTING_HR_RANGE, "resting_hr"))
            .map(|v| measured(BaselineKind::RestingHeartRate, v))
            .unwrap_or_else(|| self.default_for(BaselineKind::RestingHeartRate));

        let lthr = positive(known.lthr)
            .or_else(|| positive(profile.lthr))
            .map(|v| measured(BaselineKind::Lthr, v))
            .or_else(|| {
                (max_heart_rate.source != BaselineSource::Default).then(|| {
                    let fraction = if level.is_some_and(ExperienceLevel::is_trained) {
                        LTHR_FRACTION_TRAINED
                    } else {
                        LTHR_FRACTION
                    };
                    estimated(BaselineKind::Lthr, max_heart_rate.value * fraction)
                })
            })
            .unwrap_or_else(|| self.default_for(BaselineKind::Lthr));

        let ftp = positive(known.ftp)
            .or_else(|| positive(profile.ftp))
            .map(|v| measured(BaselineKind::Ftp, v))
            .or_else(|| {
                weight.map(|w| {
                    let level = level.unwrap_or(ExperienceLevel::Intermediate);
                    estimated(BaselineKind::Ftp, w * FTP_WATTS_PER_KG[level.index()])
                })
            })
            .unwrap_or_else(|| self.default_for(BaselineKind::Ftp));

        let threshold_speed = positive(known.threshold_speed)
            .or_else(|| positive(profile.threshold_speed))
            .map(|v| measured(BaselineKind::ThresholdPace, v))
            .or_else(|| {
                level.map(|l| estimated(BaselineKind::ThresholdPace, THRESHOLD_SPEED_MPS[l.index()]))
            })
            .unwrap_or_else(|| self.default_for(BaselineKind::ThresholdPace));

        let vo2max = (max_heart_rate.source != BaselineSource::Default
            && resting_heart_rate.source != BaselineSource::Default)
            .then(|| {
                estimated(
                    BaselineKind::Vo2max,
                    UTH_COEFFICIENT * max_heart_rate.value / resting_heart_rate.value,
                )
            });

        let mut estimate = BaselineEstimate {
            ftp,
            lthr,
            max_heart_rate,
            resting_heart_rate,
            threshold_speed,
            vo2max,
            confidence: MetricConfidence::High,
        };
        let defaults = estimate.defaults_applied();
        if !defaults.is_empty() {
            estimate.confidence = MetricConfidence::Low;
            warn!(
                defaults = ?defaults,
                "Cold-start defaults substituted for missing baselines"
            );
        }
        estimate
    }

    /// Most recent entry of `kind` at or before `as_of`
    ///
    /// Entries scoped to `category` win over entries scoped to
    /// `ActivityCategory::Other`, which apply to every category. Entries dated
    /// after `as_of` are never returned.
    #[must_use]
    pub fn most_recent_at_or_before<'a>(
        entries: &'a [AthleteBaseline],
        kind: BaselineKind,
        category: ActivityCategory,
        as_of: DateTime<Utc>,
    ) -> Option<&'a AthleteBaseline> {
        let latest_in = |scope: ActivityCategory| {
            entries
                .iter()
                .filter(|e| e.kind == kind && e.category == scope && e.recorded_at <= as_of)
                .max_by_key(|e| (e.recorded_at, e.id))
        };
        let found = latest_in(category).or_else(|| {
            (category != ActivityCategory::Other)
                .then(|| latest_in(ActivityCategory::Other))
                .flatten()
        });
        debug!(%kind, %category, found = found.is_some(), "Baseline lookup");
        found
    }

    /// Threshold set as of an instant for one category
    #[must_use]
    pub fn thresholds_as_of(
        entries: &[AthleteBaseline],
        category: ActivityCategory,
        as_of: DateTime<Utc>,
    ) -> AthleteThresholds {
        let mut thresholds = AthleteThresholds::default();
        for kind in [
            BaselineKind::Ftp,
            BaselineKind::Lthr,
            BaselineKind::MaxHeartRate,
            BaselineKind::RestingHeartRate,
            BaselineKind::ThresholdPace,
        ] {
            thresholds.set(
                kind,
                Self::most_recent_at_or_before(entries, kind, category, as_of).map(|e| e.value),
            );
        }
        thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_cold_start_defaults() {
        let estimate = MetricEstimator::default()
            .estimate_baselines(&OnboardingProfile::default(), &AthleteThresholds::default());
        assert_eq!(estimate.confidence, MetricConfidence::Low);
        assert!((estimate.ftp.value - 200.0).abs() < f64::EPSILON);
        assert!((estimate.lthr.value - 170.0).abs() < f64::EPSILON);
        assert!((estimate.max_heart_rate.value - 190.0).abs() < f64::EPSILON);
        assert!(estimate.vo2max.is_none());
        assert!(estimate.defaults_applied().contains(&BaselineKind::Ftp));
    }

    #[test]
    fn test_full_profile_is_high_confidence() {
        let profile = OnboardingProfile {
            age: Some(40.0),
            weight_kg: Some(70.0),
            experience: Some(ExperienceLevel::Advanced),
            resting_heart_rate: Some(50.0),
            ..OnboardingProfile::default()
        };
        let estimate =
            MetricEstimator::default().estimate_baselines(&profile, &AthleteThresholds::default());
        assert_eq!(estimate.confidence, MetricConfidence::High);
        assert!((estimate.max_heart_rate.value - 180.0).abs() < 1e-9);
        assert!((estimate.lthr.value - 162.0).abs() < 1e-9);
        assert!((estimate.ftp.value - 245.0).abs() < 1e-9);
        assert!((estimate.vo2max.unwrap().value - 15.3 * 180.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_implausible_age_is_ignored() {
        let profile = OnboardingProfile {
            age: Some(400.0),
            ..OnboardingProfile::default()
        };
        let estimate =
            MetricEstimator::default().estimate_baselines(&profile, &AthleteThresholds::default());
        assert_eq!(estimate.max_heart_rate.source, BaselineSource::Default);
    }
}
