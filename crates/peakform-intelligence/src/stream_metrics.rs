// ABOUTME: Per-activity derived metrics from raw power, heart-rate and speed streams
// ABOUTME: NP/NGS, IF and TSS with power > heart rate > pace fallback, EF, decoupling, curves, zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::ops::Range;

use peakform_core::constants::rounding::{round1, round2};
use peakform_core::models::{
    Activity, ActivityCategory, ActivityMetrics, ActivityStreams, AthleteThresholds, BaselineKind,
    IntensityZone, MetricConfidence, StreamSample, TrainingEffect, TrainingEffectClass, TssSource,
};
use peakform_core::{AppError, AppResult};
use tracing::{debug, warn};

use crate::algorithms::best_effort::best_effort_curve;
use crate::algorithms::grade_adjusted::{grade_adjusted_speed, grade_between};
use crate::algorithms::normalized::{
    fill_gaps, mean, normalize_fourth_power, recorded, recorded_span, resample_1hz,
};
use crate::algorithms::trimp::TrimpModel;
use crate::algorithms::tss::{intensity_factor, tss_from_intensity, tss_from_trimp};
use crate::config::{IntelligenceConfig, StreamMetricsConfig, ZoneConfig};
use crate::estimator::MetricEstimator;
use crate::zones::IntensityZoneClassifier;

/// 1 Hz channels extracted from one activity's samples, all on one time grid
#[derive(Debug, Default)]
struct Channels {
    power: Vec<Option<f64>>,
    heart_rate: Vec<Option<f64>>,
    speed: Vec<Option<f64>>,
    graded_speed: Vec<Option<f64>>,
}

/// Thresholds resolved on demand, remembering which were cold-start defaults
struct ThresholdResolver<'a> {
    estimator: &'a MetricEstimator,
    known: &'a AthleteThresholds,
    defaults_applied: Vec<BaselineKind>,
}

impl ThresholdResolver<'_> {
    fn get(&mut self, kind: BaselineKind) -> f64 {
        let (value, defaulted) = self.estimator.resolve(kind, self.known.get(kind));
        if defaulted && !self.defaults_applied.contains(&kind) {
            self.defaults_applied.push(kind);
        }
        value
    }
}

/// Candidate score from one signal
#[derive(Debug, Clone, Copy)]
struct Score {
    tss: f64,
    intensity_factor: f64,
    source: TssSource,
}

/// Output-to-heart-rate drift between the first and second half, percent
fn decoupling(output: &[Option<f64>], heart_rate: &[Option<f64>], min_pairs: usize) -> Option<f64> {
    let len = output.len().min(heart_rate.len());
    let midpoint = len / 2;
    let ratio = |range: Range<usize>| {
        let pairs: Vec<(f64, f64)> = range
            .filter_map(|i| match (output[i], heart_rate[i]) {
                (Some(o), Some(hr)) if hr > 0.0 => Some((o, hr)),
                _ => None,
            })
            .collect();
        if pairs.len() < min_pairs {
            return None;
        }
        let out = pairs.iter().map(|p| p.0).sum::<f64>();
        let hr = pairs.iter().map(|p| p.1).sum::<f64>();
        (hr > 0.0).then(|| out / hr)
    };
    let first = ratio(0..midpoint)?;
    let second = ratio(midpoint..len)?;
    (first > 0.0).then(|| (first - second) / first * 100.0)
}

/// Speed derived from the distance delta and grade from altitude over distance
fn derive_motion(prev: &StreamSample, sample: &StreamSample) -> (Option<f64>, f64) {
    let dt = f64::from(sample.elapsed_seconds.saturating_sub(prev.elapsed_seconds));
    let speed = match (prev.distance, sample.distance) {
        (Some(d0), Some(d1)) if dt > 0.0 && d1 >= d0 => Some((d1 - d0) / dt),
        _ => None,
    };
    let grade = match (prev.altitude, sample.altitude, prev.distance, sample.distance) {
        (Some(a0), Some(a1), Some(d0), Some(d1)) => grade_between(a0, a1, d0, d1),
        _ => None,
    };
    (speed, grade.unwrap_or(0.0))
}

/// Calculator for the typed metrics bag
#[derive(Debug, Clone, Default)]
pub struct StreamMetricsCalculator {
    config: StreamMetricsConfig,
    zones: IntensityZoneClassifier,
    estimator: MetricEstimator,
}

impl StreamMetricsCalculator {
    /// Create a calculator from its own and the zone configuration
    #[must_use]
    pub fn new(config: StreamMetricsConfig, zone_config: ZoneConfig) -> Self {
        let estimator = MetricEstimator::new(config.cold_start);
        Self {
            config,
            zones: IntensityZoneClassifier::new(zone_config),
            estimator,
        }
    }

    /// Create a calculator from the engine configuration
    #[must_use]
    pub fn from_config(config: &IntelligenceConfig) -> Self {
        Self::new(config.stream_metrics.clone(), config.zones.clone())
    }

    /// Compute the metrics bag for one activity
    ///
    /// Missing thresholds are replaced by cold-start defaults, which lowers
    /// confidence and is listed in `defaults_applied`. Without a power,
    /// heart-rate or pace signal the activity is returned unscored (no TSS).
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the activity duration is zero,
    /// negative, not finite or longer than the accepted maximum, and
    /// `AppError::InvalidFormat` when the samples span more seconds than
    /// `max_stream_span_seconds`; nothing is computed in either case.
    pub fn calculate(
        &self,
        activity: &Activity,
        streams: &ActivityStreams,
        thresholds: &AthleteThresholds,
    ) -> AppResult<ActivityMetrics> {
        activity.validate()?;

        let channels = match streams.time_bounds() {
            Some((first, last)) => {
                if last - first > self.config.max_stream_span_seconds {
                    return Err(AppError::invalid_format(format!(
                        "Stream spans {} seconds, more than the {} second limit",
                        last - first,
                        self.config.max_stream_span_seconds
                    ))
                    .with_resource_id(activity.id.to_string()));
                }
                self.extract_channels(&streams.samples, first, last)
            }
            None => Channels::default(),
        };
        let mut resolver = ThresholdResolver {
            estimator: &self.estimator,
            known: thresholds,
            defaults_applied: Vec::new(),
        };
        let mut metrics = ActivityMetrics::default();

        let normalized_power = self.power_metrics(&channels, &mut resolver, &mut metrics);
        let normalized_graded_speed = self.speed_metrics(activity, &channels, &mut metrics);
        let heart_rate_score =
            self.heart_rate_metrics(activity, &channels, &mut resolver, &mut metrics);

        let score = if let Some(np) = normalized_power {
            let ftp = resolver.get(BaselineKind::Ftp);
            intensity_factor(np, ftp).map(|intensity| Score {
                tss: tss_from_intensity(activity.duration_hours(), intensity),
                intensity_factor: intensity,
                source: TssSource::Power,
            })
        } else if heart_rate_score.is_some() {
            heart_rate_score
        } else if activity.category == ActivityCategory::Run {
            normalized_graded_speed.and_then(|ngs| {
                let threshold = resolver.get(BaselineKind::ThresholdPace);
                intensity_factor(ngs, threshold).map(|intensity| Score {
                    tss: tss_from_intensity(activity.duration_hours(), intensity),
                    intensity_factor: intensity,
                    source: TssSource::Pace,
                })
            })
        } else {
            None
        };

        if let Some(average_hr) = metrics.average_heart_rate {
            self.efficiency_metrics(
                &channels,
                normalized_power.or(normalized_graded_speed),
                normalized_power.is_some(),
                average_hr,
                &mut metrics,
            );
        }
        self.apply_score(activity, score, &mut metrics);

        metrics.defaults_applied = resolver.defaults_applied;
        metrics.confidence = Some(if metrics.defaults_applied.is_empty() {
            MetricConfidence::High
        } else {
            warn!(
                activity_id = %activity.id,
                defaults = ?metrics.defaults_applied,
                "Cold-start baseline defaults used; metrics are low confidence"
            );
            MetricConfidence::Low
        });

        debug!(
            activity_id = %activity.id,
            tss = ?metrics.tss,
            source = ?metrics.tss_source,
            "Computed activity metrics"
        );
        Ok(metrics)
    }

    /// Session training effect from TSS and intensity factor
    #[must_use]
    pub fn training_effect(&self, tss: f64, intensity_factor: f64) -> TrainingEffect {
        let cuts = &self.config.training_effect;
        let primary_zone = self.zones.training_intensity_zone(intensity_factor);
        let classification = if tss >= cuts.overreaching_min_tss {
            TrainingEffectClass::Overreaching
        } else if tss < cuts.recovery_max_tss || primary_zone == IntensityZone::Recovery {
            TrainingEffectClass::Recovery
        } else if tss >= cuts.improving_max_tss
            || (primary_zone >= IntensityZone::Threshold && tss >= cuts.high_intensity_min_tss)
        {
            TrainingEffectClass::HighlyImproving
        } else if tss >= cuts.maintaining_max_tss {
            TrainingEffectClass::Improving
        } else {
            TrainingEffectClass::Maintaining
        };
        TrainingEffect {
            classification,
            primary_zone,
        }
    }

    /// Average power, work, power curve and zones; returns NP when there is
    /// enough power data to normalize
    fn power_metrics(
        &self,
        channels: &Channels,
        resolver: &mut ThresholdResolver<'_>,
        metrics: &mut ActivityMetrics,
    ) -> Option<f64> {
        let power = recorded(&channels.power);
        if power.len() < self.config.min_power_seconds || !power.iter().any(|w| *w > 0.0) {
            return None;
        }
        let grid = fill_gaps(recorded_span(&channels.power));
        let normalized = normalize_fourth_power(&grid, self.config.rolling_window_seconds);

        metrics.average_power = mean(&power).map(round1);
        metrics.work_kj = Some(round1(power.iter().sum::<f64>() / 1000.0));
        metrics.power_best_efforts = best_effort_curve(&grid, &self.config.best_effort_durations);
        let ftp = resolver.get(BaselineKind::Ftp);
        metrics.power_zone_seconds = Some(self.zones.power_zone_seconds(&power, ftp));
        metrics.normalized_power = normalized.map(round1);
        normalized
    }

    /// Average speed, speed curve and NGS
    fn speed_metrics(
        &self,
        activity: &Activity,
        channels: &Channels,
        metrics: &mut ActivityMetrics,
    ) -> Option<f64> {
        let speed = recorded(&channels.speed);
        metrics.average_speed = activity
            .distance_meters
            .filter(|d| *d > 0.0)
            .map(|d| d / activity.duration_seconds)
            .or_else(|| mean(&speed))
            .map(round2);
        if speed.is_empty() {
            return None;
        }
        metrics.speed_best_efforts = best_effort_curve(
            &fill_gaps(recorded_span(&channels.speed)),
            &self.config.best_effort_durations,
        );
        let normalized = normalize_fourth_power(
            &fill_gaps(recorded_span(&channels.graded_speed)),
            self.config.rolling_window_seconds,
        )
        .filter(|ngs| *ngs > 0.0);
        metrics.normalized_graded_speed = normalized.map(round2);
        normalized
    }

    /// Heart-rate summary, zones and TRIMP; returns the heart-rate score
    fn heart_rate_metrics(
        &self,
        activity: &Activity,
        channels: &Channels,
        resolver: &mut ThresholdResolver<'_>,
        metrics: &mut ActivityMetrics,
    ) -> Option<Score> {
        let heart_rate: Vec<f64> = recorded(&channels.heart_rate)
            .into_iter()
            .filter(|hr| *hr > 0.0)
            .collect();
        let average = mean(&heart_rate)?;
        metrics.average_heart_rate = Some(round1(average));
        metrics.max_heart_rate = heart_rate.iter().copied().reduce(f64::max);

        let lthr = resolver.get(BaselineKind::Lthr);
        metrics.hr_zone_seconds = Some(self.zones.hr_zone_seconds(&heart_rate, lthr));

        let model = TrimpModel {
            resting_hr: resolver.get(BaselineKind::RestingHeartRate),
            max_hr: resolver.get(BaselineKind::MaxHeartRate),
            weighting_a: self.config.trimp_weighting_a,
            weighting_b: self.config.trimp_weighting_b,
        };
        // Scale sampled TRIMP to the full duration when HR dropped out
        let sampled_seconds = heart_rate.len() as f64;
        let session_trimp = model.from_samples(&heart_rate)
            * activity.duration_seconds.max(sampled_seconds)
            / sampled_seconds;
        metrics.trimp = Some(round1(session_trimp));

        let tss = tss_from_trimp(session_trimp, model.threshold_hour(lthr))?;
        intensity_factor(average, lthr).map(|intensity| Score {
            tss,
            intensity_factor: intensity,
            source: TssSource::HeartRate,
        })
    }

    /// Efficiency factor and aerobic decoupling against heart rate
    fn efficiency_metrics(
        &self,
        channels: &Channels,
        normalized_output: Option<f64>,
        output_is_power: bool,
        average_hr: f64,
        metrics: &mut ActivityMetrics,
    ) {
        let Some(output) = normalized_output.filter(|_| average_hr > 0.0) else {
            return;
        };
        let channel = if output_is_power {
            &channels.power
        } else {
            &channels.graded_speed
        };
        metrics.efficiency_factor = Some(round2(output / average_hr));
        metrics.aerobic_decoupling = decoupling(
            channel,
            &channels.heart_rate,
            self.config.rolling_window_seconds,
        )
        .map(round1);
    }

    fn apply_score(&self, activity: &Activity, score: Option<Score>, metrics: &mut ActivityMetrics) {
        if let Some(score) = score {
            metrics.training_effect =
                Some(self.training_effect(score.tss, score.intensity_factor));
            metrics.tss = Some(round1(score.tss));
            metrics.intensity_factor = Some(round2(score.intensity_factor));
            metrics.tss_source = Some(score.source);
        } else {
            metrics.unscored = true;
            warn!(
                activity_id = %activity.id,
                category = %activity.category,
                "No power, heart-rate or pace signal; activity left unscored"
            );
        }
    }

    /// Resample every channel over the shared `origin..=end` grid
    fn extract_channels(&self, samples: &[StreamSample], origin: u32, end: u32) -> Channels {
        let gap = self.config.max_hold_gap_seconds;
        let power: Vec<(u32, f64)> = samples
            .iter()
            .filter_map(|s| {
                s.power
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .map(|p| (s.elapsed_seconds, p))
            })
            .collect();
        let heart_rate: Vec<(u32, f64)> = samples
            .iter()
            .filter_map(|s| {
                s.heart_rate
                    .filter(|hr| hr.is_finite() && *hr > 0.0)
                    .map(|hr| (s.elapsed_seconds, hr))
            })
            .collect();

        let mut speed = Vec::new();
        let mut graded_speed = Vec::new();
        let mut previous: Option<&StreamSample> = None;
        for sample in samples {
            let (derived, grade) =
                previous.map_or((None, 0.0), |prev| derive_motion(prev, sample));
            if let Some(v) = sample
                .speed
                .filter(|v| v.is_finite() && *v >= 0.0)
                .or(derived)
            {
                speed.push((sample.elapsed_seconds, v));
                graded_speed.push((
                    sample.elapsed_seconds,
                    grade_adjusted_speed(v, grade, self.config.max_abs_grade),
                ));
            }
            previous = Some(sample);
        }

        Channels {
            power: resample_1hz(&power, origin, end, gap),
            heart_rate: resample_1hz(&heart_rate, origin, end, gap),
            speed: resample_1hz(&speed, origin, end, gap),
            graded_speed: resample_1hz(&graded_speed, origin, end, gap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_effect_classes() {
        let calculator = StreamMetricsCalculator::default();
        assert_eq!(
            calculator.training_effect(10.0, 0.7).classification,
            TrainingEffectClass::Recovery
        );
        assert_eq!(
            calculator.training_effect(45.0, 0.7).classification,
            TrainingEffectClass::Maintaining
        );
        assert_eq!(
            calculator.training_effect(90.0, 0.8).classification,
            TrainingEffectClass::Improving
        );
        assert_eq!(
            calculator.training_effect(110.0, 1.0).classification,
            TrainingEffectClass::HighlyImproving
        );
        assert_eq!(
            calculator.training_effect(320.0, 0.8).classification,
            TrainingEffectClass::Overreaching
        );
    }

    #[test]
    fn test_decoupling_detects_drift() {
        let output: Vec<Option<f64>> = vec![Some(200.0); 120];
        let mut heart_rate: Vec<Option<f64>> = vec![Some(140.0); 60];
        heart_rate.extend(vec![Some(154.0); 60]);
        let drift = decoupling(&output, &heart_rate, 30).unwrap();
        assert!((drift - (1.0 - 140.0 / 154.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_from_altitude_and_distance() {
        let prev = StreamSample {
            elapsed_seconds: 0,
            altitude: Some(100.0),
            distance: Some(0.0),
            ..StreamSample::default()
        };
        let next = StreamSample {
            elapsed_seconds: 10,
            altitude: Some(105.0),
            distance: Some(50.0),
            ..StreamSample::default()
        };
        let (speed, grade) = derive_motion(&prev, &next);
        assert!((speed.unwrap() - 5.0).abs() < 1e-9);
        assert!((grade - 0.1).abs() < 1e-9);
    }
}
