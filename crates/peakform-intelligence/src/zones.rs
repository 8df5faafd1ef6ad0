// ABOUTME: Intensity zone classification and TSS-weighted zone distributions
// ABOUTME: Also counts seconds spent in heart-rate and power zones from 1 Hz samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use peakform_core::models::{Activity, IntensityZone};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;

/// TSS and share of one zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneShare {
    /// Zone
    pub zone: IntensityZone,
    /// Summed TSS of activities in this zone
    pub tss: f64,
    /// Share of total TSS, percent with one decimal
    pub percent: f64,
}

/// TSS-weighted distribution across the seven zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    /// Total TSS of scored activities
    pub total_tss: f64,
    /// One entry per zone in ascending intensity order
    pub zones: Vec<ZoneShare>,
}

impl ZoneDistribution {
    /// Percentage for one zone
    #[must_use]
    pub fn percent(&self, zone: IntensityZone) -> f64 {
        self.zones
            .iter()
            .find(|share| share.zone == zone)
            .map_or(0.0, |share| share.percent)
    }

    /// Sum of all zone percentages (100.0, or 0.0 when nothing was scored)
    #[must_use]
    pub fn total_percent(&self) -> f64 {
        self.zones.iter().map(|share| share.percent).sum()
    }
}

/// Maps intensity factors to zones and aggregates zone time and load
#[derive(Debug, Clone, Default)]
pub struct IntensityZoneClassifier {
    config: ZoneConfig,
}

/// Largest-remainder apportionment of `total_units` in proportion to `weights`
fn apportion<const N: usize>(weights: &[f64; N], total_units: u32) -> [u32; N] {
    let total: f64 = weights.iter().sum();
    let mut units = [0_u32; N];
    if total <= 0.0 {
        return units;
    }
    let mut remainders = [(0.0_f64, 0_usize); N];
    for (i, weight) in weights.iter().enumerate() {
        let exact = weight / total * f64::from(total_units);
        units[i] = exact.floor() as u32;
        remainders[i] = (exact - exact.floor(), i);
    }
    let assigned: u32 = units.iter().sum();
    remainders.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, i) in remainders
        .iter()
        .take(total_units.saturating_sub(assigned) as usize)
    {
        units[*i] += 1;
    }
    units
}

fn bucket(value: f64, upper_bounds: &[f64]) -> usize {
    upper_bounds
        .iter()
        .position(|bound| value < *bound)
        .unwrap_or(upper_bounds.len())
}

impl IntensityZoneClassifier {
    /// Create a classifier with the given boundaries
    #[must_use]
    pub const fn new(config: ZoneConfig) -> Self {
        Self { config }
    }

    /// Zone for an intensity factor on the decimal scale
    ///
    /// Monotonic non-decreasing in `intensity_factor`. Negative and NaN
    /// values map to recovery.
    #[must_use]
    pub fn training_intensity_zone(&self, intensity_factor: f64) -> IntensityZone {
        if intensity_factor.is_nan() {
            return IntensityZone::Recovery;
        }
        let index = bucket(intensity_factor, &self.config.intensity.as_array());
        IntensityZone::ALL[index.min(IntensityZone::ALL.len() - 1)]
    }

    /// TSS-weighted zone distribution of scored activities
    ///
    /// Activities without TSS or intensity factor are skipped. Percentages are
    /// rounded to 0.1 with largest-remainder apportionment so they sum to
    /// exactly 100.0 whenever total TSS is positive; otherwise all zero.
    #[must_use]
    pub fn zone_distribution<'a, I>(&self, activities: I) -> ZoneDistribution
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let mut tss_per_zone = [0.0_f64; 7];
        for activity in activities {
            let metrics = &activity.metrics;
            if let (Some(tss), Some(intensity)) = (metrics.tss, metrics.intensity_factor) {
                if tss.is_finite() && tss > 0.0 {
                    tss_per_zone[self.training_intensity_zone(intensity).index()] += tss;
                }
            }
        }
        let tenths = apportion(&tss_per_zone, 1000);
        ZoneDistribution {
            total_tss: tss_per_zone.iter().sum(),
            zones: IntensityZone::ALL
                .iter()
                .map(|zone| ZoneShare {
                    zone: *zone,
                    tss: tss_per_zone[zone.index()],
                    percent: f64::from(tenths[zone.index()]) / 10.0,
                })
                .collect(),
        }
    }

    /// Seconds in each of five heart-rate zones (fractions of LTHR)
    ///
    /// Non-positive samples are skipped.
    #[must_use]
    pub fn hr_zone_seconds(&self, heart_rate_1hz: &[f64], lthr: f64) -> [u32; 5] {
        let bounds: Vec<f64> = self
            .config
            .hr_zone_fractions
            .0
            .iter()
            .map(|fraction| fraction * lthr)
            .collect();
        count_zones::<5>(heart_rate_1hz, &bounds, |hr| hr > 0.0)
    }

    /// Seconds in each of six power zones (fractions of FTP)
    ///
    /// Zero-watt samples (coasting) count toward zone 1.
    #[must_use]
    pub fn power_zone_seconds(&self, power_1hz: &[f64], ftp: f64) -> [u32; 6] {
        let bounds: Vec<f64> = self
            .config
            .power_zone_fractions
            .0
            .iter()
            .map(|fraction| fraction * ftp)
            .collect();
        count_zones::<6>(power_1hz, &bounds, |watts| watts >= 0.0)
    }
}

fn count_zones<const N: usize>(
    samples: &[f64],
    upper_bounds: &[f64],
    include: impl Fn(f64) -> bool + Sync,
) -> [u32; N] {
    samples
        .par_iter()
        .fold(
            || [0_u32; N],
            |mut counts, value| {
                if value.is_finite() && include(*value) {
                    counts[bucket(*value, upper_bounds).min(N - 1)] += 1;
                }
                counts
            },
        )
        .reduce(
            || [0_u32; N],
            |mut left, right| {
                for (l, r) in left.iter_mut().zip(right) {
                    *l += r;
                }
                left
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        let classifier = IntensityZoneClassifier::default();
        assert_eq!(classifier.training_intensity_zone(0.54), IntensityZone::Recovery);
        assert_eq!(classifier.training_intensity_zone(0.55), IntensityZone::Endurance);
        assert_eq!(classifier.training_intensity_zone(0.95), IntensityZone::Threshold);
        assert_eq!(classifier.training_intensity_zone(1.50), IntensityZone::Neuromuscular);
        assert_eq!(classifier.training_intensity_zone(-0.3), IntensityZone::Recovery);
        assert_eq!(classifier.training_intensity_zone(f64::NAN), IntensityZone::Recovery);
    }

    #[test]
    fn test_apportion_sums_exactly() {
        let units = apportion(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], 1000);
        assert_eq!(units.iter().sum::<u32>(), 1000);
        assert_eq!(units[0], 334);
    }

    #[test]
    fn test_hr_zone_seconds() {
        let classifier = IntensityZoneClassifier::default();
        let samples = [120.0, 150.0, 158.0, 165.0, 175.0, 0.0];
        let zones = classifier.hr_zone_seconds(&samples, 170.0);
        assert_eq!(zones, [1, 1, 1, 1, 1]);
    }
}
