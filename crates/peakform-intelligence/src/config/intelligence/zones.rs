// ABOUTME: Intensity and seconds-in-zone boundary configuration types
// ABOUTME: IF bounds for the seven training zones plus HR and power zone fractions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::{intensity_zones, zone_boundaries};
use serde::{Deserialize, Serialize};

/// Intensity factor upper bounds; the neuromuscular zone is open-ended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityZoneBounds {
    /// Recovery below this IF
    pub recovery_max: f64,
    /// Endurance below this IF
    pub endurance_max: f64,
    /// Tempo below this IF
    pub tempo_max: f64,
    /// Threshold below this IF
    pub threshold_max: f64,
    /// VO2max below this IF
    pub vo2max_max: f64,
    /// Anaerobic below this IF
    pub anaerobic_max: f64,
}

impl IntensityZoneBounds {
    /// Bounds in ascending zone order
    #[must_use]
    pub const fn as_array(&self) -> [f64; 6] {
        [
            self.recovery_max,
            self.endurance_max,
            self.tempo_max,
            self.threshold_max,
            self.vo2max_max,
            self.anaerobic_max,
        ]
    }
}

impl Default for IntensityZoneBounds {
    fn default() -> Self {
        Self {
            recovery_max: intensity_zones::RECOVERY_MAX_IF,
            endurance_max: intensity_zones::ENDURANCE_MAX_IF,
            tempo_max: intensity_zones::TEMPO_MAX_IF,
            threshold_max: intensity_zones::THRESHOLD_MAX_IF,
            vo2max_max: intensity_zones::VO2MAX_MAX_IF,
            anaerobic_max: intensity_zones::ANAEROBIC_MAX_IF,
        }
    }
}

/// Zone classification configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Intensity factor zone bounds
    pub intensity: IntensityZoneBounds,
    /// Heart-rate zone upper bounds as fraction of LTHR
    pub hr_zone_fractions: HrZoneFractions,
    /// Power zone upper bounds as fraction of FTP
    pub power_zone_fractions: PowerZoneFractions,
}

/// Heart-rate zone 1-4 upper bounds as fraction of LTHR
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HrZoneFractions(pub [f64; 4]);

impl Default for HrZoneFractions {
    fn default() -> Self {
        Self(zone_boundaries::HR_ZONE_UPPER_FRACTIONS)
    }
}

/// Power zone 1-5 upper bounds as fraction of FTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerZoneFractions(pub [f64; 5]);

impl Default for PowerZoneFractions {
    fn default() -> Self {
        Self(zone_boundaries::POWER_ZONE_UPPER_FRACTIONS)
    }
}
