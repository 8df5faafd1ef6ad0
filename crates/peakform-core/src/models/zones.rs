// ABOUTME: Intensity zone and training effect enumerations shared by metrics and analytics
// ABOUTME: Seven ordered IF-based zones plus the session training effect classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::fmt;

use serde::{Deserialize, Serialize};

/// Seven physiological training zones ordered by increasing intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityZone {
    /// Active recovery
    Recovery,
    /// Aerobic endurance
    Endurance,
    /// Tempo
    Tempo,
    /// Lactate threshold
    Threshold,
    /// VO2max intervals
    Vo2max,
    /// Anaerobic capacity
    Anaerobic,
    /// Neuromuscular power
    Neuromuscular,
}

impl IntensityZone {
    /// All zones in ascending intensity order
    pub const ALL: [Self; 7] = [
        Self::Recovery,
        Self::Endurance,
        Self::Tempo,
        Self::Threshold,
        Self::Vo2max,
        Self::Anaerobic,
        Self::Neuromuscular,
    ];

    /// Position of this zone in [`Self::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake-case label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recovery => "recovery",
            Self::Endurance => "endurance",
            Self::Tempo => "tempo",
            Self::Threshold => "threshold",
            Self::Vo2max => "vo2max",
            Self::Anaerobic => "anaerobic",
            Self::Neuromuscular => "neuromuscular",
        }
    }
}

impl fmt::Display for IntensityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse session training effect, driven by stress and intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingEffectClass {
    /// Minor stimulus, supports recovery
    Recovery,
    /// Maintains current fitness
    Maintaining,
    /// Improves fitness
    Improving,
    /// Strong improving stimulus
    HighlyImproving,
    /// Load beyond what is productive for a single session
    Overreaching,
}

/// Training effect of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEffect {
    /// Magnitude classification
    pub classification: TrainingEffectClass,
    /// Zone the session's intensity factor falls in
    pub primary_zone: IntensityZone,
}
