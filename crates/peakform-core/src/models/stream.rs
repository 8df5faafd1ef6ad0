// ABOUTME: Standardized raw stream records produced by the activity file parser
// ABOUTME: Per-sample power, heart rate, cadence, altitude, speed, distance and position
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// One raw time-series point; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSample {
    /// Seconds since activity start
    pub elapsed_seconds: u32,
    /// Power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Heart rate in bpm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Cadence in rpm or steps/min
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    /// Altitude in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Speed in m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Cumulative distance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// GPS position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GeoPoint>,
}

/// Ordered samples of one activity file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStreams {
    /// Samples sorted by `elapsed_seconds`
    pub samples: Vec<StreamSample>,
}

impl ActivityStreams {
    /// Wrap samples, sorting them by elapsed time
    #[must_use]
    pub fn new(mut samples: Vec<StreamSample>) -> Self {
        samples.sort_by_key(|s| s.elapsed_seconds);
        Self { samples }
    }

    /// First and last elapsed second, `None` without samples
    #[must_use]
    pub fn time_bounds(&self) -> Option<(u32, u32)> {
        let seconds = self.samples.iter().map(|s| s.elapsed_seconds);
        Some((seconds.clone().min()?, seconds.max()?))
    }
}
