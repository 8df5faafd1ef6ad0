// ABOUTME: Intensity factor and training stress score formulas
// ABOUTME: Power and pace TSS from IF squared, heart-rate TSS from normalized TRIMP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Ratio of a normalized output to its threshold
///
/// `None` when either value is not a positive finite number.
#[must_use]
pub fn intensity_factor(normalized: f64, threshold: f64) -> Option<f64> {
    (normalized.is_finite() && threshold.is_finite() && normalized >= 0.0 && threshold > 0.0)
        .then(|| normalized / threshold)
}

/// TSS = 100 x hours x IF squared
#[must_use]
pub fn tss_from_intensity(duration_hours: f64, intensity_factor: f64) -> f64 {
    100.0 * duration_hours * intensity_factor * intensity_factor
}

/// Heart-rate TSS: session TRIMP relative to one hour at LTHR
///
/// `None` when the reference TRIMP is not positive.
#[must_use]
pub fn tss_from_trimp(session_trimp: f64, threshold_hour_trimp: f64) -> Option<f64> {
    (threshold_hour_trimp > 0.0 && session_trimp.is_finite())
        .then(|| session_trimp / threshold_hour_trimp * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hour_at_threshold_is_100() {
        let intensity = intensity_factor(250.0, 250.0).unwrap();
        assert!((tss_from_intensity(1.0, intensity) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_threshold_has_no_intensity() {
        assert!(intensity_factor(200.0, 0.0).is_none());
        assert!(intensity_factor(f64::NAN, 200.0).is_none());
    }

    #[test]
    fn test_trimp_tss_is_relative_to_threshold_hour() {
        assert!((tss_from_trimp(50.0, 100.0).unwrap() - 50.0).abs() < 1e-9);
        assert!(tss_from_trimp(50.0, 0.0).is_none());
    }
}
