// ABOUTME: Grade-adjusted speed using the Minetti energy cost polynomial
// ABOUTME: Uphill running is weighted as faster, moderate downhill as slightly faster
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use crate::physiological_constants::grade_adjustment::{COST_POLYNOMIAL, FLAT_COST};

/// Energy cost of running at `grade` (rise over run), J/kg/m
#[must_use]
pub fn running_cost(grade: f64) -> f64 {
    COST_POLYNOMIAL
        .iter()
        .fold(0.0, |acc, coefficient| acc.mul_add(grade, *coefficient))
}

/// Flat-equivalent speed for `speed` m/s on `grade`, after clamping the grade
#[must_use]
pub fn grade_adjusted_speed(speed: f64, grade: f64, max_abs_grade: f64) -> f64 {
    let grade = grade.clamp(-max_abs_grade, max_abs_grade);
    speed * running_cost(grade) / FLAT_COST
}

/// Grade between two points from altitude and cumulative distance deltas
///
/// `None` when the horizontal distance does not increase.
#[must_use]
pub fn grade_between(
    from_altitude: f64,
    to_altitude: f64,
    from_distance: f64,
    to_distance: f64,
) -> Option<f64> {
    let run = to_distance - from_distance;
    (run > 0.0).then(|| (to_altitude - from_altitude) / run)
}
