// ABOUTME: Best-effort curves from a sliding-window maximum mean
// ABOUTME: Durations longer than the recording are omitted rather than extrapolated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use peakform_core::models::BestEffort;

/// Highest mean over any `window` consecutive seconds
#[must_use]
pub fn max_window_mean(grid: &[f64], window: usize) -> Option<f64> {
    if window == 0 || grid.len() < window {
        return None;
    }
    let mut sum: f64 = grid[..window].iter().sum();
    let mut best = sum;
    for i in window..grid.len() {
        sum += grid[i] - grid[i - window];
        best = best.max(sum);
    }
    Some(best / window as f64)
}

/// Best effort for each duration that fits in the series
#[must_use]
pub fn best_effort_curve(grid: &[f64], durations: &[u32]) -> Vec<BestEffort> {
    durations
        .iter()
        .filter_map(|duration| {
            max_window_mean(grid, *duration as usize).map(|value| BestEffort {
                duration_seconds: *duration,
                value,
            })
        })
        .collect()
}
