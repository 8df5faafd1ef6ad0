// ABOUTME: Exponentially weighted CTL/ATL recursion and trailing-history seeding
// ABOUTME: new = previous + (today - previous) / time_constant, one step per calendar day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// One day of the exponentially weighted recursion
///
/// Pure function of `(previous, today_tss)`; the same inputs always produce
/// bit-identical output.
#[must_use]
pub fn ewma_step(previous: f64, today_tss: f64, time_constant_days: f64) -> f64 {
    previous + (today_tss - previous) / time_constant_days
}

/// Training Stress Balance: exactly `ctl - atl`
#[must_use]
pub fn tsb(ctl: f64, atl: f64) -> f64 {
    ctl - atl
}

/// Seed `(ctl, atl)` estimated from trailing daily TSS
///
/// `trailing` holds one value per calendar day, oldest first, ending the day
/// before the window starts. CTL seed is the mean over all of it, ATL seed the
/// mean over the final `atl_days` values. `None` for an empty slice; callers
/// decide whether a window without activities should use a default instead.
#[must_use]
pub fn seed_from_trailing(trailing: &[f64], atl_days: usize) -> Option<(f64, f64)> {
    if trailing.is_empty() || atl_days == 0 {
        return None;
    }
    let ctl = trailing.iter().sum::<f64>() / trailing.len() as f64;
    let recent = &trailing[trailing.len().saturating_sub(atl_days)..];
    let atl = recent.iter().sum::<f64>() / recent.len() as f64;
    Some((ctl, atl))
}
