// ABOUTME: Pure numeric building blocks for stream metrics and training load
// ABOUTME: Resampling, 4th-power normalization, grade adjustment, TSS, TRIMP, best efforts, EWMA
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Sliding-window best-effort curves
pub mod best_effort;
/// Minetti grade-adjusted speed
pub mod grade_adjusted;
/// 1 Hz resampling and rolling 4th-power normalization
pub mod normalized;
/// Exponentially weighted CTL/ATL recursion
pub mod training_load;
/// Banister training impulse
pub mod trimp;
/// Intensity factor and training stress score
pub mod tss;
