// ABOUTME: 1 Hz stream resampling and rolling 4th-power normalization (NP and NGS)
// ABOUTME: Gaps longer than the hold limit are left empty and count as zero output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

/// Resample `(elapsed_seconds, value)` points onto the 1-second grid `origin..=end`
///
/// Points must be sorted by elapsed time; a later point with the same
/// timestamp wins. Each second takes the value of the latest point at or
/// before it, as long as that point is at most `max_hold_gap` seconds old.
/// Seconds before the first point and inside longer gaps (recording pauses)
/// are `None`. Channels resampled over the same bounds share an index.
#[must_use]
pub fn resample_1hz(
    points: &[(u32, f64)],
    origin: u32,
    end: u32,
    max_hold_gap: u32,
) -> Vec<Option<f64>> {
    if points.is_empty() || end < origin {
        return Vec::new();
    }
    let mut grid = Vec::with_capacity((end - origin) as usize + 1);
    let mut pending = points.iter().peekable();
    let mut held: Option<(u32, f64)> = None;
    for second in origin..=end {
        while let Some(&&point) = pending.peek() {
            if point.0 > second {
                break;
            }
            held = Some(point);
            pending.next();
        }
        grid.push(held.and_then(|(at, value)| (second - at <= max_hold_gap).then_some(value)));
    }
    grid
}

/// The grid from its first to its last recorded second
#[must_use]
pub fn recorded_span(grid: &[Option<f64>]) -> &[Option<f64>] {
    let first = grid.iter().position(Option::is_some);
    let last = grid.iter().rposition(Option::is_some);
    match (first, last) {
        (Some(first), Some(last)) => grid.get(first..=last).unwrap_or_default(),
        _ => &[],
    }
}

/// Replace paused seconds with zero output
#[must_use]
pub fn fill_gaps(grid: &[Option<f64>]) -> Vec<f64> {
    grid.iter().map(|v| v.unwrap_or(0.0)).collect()
}

/// Recorded seconds only
#[must_use]
pub fn recorded(grid: &[Option<f64>]) -> Vec<f64> {
    grid.iter().flatten().copied().collect()
}

/// Trailing rolling mean over full windows only
///
/// Returns `values.len() - window + 1` means, or nothing when the series is
/// shorter than one window.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let width = window as f64;
    let mut sum: f64 = values[..window].iter().sum();
    let mut means = Vec::with_capacity(values.len() - window + 1);
    means.push(sum / width);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        means.push(sum / width);
    }
    means
}

/// Coggan normalization of a 1 Hz series
///
/// 30-second (configurable) rolling mean, raised to the 4th power, averaged,
/// then the 4th root. `None` when the series is shorter than one window.
#[must_use]
pub fn normalize_fourth_power(grid: &[f64], window: usize) -> Option<f64> {
    let smoothed = rolling_mean(grid, window);
    if smoothed.is_empty() {
        return None;
    }
    let mean_fourth =
        smoothed.iter().map(|v| v.max(0.0).powi(4)).sum::<f64>() / smoothed.len() as f64;
    Some(mean_fourth.powf(0.25))
}

/// Arithmetic mean, `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_holds_short_gaps_and_zeroes_long_ones() {
        let grid = resample_1hz(&[(0, 100.0), (2, 200.0), (12, 300.0)], 0, 12, 5);
        assert_eq!(grid.len(), 13);
        assert_eq!(grid[1], Some(100.0));
        assert_eq!(grid[7], Some(200.0));
        assert_eq!(grid[8], None);
        assert_eq!(grid[12], Some(300.0));
        assert_eq!(recorded(&grid).len(), 9);
        assert!(fill_gaps(&grid)[8].abs() < f64::EPSILON);
    }

    #[test]
    fn test_late_channel_keeps_the_shared_origin() {
        let grid = resample_1hz(&[(10, 150.0), (11, 152.0)], 0, 20, 5);
        assert_eq!(grid.len(), 21);
        assert!(grid[..10].iter().all(Option::is_none));
        assert_eq!(grid[10], Some(150.0));
        assert_eq!(grid[16], Some(152.0));
        assert_eq!(grid[17], None);

        let span = recorded_span(&grid);
        assert_eq!(span.len(), 7);
        assert_eq!(span[0], Some(150.0));
        assert!(recorded_span(&[None, None]).is_empty());
    }

    #[test]
    fn test_constant_series_normalizes_to_itself() {
        let grid = vec![250.0; 600];
        let np = normalize_fourth_power(&grid, 30).unwrap();
        assert!((np - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_variable_series_normalizes_above_mean() {
        let grid: Vec<f64> = (0..1200)
            .map(|s| if (s / 60) % 2 == 0 { 350.0 } else { 150.0 })
            .collect();
        let np = normalize_fourth_power(&grid, 30).unwrap();
        assert!(np > mean(&grid).unwrap());
    }

    #[test]
    fn test_short_series_has_no_normalized_value() {
        assert!(normalize_fourth_power(&[200.0; 29], 30).is_none());
    }
}
