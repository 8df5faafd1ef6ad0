// ABOUTME: CTL/ATL/TSB state machine over a zero-filled daily TSS series
// ABOUTME: Trailing-history seeding, forward projection, weekly rollup, ramp rate and form status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peakform Contributors

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use peakform_core::constants::rounding::round1;
use peakform_core::constants::time_constants::DAYS_PER_WEEK;
use peakform_core::models::Activity;
use peakform_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algorithms::training_load::{ewma_step, seed_from_trailing, tsb};
use crate::config::TrainingLoadConfig;

/// Ordinal form classification derived from TSB
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// Very positive TSB, fitness is decaying
    Detraining,
    /// Rested and ready to perform
    Fresh,
    /// Neither fresh nor fatigued
    GreyZone,
    /// Productive training fatigue
    Fatigued,
    /// Fatigue beyond what is productive
    Overreaching,
}

/// (CTL, ATL, TSB) triple at full precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoadState {
    /// Chronic training load (fitness)
    pub ctl: f64,
    /// Acute training load (fatigue)
    pub atl: f64,
    /// Training stress balance (form)
    pub tsb: f64,
}

impl TrainingLoadState {
    /// Build a state, deriving TSB
    #[must_use]
    pub fn new(ctl: f64, atl: f64) -> Self {
        Self {
            ctl,
            atl,
            tsb: tsb(ctl, atl),
        }
    }
}

/// One exposed day of the load curve, rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoadPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Chronic training load
    pub ctl: f64,
    /// Acute training load
    pub atl: f64,
    /// Training stress balance
    pub tsb: f64,
}

/// Summed TSS of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTss {
    /// Calendar day
    pub date: NaiveDate,
    /// Summed TSS, zero for rest days
    pub tss: f64,
}

/// How the recursion was seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Averaged from the trailing history window
    TrailingHistory,
    /// Configured default, no trailing activities existed
    Default,
}

/// Load curve over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLoadSeries {
    /// State before the first day
    pub seed: TrainingLoadState,
    /// How the seed was obtained
    pub seed_source: SeedSource,
    /// One rounded point per calendar day
    pub points: Vec<TrainingLoadPoint>,
    /// State after the last day, at full precision
    pub final_state: TrainingLoadState,
    /// Activities in the window that carried no TSS
    pub unscored_activities: usize,
}

/// Recursive fitness/fatigue tracker with injected time constants
#[derive(Debug, Clone, Default)]
pub struct TrainingLoadTracker {
    config: TrainingLoadConfig,
}

impl TrainingLoadTracker {
    /// Create a tracker
    #[must_use]
    pub const fn new(config: TrainingLoadConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &TrainingLoadConfig {
        &self.config
    }

    /// `previous + (today_tss - previous) / ctl_time_constant`
    #[must_use]
    pub fn calculate_ctl(&self, previous_ctl: f64, today_tss: f64) -> f64 {
        ewma_step(previous_ctl, today_tss, self.config.ctl_time_constant_days)
    }

    /// `previous + (today_tss - previous) / atl_time_constant`
    #[must_use]
    pub fn calculate_atl(&self, previous_atl: f64, today_tss: f64) -> f64 {
        ewma_step(previous_atl, today_tss, self.config.atl_time_constant_days)
    }

    /// `ctl - atl`, exactly
    #[must_use]
    pub fn calculate_tsb(ctl: f64, atl: f64) -> f64 {
        tsb(ctl, atl)
    }

    /// Classify TSB on the fixed ordinal form scale
    #[must_use]
    pub fn form_status(&self, tsb: f64) -> FormStatus {
        let form = &self.config.form;
        if tsb > form.detraining_above {
            FormStatus::Detraining
        } else if tsb > form.fresh_above {
            FormStatus::Fresh
        } else if tsb >= form.grey_zone_floor {
            FormStatus::GreyZone
        } else if tsb >= form.fatigued_floor {
            FormStatus::Fatigued
        } else {
            FormStatus::Overreaching
        }
    }

    /// Check a date window and return its length in days (inclusive)
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when `end` precedes `start` or the
    /// window is longer than the configured cap.
    pub fn validate_window(&self, start: NaiveDate, end: NaiveDate) -> AppResult<i64> {
        if end < start {
            return Err(AppError::invalid_input(format!(
                "Date range end {end} is before start {start}"
            )));
        }
        let days = (end - start).num_days() + 1;
        if days > self.config.max_window_days {
            return Err(AppError::invalid_input(format!(
                "Date range of {days} days exceeds the maximum of {} days",
                self.config.max_window_days
            )));
        }
        Ok(days)
    }

    /// Zero-filled daily TSS from `start` to `end` inclusive
    ///
    /// Activities are attributed to their UTC start day and summed. Unscored
    /// activities contribute zero. Activities outside the range are ignored.
    #[must_use]
    pub fn daily_tss<'a, I>(activities: I, start: NaiveDate, end: NaiveDate) -> Vec<DailyTss>
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for activity in activities {
            let day = activity.day();
            if day >= start && day <= end {
                *per_day.entry(day).or_insert(0.0) += activity.metrics.tss_contribution();
            }
        }
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|date| DailyTss {
                date,
                tss: per_day.get(&date).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Seed state for a window starting at `window_start`
    ///
    /// Averages the trailing seed window before `window_start`; falls back to
    /// the configured default only when no activity falls in that window.
    #[must_use]
    pub fn seed(
        &self,
        activities: &[Activity],
        window_start: NaiveDate,
    ) -> (TrainingLoadState, SeedSource) {
        let trailing_start = window_start - Duration::days(self.config.seed_window_days);
        let trailing_end = window_start - Duration::days(1);
        let has_history = activities
            .iter()
            .any(|a| a.day() >= trailing_start && a.day() <= trailing_end);

        let estimate = has_history
            .then(|| {
                let trailing: Vec<f64> = Self::daily_tss(activities, trailing_start, trailing_end)
                    .iter()
                    .map(|d| d.tss)
                    .collect();
                seed_from_trailing(&trailing, self.config.seed_atl_window_days as usize)
            })
            .flatten();

        match estimate {
            Some((ctl, atl)) => {
                debug!(ctl, atl, %window_start, "Seeded training load from trailing history");
                (TrainingLoadState::new(ctl, atl), SeedSource::TrailingHistory)
            }
            None => {
                debug!(%window_start, "No trailing history, using default training load seed");
                (
                    TrainingLoadState::new(
                        self.config.default_seed_ctl,
                        self.config.default_seed_atl,
                    ),
                    SeedSource::Default,
                )
            }
        }
    }

    /// Apply the recursion to an ordered daily series
    ///
    /// Returns one rounded point per day plus the unrounded final state.
    #[must_use]
    pub fn replay(
        &self,
        seed: TrainingLoadState,
        daily: &[DailyTss],
    ) -> (Vec<TrainingLoadPoint>, TrainingLoadState) {
        let mut ctl = seed.ctl;
        let mut atl = seed.atl;
        let mut points = Vec::with_capacity(daily.len());
        for day in daily {
            ctl = self.calculate_ctl(ctl, day.tss);
            atl = self.calculate_atl(atl, day.tss);
            points.push(TrainingLoadPoint {
                date: day.date,
                ctl: round1(ctl),
                atl: round1(atl),
                tsb: round1(tsb(ctl, atl)),
            });
        }
        (points, TrainingLoadState::new(ctl, atl))
    }

    /// Historical load curve from `start` to `end` inclusive
    ///
    /// `activities` should cover the trailing seed window as well as the
    /// window itself.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a reversed or oversized window.
    pub fn series(
        &self,
        activities: &[Activity],
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<TrainingLoadSeries> {
        let days = self.validate_window(start, end)?;
        let (seed, seed_source) = self.seed(activities, start);
        let daily = Self::daily_tss(activities, start, end);

        let unscored_activities = activities
            .iter()
            .filter(|a| a.day() >= start && a.day() <= end && !a.metrics.is_scored())
            .count();
        if unscored_activities > 0 {
            warn!(
                unscored_activities,
                "Unscored activities counted as zero training stress"
            );
        }

        let (points, final_state) = self.replay(seed, &daily);
        debug!(
            days,
            ctl = final_state.ctl,
            atl = final_state.atl,
            "Computed training load series"
        );
        Ok(TrainingLoadSeries {
            seed,
            seed_source,
            points,
            final_state,
            unscored_activities,
        })
    }

    /// Replay the recursion forward from `from` with hypothetical daily TSS
    ///
    /// The first value applies to `first_day`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when the projection is longer than
    /// the configured window cap.
    pub fn project(
        &self,
        from: TrainingLoadState,
        first_day: NaiveDate,
        hypothetical_tss: &[f64],
    ) -> AppResult<Vec<TrainingLoadPoint>> {
        if hypothetical_tss.len() as i64 > self.config.max_window_days {
            return Err(AppError::invalid_input(format!(
                "Projection of {} days exceeds the maximum of {} days",
                hypothetical_tss.len(),
                self.config.max_window_days
            )));
        }
        let daily: Vec<DailyTss> = first_day
            .iter_days()
            .zip(hypothetical_tss)
            .map(|(date, &tss)| DailyTss {
                date,
                tss: if tss.is_finite() { tss.max(0.0) } else { 0.0 },
            })
            .collect();
        Ok(self.replay(from, &daily).0)
    }

    /// Last point of each ISO week (Monday to Sunday)
    #[must_use]
    pub fn weekly(points: &[TrainingLoadPoint]) -> Vec<TrainingLoadPoint> {
        let mut weekly: Vec<TrainingLoadPoint> = Vec::new();
        for point in points {
            let same_week = weekly
                .last()
                .is_some_and(|last| last.date.iso_week() == point.date.iso_week());
            if same_week {
                weekly.pop();
            }
            weekly.push(*point);
        }
        weekly
    }

    /// CTL change over the last seven days of a daily series
    #[must_use]
    pub fn ramp_rate(points: &[TrainingLoadPoint]) -> Option<f64> {
        let last = points.last()?;
        let week_ago = last.date - Duration::days(DAYS_PER_WEEK);
        let earlier = points.iter().rev().find(|p| p.date == week_ago)?;
        Some(round1(last.ctl - earlier.ctl))
    }
}
