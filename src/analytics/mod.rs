/// Per-habit statistics
///
/// This module composes the streak and ratio calculations from the domain
/// layer into one `HabitStats` record per habit, and runs that over every
/// habit in a store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    completion_dates, current_daily_streak, current_weekly_streak, longest_daily_streak,
    longest_weekly_streak, success_ratio_daily, success_ratio_weekly, weekly_totals, Cadence,
    Completion, DomainError, Habit, HabitId,
};
use crate::storage::{HabitStorage, StorageError};

/// Trailing window for the short success ratio
pub const SHORT_WINDOW: u32 = 7;
/// Trailing window for the long success ratio
pub const LONG_WINDOW: u32 = 30;

/// Statistics for one habit as of a reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: HabitId,
    pub name: String,
    pub cadence: Cadence,
    /// Consecutive periods ending at the reference date
    pub current_streak: u32,
    /// Best run anywhere in the history
    pub longest_streak: u32,
    /// Success ratio over the last 7 days, rounded to 4 decimals
    pub success_7d: f64,
    /// Success ratio over the last 30 days, rounded to 4 decimals
    pub success_30d: f64,
}

/// Round a ratio to 4 decimal digits for presentation
pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 10_000.0
}

/// Compute stats for one habit from its completion history
///
/// Completions dated after `reference` are ignored. Longest streaks use the
/// whole remaining history; ratios use the trailing 7 and 30 day windows.
pub fn compute_habit_stats(
    habit: &Habit,
    completions: &[Completion],
    reference: NaiveDate,
) -> Result<HabitStats, DomainError> {
    let history: Vec<Completion> = completions
        .iter()
        .filter(|c| c.date <= reference)
        .copied()
        .collect();

    if let Some(bad) = history.iter().find(|c| c.amount < 0) {
        return Err(DomainError::InvalidArgument(format!(
            "negative amount {} on {}",
            bad.amount, bad.date
        )));
    }

    let (current_streak, longest_streak, success_7d, success_30d) = match habit.cadence {
        Cadence::Weekly => {
            let target = habit.target_per_period;
            let totals = weekly_totals(&history)?;
            (
                current_weekly_streak(&history, target, reference)?,
                longest_weekly_streak(&totals, target)?,
                success_ratio_weekly(&history, target, SHORT_WINDOW, reference)?,
                success_ratio_weekly(&history, target, LONG_WINDOW, reference)?,
            )
        }
        Cadence::Daily => {
            let dates = completion_dates(&history);
            (
                current_daily_streak(&dates, reference),
                longest_daily_streak(&dates),
                success_ratio_daily(&dates, SHORT_WINDOW, reference)?,
                success_ratio_daily(&dates, LONG_WINDOW, reference)?,
            )
        }
    };

    Ok(HabitStats {
        habit_id: habit.id.clone(),
        name: habit.name.clone(),
        cadence: habit.cadence,
        current_streak,
        longest_streak,
        success_7d: round_ratio(success_7d),
        success_30d: round_ratio(success_30d),
    })
}

/// Errors from computing stats over stored habits
#[derive(thiserror::Error, Debug)]
pub enum AnalyticsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Habit '{name}': {source}")]
    Domain { name: String, source: DomainError },
}

/// Analytics engine for processing habit data
///
/// Stateless: every call reads a fresh snapshot from the store and computes
/// from scratch.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Stats for a single stored habit
    pub fn habit_stats<S: HabitStorage>(
        &self,
        storage: &S,
        habit: &Habit,
        reference: NaiveDate,
    ) -> Result<HabitStats, AnalyticsError> {
        let completions = storage.completions_up_to(&habit.id, reference)?;
        tracing::debug!(
            "Computing stats for habit {} from {} completions as of {}",
            habit.id, completions.len(), reference
        );

        compute_habit_stats(habit, &completions, reference).map_err(|source| {
            AnalyticsError::Domain { name: habit.name.clone(), source }
        })
    }

    /// Stats for every stored habit, in store order
    pub fn all_stats<S: HabitStorage>(
        &self,
        storage: &S,
        reference: NaiveDate,
    ) -> Result<Vec<HabitStats>, AnalyticsError> {
        storage
            .list_habits()?
            .iter()
            .map(|habit| self.habit_stats(storage, habit, reference))
            .collect()
    }
}
