/// Streak calculation
///
/// Current streaks walk backward from a reference date; longest streaks scan
/// the whole history for runs. Daily habits qualify on any day that has a
/// completion. Weekly habits qualify in any ISO week whose summed amounts
/// reach the target.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};

use crate::domain::{check_target, start_of_week, Cadence, Completion, DomainError};

/// Summed completion amounts keyed by the Monday of each week
pub type WeekTotals = HashMap<NaiveDate, i64>;

/// Distinct dates that have at least one completion
pub fn completion_dates<'a, I>(completions: I) -> HashSet<NaiveDate>
where
    I: IntoIterator<Item = &'a Completion>,
{
    completions.into_iter().map(|c| c.date).collect()
}

/// Sum completion amounts per ISO week
///
/// Input order does not matter and records sharing a date simply add up.
/// Totals saturate at `i64::MAX`. Negative amounts are rejected.
pub fn weekly_totals<'a, I>(completions: I) -> Result<WeekTotals, DomainError>
where
    I: IntoIterator<Item = &'a Completion>,
{
    let mut totals = WeekTotals::new();
    for completion in completions {
        if completion.amount < 0 {
            return Err(DomainError::InvalidArgument(format!(
                "negative amount {} on {}",
                completion.amount, completion.date
            )));
        }
        let total = totals.entry(start_of_week(completion.date)).or_insert(0);
        *total = total.saturating_add(completion.amount);
    }
    Ok(totals)
}

/// Consecutive days with a completion, ending at `reference`
///
/// Returns 0 when `reference` itself has no completion.
pub fn current_daily_streak(dates: &HashSet<NaiveDate>, reference: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(reference);

    while let Some(d) = day.filter(|d| dates.contains(d)) {
        streak += 1;
        day = d.pred_opt();
    }

    streak
}

/// Consecutive weeks meeting `target`, ending at the week containing `reference`
///
/// The reference week only counts if it has already reached the target.
pub fn current_weekly_streak(
    completions: &[Completion],
    target: u32,
    reference: NaiveDate,
) -> Result<u32, DomainError> {
    check_target(target)?;
    let totals = weekly_totals(completions)?;
    let target = i64::from(target);

    let mut streak = 0;
    let mut week = Some(start_of_week(reference));

    while let Some(w) = week.filter(|w| totals.get(w).copied().unwrap_or(0) >= target) {
        streak += 1;
        week = w.checked_sub_signed(Duration::weeks(1));
    }

    Ok(streak)
}

/// Longest run of consecutive days anywhere in `dates`
pub fn longest_daily_streak(dates: &HashSet<NaiveDate>) -> u32 {
    longest_run(dates, Duration::days(1))
}

/// Longest run of consecutive weeks whose totals reach `target`
pub fn longest_weekly_streak(totals: &WeekTotals, target: u32) -> Result<u32, DomainError> {
    check_target(target)?;
    let target = i64::from(target);

    let successful: HashSet<NaiveDate> = totals
        .iter()
        .filter(|(_, total)| **total >= target)
        .map(|(week, _)| *week)
        .collect();

    Ok(longest_run(&successful, Duration::weeks(1)))
}

/// Longest chain of members spaced exactly `step` apart
///
/// Only run starts (members whose predecessor is absent) are walked, so each
/// member is visited once by a walk.
fn longest_run(members: &HashSet<NaiveDate>, step: Duration) -> u32 {
    let mut best = 0;

    for &start in members {
        let is_run_start = start
            .checked_sub_signed(step)
            .map_or(true, |prev| !members.contains(&prev));
        if !is_run_start {
            continue;
        }

        let mut length = 1;
        let mut next = start.checked_add_signed(step);
        while let Some(n) = next.filter(|n| members.contains(n)) {
            length += 1;
            next = n.checked_add_signed(step);
        }

        best = best.max(length);
    }

    best
}

/// A short encouragement line for the current streak
pub fn streak_message(cadence: Cadence, current_streak: u32) -> String {
    let period = cadence.period_name();
    match current_streak {
        0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        1 => format!("Great start! One {} down, keep the momentum going.", period),
        2..=6 => format!("Nice work! {} {}s in a row.", current_streak, period),
        7..=29 => format!("Excellent! {} {}s strong. You're in the groove now!", current_streak, period),
        _ => format!("Incredible! {} {}s of consistency.", current_streak, period),
    }
}
