/// Success ratios over trailing windows
///
/// Both ratios are fractions in `[0, 1]` computed over the `days` calendar
/// days ending at the reference date.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::domain::{
    check_target, check_window, last_n_days, start_of_week, weekly_totals, Completion,
    DomainError,
};

/// Windows shorter than this are judged on the reference week alone
pub const SHORT_WINDOW_DAYS: u32 = 14;

/// Fraction of the last `days` days that have a completion
pub fn success_ratio_daily(
    dates: &HashSet<NaiveDate>,
    days: u32,
    reference: NaiveDate,
) -> Result<f64, DomainError> {
    let window = last_n_days(days, reference)?;
    let hits = window.iter().filter(|d| dates.contains(d)).count();
    Ok(hits as f64 / f64::from(days))
}

/// Fraction of weeks in the window whose totals reach `target`
///
/// Only completions inside the window count toward a week, so the oldest
/// week is usually judged on a partial total. Windows shorter than
/// [`SHORT_WINDOW_DAYS`] score the reference week alone as 1.0 or 0.0.
pub fn success_ratio_weekly(
    completions: &[Completion],
    target: u32,
    days: u32,
    reference: NaiveDate,
) -> Result<f64, DomainError> {
    check_target(target)?;
    check_window(days)?;

    let window = last_n_days(days, reference)?;
    let totals = weekly_totals(completions.iter().filter(|c| window.contains(c.date)))?;
    let target = i64::from(target);

    let weeks: Vec<NaiveDate> = if days < SHORT_WINDOW_DAYS {
        vec![start_of_week(reference)]
    } else {
        let last = start_of_week(reference);
        let mut weeks = Vec::new();
        let mut week = Some(start_of_week(window.start()));
        while let Some(w) = week.filter(|w| *w <= last) {
            weeks.push(w);
            week = w.checked_add_signed(Duration::weeks(1));
        }
        weeks
    };

    if weeks.is_empty() {
        return Ok(0.0);
    }

    let achieved = weeks
        .iter()
        .filter(|w| totals.get(w).copied().unwrap_or(0) >= target)
        .count();

    Ok(achieved as f64 / weeks.len() as f64)
}
