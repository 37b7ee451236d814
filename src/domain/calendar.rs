/// Calendar helpers shared by the streak and ratio calculations
///
/// Weeks follow the ISO convention: Monday through Sunday, identified by
/// their Monday.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{check_window, DomainError};

/// The Monday on or before `date`
///
/// Dates in the first partial week of the calendar's range clamp to
/// `NaiveDate::MIN`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date.checked_sub_signed(Duration::days(offset))
        .unwrap_or(NaiveDate::MIN)
}

/// The `n` calendar days ending at (and including) `reference`, oldest first
///
/// Fails with `InvalidArgument` when `n` is zero or the window would start
/// before the earliest representable date.
pub fn last_n_days(n: u32, reference: NaiveDate) -> Result<DayWindow, DomainError> {
    check_window(n)?;
    let start = reference
        .checked_sub_signed(Duration::days(i64::from(n) - 1))
        .ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "a {}-day window ending {} is out of the calendar's range",
                n, reference
            ))
        })?;
    Ok(DayWindow { start, end: reference, len: n })
}

/// A run of consecutive calendar days
///
/// Iterating does not consume the window, so it can be walked any number of
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: NaiveDate,
    end: NaiveDate,
    len: u32,
}

impl DayWindow {
    /// First (oldest) day in the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last (most recent) day in the window
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter(&self) -> DayWindowIter {
        DayWindowIter {
            next: self.start,
            remaining: self.len,
        }
    }
}

impl IntoIterator for DayWindow {
    type Item = NaiveDate;
    type IntoIter = DayWindowIter;

    fn into_iter(self) -> DayWindowIter {
        self.iter()
    }
}

impl IntoIterator for &DayWindow {
    type Item = NaiveDate;
    type IntoIter = DayWindowIter;

    fn into_iter(self) -> DayWindowIter {
        self.iter()
    }
}

/// Iterator over the days of a [`DayWindow`]
#[derive(Debug, Clone)]
pub struct DayWindowIter {
    next: NaiveDate,
    remaining: u32,
}

impl Iterator for DayWindowIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = current.succ_opt()?;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for DayWindowIter {}
