/// Log records for habit completions
///
/// A `HabitLog` is the stored record of doing a habit on a given day. The
/// stats engine only needs the `(date, amount)` part of it, which is the
/// `Completion` type.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{LogId, HabitId, DomainError};

/// Largest accepted value for a single log
pub const MAX_LOG_VALUE: i64 = 100_000;

/// A record of completing a habit on a specific day
///
/// The store keeps at most one of these per habit and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Unique identifier for this log
    pub id: LogId,
    /// Which habit this log is for
    pub habit_id: HabitId,
    /// Which day this completion was for
    pub date: NaiveDate,
    /// How much was done that day (counts toward weekly targets)
    pub value: i64,
    /// When this log was created
    pub created_at: DateTime<Utc>,
}

impl HabitLog {
    /// Create a new log with validation
    ///
    /// `today` is the caller's notion of the current date; logs for days after
    /// it are rejected.
    pub fn new(
        habit_id: HabitId,
        date: NaiveDate,
        value: i64,
        today: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if date > today {
            return Err(DomainError::InvalidDate(
                "Cannot log habits for future dates".to_string()
            ));
        }
        Self::validate_value(value)?;

        Ok(Self {
            id: LogId::new(),
            habit_id,
            date,
            value,
            created_at,
        })
    }

    /// Create a log from existing data (used when loading from database)
    pub fn from_existing(
        id: LogId,
        habit_id: HabitId,
        date: NaiveDate,
        value: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            value,
            created_at,
        }
    }

    /// The part of this log the stats engine consumes
    pub fn completion(&self) -> Completion {
        Completion::new(self.date, self.value)
    }

    fn validate_value(value: i64) -> Result<(), DomainError> {
        if value < 0 {
            return Err(DomainError::InvalidArgument(
                "Log value cannot be negative".to_string()
            ));
        }
        if value > MAX_LOG_VALUE {
            return Err(DomainError::InvalidArgument(format!(
                "Log value cannot exceed {}",
                MAX_LOG_VALUE
            )));
        }
        Ok(())
    }
}

/// A dated completion amount, as handed to the stats engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Completion {
    pub date: NaiveDate,
    pub amount: i64,
}

impl Completion {
    pub fn new(date: NaiveDate, amount: i64) -> Self {
        Self { date, amount }
    }
}

impl From<&HabitLog> for Completion {
    fn from(log: &HabitLog) -> Self {
        log.completion()
    }
}

impl From<(NaiveDate, i64)> for Completion {
    fn from((date, amount): (NaiveDate, i64)) -> Self {
        Self::new(date, amount)
    }
}
