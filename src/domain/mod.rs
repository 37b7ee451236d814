/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitLog) and the pure
/// streak and success-ratio engine that works on their completion history.
/// Nothing in here reads the clock or touches storage: every "current" value
/// is computed relative to a reference date passed in by the caller.

pub mod types;
pub mod habit;
pub mod entry;
pub mod calendar;
pub mod streak;
pub mod ratio;

// Re-export public types for easy access
pub use types::*;
pub use habit::*;
pub use entry::*;
pub use calendar::*;
pub use streak::*;
pub use ratio::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid cadence: {0}")]
    InvalidCadence(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Reject targets that would make every period succeed
pub(crate) fn check_target(target_per_period: u32) -> Result<(), DomainError> {
    if target_per_period < 1 {
        return Err(DomainError::InvalidConfiguration(
            "target_per_period must be at least 1".to_string()
        ));
    }
    Ok(())
}

/// Reject empty or negative-length windows
pub(crate) fn check_window(days: u32) -> Result<(), DomainError> {
    if days < 1 {
        return Err(DomainError::InvalidArgument(
            "window must cover at least 1 day".to_string()
        ));
    }
    Ok(())
}
