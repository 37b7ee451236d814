/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with its validation rules.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{check_target, Cadence, HabitId, DomainError};

/// Largest accepted per-period target
pub const MAX_TARGET_PER_PERIOD: u32 = 10_000;

/// A habit represents something the user wants to do regularly
///
/// Each habit has a name, a cadence (daily or weekly) and a target per period.
/// The target only matters for weekly habits: a week succeeds once the logged
/// values in it add up to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Reading", "Running")
    pub name: String,
    /// Daily or weekly
    pub cadence: Cadence,
    /// Required sum of log values per period (weekly only)
    pub target_per_period: u32,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// `created_at` is supplied by the caller so that the domain layer never
    /// reads the clock itself.
    pub fn new(
        name: String,
        cadence: Cadence,
        target_per_period: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        Self::validate_target(target_per_period)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            cadence,
            target_per_period,
            created_at,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated. The stats engine
    /// re-checks the target before using it.
    pub fn from_existing(
        id: HabitId,
        name: String,
        cadence: Cadence,
        target_per_period: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            cadence,
            target_per_period,
            created_at,
        }
    }

    /// Update the habit's properties with validation
    ///
    /// Nothing is applied unless every provided value is valid.
    pub fn update(
        &mut self,
        name: Option<String>,
        cadence: Option<Cadence>,
        target_per_period: Option<u32>,
    ) -> Result<(), DomainError> {
        let name = match name {
            Some(ref new_name) => Some(Self::validate_name(new_name)?),
            None => None,
        };

        if let Some(target) = target_per_period {
            Self::validate_target(target)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_cadence) = cadence {
            self.cadence = new_cadence;
        }
        if let Some(new_target) = target_per_period {
            self.target_per_period = new_target;
        }

        Ok(())
    }

    /// Get a display string for the goal (e.g., "3x per week")
    pub fn goal_display(&self) -> String {
        match self.cadence {
            Cadence::Daily => "every day".to_string(),
            Cadence::Weekly => format!("{}x per week", self.target_per_period),
        }
    }

    // Validation helper methods

    /// Validate habit name and return its trimmed form
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(trimmed.to_string())
    }

    /// Validate the per-period target
    fn validate_target(target: u32) -> Result<(), DomainError> {
        check_target(target)?;
        if target > MAX_TARGET_PER_PERIOD {
            return Err(DomainError::InvalidConfiguration(format!(
                "target_per_period cannot exceed {}",
                MAX_TARGET_PER_PERIOD
            )));
        }
        Ok(())
    }
}
