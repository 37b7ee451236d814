/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits and their daily logs,
/// and for handing a habit's completion history to the stats engine.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::{Completion, Habit, HabitId, HabitLog, LogId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Log not found: {log_id}")]
    LogNotFound { log_id: String },

    #[error("Duplicate entry: habit {habit_id} already logged for date {date}")]
    DuplicateEntry { habit_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Sort order for log listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOrdering {
    /// Oldest first
    DateAsc,
    /// Newest first
    #[default]
    DateDesc,
}

impl LogOrdering {
    /// Parse the `date` / `-date` convention used by clients
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "date" => Some(LogOrdering::DateAsc),
            "-date" => Some(LogOrdering::DateDesc),
            _ => None,
        }
    }
}

/// Optional filters for listing logs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub habit_id: Option<HabitId>,
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,
    pub ordering: LogOrdering,
}

/// Trait defining the storage interface for habits
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit together with all of its logs
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List all habits, oldest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Create a new log; fails with `DuplicateEntry` if the day is already logged
    fn create_log(&self, log: &HabitLog) -> Result<(), StorageError>;

    /// The log for a habit on a given day, if any
    fn find_log(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Option<HabitLog>, StorageError>;

    /// Delete a single log
    fn delete_log(&self, log_id: &LogId) -> Result<(), StorageError>;

    /// List logs matching the filter
    fn list_logs(&self, filter: &LogFilter) -> Result<Vec<HabitLog>, StorageError>;

    /// Every completion for a habit dated on or before `reference`
    fn completions_up_to(
        &self,
        habit_id: &HabitId,
        reference: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError>;
}
