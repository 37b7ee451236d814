/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Each tool is a plain function over a
/// `HabitStorage`; anything that depends on "today" takes it as a parameter.

pub mod create;
pub mod update;
pub mod delete;
pub mod log;
pub mod list;
pub mod stats;

// Re-export tool functions for easy access
pub use create::*;
pub use update::*;
pub use delete::*;
pub use log::*;
pub use list::*;
pub use stats::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::domain::{DomainError, HabitId, LogId};
use crate::storage::StorageError;

/// Errors returned by tool functions
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Parse a habit ID argument
pub(crate) fn parse_habit_id(value: &str) -> Result<HabitId, ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidParams("habit_id cannot be empty".to_string()));
    }
    HabitId::from_string(value)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", value)))
}

/// Parse a log ID argument
pub(crate) fn parse_log_id(value: &str) -> Result<LogId, ToolError> {
    LogId::from_string(value)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid log ID format: '{}'", value)))
}

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date_arg(field: &str, value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ToolError::InvalidParams(format!("{} must be a date in YYYY-MM-DD format, got '{}'", field, value))
    })
}
