/// Tools for logging habit completions
///
/// This module implements the habit_log, habit_toggle and habit_unlog MCP
/// tools. A habit can be logged at most once per day; the response carries
/// the current streak recomputed from the stored history.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEngine;
use crate::domain::{streak_message, Habit, HabitLog};
use crate::storage::HabitStorage;
use crate::tools::{parse_date_arg, parse_habit_id, parse_log_id, ToolError};

/// Parameters for logging a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogHabitParams {
    /// ID of the habit to log
    pub habit_id: String,
    /// Day completed (YYYY-MM-DD, defaults to today)
    #[serde(default)]
    pub date: Option<String>,
    /// Amount done that day (defaults to 1, counts toward weekly targets)
    #[serde(default)]
    pub value: Option<i64>,
}

/// Response from logging a habit
#[derive(Debug, Serialize)]
pub struct LogHabitResponse {
    pub success: bool,
    pub log_id: String,
    pub message: String,
    pub current_streak: u32,
}

/// Parameters for toggling today's log
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleTodayParams {
    /// ID of the habit to toggle
    pub habit_id: String,
}

/// Response from toggling today's log
#[derive(Debug, Serialize)]
pub struct ToggleTodayResponse {
    /// True when today is now logged, false when the log was removed
    pub logged: bool,
    pub message: String,
    pub current_streak: u32,
}

/// Parameters for removing a single log
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UnlogParams {
    /// ID of the log to remove
    pub log_id: String,
}

/// Response from removing a log
#[derive(Debug, Serialize)]
pub struct UnlogResponse {
    pub success: bool,
    pub message: String,
}

/// Current streak for a habit as of `today`
fn current_streak<S: HabitStorage>(
    storage: &S,
    habit: &Habit,
    today: NaiveDate,
) -> Result<u32, ToolError> {
    let stats = AnalyticsEngine::new().habit_stats(storage, habit, today)?;
    Ok(stats.current_streak)
}

fn streak_suffix(habit: &Habit, streak: u32) -> String {
    let period = habit.cadence.period_name();
    format!(
        "Current streak: {} {}{}. {}",
        streak,
        period,
        if streak == 1 { "" } else { "s" },
        streak_message(habit.cadence, streak)
    )
}

/// Log a habit completion using the provided storage
pub fn log_habit<S: HabitStorage>(
    storage: &S,
    params: LogHabitParams,
    today: NaiveDate,
) -> Result<LogHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let date = match params.date.as_deref() {
        Some(s) => parse_date_arg("date", s)?,
        None => today,
    };

    let log = HabitLog::new(habit.id.clone(), date, params.value.unwrap_or(1), today, Utc::now())?;
    storage.create_log(&log)?;

    let streak = current_streak(storage, &habit, today)?;

    Ok(LogHabitResponse {
        success: true,
        log_id: log.id.to_string(),
        message: format!("🔥 Logged '{}' for {}! {}", habit.name, date, streak_suffix(&habit, streak)),
        current_streak: streak,
    })
}

/// Create today's log if it is missing, otherwise remove it
pub fn toggle_today<S: HabitStorage>(
    storage: &S,
    params: ToggleTodayParams,
    today: NaiveDate,
) -> Result<ToggleTodayResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let logged = match storage.find_log(&habit.id, today)? {
        Some(existing) => {
            storage.delete_log(&existing.id)?;
            false
        }
        None => {
            let log = HabitLog::new(habit.id.clone(), today, 1, today, Utc::now())?;
            storage.create_log(&log)?;
            true
        }
    };

    let streak = current_streak(storage, &habit, today)?;
    let action = if logged { "✅ Marked" } else { "↩️ Unmarked" };

    Ok(ToggleTodayResponse {
        logged,
        message: format!("{} '{}' for today. {}", action, habit.name, streak_suffix(&habit, streak)),
        current_streak: streak,
    })
}

/// Remove a single log
pub fn unlog<S: HabitStorage>(
    storage: &S,
    params: UnlogParams,
) -> Result<UnlogResponse, ToolError> {
    let log_id = parse_log_id(&params.log_id)?;
    storage.delete_log(&log_id)?;

    Ok(UnlogResponse {
        success: true,
        message: format!("Removed log {}", log_id),
    })
}
