/// Tools for listing habits and their logs
///
/// This module implements the habit_list and habit_logs MCP tools.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsEngine;
use crate::storage::{HabitStorage, LogFilter, LogOrdering};
use crate::tools::{parse_date_arg, parse_habit_id, ToolError};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Sort order: "name", "streak", "success" or "created_at" (default)
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub cadence: String,
    pub target_per_period: u32,
    pub goal: String,
    pub current_streak: u32,
    pub success_30d: f64,
}

/// Summary statistics for all habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: u32,
    pub avg_success_30d: f64,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: HabitListSummary,
}

/// List habits with their current streak as of `today`
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    today: NaiveDate,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = storage.list_habits()?;
    let engine = AnalyticsEngine::new();

    let mut summaries = Vec::with_capacity(habits.len());
    for habit in &habits {
        let stats = engine.habit_stats(storage, habit, today)?;
        summaries.push(HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            cadence: habit.cadence.to_string(),
            target_per_period: habit.target_per_period,
            goal: habit.goal_display(),
            current_streak: stats.current_streak,
            success_30d: stats.success_30d,
        });
    }

    match params.sort_by.as_deref() {
        Some("name") => summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        Some("streak") => summaries.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        Some("success") => summaries.sort_by(|a, b| b.success_30d.total_cmp(&a.success_30d)),
        Some("created_at") | None => {}
        Some(other) => {
            return Err(ToolError::InvalidParams(format!(
                "sort_by must be one of name, streak, success, created_at; got '{}'",
                other
            )))
        }
    }

    let total_habits = summaries.len() as u32;
    let avg_success_30d = if summaries.is_empty() {
        0.0
    } else {
        crate::analytics::round_ratio(
            summaries.iter().map(|s| s.success_30d).sum::<f64>() / summaries.len() as f64,
        )
    };

    Ok(ListHabitsResponse {
        habits: summaries,
        summary: HabitListSummary { total_habits, avg_success_30d },
    })
}

/// Parameters for listing logs
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListLogsParams {
    /// Only logs for this habit
    #[serde(default)]
    pub habit_id: Option<String>,
    /// Earliest day to include (YYYY-MM-DD)
    #[serde(default)]
    pub date_from: Option<String>,
    /// Latest day to include (YYYY-MM-DD)
    #[serde(default)]
    pub date_to: Option<String>,
    /// "date" for oldest first, "-date" for newest first (default)
    #[serde(default)]
    pub ordering: Option<String>,
}

/// One log in a listing
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub log_id: String,
    pub habit_id: String,
    pub date: NaiveDate,
    pub value: i64,
}

/// Response from listing logs
#[derive(Debug, Serialize)]
pub struct ListLogsResponse {
    pub logs: Vec<LogEntry>,
    pub count: usize,
}

/// List logs matching the given filters
pub fn list_logs<S: HabitStorage>(
    storage: &S,
    params: ListLogsParams,
) -> Result<ListLogsResponse, ToolError> {
    let habit_id = params.habit_id.as_deref().map(parse_habit_id).transpose()?;
    let date_from = params
        .date_from
        .as_deref()
        .map(|s| parse_date_arg("date_from", s))
        .transpose()?;
    let date_to = params
        .date_to
        .as_deref()
        .map(|s| parse_date_arg("date_to", s))
        .transpose()?;

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            return Err(ToolError::InvalidParams(format!(
                "date_from {} is after date_to {}",
                from, to
            )));
        }
    }

    let ordering = match params.ordering.as_deref() {
        Some(s) => LogOrdering::parse(s).ok_or_else(|| {
            ToolError::InvalidParams(format!("ordering must be 'date' or '-date', got '{}'", s))
        })?,
        None => LogOrdering::default(),
    };

    let filter = LogFilter { habit_id, date_from, date_to, ordering };
    let logs: Vec<LogEntry> = storage
        .list_logs(&filter)?
        .into_iter()
        .map(|log| LogEntry {
            log_id: log.id.to_string(),
            habit_id: log.habit_id.to_string(),
            date: log.date,
            value: log.value,
        })
        .collect();

    Ok(ListLogsResponse { count: logs.len(), logs })
}
