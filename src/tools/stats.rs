/// Tool for habit statistics
///
/// This module implements the habit_stats MCP tool: current and longest
/// streaks plus 7 and 30 day success ratios, for one habit or all of them.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, HabitStats};
use crate::domain::streak_message;
use crate::storage::HabitStorage;
use crate::tools::{parse_date_arg, parse_habit_id, ToolError};

/// Parameters for computing stats
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatsParams {
    /// Only this habit (defaults to every habit)
    #[serde(default)]
    pub habit_id: Option<String>,
    /// Compute as of this day (YYYY-MM-DD, defaults to today)
    #[serde(default)]
    pub reference_date: Option<String>,
}

/// Response with stats as of a reference date
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub reference_date: NaiveDate,
    pub habits: Vec<HabitStats>,
    pub message: String,
}

/// Compute stats for one habit or for all habits
pub fn get_habit_stats<S: HabitStorage>(
    storage: &S,
    params: StatsParams,
    today: NaiveDate,
) -> Result<StatsResponse, ToolError> {
    let reference = match params.reference_date.as_deref() {
        Some(s) => parse_date_arg("reference_date", s)?,
        None => today,
    };
    let engine = AnalyticsEngine::new();

    let habits = match params.habit_id.as_deref() {
        Some(id) => {
            let habit = storage.get_habit(&parse_habit_id(id)?)?;
            vec![engine.habit_stats(storage, &habit, reference)?]
        }
        None => engine.all_stats(storage, reference)?,
    };

    let message = match habits.as_slice() {
        [] => "No habits yet. Create one to start tracking!".to_string(),
        [single] => format!(
            "'{}': {}",
            single.name,
            streak_message(single.cadence, single.current_streak)
        ),
        many => {
            let active = many.iter().filter(|s| s.current_streak > 0).count();
            format!("{} of {} habits have an active streak", active, many.len())
        }
    };

    Ok(StatsResponse { reference_date: reference, habits, message })
}
