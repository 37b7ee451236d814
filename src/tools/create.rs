/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Cadence, Habit};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// "daily" or "weekly" (defaults to daily)
    #[serde(default)]
    pub cadence: Option<String>,
    /// Required total per week for weekly habits (defaults to 1)
    #[serde(default)]
    pub target_per_period: Option<u32>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let cadence = match params.cadence.as_deref() {
        Some(s) => s.parse::<Cadence>()?,
        None => Cadence::Daily,
    };
    let target = params.target_per_period.unwrap_or(1);

    let habit = Habit::new(params.name, cadence, target, Utc::now())?;
    storage.create_habit(&habit)?;

    tracing::info!("Created {} habit '{}' ({})", habit.cadence, habit.name, habit.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Created habit '{}' ({})! Ready to start your streak!", habit.name, habit.goal_display()),
    })
}
