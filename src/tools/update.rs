/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to rename a habit or
/// change its cadence and target. Stats are always recomputed from the logs,
/// so a change applies to the whole history on the next stats request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Cadence;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New cadence ("daily" or "weekly")
    #[serde(default)]
    pub cadence: Option<String>,
    /// New required total per week
    #[serde(default)]
    pub target_per_period: Option<u32>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let cadence = params
        .cadence
        .as_deref()
        .map(str::parse::<Cadence>)
        .transpose()?;

    habit.update(params.name, cadence, params.target_per_period)?;
    storage.update_habit(&habit)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("✅ Updated habit '{}' ({})", habit.name, habit.goal_display()),
    })
}
