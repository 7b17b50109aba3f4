/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deleting a habit also
/// removes its whole completion log.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::UserId;
use crate::storage::HabitStorage;
use crate::tools::{require_habit_id, ToolError};

/// Parameters for deleting a habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub id: Option<String>,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub message: String,
}

/// Delete one of the user's habits
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    user_id: &UserId,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = require_habit_id(params.id.as_deref(), "Habit ID is required")?;
    storage.delete_habit(&habit_id, user_id)?;

    tracing::info!("Deleted habit {} for user {}", habit_id, user_id);
    Ok(DeleteHabitResponse {
        message: "Habit deleted successfully".to_string(),
    })
}
