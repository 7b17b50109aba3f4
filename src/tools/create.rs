/// Tool for creating new habits
/// 
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{Clock, Habit, UserId};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub data: Habit,
}

/// Create a new habit using the provided storage
pub fn create_habit<S, C>(
    storage: &S,
    user_id: &UserId,
    params: CreateHabitParams,
    clock: &C,
) -> Result<CreateHabitResponse, ToolError>
where
    S: HabitStorage,
    C: Clock + ?Sized,
{
    let name = params.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::Validation("Name is required".to_string()))?;
    
    let habit = Habit::new(user_id.clone(), name, clock.now())?;
    storage.create_habit(&habit)?;
    
    tracing::info!("Created habit '{}' ({}) for user {}", habit.name, habit.id, user_id);
    Ok(CreateHabitResponse { data: habit })
}
