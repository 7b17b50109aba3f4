/// Tool for listing all habits
/// 
/// This module implements the habit_list MCP tool.

use serde::Serialize;
use crate::domain::{Habit, UserId};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub data: Vec<Habit>,
}

/// List the user's habits, newest first, with their cached counters
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    user_id: &UserId,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = storage.list_habits(user_id)?;
    tracing::debug!("Listed {} habits for user {}", habits.len(), user_id);
    
    Ok(ListHabitsResponse { data: habits })
}
