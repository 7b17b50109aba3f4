/// Tools for reading the completion log
///
/// This module implements the done_list and done_list_all MCP tools.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{Completion, CompletionId, HabitId, UserId};
use crate::storage::CompletionLog;
use crate::tools::{require_habit_id, ToolError};

/// Parameters for listing one habit's completions
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListDoneParams {
    /// ID of the habit whose completions to list
    pub habit_id: Option<String>,
}

/// Response from listing one habit's completions
#[derive(Debug, Serialize)]
pub struct ListDoneResponse {
    pub data: Vec<Completion>,
}

/// A completion as shown in the cross-habit listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoneSummary {
    pub id: CompletionId,
    pub habit_id: HabitId,
    pub date_done: NaiveDate,
}

/// Response from listing every completion of the user
#[derive(Debug, Serialize)]
pub struct ListAllDoneResponse {
    pub data: Vec<DoneSummary>,
}

/// List a habit's completions, newest day first
pub fn list_done<S: CompletionLog>(
    storage: &S,
    user_id: &UserId,
    params: ListDoneParams,
) -> Result<ListDoneResponse, ToolError> {
    let habit_id = require_habit_id(params.habit_id.as_deref(), "habit_id is required")?;
    let completions = storage.list_completions(&habit_id, user_id)?;

    Ok(ListDoneResponse { data: completions })
}

/// List every completion across the user's habits, newest day first
pub fn list_all_done<S: CompletionLog>(
    storage: &S,
    user_id: &UserId,
) -> Result<ListAllDoneResponse, ToolError> {
    let summaries = storage
        .list_all_completions(user_id)?
        .into_iter()
        .map(|c| DoneSummary {
            id: c.id,
            habit_id: c.habit_id,
            date_done: c.date_done,
        })
        .collect();

    Ok(ListAllDoneResponse { data: summaries })
}
