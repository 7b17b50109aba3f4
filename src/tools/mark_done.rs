/// Tool for marking a habit done on a calendar day
///
/// This module implements the habit_mark_done MCP tool: record the
/// completion, rederive both streak counters from the full log and persist
/// them on the habit.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::domain::{calendar, Clock, Completion, CompletionId, HabitId, Streak, UserId};
use crate::storage::{CompletionLog, HabitStorage};
use crate::tools::{recompute::rederive_streaks, require_habit_id, ToolError};

/// Parameters for marking a habit done
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct MarkDoneParams {
    /// ID of the habit to mark done
    pub habit_id: Option<String>,
    /// Day the habit was done (YYYY-MM-DD, optional - defaults to today)
    pub date_done: Option<String>,
}

/// Response from marking a habit done
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkDoneResponse {
    pub id: CompletionId,
    pub habit_id: HabitId,
    pub date_done: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub habit_name: String,
    pub updated_streaks: Streak,
}

/// Mark a habit done and refresh its streak counters
///
/// The completion insert is the idempotency guard: a second call for the
/// same habit and day fails with [`ToolError::AlreadyMarked`] before any
/// counter is touched. If the insert succeeds but the counter update fails,
/// the log is ahead of the counters until the next mark-done or recompute.
pub fn mark_done<S, C>(
    storage: &S,
    user_id: &UserId,
    params: MarkDoneParams,
    clock: &C,
) -> Result<MarkDoneResponse, ToolError>
where
    S: HabitStorage + CompletionLog,
    C: Clock + ?Sized,
{
    let habit_id = require_habit_id(params.habit_id.as_deref(), "Habit ID is required")?;

    let evaluation_day = clock.today();
    let date_done = match params.date_done.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => calendar::parse_calendar_day(raw)?,
        None => evaluation_day,
    };

    let habit = storage.get_habit(&habit_id, user_id)?;
    let completion = Completion::new(&habit, date_done, clock.now(), evaluation_day)?;

    storage.insert_completion(&completion).map_err(|e| {
        let e = ToolError::from(e);
        if matches!(e, ToolError::AlreadyMarked { .. }) {
            debug!("Habit {} already marked done for {}", habit.id, date_done);
        }
        e
    })?;

    let updated_streaks = rederive_streaks(storage, &habit, evaluation_day).map_err(|e| {
        error!(
            "Completion {} recorded but streaks for habit {} were not updated: {}",
            completion.id, habit.id, e
        );
        e
    })?;

    info!(
        "Marked habit {} done for {}: current streak {}, longest {}",
        habit.id, date_done, updated_streaks.current_streak, updated_streaks.longest_streak
    );

    Ok(MarkDoneResponse {
        id: completion.id,
        habit_id: completion.habit_id,
        date_done: completion.date_done,
        created_at: completion.created_at,
        habit_name: habit.name,
        updated_streaks,
    })
}
