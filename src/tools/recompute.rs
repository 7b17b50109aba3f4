/// Tool for rederiving a habit's streak counters
///
/// This module implements the habit_recompute MCP tool. It also holds the
/// read-log, compute, write-counters step that marking a habit done reuses.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Clock, Habit, HabitId, Streak, UserId};
use crate::storage::{CompletionLog, HabitStorage};
use crate::tools::{require_habit_id, ToolError};

/// Parameters for recomputing a habit's streaks
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecomputeParams {
    /// ID of the habit to recompute
    pub habit_id: Option<String>,
}

/// Response from recomputing a habit's streaks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecomputeResponse {
    pub habit_id: HabitId,
    pub habit_name: String,
    pub updated_streaks: Streak,
}

/// Recompute a habit's counters from its completion log
///
/// Useful after a day rolls over (an unmarked today ends the current
/// streak) or after a mark-done whose counter write failed.
pub fn recompute_streaks<S, C>(
    storage: &S,
    user_id: &UserId,
    params: RecomputeParams,
    clock: &C,
) -> Result<RecomputeResponse, ToolError>
where
    S: HabitStorage + CompletionLog,
    C: Clock + ?Sized,
{
    let habit_id = require_habit_id(params.habit_id.as_deref(), "Habit ID is required")?;
    let habit = storage.get_habit(&habit_id, user_id)?;

    let updated_streaks = rederive_streaks(storage, &habit, clock.today())?;
    tracing::info!(
        "Recomputed streaks for habit {}: current {}, longest {}",
        habit.id, updated_streaks.current_streak, updated_streaks.longest_streak
    );

    Ok(RecomputeResponse {
        habit_id: habit.id,
        habit_name: habit.name,
        updated_streaks,
    })
}

/// Read the full log, run the calculator and persist the counters
///
/// Counters are always rebuilt from scratch, never incremented, so running
/// this again with the same log and day converges on the same values.
pub(crate) fn rederive_streaks<S>(
    storage: &S,
    habit: &Habit,
    evaluation_day: NaiveDate,
) -> Result<Streak, ToolError>
where
    S: HabitStorage + CompletionLog,
{
    let completion_dates = storage.list_completion_dates(&habit.id, &habit.user_id)?;
    let computed = Streak::calculate(completion_dates, habit.created_on(), evaluation_day);

    let merged = computed.with_stored_best(habit.longest_streak);

    Ok(storage.update_streaks(&habit.id, &habit.user_id, &merged)?)
}
