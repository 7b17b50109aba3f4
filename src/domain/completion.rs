/// Completion records
///
/// A Completion states that a habit was done on one calendar day. Records
/// are immutable once written and only disappear when their habit is
/// deleted.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{CompletionId, DomainError, Habit, HabitId, UserId};

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this record
    pub id: CompletionId,
    /// Which habit was completed
    pub habit_id: HabitId,
    /// Owner of the habit
    pub user_id: UserId,
    /// The calendar day the habit was done on
    pub date_done: NaiveDate,
    /// When the record was written (informational only)
    pub created_at: DateTime<Utc>,
}

impl Completion {
    /// Create a new completion for `habit` on `date_done`
    ///
    /// The day must fall inside the habit's history: not before the day it
    /// was created and not after `evaluation_day`.
    pub fn new(
        habit: &Habit,
        date_done: NaiveDate,
        created_at: DateTime<Utc>,
        evaluation_day: NaiveDate,
    ) -> Result<Self, DomainError> {
        Self::validate_date_done(date_done, habit.created_on(), evaluation_day)?;

        Ok(Self {
            id: CompletionId::new(),
            habit_id: habit.id.clone(),
            user_id: habit.user_id.clone(),
            date_done,
            created_at,
        })
    }

    /// Create a completion from existing data (used when loading from database)
    pub fn from_existing(
        id: CompletionId,
        habit_id: HabitId,
        user_id: UserId,
        date_done: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            user_id,
            date_done,
            created_at,
        }
    }

    fn validate_date_done(
        date_done: NaiveDate,
        habit_created_on: NaiveDate,
        evaluation_day: NaiveDate,
    ) -> Result<(), DomainError> {
        if date_done > evaluation_day {
            return Err(DomainError::InvalidDate(
                "Cannot mark a habit as done for a future date".to_string()
            ));
        }

        if date_done < habit_created_on {
            return Err(DomainError::InvalidDate(format!(
                "Cannot mark a habit as done before it was created on {}",
                habit_created_on
            )));
        }

        Ok(())
    }
}
