/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It exposes two
/// collaborator interfaces: the habit record store and the append-only
/// completion log.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{Completion, Habit, HabitId, Streak, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate completion: habit {habit_id} already marked done for {date}")]
    DuplicateCompletion { habit_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Store for habit records and their cached streak counters
///
/// Every lookup is scoped to the owning user; a habit owned by someone else
/// is reported as not found.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId, user_id: &UserId) -> Result<Habit, StorageError>;

    /// List a user's habits, newest first
    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError>;

    /// Delete a habit together with its completions
    fn delete_habit(&self, habit_id: &HabitId, user_id: &UserId) -> Result<(), StorageError>;

    /// Overwrite the cached counters with a recomputation
    ///
    /// The stored longest streak is never lowered. Returns the counters as
    /// persisted.
    fn update_streaks(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
        streak: &Streak,
    ) -> Result<Streak, StorageError>;
}

/// Append-only log of (habit, calendar day) completions
///
/// Implementations must reject a second completion for the same habit and
/// day with [`StorageError::DuplicateCompletion`], atomically at the storage
/// level. Upserting or check-then-insert is not acceptable.
pub trait CompletionLog {
    /// Append a completion
    fn insert_completion(&self, completion: &Completion) -> Result<(), StorageError>;

    /// Every day a habit was marked done
    fn list_completion_dates(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
    ) -> Result<BTreeSet<NaiveDate>, StorageError>;

    /// Completions of one habit, newest first
    fn list_completions(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
    ) -> Result<Vec<Completion>, StorageError>;

    /// Completions across all of a user's habits, newest first
    fn list_all_completions(&self, user_id: &UserId) -> Result<Vec<Completion>, StorageError>;
}
