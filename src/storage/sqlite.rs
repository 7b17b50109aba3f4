/// SQLite implementation of the storage interfaces
///
/// This module provides the concrete SQLite implementation for storing
/// habits and their completion log. It handles all SQL queries and data
/// conversion.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use crate::domain::{
    Completion, CompletionId, Habit, HabitId, Streak, UserId, DATE_FORMAT,
};
use crate::storage::{migrations, CompletionLog, HabitStorage, StorageError};

/// How long a writer waits for a competing connection's lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based storage implementation
///
/// This struct holds a single connection. Open one instance per thread; the
/// database file arbitrates between them.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {}", db_path.display());
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {}", e)))?;

        // Needed for the done_records cascade on habit deletion
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&mut conn)?;

        Ok(Self { conn })
    }

    fn format_timestamp(instant: &DateTime<Utc>) -> String {
        // Fixed width so text ordering matches time ordering
        instant.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn invalid_column(index: usize, what: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(index, what.to_string(), rusqlite::types::Type::Text)
    }

    fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(index)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| Self::invalid_column(index, "Invalid datetime"))
    }

    fn date_column(row: &Row<'_>, index: usize) -> rusqlite::Result<NaiveDate> {
        let raw: String = row.get(index)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map_err(|_| Self::invalid_column(index, "Invalid date"))
    }

    fn user_column(row: &Row<'_>, index: usize) -> rusqlite::Result<UserId> {
        let raw: String = row.get(index)?;
        UserId::new(raw).map_err(|_| Self::invalid_column(index, "Invalid user id"))
    }

    /// Map a `habits` row selected as (id, user_id, name, created_at,
    /// current_streak, longest_streak)
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| Self::invalid_column(0, "Invalid UUID"))?;

        Ok(Habit::from_existing(
            id,
            Self::user_column(row, 1)?,
            row.get(2)?, // name
            Self::timestamp_column(row, 3)?,
            row.get(4)?, // current_streak
            row.get(5)?, // longest_streak
        ))
    }

    /// Map a `done_records` row selected as (id, habit_id, user_id,
    /// date_done, created_at)
    fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
        let id_str: String = row.get(0)?;
        let id = CompletionId::from_string(&id_str).map_err(|_| Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id = HabitId::from_string(&habit_id_str).map_err(|_| Self::invalid_column(1, "Invalid UUID"))?;

        Ok(Completion::from_existing(
            id,
            habit_id,
            Self::user_column(row, 2)?,
            Self::date_column(row, 3)?,
            Self::timestamp_column(row, 4)?,
        ))
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (
                id, user_id, name, created_at, current_streak, longest_streak
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id.to_string(),
                habit.user_id.as_str(),
                habit.name,
                Self::format_timestamp(&habit.created_at),
                habit.current_streak,
                habit.longest_streak
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId, user_id: &UserId) -> Result<Habit, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, created_at, current_streak, longest_streak
             FROM habits WHERE id = ?1 AND user_id = ?2"
        )?;

        stmt.query_row(params![habit_id.to_string(), user_id.as_str()], Self::habit_from_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, created_at, current_streak, longest_streak
             FROM habits WHERE user_id = ?1
             ORDER BY created_at DESC"
        )?;

        let habits = stmt
            .query_map(params![user_id.as_str()], Self::habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn delete_habit(&self, habit_id: &HabitId, user_id: &UserId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![habit_id.to_string(), user_id.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn update_streaks(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
        streak: &Streak,
    ) -> Result<Streak, StorageError> {
        // MAX() here guards the best streak against a concurrent writer that
        // read older counters than ours.
        let persisted = self.conn.query_row(
            "UPDATE habits SET
                current_streak = ?3,
                longest_streak = MAX(longest_streak, ?4)
             WHERE id = ?1 AND user_id = ?2
             RETURNING current_streak, longest_streak",
            params![
                habit_id.to_string(),
                user_id.as_str(),
                streak.current_streak,
                streak.longest_streak
            ],
            |row| {
                Ok(Streak {
                    current_streak: row.get(0)?,
                    longest_streak: row.get(1)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })?;

        tracing::debug!(
            "Updated streaks for habit {}: current {}, longest {}",
            habit_id, persisted.current_streak, persisted.longest_streak
        );
        Ok(persisted)
    }
}

impl CompletionLog for SqliteStorage {
    fn insert_completion(&self, completion: &Completion) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO done_records (
                id, habit_id, user_id, date_done, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                completion.id.to_string(),
                completion.habit_id.to_string(),
                completion.user_id.as_str(),
                completion.date_done.format(DATE_FORMAT).to_string(),
                Self::format_timestamp(&completion.created_at)
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Recorded completion {} for habit {} on {}",
                    completion.id, completion.habit_id, completion.date_done
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StorageError::DuplicateCompletion {
                    habit_id: completion.habit_id.to_string(),
                    date: completion.date_done.format(DATE_FORMAT).to_string(),
                })
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(StorageError::HabitNotFound {
                    habit_id: completion.habit_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn list_completion_dates(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
    ) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date_done FROM done_records WHERE habit_id = ?1 AND user_id = ?2"
        )?;

        let dates = stmt
            .query_map(params![habit_id.to_string(), user_id.as_str()], |row| {
                Self::date_column(row, 0)
            })?
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(dates)
    }

    fn list_completions(
        &self,
        habit_id: &HabitId,
        user_id: &UserId,
    ) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, user_id, date_done, created_at
             FROM done_records WHERE habit_id = ?1 AND user_id = ?2
             ORDER BY date_done DESC, created_at DESC"
        )?;

        let completions = stmt
            .query_map(params![habit_id.to_string(), user_id.as_str()], Self::completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(completions)
    }

    fn list_all_completions(&self, user_id: &UserId) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, user_id, date_done, created_at
             FROM done_records WHERE user_id = ?1
             ORDER BY date_done DESC, created_at DESC"
        )?;

        let completions = stmt
            .query_map(params![user_id.as_str()], Self::completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(completions)
    }
}
