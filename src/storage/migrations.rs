/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
///
/// The version check and every migration run under one IMMEDIATE
/// transaction, so connections opening the same file concurrently migrate
/// it exactly once.
pub fn initialize_database(conn: &mut Connection) -> Result<(), StorageError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // Create version tracking table first
    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(&tx)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "Database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(&tx, current_version)?;
        set_version(&tx, CURRENT_VERSION)?;
    }

    tx.commit()?;
    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .optional()?
        .unwrap_or(0); // No version row yet means a fresh database

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: habits and their completion log
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            current_streak INTEGER NOT NULL DEFAULT 0 CHECK (current_streak >= 0),
            longest_streak INTEGER NOT NULL DEFAULT 0 CHECK (longest_streak >= 0)
        )",
        [],
    )?;

    // The (habit_id, date_done) uniqueness is what makes marking a habit
    // done idempotent under concurrent callers.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS done_records (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            date_done TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (habit_id, date_done),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created habits and done_records tables");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Listing a user's habits, newest first
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_user_created
         ON habits (user_id, created_at)",
        [],
    )?;

    // Listing all of a user's completions by day
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_done_records_user_date
         ON done_records (user_id, date_done)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
