/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker, plus the error type they share.

pub mod create;
pub mod delete;
pub mod done;
pub mod list;
pub mod mark_done;
pub mod recompute;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use done::*;
pub use list::*;
pub use mark_done::*;
pub use recompute::*;

use thiserror::Error;

use crate::domain::{DomainError, HabitId};
use crate::storage::StorageError;

/// Message returned when a habit is marked done twice for the same day
pub const ALREADY_MARKED_MESSAGE: &str = "You already marked this habit as done today!";

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required field is missing or malformed; nothing was written
    #[error("{0}")]
    Validation(String),

    /// The habit already has a completion for that day
    #[error("You already marked this habit as done today!")]
    AlreadyMarked { habit_id: String, date: String },

    /// The habit does not exist or belongs to another user
    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: String },

    /// The storage collaborator failed
    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl ToolError {
    /// HTTP-style status for the wire response
    pub fn status(&self) -> u16 {
        match self {
            ToolError::Validation(_) => 400,
            ToolError::NotFound { .. } => 404,
            ToolError::AlreadyMarked { .. } => 409,
            ToolError::Storage(_) => 500,
        }
    }

    /// Whether the caller, rather than the system, is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

impl From<StorageError> for ToolError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::HabitNotFound { habit_id } => ToolError::NotFound { habit_id },
            StorageError::DuplicateCompletion { habit_id, date } => {
                ToolError::AlreadyMarked { habit_id, date }
            }
            other => ToolError::Storage(other),
        }
    }
}

impl From<DomainError> for ToolError {
    fn from(error: DomainError) -> Self {
        ToolError::Validation(error.to_string())
    }
}

/// Parse a required habit id argument
///
/// A missing or blank id is a validation failure reported with
/// `missing_message`; an id that is not a UUID cannot name any habit.
pub(crate) fn require_habit_id(
    raw: Option<&str>,
    missing_message: &str,
) -> Result<HabitId, ToolError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::Validation(missing_message.to_string()))?;

    HabitId::from_string(raw).map_err(|_| ToolError::NotFound {
        habit_id: raw.to_string(),
    })
}
