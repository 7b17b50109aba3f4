/// Domain module containing core business logic and data types
/// 
/// This module defines the core entities (Habit, Completion, Streak), the
/// calendar-day policy every date in the system goes through, and the
/// validation rules for all of them.

pub mod calendar;
pub mod completion;
pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use completion::*;
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },
    
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),
    
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
