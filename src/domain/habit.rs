/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a daily habit
/// a user wants to keep, along with its validation rules and the cached
/// streak counters.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{calendar, DomainError, HabitId, Streak, UserId};

/// Longest habit name we accept, in characters
pub const MAX_HABIT_NAME_LEN: usize = 100;

/// A habit represents something the user wants to do once per calendar day
///
/// The streak counters are derived values. They are only ever written from
/// a full recomputation over the habit's completion log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// The user this habit belongs to
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Consecutive completed days ending today, as of the last recomputation
    pub current_streak: u32,
    /// Best streak on record
    pub longest_streak: u32,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The name is trimmed before it is stored. Both counters start at 0.
    pub fn new(
        user_id: UserId,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(name)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name: name.trim().to_string(),
            created_at,
            current_streak: 0,
            longest_streak: 0,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        created_at: DateTime<Utc>,
        current_streak: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at,
            current_streak,
            longest_streak,
        }
    }

    /// The calendar day this habit was created on
    pub fn created_on(&self) -> NaiveDate {
        calendar::calendar_day(self.created_at)
    }

    /// The cached counters
    pub fn streak(&self) -> Streak {
        Streak {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_HABIT_NAME_LEN {
            return Err(DomainError::InvalidHabitName(
                format!("Habit name cannot be longer than {} characters", MAX_HABIT_NAME_LEN)
            ));
        }

        Ok(())
    }
}
