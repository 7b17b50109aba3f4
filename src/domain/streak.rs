/// Streak calculation
///
/// This module derives a habit's current and longest streak from its
/// completion days. The calculation is a pure function of the completion
/// set, the habit's creation day and the evaluation day, so recomputing it
/// with the same inputs always yields the same counters.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How far back the current-streak walk may go
///
/// Any real gap stops the walk long before this; the bound only caps the
/// work done for pathological inputs.
pub const CURRENT_STREAK_LOOKBACK_DAYS: u32 = 365;

/// Derived streak counters for a habit
///
/// These are cached on the habit record, but the completion log stays the
/// source of truth and the counters are always rederived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed days ending at the evaluation day
    pub current_streak: u32,
    /// Longest run of consecutive completed days in the habit's history
    pub longest_streak: u32,
}

impl Streak {
    /// Counters of a habit that has never been completed
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate both counters from a habit's completion days
    ///
    /// `completion_dates` may be unordered and may repeat days; it is
    /// treated as a set. Days before `habit_created_on` are outside the
    /// habit's history and never count, which keeps
    /// `longest_streak >= current_streak` for every input.
    pub fn calculate<I>(
        completion_dates: I,
        habit_created_on: NaiveDate,
        evaluation_day: NaiveDate,
    ) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let done: BTreeSet<NaiveDate> = completion_dates.into_iter().collect();

        Self {
            current_streak: Self::calculate_current_streak(&done, habit_created_on, evaluation_day),
            longest_streak: Self::calculate_longest_streak(&done, habit_created_on, evaluation_day),
        }
    }

    /// Keep the best streak already on record
    ///
    /// A stored longest streak is never lowered by a recomputation, even if
    /// an earlier write raced ahead of this one.
    pub fn with_stored_best(self, stored_longest: u32) -> Self {
        Self {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak.max(stored_longest),
        }
    }

    /// Walk backward from the evaluation day counting completed days
    ///
    /// An unmarked evaluation day means there is no ongoing streak.
    fn calculate_current_streak(
        done: &BTreeSet<NaiveDate>,
        habit_created_on: NaiveDate,
        evaluation_day: NaiveDate,
    ) -> u32 {
        let mut current_streak = 0;
        let mut checking_date = evaluation_day;

        for _ in 0..CURRENT_STREAK_LOOKBACK_DAYS {
            if checking_date < habit_created_on || !done.contains(&checking_date) {
                break;
            }
            current_streak += 1;

            match checking_date.pred_opt() {
                Some(previous) => checking_date = previous,
                None => break,
            }
        }

        current_streak
    }

    /// Scan every day from creation through the evaluation day
    fn calculate_longest_streak(
        done: &BTreeSet<NaiveDate>,
        habit_created_on: NaiveDate,
        evaluation_day: NaiveDate,
    ) -> u32 {
        let mut longest_streak = 0;
        let mut running = 0;

        for day in habit_created_on
            .iter_days()
            .take_while(|day| *day <= evaluation_day)
        {
            if done.contains(&day) {
                running += 1;
                longest_streak = longest_streak.max(running);
            } else {
                running = 0;
            }
        }

        longest_streak
    }
}
