/// Calendar-day policy and time sources
/// 
/// Every "which day is it" question in the system is answered here. The
/// policy is fixed to UTC: a completion's default day, the evaluation day of
/// the streak scans and a habit's creation day are all the UTC calendar date
/// of the relevant instant.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::DomainError;

/// Wire and storage format of a calendar day
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The calendar day an instant falls on under the UTC policy
pub fn calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_calendar_day(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", raw.trim()))
    })
}

/// Source of the current instant
/// 
/// Streak results depend on the evaluation day, so the clock is passed in
/// explicitly instead of being read deep inside the calculator.
pub trait Clock: Send + Sync {
    /// Current wall-clock instant
    fn now(&self) -> DateTime<Utc>;
    
    /// Current calendar day under the UTC policy
    fn today(&self) -> NaiveDate {
        calendar_day(self.now())
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant, for deterministic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
    
    /// Clock pinned to midnight UTC of the given day
    pub fn on(day: NaiveDate) -> Self {
        Self::at(day.and_time(NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
