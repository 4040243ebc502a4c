//! Periodicity and period mapping
//!
//! A period is the canonical start date of the bucket an instant falls into:
//! the calendar date for daily habits, the ISO Monday for weekly ones.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::habit::HabitError;

/// How often a habit is expected to recur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
}

impl Periodicity {
    /// All supported periodicities, in display order
    pub const ALL: [Periodicity; 2] = [Periodicity::Daily, Periodicity::Weekly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
        }
    }

    /// Number of days between two consecutive periods
    pub fn step_days(&self) -> u64 {
        match self {
            Periodicity::Daily => 1,
            Periodicity::Weekly => 7,
        }
    }

    /// Returns the period following `period`
    pub fn next(&self, period: NaiveDate) -> Option<NaiveDate> {
        period.checked_add_days(Days::new(self.step_days()))
    }

    /// Returns the period preceding `period`
    pub fn previous(&self, period: NaiveDate) -> Option<NaiveDate> {
        period.checked_sub_days(Days::new(self.step_days()))
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            _ => Err(HabitError::InvalidPeriodicity(s.to_string())),
        }
    }
}

/// Maps an instant to the start of the period containing it
///
/// Weekly periods start on Monday.
pub fn period_start(instant: NaiveDateTime, periodicity: Periodicity) -> NaiveDate {
    let date = instant.date();
    match periodicity {
        Periodicity::Daily => date,
        Periodicity::Weekly => {
            let offset = u64::from(date.weekday().num_days_from_monday());
            // Subtracting at most six days only fails at the very start of the calendar
            date.checked_sub_days(Days::new(offset)).unwrap_or(date)
        }
    }
}

/// Iterates period keys from `first` through `last` inclusive
///
/// Yields nothing when `first` is after `last`.
pub fn periods_between(
    first: NaiveDate,
    last: NaiveDate,
    periodicity: Periodicity,
) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(first), move |p| periodicity.next(*p))
        .take_while(move |p| *p <= last)
}
