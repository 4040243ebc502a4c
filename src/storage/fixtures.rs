//! Sample habits for demos and testing
//!
//! A fixture describes a habit and the days it was completed, as offsets
//! from a start date four weeks before now. Check-offs land at midday.
//!
//! Fixture files are YAML:
//!
//! ```yaml
//! - name: Read Book
//!   description: Read 20 pages
//!   periodicity: daily
//!   days: [1, 2, 3]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;

use super::HabitDb;
use crate::domain::{Habit, Periodicity};

/// Length of the fixture window in days
pub const FIXTURE_WINDOW_DAYS: u32 = 28;

#[derive(Debug, Error, PartialEq)]
pub enum FixtureError {
    #[error("Fixture '{name}' has day offset {day}, beyond the {max}-day window")]
    DayOutOfRange { name: String, day: u32, max: u32 },
}

/// One sample habit with its completion days
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixtureHabit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub periodicity: Periodicity,
    pub days: Vec<u32>,
}

impl FixtureHabit {
    fn new(name: &str, description: &str, periodicity: Periodicity, days: Vec<u32>) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            periodicity,
            days,
        }
    }

    /// Builds the habit, placing check-offs relative to `now`
    pub fn to_habit(&self, now: NaiveDateTime) -> Result<Habit> {
        if let Some(&day) = self.days.iter().find(|d| **d > FIXTURE_WINDOW_DAYS) {
            return Err(FixtureError::DayOutOfRange {
                name: self.name.clone(),
                day,
                max: FIXTURE_WINDOW_DAYS,
            }
            .into());
        }

        let start = (now - Duration::days(i64::from(FIXTURE_WINDOW_DAYS))).date();
        let midday = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        let created_at = start.and_time(NaiveTime::default());

        let check_offs = self
            .days
            .iter()
            .map(|day| (start + Duration::days(i64::from(*day))).and_time(midday));

        let habit = Habit::new(self.name.as_str(), self.periodicity, created_at)
            .with_context(|| format!("Invalid fixture habit '{}'", self.name))?
            .with_description(self.description.clone())
            .with_check_offs(check_offs);

        Ok(habit)
    }
}

/// Built-in sample set: three daily and two weekly habits over four weeks
pub fn builtin() -> Vec<FixtureHabit> {
    vec![
        FixtureHabit::new(
            "Drink Water",
            "Drink 2L per day",
            Periodicity::Daily,
            vec![1, 2, 3, 5, 6, 7, 9, 10, 12, 13, 14, 16, 17, 18, 20, 21, 23, 24, 25, 27, 28],
        ),
        FixtureHabit::new("Read Book", "Read 20 pages", Periodicity::Daily, (1..=28).collect()),
        FixtureHabit::new(
            "Exercise",
            "60 min workout",
            Periodicity::Daily,
            vec![1, 4, 7, 10, 13, 16, 19, 22, 25, 28],
        ),
        FixtureHabit::new(
            "Grocery Shopping",
            "Buy weekly groceries",
            Periodicity::Weekly,
            vec![7, 14, 21, 28],
        ),
        FixtureHabit::new("Clean House", "Deep clean", Periodicity::Weekly, vec![7, 14, 28]),
    ]
}

/// Reads fixtures from a YAML file
pub fn load_file(path: &Path) -> Result<Vec<FixtureHabit>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse fixture file: {}", path.display()))
}

/// Stores the fixtures as new habits, returning the ones inserted
///
/// A fixture whose habit is already stored (same name seeded the same day)
/// is skipped, so seeding twice in one day is a no-op.
pub fn seed(db: &mut HabitDb, fixtures: &[FixtureHabit], now: NaiveDateTime) -> Result<Vec<Habit>> {
    let habits = fixtures
        .iter()
        .map(|f| f.to_habit(now))
        .collect::<Result<Vec<_>>>()?;

    let mut inserted = Vec::new();
    for habit in habits {
        if db.contains(&habit.id)? {
            continue;
        }
        db.insert_habit(&habit)?;
        inserted.push(habit);
    }

    Ok(inserted)
}
