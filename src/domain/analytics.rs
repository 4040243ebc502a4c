//! Analytics across habits
//!
//! Pure, read-only composition over habit snapshots: filtering by cadence,
//! finding the best streak and building per-group reports.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::clock::Clock;
use super::habit::Trackable;
use super::period::Periodicity;
use super::streak::StreakEngine;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid habit group '{0}': must be 'all', 'daily' or 'weekly'")]
    InvalidGroup(String),
}

/// Habits with the given periodicity, in their original order
pub fn filter_by_periodicity<H: Trackable>(habits: &[H], periodicity: Periodicity) -> Vec<&H> {
    habits
        .iter()
        .filter(|h| h.periodicity() == periodicity)
        .collect()
}

/// Best longest streak across habits (0 when there are none)
pub fn max_longest_streak<C, H>(engine: &StreakEngine<C>, habits: &[H]) -> u32
where
    C: Clock,
    H: Trackable,
{
    habits
        .iter()
        .map(|h| engine.longest_for(h))
        .max()
        .unwrap_or(0)
}

/// Longest streak of a single habit
pub fn longest_streak_for<C, H>(engine: &StreakEngine<C>, habit: &H) -> u32
where
    C: Clock,
    H: Trackable + ?Sized,
{
    engine.longest_for(habit)
}

/// Longest streak of the first habit with the given name
pub fn longest_streak_by_name<C, H>(engine: &StreakEngine<C>, habits: &[H], name: &str) -> Option<u32>
where
    C: Clock,
    H: Trackable,
{
    habits
        .iter()
        .find(|h| h.name() == name)
        .map(|h| engine.longest_for(h))
}

/// Which habits an analysis covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitGroup {
    #[default]
    All,
    Daily,
    Weekly,
}

impl HabitGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitGroup::All => "all",
            HabitGroup::Daily => "daily",
            HabitGroup::Weekly => "weekly",
        }
    }

    /// Periodicity filter, or None for all habits
    pub fn periodicity(&self) -> Option<Periodicity> {
        match self {
            HabitGroup::All => None,
            HabitGroup::Daily => Some(Periodicity::Daily),
            HabitGroup::Weekly => Some(Periodicity::Weekly),
        }
    }

    /// Habits belonging to this group, in order
    pub fn select<'a, H: Trackable>(&self, habits: &'a [H]) -> Vec<&'a H> {
        match self.periodicity() {
            Some(p) => filter_by_periodicity(habits, p),
            None => habits.iter().collect(),
        }
    }

    /// Heading used in reports
    pub fn title(&self) -> &'static str {
        match self {
            HabitGroup::All => "All habits",
            HabitGroup::Daily => "Daily habits",
            HabitGroup::Weekly => "Weekly habits",
        }
    }
}

impl fmt::Display for HabitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HabitGroup {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(HabitGroup::All),
            "daily" => Ok(HabitGroup::Daily),
            "weekly" => Ok(HabitGroup::Weekly),
            _ => Err(AnalyticsError::InvalidGroup(s.to_string())),
        }
    }
}

impl From<Periodicity> for HabitGroup {
    fn from(p: Periodicity) -> Self {
        match p {
            Periodicity::Daily => HabitGroup::Daily,
            Periodicity::Weekly => HabitGroup::Weekly,
        }
    }
}

/// Streak figures for one habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitReport {
    pub name: String,
    pub periodicity: Periodicity,
    pub longest: u32,
    pub current: u32,
    pub last_check_off: Option<NaiveDateTime>,
}

/// Streak figures for a group of habits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub group: HabitGroup,
    pub habits: Vec<HabitReport>,
    /// Highest longest streak in the group
    pub best_longest: u32,
    /// Names of habits reaching `best_longest` (empty when it is 0)
    pub leaders: Vec<String>,
}

impl GroupReport {
    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

/// Builds a report for one habit
pub fn report_for<C, H>(engine: &StreakEngine<C>, habit: &H) -> HabitReport
where
    C: Clock,
    H: Trackable + ?Sized,
{
    let streaks = engine.streaks(habit);
    HabitReport {
        name: habit.name().to_string(),
        periodicity: habit.periodicity(),
        longest: streaks.longest,
        current: streaks.current,
        last_check_off: habit.last_check_off(),
    }
}

/// Analyzes the habits of a group
pub fn analyze<C, H>(engine: &StreakEngine<C>, habits: &[H], group: HabitGroup) -> GroupReport
where
    C: Clock,
    H: Trackable,
{
    let selected = group.select(habits);
    let best_longest = max_longest_streak(engine, &selected);

    let reports: Vec<HabitReport> = selected
        .into_iter()
        .map(|h| report_for(engine, h))
        .collect();

    let leaders = if best_longest == 0 {
        Vec::new()
    } else {
        reports
            .iter()
            .filter(|r| r.longest == best_longest)
            .map(|r| r.name.clone())
            .collect()
    };

    GroupReport {
        group,
        habits: reports,
        best_longest,
        leaders,
    }
}
