//! Habit CLI - A local-first habit tracker
//!
//! Habits recur daily or weekly. Every completion is recorded as a check-off,
//! and streaks (the longest run ever and the run still alive today) are
//! derived from those check-offs on demand.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Habit, HabitId, Periodicity, StreakEngine, Streaks};
