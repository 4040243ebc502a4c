//! Domain models for the habit tracker
//!
//! Contains the habit model and the streak core without any I/O concerns.

mod id;
mod habit;
mod period;
mod clock;
mod source;
mod streak;
pub mod analytics;

pub use id::{HabitId, IdError};
pub use habit::{Habit, HabitError, Trackable};
pub use period::{period_start, periods_between, Periodicity};
pub use clock::{format_instant, parse_instant, Clock, FixedClock, InstantError, SystemClock};
pub use source::HabitSource;
pub use streak::{covered_periods, CurrentRule, ScanBound, StreakEngine, Streaks};
pub use analytics::{AnalyticsError, GroupReport, HabitGroup, HabitReport};
