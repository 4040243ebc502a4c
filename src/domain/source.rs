//! Read boundary between the streak core and habit storage

use chrono::NaiveDateTime;

use super::id::HabitId;
use super::period::Periodicity;

/// Narrow read-only access to stored habits
///
/// The core only ever reads through this trait; writes stay with the
/// storage implementation.
pub trait HabitSource {
    type Error;

    /// Periodicity of the habit
    fn periodicity_of(&self, id: &HabitId) -> Result<Periodicity, Self::Error>;

    /// Check-off instants of the habit, in any order
    fn check_offs_of(&self, id: &HabitId) -> Result<Vec<NaiveDateTime>, Self::Error>;
}
