//! Habit domain model
//!
//! A habit is a named recurring activity with a fixed periodicity and a
//! history of check-offs (completion instants).

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::id::HabitId;
use super::period::Periodicity;

#[derive(Debug, Error, PartialEq)]
pub enum HabitError {
    #[error("Invalid periodicity '{0}': must be 'daily' or 'weekly'")]
    InvalidPeriodicity(String),

    #[error("Habit name cannot be empty")]
    EmptyName,
}

/// Read-only view of anything the streak engine and analytics can work on
pub trait Trackable {
    /// Human-readable name
    fn name(&self) -> &str;

    /// Cadence the habit recurs at
    fn periodicity(&self) -> Periodicity;

    /// Completion instants, in any order
    fn check_offs(&self) -> &[NaiveDateTime];

    /// Most recent completion, if any
    fn last_check_off(&self) -> Option<NaiveDateTime> {
        self.check_offs().iter().max().copied()
    }
}

impl<T: Trackable + ?Sized> Trackable for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn periodicity(&self) -> Periodicity {
        (**self).periodicity()
    }

    fn check_offs(&self) -> &[NaiveDateTime] {
        (**self).check_offs()
    }

    fn last_check_off(&self) -> Option<NaiveDateTime> {
        (**self).last_check_off()
    }
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Habit {
    /// Unique identifier
    pub id: HabitId,

    /// Human-readable name
    pub name: String,

    /// What completing the habit means
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fixed at creation
    periodicity: Periodicity,

    /// When the habit was created
    pub created_at: NaiveDateTime,

    /// Sorted completion instants
    #[serde(skip_serializing_if = "Vec::is_empty")]
    check_offs: Vec<NaiveDateTime>,
}

impl Habit {
    /// Creates a new habit, deriving its ID from name and creation time
    pub fn new(
        name: impl Into<String>,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Result<Self, HabitError> {
        let name = name.into();
        let id = HabitId::new(&name, created_at);
        Self::with_id(id, name, periodicity, created_at)
    }

    /// Creates a habit from an existing ID (used when loading from storage)
    pub fn with_id(
        id: HabitId,
        name: impl Into<String>,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Result<Self, HabitError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(HabitError::EmptyName);
        }

        Ok(Self {
            id,
            name,
            description: None,
            periodicity,
            created_at,
            check_offs: Vec::new(),
        })
    }

    /// Creates a habit from a raw periodicity string
    pub fn parse(
        name: impl Into<String>,
        periodicity: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, HabitError> {
        Self::new(name, periodicity.parse()?, created_at)
    }

    /// Sets the description, treating blank text as none
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    /// Replaces the check-off history
    pub fn with_check_offs(mut self, check_offs: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        self.check_offs = check_offs.into_iter().collect();
        self.check_offs.sort();
        self
    }

    /// Records a completion, keeping history sorted
    pub fn add_check_off(&mut self, instant: NaiveDateTime) {
        let pos = self.check_offs.partition_point(|t| *t <= instant);
        self.check_offs.insert(pos, instant);
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn check_offs(&self) -> &[NaiveDateTime] {
        &self.check_offs
    }

    /// Most recent completion, if any
    pub fn last_check_off(&self) -> Option<NaiveDateTime> {
        self.check_offs.last().copied()
    }
}

impl Trackable for Habit {
    fn name(&self) -> &str {
        &self.name
    }

    fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    fn check_offs(&self) -> &[NaiveDateTime] {
        &self.check_offs
    }

    fn last_check_off(&self) -> Option<NaiveDateTime> {
        self.check_offs.last().copied()
    }
}
