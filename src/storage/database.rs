//! SQLite habit database
//!
//! Habits and their check-offs live in `.habits/habits.db`. Instants are
//! stored as local wall-clock ISO-8601 text (see [`format_instant`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::domain::{format_instant, Habit, HabitId, HabitSource, Periodicity};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Habit not found: {0}")]
    HabitNotFound(HabitId),

    #[error("Habit already exists: {0}")]
    DuplicateHabit(HabitId),

    #[error("Corrupt habit record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Persistent store for habits and check-offs
pub struct HabitDb {
    /// Path to the SQLite database (None for in-memory)
    db_path: Option<PathBuf>,

    /// Database connection
    conn: Connection,
}

/// Habit columns before check-offs are attached
struct HabitRow {
    id: String,
    name: String,
    description: Option<String>,
    periodicity: String,
    created_at: String,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            periodicity: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_habit(self, check_offs: Vec<NaiveDateTime>) -> Result<Habit, DatabaseError> {
        let corrupt = |reason: String| DatabaseError::Corrupt {
            id: self.id.clone(),
            reason,
        };

        let id: HabitId = self.id.parse().map_err(|e| corrupt(format!("{}", e)))?;
        let periodicity: Periodicity = self
            .periodicity
            .parse()
            .map_err(|e| corrupt(format!("{}", e)))?;
        let created_at = parse_stored(&self.created_at).map_err(corrupt)?;

        let habit = Habit::with_id(id, self.name.clone(), periodicity, created_at)
            .map_err(|e| corrupt(e.to_string()))?
            .with_description(self.description.clone())
            .with_check_offs(check_offs);

        Ok(habit)
    }
}

fn parse_stored(value: &str) -> Result<NaiveDateTime, String> {
    value
        .parse::<NaiveDateTime>()
        .map_err(|e| format!("bad timestamp '{}': {}", value, e))
}

impl HabitDb {
    /// Schema version - bump when schema changes
    const SCHEMA_VERSION: i32 = 1;

    /// Opens (creating if needed) the database at the given path
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open habit database: {}", db_path.display()))?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::init(conn, Some(db_path.to_path_buf()))
    }

    /// Opens a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self { db_path, conn };
        db.ensure_schema()?;

        Ok(db)
    }

    /// Ensures the schema exists and is current
    fn ensure_schema(&self) -> Result<()> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version != Self::SCHEMA_VERSION {
            anyhow::bail!(
                "Habit database schema version {} is not supported (expected {})",
                current_version,
                Self::SCHEMA_VERSION
            );
        }

        Ok(())
    }

    /// Gets the current schema version
    fn get_schema_version(&self) -> Result<i32> {
        let result: Option<i32> = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?;

        Ok(result.unwrap_or(0))
    }

    /// Creates the schema from scratch
    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS habits (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                periodicity TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS check_offs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_check_offs_habit ON check_offs(habit_id);
            CREATE INDEX IF NOT EXISTS idx_habits_periodicity ON habits(periodicity);
            ",
        )?;

        self.conn.execute(
            &format!("PRAGMA user_version = {}", Self::SCHEMA_VERSION),
            [],
        )?;

        Ok(())
    }

    /// Stores a new habit together with any check-offs it already has
    pub fn insert_habit(&mut self, habit: &Habit) -> Result<(), DatabaseError> {
        if self.contains(&habit.id)? {
            return Err(DatabaseError::DuplicateHabit(habit.id.clone()));
        }

        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO habits (id, name, description, periodicity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.periodicity().as_str(),
                format_instant(habit.created_at),
            ],
        )?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO check_offs (habit_id, timestamp) VALUES (?1, ?2)")?;
            for instant in habit.check_offs() {
                stmt.execute(params![habit.id.to_string(), format_instant(*instant)])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Records a completion for a habit
    pub fn add_check_off(&self, id: &HabitId, instant: NaiveDateTime) -> Result<(), DatabaseError> {
        if !self.contains(id)? {
            return Err(DatabaseError::HabitNotFound(id.clone()));
        }

        self.conn.execute(
            "INSERT INTO check_offs (habit_id, timestamp) VALUES (?1, ?2)",
            params![id.to_string(), format_instant(instant)],
        )?;

        Ok(())
    }

    /// Deletes a habit and all its check-offs
    pub fn delete_habit(&mut self, id: &HabitId) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM check_offs WHERE habit_id = ?1",
            params![id.to_string()],
        )?;
        let removed = tx.execute("DELETE FROM habits WHERE id = ?1", params![id.to_string()])?;

        if removed == 0 {
            return Err(DatabaseError::HabitNotFound(id.clone()));
        }

        tx.commit()?;
        Ok(())
    }

    /// Returns true if a habit with this ID exists
    pub fn contains(&self, id: &HabitId) -> Result<bool, DatabaseError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM habits WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    /// Number of stored habits
    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Returns true if no habits are stored
    pub fn is_empty(&self) -> Result<bool, DatabaseError> {
        Ok(self.count()? == 0)
    }

    /// Loads all habits with their check-off history, oldest first
    pub fn list_habits(&self) -> Result<Vec<Habit>, DatabaseError> {
        self.load_habits(
            "SELECT id, name, description, periodicity, created_at
             FROM habits ORDER BY created_at, id",
            [],
        )
    }

    /// Loads habits with the given periodicity, oldest first
    pub fn list_by_periodicity(&self, periodicity: Periodicity) -> Result<Vec<Habit>, DatabaseError> {
        self.load_habits(
            "SELECT id, name, description, periodicity, created_at
             FROM habits WHERE periodicity = ?1 ORDER BY created_at, id",
            params![periodicity.as_str()],
        )
    }

    fn load_habits(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Habit>, DatabaseError> {
        let rows: Vec<HabitRow> = {
            let mut stmt = self.conn.prepare(sql)?;
            let rows = stmt
                .query_map(args, HabitRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter()
            .map(|row| {
                let check_offs = self.load_check_offs(&row.id)?;
                row.into_habit(check_offs)
            })
            .collect()
    }

    /// Loads a single habit
    pub fn get_habit(&self, id: &HabitId) -> Result<Option<Habit>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, periodicity, created_at
                 FROM habits WHERE id = ?1",
                params![id.to_string()],
                HabitRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => {
                let check_offs = self.load_check_offs(&row.id)?;
                Ok(Some(row.into_habit(check_offs)?))
            }
            None => Ok(None),
        }
    }

    /// Loads a habit, failing if it does not exist
    pub fn require_habit(&self, id: &HabitId) -> Result<Habit, DatabaseError> {
        self.get_habit(id)?
            .ok_or_else(|| DatabaseError::HabitNotFound(id.clone()))
    }

    fn load_check_offs(&self, habit_id: &str) -> Result<Vec<NaiveDateTime>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT timestamp FROM check_offs WHERE habit_id = ?1 ORDER BY timestamp")?;

        let raw: Vec<String> = stmt
            .query_map(params![habit_id], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        raw.iter()
            .map(|value| {
                parse_stored(value).map_err(|reason| DatabaseError::Corrupt {
                    id: habit_id.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// Returns the path to the database file (None when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl HabitSource for HabitDb {
    type Error = DatabaseError;

    fn periodicity_of(&self, id: &HabitId) -> Result<Periodicity, Self::Error> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT periodicity FROM habits WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let raw = raw.ok_or_else(|| DatabaseError::HabitNotFound(id.clone()))?;
        raw.parse().map_err(|e: crate::domain::HabitError| DatabaseError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    fn check_offs_of(&self, id: &HabitId) -> Result<Vec<NaiveDateTime>, Self::Error> {
        if !self.contains(id)? {
            return Err(DatabaseError::HabitNotFound(id.clone()));
        }
        self.load_check_offs(&id.to_string())
    }
}
