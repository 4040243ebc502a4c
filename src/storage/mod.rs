//! # Storage Layer
//!
//! Persistence for habits and check-offs, plus project configuration.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Habits + check-offs | SQLite | `.habits/habits.db` |
//! | Config | TOML | `.habits/config.toml` |
//! | Fixtures | YAML | any path given to `habit fixtures --file` |
//!
//! ## Project Structure
//!
//! ```text
//! .habits/
//! ├── habits.db       # Habits and check-offs
//! ├── config.toml     # Project configuration
//! └── .gitignore      # Ignores SQLite WAL files
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a habit project
//! - [`HabitDb`] - SQLite store, also the [`HabitSource`](crate::domain::HabitSource) the streak core reads
//! - [`Config`] - Project and global configuration

mod config;
mod database;
mod project;
pub mod fixtures;

pub use config::{Config, ConfigError, FixtureConfig, GlobalConfig, OutputFormat, ProjectConfig, StreakConfig, PROJECT_DIR};
pub use database::{DatabaseError, HabitDb};
pub use project::{Project, ProjectError};
pub use fixtures::{FixtureError, FixtureHabit};
