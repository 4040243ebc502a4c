//! Project management
//!
//! Handles project initialization and provides access to the database.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, HabitDb};
use crate::domain::{Clock, StreakEngine};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a habit project. Run 'habit init' first.")]
    NotInProject,
}

/// A habit tracking project (a directory containing `.habits/`)
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(PROJECT_DIR);

        if !data_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left untouched, so running it twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Habit tracker configuration

[streaks]
# Where the longest-streak scan stops: "now" or "latest_check_off"
scan_bound = "now"
# Current streak rule: "from_latest" counts back from the latest check-off,
# "grace_window" resets to 0 once a whole period has been missed
current_rule = "from_latest"

[fixtures]
# Load the built-in sample habits on 'habit init'
seed_on_init = true
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# SQLite write-ahead log files
habits.db-wal
habits.db-shm
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let project = Self::open(root)?;
        project.database()?;

        Ok(project)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.habits` directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the database file path
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("habits.db")
    }

    /// Opens the habit database for this project
    pub fn database(&self) -> Result<HabitDb> {
        HabitDb::open(&self.db_path())
    }

    /// Builds a streak engine using this project's streak settings
    pub fn streak_engine<C: Clock>(&self, clock: C) -> StreakEngine<C> {
        let streaks = &self.config.project.streaks;
        StreakEngine::new(clock)
            .with_bound(streaks.scan_bound)
            .with_current_rule(streaks.current_rule)
    }
}
