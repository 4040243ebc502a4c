//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{analyze, config_cmd, fixtures_cmd, habit};
use crate::domain::{parse_instant, Clock, FixedClock, HabitGroup, HabitId, Periodicity, SystemClock};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "habit")]
#[command(author, version, about = "Track daily and weekly habits and their streaks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Treat this moment as "now" (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS])
    #[arg(long, global = true, env = "HABIT_NOW", value_parser = parse_instant)]
    pub now: Option<NaiveDateTime>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new habit project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Do not load the sample habits
        #[arg(long)]
        no_fixtures: bool,
    },

    /// Create a new habit
    Create {
        /// Habit name
        name: String,

        /// How often the habit recurs (daily or weekly)
        #[arg(long, short)]
        periodicity: Periodicity,

        /// What completing the habit means
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Record a completion for a habit
    CheckOff {
        /// Habit ID
        id: HabitId,

        /// When it was completed (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
    },

    /// Delete a habit and all its check-offs
    Delete {
        /// Habit ID
        id: HabitId,
    },

    /// List habits
    List {
        /// Only show habits with this periodicity
        #[arg(long, short)]
        periodicity: Option<Periodicity>,
    },

    /// Show longest and current streak for one habit
    Show {
        /// Habit ID
        id: HabitId,
    },

    /// Analyze streaks for a group of habits (all, daily or weekly)
    Analyze {
        /// Which habits to analyze
        #[arg(default_value = "all")]
        group: HabitGroup,
    },

    /// Load sample habits with four weeks of check-offs
    Fixtures {
        /// YAML file with fixture habits (defaults to the built-in set)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// View or change project configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("Habit CLI starting");

    let clock: Box<dyn Clock> = match cli.now {
        Some(now) => {
            output.verbose(&format!("Using pinned clock: {}", now));
            Box::new(FixedClock(now))
        }
        None => Box::new(SystemClock),
    };
    let clock = &*clock;

    match cli.command {
        Commands::Init { path, no_fixtures } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path.display()));
            let project = Project::init(&path)?;
            output.verbose_ctx("init", &format!("Created data directory at: {}", project.data_dir().display()));
            output.success(&format!("Initialized habit project at {}", project.root().display()));

            if !no_fixtures && project.config().project.fixtures.seed_on_init {
                fixtures_cmd::seed_if_empty(&output, &project, clock)?;
            }
        }

        Commands::Create { name, periodicity, description } => {
            habit::create(&output, clock, &name, periodicity, description)?
        }
        Commands::CheckOff { id, at } => habit::check_off(&output, clock, &id, at)?,
        Commands::Delete { id } => habit::delete(&output, &id)?,
        Commands::List { periodicity } => habit::list(&output, periodicity)?,
        Commands::Show { id } => habit::show(&output, clock, &id)?,

        Commands::Analyze { group } => {
            output.verbose_ctx("analyze", &format!("Analyzing group: {}", group));
            analyze::run(&output, clock, group)?
        }

        Commands::Fixtures { file } => fixtures_cmd::load(&output, clock, file.as_deref())?,

        Commands::Config(cmd) => config_cmd::run(cmd, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
