//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `config show`, `config set` |
//! | Habit | Habit lifecycle | `create`, `check-off`, `delete`, `list`, `show` |
//! | Analysis | Streak reports | `analyze`, `analyze daily` |
//! | Samples | Demo data | `fixtures`, `fixtures --file` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Time
//!
//! Commands read the current moment from the system clock unless `--now`
//! (or `HABIT_NOW`) pins it:
//! ```bash
//! habit --now 2024-06-12T18:00 analyze weekly
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod habit;
mod analyze;
mod fixtures_cmd;
mod config_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
