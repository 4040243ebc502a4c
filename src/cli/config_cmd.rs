//! Project configuration commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{CurrentRule, ScanBound};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the project configuration
    Show,

    /// Change a project setting
    Set {
        /// Setting key (streaks.scan_bound, streaks.current_rule or fixtures.seed_on_init)
        key: String,

        /// New value
        value: String,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output),
        ConfigCommands::Set { key, value } => set(output, &key, &value),
    }
}

fn show(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let config = &project.config().project;

    if output.is_json() {
        output.data(config);
    } else {
        let content = toml::to_string_pretty(config).context("Failed to serialize project config")?;
        print!("{}", content);
    }

    Ok(())
}

fn set(output: &Output, key: &str, value: &str) -> Result<()> {
    let mut project = Project::open_current()?;
    let config = &mut project.config_mut().project;

    match key {
        "streaks.scan_bound" => {
            config.streaks.scan_bound = match value {
                "now" => ScanBound::Now,
                "latest_check_off" => ScanBound::LatestCheckOff,
                _ => bail!(
                    "Invalid scan bound '{}': must be 'now' or 'latest_check_off'",
                    value
                ),
            };
        }
        "streaks.current_rule" => {
            config.streaks.current_rule = match value {
                "from_latest" => CurrentRule::FromLatest,
                "grace_window" => CurrentRule::GraceWindow,
                _ => bail!(
                    "Invalid current rule '{}': must be 'from_latest' or 'grace_window'",
                    value
                ),
            };
        }
        "fixtures.seed_on_init" => {
            config.fixtures.seed_on_init = value
                .parse()
                .with_context(|| format!("Invalid boolean '{}' for {}", value, key))?;
        }
        _ => bail!("Unknown config key '{}'", key),
    }

    project.config().save_project()?;
    output.verbose_ctx("config", &format!("Wrote {}", project.data_dir().join("config.toml").display()));
    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
