//! Sample data commands

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::Clock;
use crate::storage::{fixtures, Project};

/// Loads the built-in sample habits into a freshly initialized project
pub fn seed_if_empty(output: &Output, project: &Project, clock: &dyn Clock) -> Result<()> {
    let mut db = project.database()?;
    if !db.is_empty()? {
        output.verbose_ctx("init", "Database already has habits, skipping samples");
        return Ok(());
    }

    let inserted = fixtures::seed(&mut db, &fixtures::builtin(), clock.now())?;
    output.success(&format!("Loaded {} sample habits", inserted.len()));

    Ok(())
}

pub fn load(output: &Output, clock: &dyn Clock, file: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let mut db = project.database()?;

    let set = match file {
        Some(path) => {
            output.verbose_ctx("fixtures", &format!("Reading {}", path.display()));
            fixtures::load_file(path)?
        }
        None => fixtures::builtin(),
    };

    let inserted = fixtures::seed(&mut db, &set, clock.now())?;
    let skipped = set.len() - inserted.len();

    if output.is_json() {
        let ids: Vec<String> = inserted.iter().map(|h| h.id.to_string()).collect();
        output.data(&serde_json::json!({
            "loaded": ids,
            "skipped": skipped,
        }));
        return Ok(());
    }

    for habit in &inserted {
        println!("  {} - {} ({})", habit.id, habit.name, habit.periodicity());
    }
    output.success(&format!(
        "Loaded {} habits ({} already present)",
        inserted.len(),
        skipped
    ));

    Ok(())
}
