//! Habit commands

use anyhow::Result;
use chrono::NaiveDateTime;

use super::output::{format_last_check, periods, Output};
use crate::domain::{format_instant, Clock, Habit, HabitId, Periodicity};
use crate::storage::Project;

pub fn create(
    output: &Output,
    clock: &dyn Clock,
    name: &str,
    periodicity: Periodicity,
    description: Option<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let mut db = project.database()?;

    let habit = Habit::new(name, periodicity, clock.now())?.with_description(description);
    output.verbose_ctx("create", &format!("Derived ID {} for '{}'", habit.id, habit.name));

    db.insert_habit(&habit)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": habit.id.to_string(),
            "name": habit.name,
            "periodicity": habit.periodicity(),
            "description": habit.description,
            "created_at": format_instant(habit.created_at),
        }));
    } else {
        output.success(&format!(
            "Created habit: {} - {} ({})",
            habit.id,
            habit.name,
            habit.periodicity()
        ));
    }

    Ok(())
}

pub fn check_off(
    output: &Output,
    clock: &dyn Clock,
    id: &HabitId,
    at: Option<NaiveDateTime>,
) -> Result<()> {
    let project = Project::open_current()?;
    let db = project.database()?;

    let instant = at.unwrap_or_else(|| clock.now());
    db.add_check_off(id, instant)?;
    output.verbose_ctx("check-off", &format!("Recorded {} for {}", format_instant(instant), id));

    let habit = db.require_habit(id)?;
    let engine = project.streak_engine(clock);
    let current = engine.current_for(&habit);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "name": habit.name,
            "checked_at": format_instant(instant),
            "current_streak": current,
        }));
    } else {
        output.success(&format!(
            "Checked off '{}' at {} (current streak: {})",
            habit.name,
            instant.format("%Y-%m-%d %H:%M"),
            periods(current, habit.periodicity())
        ));
    }

    Ok(())
}

pub fn delete(output: &Output, id: &HabitId) -> Result<()> {
    let project = Project::open_current()?;
    let mut db = project.database()?;

    let habit = db.require_habit(id)?;
    db.delete_habit(id)?;
    output.verbose_ctx(
        "delete",
        &format!("Removed {} with {} check-offs", id, habit.check_offs().len()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "deleted": id.to_string(),
            "name": habit.name,
        }));
    } else {
        output.success(&format!("Deleted habit: {} - {}", id, habit.name));
    }

    Ok(())
}

pub fn list(output: &Output, periodicity: Option<Periodicity>) -> Result<()> {
    let project = Project::open_current()?;
    let db = project.database()?;

    let habits = match periodicity {
        Some(p) => db.list_by_periodicity(p)?,
        None => db.list_habits()?,
    };

    if output.is_json() {
        let json: Vec<_> = habits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "id": h.id.to_string(),
                    "name": h.name,
                    "periodicity": h.periodicity(),
                    "description": h.description,
                    "check_offs": h.check_offs().len(),
                    "last_check_off": h.last_check_off().map(format_instant),
                })
            })
            .collect();
        output.data(&json);
        return Ok(());
    }

    if habits.is_empty() {
        match periodicity {
            Some(p) => println!("No {} habits found.", p),
            None => println!("No habits found."),
        }
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:<8} {:<30} LAST CHECK",
        "ID", "NAME", "PERIOD", "DESCRIPTION"
    );
    println!("{}", "-".repeat(86));
    for habit in &habits {
        println!(
            "{:<10} {:<20} {:<8} {:<30} {}",
            habit.id,
            truncate(&habit.name, 20),
            habit.periodicity(),
            truncate(habit.description.as_deref().unwrap_or("-"), 30),
            format_last_check(habit.last_check_off())
        );
    }

    Ok(())
}

pub fn show(output: &Output, clock: &dyn Clock, id: &HabitId) -> Result<()> {
    let project = Project::open_current()?;
    let db = project.database()?;

    let habit = db.require_habit(id)?;
    let engine = project.streak_engine(clock);
    let streaks = engine.streaks_for_id(&db, id)?;
    output.verbose_ctx(
        "show",
        &format!(
            "Scan bound: {}, current rule: {}",
            engine.bound().as_str(),
            engine.current_rule().as_str()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": habit.id.to_string(),
            "name": habit.name,
            "periodicity": habit.periodicity(),
            "description": habit.description,
            "created_at": format_instant(habit.created_at),
            "check_offs": habit.check_offs().len(),
            "last_check_off": habit.last_check_off().map(format_instant),
            "longest_streak": streaks.longest,
            "current_streak": streaks.current,
        }));
        return Ok(());
    }

    println!("Habit: {}", habit.id);
    println!("Name: {}", habit.name);
    println!("Periodicity: {}", habit.periodicity());
    if let Some(ref description) = habit.description {
        println!("Description: {}", description);
    }
    println!("Created: {}", habit.created_at.format("%Y-%m-%d %H:%M"));
    println!("Check-offs: {}", habit.check_offs().len());
    println!("Last check: {}", format_last_check(habit.last_check_off()));
    println!("Longest streak: {}", periods(streaks.longest, habit.periodicity()));
    println!("Current streak: {}", periods(streaks.current, habit.periodicity()));

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
