//! Streak analysis command

use anyhow::Result;

use super::output::{format_last_check, periods, Output};
use crate::domain::analytics;
use crate::domain::{format_instant, Clock, HabitGroup};
use crate::storage::Project;

pub fn run(output: &Output, clock: &dyn Clock, group: HabitGroup) -> Result<()> {
    let project = Project::open_current()?;
    let db = project.database()?;

    let habits = db.list_habits()?;
    let engine = project.streak_engine(clock);
    let report = analytics::analyze(&engine, &habits, group);
    output.verbose_ctx(
        "analyze",
        &format!("{} of {} habits in group", report.habits.len(), habits.len()),
    );

    if output.is_json() {
        let json: Vec<_> = report
            .habits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "name": h.name,
                    "periodicity": h.periodicity,
                    "longest_streak": h.longest,
                    "current_streak": h.current,
                    "last_check_off": h.last_check_off.map(format_instant),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "group": report.group,
            "habits": json,
            "best_longest_streak": report.best_longest,
            "leaders": report.leaders,
        }));
        return Ok(());
    }

    if report.is_empty() {
        match group {
            HabitGroup::All => println!("No habits found."),
            _ => println!("No {} habits found.", group),
        }
        return Ok(());
    }

    println!("{} analysis:", report.group.title());
    println!(
        "{:<20} {:<8} {:<10} {:<10} LAST CHECK",
        "NAME", "PERIOD", "LONGEST", "CURRENT"
    );
    println!("{}", "-".repeat(66));
    for h in &report.habits {
        println!(
            "{:<20} {:<8} {:<10} {:<10} {}",
            h.name,
            h.periodicity,
            periods(h.longest, h.periodicity),
            periods(h.current, h.periodicity),
            format_last_check(h.last_check_off)
        );
    }

    println!();
    println!("Overall longest streak: {} periods", report.best_longest);
    if report.leaders.is_empty() {
        println!("Achieved by: nobody yet");
    } else {
        println!("Achieved by: {}", report.leaders.join(", "));
    }

    Ok(())
}
