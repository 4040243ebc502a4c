//! Habit CLI - Local-first habit tracking with streak analytics

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = habit_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
