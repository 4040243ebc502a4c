//! CLI integration tests for the habit tracker
//!
//! These tests verify the complete workflow from initialization through
//! check-offs and analysis, with the clock pinned through `HABIT_NOW`.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Wednesday evening; the sample habits end on this day
const NOW: &str = "2024-06-12T18:00:00";

/// Get a command instance for the habit binary, isolated from user config
fn habit_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("habit"));
    cmd.current_dir(dir.path())
        .env("HABIT_NOW", NOW)
        .env("XDG_CONFIG_HOME", dir.path().join(".xdg"));
    cmd
}

/// Create a temporary directory with an empty habit project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    habit_cmd(&dir).args(["init", "--no-fixtures"]).assert().success();
    dir
}

/// Create a temporary directory with the sample habits loaded
fn setup_seeded_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    habit_cmd(&dir).arg("init").assert().success();
    dir
}

/// Create a habit and return its ID
fn create_habit(dir: &TempDir, name: &str, periodicity: &str) -> String {
    let output = habit_cmd(dir)
        .args(["create", name, "--periodicity", periodicity, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["id"].as_str().unwrap().to_string()
}

fn json_output(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = habit_cmd(dir).args(args).args(["--format", "json"]).output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", args);
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    habit_cmd(&dir)
        .args(["init", "--no-fixtures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized habit project"));

    assert!(dir.path().join(".habits").is_dir());
    assert!(dir.path().join(".habits/config.toml").is_file());
    assert!(dir.path().join(".habits/.gitignore").is_file());
    assert!(dir.path().join(".habits/habits.db").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    habit_cmd(&dir).arg("init").assert().success();
    habit_cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("sample habits").not());

    let habits = json_output(&dir, &["list"]);
    assert_eq!(habits.as_array().unwrap().len(), 5);
}

#[test]
fn test_init_loads_samples() {
    let dir = TempDir::new().unwrap();

    habit_cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 5 sample habits"));
}

#[test]
fn test_init_respects_seed_setting() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["config", "set", "fixtures.seed_on_init", "false"])
        .assert()
        .success();
    habit_cmd(&dir).arg("init").assert().success();

    habit_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No habits found."));
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    habit_cmd(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a habit project"));
}

// =============================================================================
// Habit Tests
// =============================================================================

#[test]
fn test_create_habit() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["create", "Meditate", "--periodicity", "daily", "-d", "Ten minutes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created habit: h-"))
        .stdout(predicate::str::contains("Meditate (daily)"));

    habit_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Meditate"))
        .stdout(predicate::str::contains("Ten minutes"))
        .stdout(predicate::str::contains("Never"));
}

#[test]
fn test_create_rejects_unknown_periodicity() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["create", "Stretch", "--periodicity", "monthly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid periodicity 'monthly'"));
}

#[test]
fn test_create_rejects_blank_name() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["create", "   ", "--periodicity", "daily"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Habit name cannot be empty"));
}

#[test]
fn test_check_off_and_show_streaks() {
    let dir = setup_project();
    let id = create_habit(&dir, "Meditate", "daily");

    for at in ["2024-06-10T07:00", "2024-06-11T07:00", "2024-06-12 07:30"] {
        habit_cmd(&dir)
            .args(["check-off", &id, "--at", at])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked off 'Meditate'"));
    }

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 3);
    assert_eq!(json["current_streak"], 3);
    assert_eq!(json["check_offs"], 3);
    assert_eq!(json["last_check_off"], "2024-06-12T07:30:00");

    habit_cmd(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Longest streak: 3 days"))
        .stdout(predicate::str::contains("Current streak: 3 days"));
}

#[test]
fn test_check_off_defaults_to_now() {
    let dir = setup_project();
    let id = create_habit(&dir, "Journal", "weekly");

    let json = json_output(&dir, &["check-off", &id]);
    assert_eq!(json["checked_at"], "2024-06-12T18:00:00");
    assert_eq!(json["current_streak"], 1);
}

#[test]
fn test_same_period_check_offs_count_once() {
    let dir = setup_project();
    let id = create_habit(&dir, "Run", "weekly");

    // Monday and Sunday of the same ISO week
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-03"]).assert().success();
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-09T21:00"]).assert().success();

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 1);
    // Last week counts as still alive during this week
    assert_eq!(json["current_streak"], 1);
}

#[test]
fn test_older_chain_counts_back_from_latest() {
    let dir = setup_project();
    let id = create_habit(&dir, "Floss", "daily");

    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-08"]).assert().success();
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-09"]).assert().success();

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 2);
    assert_eq!(json["current_streak"], 2);
}

#[test]
fn test_grace_window_breaks_older_chain() {
    let dir = setup_project();
    let id = create_habit(&dir, "Floss", "daily");

    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-08"]).assert().success();
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-09"]).assert().success();

    habit_cmd(&dir)
        .args(["config", "set", "streaks.current_rule", "grace_window"])
        .assert()
        .success();

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 2);
    assert_eq!(json["current_streak"], 0);

    // Yesterday is still inside the window
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-11"]).assert().success();
    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["current_streak"], 1);
}

#[test]
fn test_check_off_rejects_bad_instant() {
    let dir = setup_project();
    let id = create_habit(&dir, "Meditate", "daily");

    habit_cmd(&dir)
        .args(["check-off", &id, "--at", "yesterday"])
        .assert()
        .failure();
}

#[test]
fn test_check_off_unknown_habit() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["check-off", "h-0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Habit not found: h-0000000"));
}

#[test]
fn test_invalid_id_is_rejected() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["show", "not-an-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid habit ID format"));
}

#[test]
fn test_delete_habit() {
    let dir = setup_project();
    let id = create_habit(&dir, "Meditate", "daily");
    habit_cmd(&dir).args(["check-off", &id]).assert().success();

    habit_cmd(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted habit"));

    habit_cmd(&dir)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Habit not found"));

    habit_cmd(&dir)
        .args(["delete", &id])
        .assert()
        .failure();
}

#[test]
fn test_list_filters_by_periodicity() {
    let dir = setup_seeded_project();

    habit_cmd(&dir)
        .args(["list", "--periodicity", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grocery Shopping"))
        .stdout(predicate::str::contains("Clean House"))
        .stdout(predicate::str::contains("Read Book").not());

    let daily = json_output(&dir, &["list", "-p", "daily"]);
    let names: Vec<&str> = daily
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Drink Water"));
    assert!(names.contains(&"Read Book"));
    assert!(names.contains(&"Exercise"));
}

// =============================================================================
// Analysis Tests
// =============================================================================

#[test]
fn test_analyze_all() {
    let dir = setup_seeded_project();

    habit_cmd(&dir)
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("All habits analysis:"))
        .stdout(predicate::str::contains("Overall longest streak: 28 periods"))
        .stdout(predicate::str::contains("Achieved by: Read Book"));
}

#[test]
fn test_analyze_sample_streaks() {
    let dir = setup_seeded_project();
    let json = json_output(&dir, &["analyze"]);

    let streaks: Vec<(String, u64, u64)> = json["habits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            (
                h["name"].as_str().unwrap().to_string(),
                h["longest_streak"].as_u64().unwrap(),
                h["current_streak"].as_u64().unwrap(),
            )
        })
        .collect();

    let expect = |name: &str| {
        streaks
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, l, c)| (*l, *c))
            .unwrap()
    };
    assert_eq!(expect("Drink Water"), (3, 2));
    assert_eq!(expect("Read Book"), (28, 28));
    assert_eq!(expect("Exercise"), (1, 1));
    assert_eq!(expect("Grocery Shopping"), (4, 4));
    assert_eq!(expect("Clean House"), (2, 1));
}

#[test]
fn test_analyze_weekly() {
    let dir = setup_seeded_project();
    let json = json_output(&dir, &["analyze", "weekly"]);

    assert_eq!(json["group"], "weekly");
    assert_eq!(json["habits"].as_array().unwrap().len(), 2);
    assert_eq!(json["best_longest_streak"], 4);
    assert_eq!(json["leaders"], serde_json::json!(["Grocery Shopping"]));
}

#[test]
fn test_analyze_reports_ties() {
    let dir = setup_project();
    let a = create_habit(&dir, "Pushups", "daily");
    let b = create_habit(&dir, "Situps", "daily");

    for id in [&a, &b] {
        habit_cmd(&dir).args(["check-off", id, "--at", "2024-06-01"]).assert().success();
        habit_cmd(&dir).args(["check-off", id, "--at", "2024-06-02"]).assert().success();
    }

    let json = json_output(&dir, &["analyze", "daily"]);
    let mut leaders: Vec<&str> = json["leaders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect();
    leaders.sort();

    assert_eq!(json["best_longest_streak"], 2);
    assert_eq!(leaders, ["Pushups", "Situps"]);
}

#[test]
fn test_analyze_empty_group() {
    let dir = setup_project();
    create_habit(&dir, "Meditate", "daily");

    habit_cmd(&dir)
        .args(["analyze", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No weekly habits found."));
}

#[test]
fn test_analyze_without_check_offs() {
    let dir = setup_project();
    create_habit(&dir, "Meditate", "daily");

    let json = json_output(&dir, &["analyze"]);
    assert_eq!(json["best_longest_streak"], 0);
    assert_eq!(json["leaders"], serde_json::json!([]));
}

#[test]
fn test_analyze_rejects_unknown_group() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["analyze", "monthly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid habit group"));
}

#[test]
fn test_now_flag_overrides_env() {
    let dir = setup_project();
    let id = create_habit(&dir, "Meditate", "daily");
    habit_cmd(&dir).args(["check-off", &id, "--at", "2024-06-12"]).assert().success();

    // Two days later the run is still reported from its latest check-off
    let output = habit_cmd(&dir)
        .args(["show", &id, "--format", "json", "--now", "2024-06-14T09:00"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["current_streak"], 1);
    assert_eq!(json["longest_streak"], 1);

    // Before the check-off happened there was nothing to count
    let output = habit_cmd(&dir)
        .args(["show", &id, "--format", "json", "--now", "2024-06-10T09:00"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["current_streak"], 0);
}

// =============================================================================
// Fixture Tests
// =============================================================================

#[test]
fn test_fixtures_twice_is_noop() {
    let dir = setup_seeded_project();

    habit_cmd(&dir)
        .arg("fixtures")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 0 habits (5 already present)"));
}

#[test]
fn test_fixtures_from_yaml_file() {
    let dir = setup_project();
    let file = dir.path().join("samples.yaml");
    fs::write(
        &file,
        r#"- name: Stretch
  periodicity: daily
  days: [26, 27, 28]
- name: Call Parents
  description: Sunday call
  periodicity: weekly
  days: [4, 11]
"#,
    )
    .unwrap();

    habit_cmd(&dir)
        .args(["fixtures", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 2 habits"));

    let json = json_output(&dir, &["analyze", "daily"]);
    assert_eq!(json["best_longest_streak"], 3);
    assert_eq!(json["leaders"], serde_json::json!(["Stretch"]));
}

#[test]
fn test_fixtures_reject_day_outside_window() {
    let dir = setup_project();
    let file = dir.path().join("bad.yaml");
    fs::write(&file, "- name: Late\n  periodicity: daily\n  days: [29]\n").unwrap();

    habit_cmd(&dir)
        .args(["fixtures", "--file"])
        .arg(&file)
        .assert()
        .failure();
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_show_and_set() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scan_bound = \"now\""));

    habit_cmd(&dir)
        .args(["config", "set", "streaks.scan_bound", "latest_check_off"])
        .assert()
        .success();

    let json = json_output(&dir, &["config", "show"]);
    assert_eq!(json["streaks"]["scan_bound"], "latest_check_off");
    assert_eq!(json["streaks"]["current_rule"], "from_latest");
}

#[test]
fn test_config_set_rejects_bad_values() {
    let dir = setup_project();

    habit_cmd(&dir)
        .args(["config", "set", "streaks.scan_bound", "forever"])
        .assert()
        .failure();
    habit_cmd(&dir)
        .args(["config", "set", "streaks.current_rule", "lenient"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid current rule"));
    habit_cmd(&dir)
        .args(["config", "set", "colors.theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_scan_bound_changes_future_check_offs() {
    let dir = setup_project();
    let id = create_habit(&dir, "Plan", "daily");

    for at in ["2024-06-13", "2024-06-14"] {
        habit_cmd(&dir).args(["check-off", &id, "--at", at]).assert().success();
    }

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 0);

    habit_cmd(&dir)
        .args(["config", "set", "streaks.scan_bound", "latest_check_off"])
        .assert()
        .success();

    let json = json_output(&dir, &["show", &id]);
    assert_eq!(json["longest_streak"], 2);
}
