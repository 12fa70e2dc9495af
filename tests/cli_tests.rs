//! Command-line tests running the `xtimer` binary.
//!
//! Every test points `--data-dir` at a fresh temporary directory so the
//! user's real settings and database are never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn xtimer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xtimer").unwrap();
    cmd.arg("--data-dir").arg(dir.path()).env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Stats
// ============================================================================

#[test]
fn test_stats_on_empty_data_dir() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["stats", "--date", "2024-06-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-03: 0 pomodoros, 0h 00m"));

    assert!(dir.path().join("sessions.db").exists());
}

#[test]
fn test_stats_table_for_several_days() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["stats", "--date", "2024-06-03", "--days", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-01"))
        .stdout(predicate::str::contains("Total"));
}

#[test]
fn test_stats_rejects_bad_date() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["stats", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_show_defaults() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work time:   25 min"))
        .stdout(predicate::str::contains("Break time:  5 min"));
}

#[test]
fn test_settings_set_then_show() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["settings", "set", "--work", "40", "--break", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    xtimer(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work time:   40 min"))
        .stdout(predicate::str::contains("Break time:  10 min"));

    let saved = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert!(saved.contains("\"workMinutes\": 40"));
}

#[test]
fn test_settings_set_rejects_out_of_range() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["settings", "set", "--work", "500"])
        .assert()
        .failure();

    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn test_settings_set_rejects_non_audio_bell() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["settings", "set", "--work-sound", "/tmp/notes.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

    xtimer(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work time:   25 min"));
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_starts_and_quits() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["run", "--no-sound"])
        .write_stdin("s\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready"))
        .stdout(predicate::str::contains("Focusing"));
}

#[test]
fn test_run_reports_state_errors() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["run", "--no-sound", "--work", "1"])
        .write_stdin("y\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed phase is waiting for confirmation"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();

    xtimer(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xtimer"));
}
