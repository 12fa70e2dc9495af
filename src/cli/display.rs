//! Display utilities for the xtimer CLI.
//!
//! This module provides formatted output for:
//! - The live status line of the interactive timer
//! - Daily and multi-day statistics
//! - Settings
//! - Error and warning messages

use std::path::Path;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::timer::{format_duration, format_minutes_total, EngineSnapshot};
use crate::types::{DailyStats, Phase};

/// Longest path shown in full before it is shortened from the left.
const MAX_PATH_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats the one-line status of the interactive timer.
    pub fn status_line(snapshot: &EngineSnapshot) -> String {
        let state = if snapshot.awaiting_confirm {
            "Done"
        } else {
            snapshot.phase.label()
        };
        format!(
            "{:<9} {}  | today: {}",
            state,
            format_duration(snapshot.remaining),
            Self::stats_summary(&snapshot.stats)
        )
    }

    /// Formats a short statistics summary (`3 pomodoros, 1h 15m`).
    pub fn stats_summary(stats: &DailyStats) -> String {
        let noun = if stats.count == 1 { "pomodoro" } else { "pomodoros" };
        format!(
            "{} {}, {}",
            stats.count,
            noun,
            format_minutes_total(stats.total_minutes)
        )
    }

    /// Formats the prompt shown when a phase completes.
    pub fn completion_prompt(completed: Phase, next: Phase) -> String {
        let done = match completed {
            Phase::Working => "Work session complete.",
            _ => "Break is over.",
        };
        let question = match next {
            Phase::Breaking => "Start break?",
            _ => "Start next work session?",
        };
        format!("{done} {question} [y/n]")
    }

    /// Shows the statistics of one day.
    pub fn show_daily_stats(date: NaiveDate, stats: &DailyStats) {
        println!("{}: {}", date, Self::stats_summary(stats));
    }

    /// Shows a table of per-day statistics.
    pub fn show_stats_table(rows: &[(NaiveDate, DailyStats)]) {
        for line in Self::stats_table(rows) {
            println!("{line}");
        }
    }

    fn stats_table(rows: &[(NaiveDate, DailyStats)]) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows.len() + 3);
        lines.push(format!("{:<10}  {:>9}  {:>8}", "Date", "Pomodoros", "Time"));
        lines.push("─".repeat(31));
        let mut total = DailyStats::default();
        for (date, stats) in rows {
            total.count += stats.count;
            total.total_minutes += stats.total_minutes;
            lines.push(format!(
                "{:<10}  {:>9}  {:>8}",
                date.to_string(),
                stats.count,
                format_minutes_total(stats.total_minutes)
            ));
        }
        lines.push(format!(
            "{:<10}  {:>9}  {:>8}",
            "Total",
            total.count,
            format_minutes_total(total.total_minutes)
        ));
        lines
    }

    /// Shows the current settings.
    pub fn show_settings(settings: &Settings, path: &Path) {
        for line in Self::settings_lines(settings, path) {
            println!("{line}");
        }
    }

    fn settings_lines(settings: &Settings, path: &Path) -> Vec<String> {
        let sound = |p: &Option<std::path::PathBuf>| {
            p.as_deref()
                .map(truncate_path)
                .unwrap_or_else(|| "(beep)".to_string())
        };
        vec![
            format!("Settings file: {}", path.display()),
            "─────────────────────────────".to_string(),
            format!("Work time:   {} min", settings.work_minutes),
            format!("Break time:  {} min", settings.break_minutes),
            format!("Work bell:   {}", sound(&settings.work_sound_path)),
            format!("Break bell:  {}", sound(&settings.break_sound_path)),
        ]
    }

    /// Shows a success message for saved settings.
    pub fn show_settings_saved() {
        println!("* Settings saved");
    }

    /// Shows the key help of the interactive timer.
    pub fn show_keys() {
        println!("Keys: [Enter]/s start/pause  r reset  y/n answer prompt  q quit");
    }

    /// Shows a non-fatal warning.
    pub fn show_warning(message: &str) {
        eprintln!("Warning: {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Shortens a long path to its last characters, prefixed by `...`.
pub fn truncate_path(path: &Path) -> String {
    let text = path.display().to_string();
    let count = text.chars().count();
    if count <= MAX_PATH_WIDTH {
        return text;
    }
    let tail: String = text.chars().skip(count - MAX_PATH_WIDTH).collect();
    format!("...{tail}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn snapshot(phase: Phase, remaining_secs: u64) -> EngineSnapshot {
        EngineSnapshot {
            phase,
            remaining: Duration::from_secs(remaining_secs),
            total: Duration::from_secs(1500),
            next_phase: Phase::Working,
            awaiting_confirm: false,
            today: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            stats: DailyStats::new(3, 75),
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_line_working() {
            let line = Display::status_line(&snapshot(Phase::Working, 1499));
            assert!(line.starts_with("Focusing"));
            assert!(line.contains("24:59"));
            assert!(line.contains("today: 3 pomodoros, 1h 15m"));
        }

        #[test]
        fn test_status_line_awaiting_confirm() {
            let mut snap = snapshot(Phase::Idle, 0);
            snap.awaiting_confirm = true;
            assert!(Display::status_line(&snap).starts_with("Done"));
        }

        #[test]
        fn test_stats_summary_singular() {
            assert_eq!(
                Display::stats_summary(&DailyStats::new(1, 25)),
                "1 pomodoro, 0h 25m"
            );
        }

        #[test]
        fn test_completion_prompt() {
            assert_eq!(
                Display::completion_prompt(Phase::Working, Phase::Breaking),
                "Work session complete. Start break? [y/n]"
            );
            assert!(Display::completion_prompt(Phase::Breaking, Phase::Working)
                .contains("Start next work session?"));
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_stats_table_has_total() {
            let rows = vec![
                (NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), DailyStats::new(2, 50)),
                (NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), DailyStats::new(1, 25)),
            ];

            let lines = Display::stats_table(&rows);

            assert_eq!(lines.len(), 5);
            assert!(lines[2].starts_with("2024-06-03"));
            assert!(lines[4].starts_with("Total"));
            assert!(lines[4].contains("1h 15m"));
        }

        #[test]
        fn test_settings_lines() {
            let settings = Settings {
                break_sound_path: Some(PathBuf::from("/s/gong.mp3")),
                ..Settings::default()
            };
            let lines = Display::settings_lines(&settings, Path::new("/cfg/settings.json"));
            assert!(lines[0].contains("/cfg/settings.json"));
            assert_eq!(lines[2], "Work time:   25 min");
            assert_eq!(lines[4], "Work bell:   (beep)");
            assert_eq!(lines[5], "Break bell:  /s/gong.mp3");
        }
    }

    mod truncate_path_tests {
        use super::*;

        #[test]
        fn test_short_path_unchanged() {
            assert_eq!(truncate_path(Path::new("/a/b.mp3")), "/a/b.mp3");
        }

        #[test]
        fn test_long_path_keeps_tail() {
            let path = Path::new("/home/someone/music/bells/very-long-bell-name.mp3");
            let shown = truncate_path(path);
            assert!(shown.starts_with("..."));
            assert!(shown.ends_with("very-long-bell-name.mp3"));
            assert_eq!(shown.chars().count(), MAX_PATH_WIDTH + 3);
        }
    }
}
