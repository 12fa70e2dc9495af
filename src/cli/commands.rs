//! Command definitions for the xtimer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI Structure
// ============================================================================

/// xtimer - a pomodoro timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "xtimer",
    version,
    about = "Pomodoro timer with daily statistics",
    long_about = "A simple pomodoro timer that runs in the terminal.\n\
                  Completed work sessions are stored locally and summed per day.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding settings and the session database
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive timer
    Run(RunArgs),

    /// Show completed sessions per day
    Stats(StatsArgs),

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Work duration in minutes for this run (1-120)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Break duration in minutes for this run (1-60)
    #[arg(
        short,
        long = "break",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_time: Option<u32>,

    /// Disable bell sounds
    #[arg(long)]
    pub no_sound: bool,
}

/// Arguments for the stats command
#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// Day to report (YYYY-MM-DD, defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Report this many days ending at the date (1-366)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: Option<u32>,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change settings and save them
    Set(SetArgs),
}

/// Arguments for `settings set`
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Work duration in minutes (1-120)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: Option<u32>,

    /// Break duration in minutes (1-60)
    #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub break_time: Option<u32>,

    /// Bell played when work is about to start
    #[arg(long, value_name = "PATH")]
    pub work_sound: Option<PathBuf>,

    /// Bell played when a break is about to start
    #[arg(long, value_name = "PATH")]
    pub break_sound: Option<PathBuf>,

    /// Remove both bell sounds (use the beep)
    #[arg(long, conflicts_with_all = ["work_sound", "break_sound"])]
    pub clear_sounds: bool,
}

impl SetArgs {
    /// Returns true if no change was requested.
    pub fn is_empty(&self) -> bool {
        self.work.is_none()
            && self.break_time.is_none()
            && self.work_sound.is_none()
            && self.break_sound.is_none()
            && !self.clear_sounds
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

// ============================================================================
// Tests
// ============================================================================
