//! xtimer - a pomodoro timer for the terminal
//!
//! Alternates focused work and short breaks:
//! - 25 minutes of work, then a 5 minute break by default
//! - Each finished work session is stored and counted per day
//! - A bell rings and the timer waits for confirmation between phases

use std::fs::File;
use std::io::IsTerminal;
use std::sync::Mutex;

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser};

use xtimer::cli::{run_shell, Cli, Commands, Display, SetArgs, SettingsCommand, StatsArgs};
use xtimer::config::default_data_dir;
use xtimer::{open_log_file, stats_for_last_days, App, Settings};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; the live status line owns the terminal during `run`
    let log_file = if logs_to_file(cli.command.as_ref(), std::io::stdout().is_terminal()) {
        let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
        match open_log_file(&data_dir) {
            Ok(file) => Some(file),
            Err(e) => {
                Display::show_warning(&format!("Cannot open log file, logging to stderr: {e}"));
                None
            }
        }
    } else {
        None
    };
    init_tracing(cli.verbose, log_file);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Whether log output goes to the data directory instead of stderr.
fn logs_to_file(command: Option<&Commands>, interactive: bool) -> bool {
    interactive && matches!(command, Some(Commands::Run(_)))
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`. Without a log file, output goes to
/// stderr.
fn init_tracing(verbose: bool, log_file: Option<File>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.without_time().with_writer(std::io::stderr).init(),
    }
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let open_app = || App::open(cli.data_dir.clone().unwrap_or_else(default_data_dir));

    match cli.command {
        Some(Commands::Run(args)) => {
            let app = open_app()?;
            run_shell(&app, &args).await?;
        }
        Some(Commands::Stats(args)) => {
            let app = open_app()?;
            show_stats(&app, &args)?;
        }
        Some(Commands::Settings { action }) => {
            let mut app = open_app()?;
            match action {
                SettingsCommand::Show => Display::show_settings(app.settings(), app.settings_path()),
                SettingsCommand::Set(args) => {
                    if args.is_empty() {
                        Display::show_warning("Nothing to change");
                    } else {
                        let settings = apply_set_args(app.settings(), &args);
                        app.update_settings(settings)?;
                        Display::show_settings_saved();
                    }
                    Display::show_settings(app.settings(), app.settings_path());
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Prints the statistics of one day or of several days.
fn show_stats(app: &App, args: &StatsArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    match args.days {
        Some(days) if days > 1 => {
            let rows = stats_for_last_days(app.sessions(), date, days)?;
            Display::show_stats_table(&rows);
        }
        _ => {
            let stats = app.sessions().daily_stats(date)?;
            Display::show_daily_stats(date, &stats);
        }
    }
    Ok(())
}

/// Returns `current` with the requested changes applied.
fn apply_set_args(current: &Settings, args: &SetArgs) -> Settings {
    let mut settings = current.clone();
    if let Some(work) = args.work {
        settings.work_minutes = work;
    }
    if let Some(break_time) = args.break_time {
        settings.break_minutes = break_time;
    }
    if args.clear_sounds {
        settings.work_sound_path = None;
        settings.break_sound_path = None;
    }
    if let Some(path) = &args.work_sound {
        settings.work_sound_path = Some(path.clone());
    }
    if let Some(path) = &args.break_sound {
        settings.break_sound_path = Some(path.clone());
    }
    settings
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["xtimer", "run"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["xtimer", "--verbose", "stats"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_interactive_run_logs_to_file() {
        let run = Cli::parse_from(["xtimer", "run"]);
        assert!(logs_to_file(run.command.as_ref(), true));
        assert!(!logs_to_file(run.command.as_ref(), false));
    }

    #[test]
    fn test_other_commands_log_to_stderr() {
        let stats = Cli::parse_from(["xtimer", "stats"]);
        assert!(!logs_to_file(stats.command.as_ref(), true));
        assert!(!logs_to_file(None, true));
    }

    #[test]
    fn test_apply_set_args_minutes() {
        let args = SetArgs {
            work: Some(50),
            break_time: Some(10),
            ..SetArgs::default()
        };
        let settings = apply_set_args(&Settings::default(), &args);
        assert_eq!(settings.work_minutes, 50);
        assert_eq!(settings.break_minutes, 10);
    }

    #[test]
    fn test_apply_set_args_clear_sounds() {
        let current = Settings {
            work_sound_path: Some(PathBuf::from("/s/a.mp3")),
            break_sound_path: Some(PathBuf::from("/s/b.mp3")),
            ..Settings::default()
        };
        let args = SetArgs {
            clear_sounds: true,
            ..SetArgs::default()
        };
        let settings = apply_set_args(&current, &args);
        assert_eq!(settings.work_sound_path, None);
        assert_eq!(settings.break_sound_path, None);
        assert_eq!(settings.work_minutes, current.work_minutes);
    }
}
