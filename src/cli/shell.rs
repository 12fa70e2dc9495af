//! Interactive terminal timer.
//!
//! `run_shell` spawns a timer engine and drives it from keyboard lines read
//! on stdin. Engine events arrive over an unbounded channel; the live
//! status line is only redrawn on every tick when stdout is a terminal.

use std::io::{BufRead, IsTerminal, Write};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::commands::RunArgs;
use super::display::Display;
use crate::app::App;
use crate::config::Settings;
use crate::sound::{AudioWorker, SoundPlayer, SoundSource};
use crate::timer::{EngineSnapshot, Reply, TimerEvent};
use crate::types::{Phase, PhaseDurations};

// ============================================================================
// Input
// ============================================================================

/// A parsed keyboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Start, pause, or resume
    Toggle,
    /// Back to idle
    Reset,
    /// Answer the completion prompt
    Confirm(bool),
    /// Leave the timer
    Quit,
    /// Print the key help
    Help,
    /// Anything else
    Unknown(String),
}

/// Parses one line typed by the user.
pub fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "start" | "p" | "pause" => Input::Toggle,
        "r" | "reset" => Input::Reset,
        "y" | "yes" => Input::Confirm(true),
        "n" | "no" => Input::Confirm(false),
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "?" | "help" => Input::Help,
        other => Input::Unknown(other.to_string()),
    }
}

/// Phase lengths for a run: settings, overridden by command-line flags.
pub fn run_durations(settings: &Settings, args: &RunArgs) -> PhaseDurations {
    PhaseDurations::from_minutes(
        args.work.unwrap_or(settings.work_minutes),
        args.break_time.unwrap_or(settings.break_minutes),
    )
}

// ============================================================================
// Screen
// ============================================================================

/// Writes status and messages, keeping the live line on terminals.
struct Screen {
    interactive: bool,
    live: bool,
}

impl Screen {
    fn new(interactive: bool) -> Self {
        Self {
            interactive,
            live: false,
        }
    }

    fn status(&mut self, snapshot: &EngineSnapshot) {
        let line = Display::status_line(snapshot);
        if self.interactive {
            print!("\r\x1b[2K{line}");
            let _ = std::io::stdout().flush();
            self.live = true;
        } else {
            println!("{line}");
        }
    }

    fn message(&mut self, text: &str) {
        self.end_live();
        println!("{text}");
    }

    fn end_live(&mut self) {
        if self.live {
            println!();
            self.live = false;
        }
    }
}

// ============================================================================
// Shell
// ============================================================================

/// Runs the interactive timer until the user quits, stdin closes, or
/// Ctrl-C is pressed.
pub async fn run_shell(app: &App, args: &RunArgs) -> Result<()> {
    let settings = app.settings().clone();
    let durations = run_durations(&settings, args);

    let bell = if args.no_sound {
        None
    } else {
        match AudioWorker::spawn() {
            Ok(worker) => Some(worker),
            Err(e) => {
                Display::show_warning(&format!("{e}, continuing without sound"));
                None
            }
        }
    };

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let (handle, task) = app.spawn_engine(durations, events_tx);
    let mut lines = spawn_stdin_reader()?;
    let mut screen = Screen::new(std::io::stdout().is_terminal());

    Display::show_keys();
    let mut view = handle.snapshot().await?;
    screen.status(&view);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(event) = events.recv() => match event {
                TimerEvent::Tick { remaining } => {
                    view.remaining = remaining;
                    if screen.interactive {
                        screen.status(&view);
                    }
                }
                TimerEvent::StatsChanged { stats } => view.stats = stats,
                TimerEvent::PhaseChanged { phase } => {
                    debug!(%phase, "phase changed");
                    view = handle.snapshot().await?;
                    if screen.interactive {
                        screen.status(&view);
                    }
                }
                TimerEvent::PhaseCompleted { completed, next } => {
                    if let Some(bell) = &bell {
                        ring_bell(bell, &settings, next);
                    }
                    view = handle.snapshot().await?;
                    screen.status(&view);
                    screen.message(&Display::completion_prompt(completed, next));
                }
            },
            line = lines.recv() => {
                let Some(line) = line else { break };
                let reply = match parse_input(&line) {
                    Input::Toggle => handle.toggle().await,
                    Input::Reset => handle.reset().await,
                    Input::Confirm(proceed) => handle.confirm(proceed).await,
                    Input::Quit => break,
                    Input::Help => {
                        screen.end_live();
                        Display::show_keys();
                        continue;
                    }
                    Input::Unknown(text) => {
                        screen.message(&format!("Unknown command '{text}', press h for help"));
                        continue;
                    }
                };
                if let Some(snapshot) = report(&mut screen, reply)? {
                    view = snapshot;
                    screen.status(&view);
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    screen.end_live();
    let _ = handle.reset().await;
    drop(handle);
    task.await.context("Timer engine task failed")?;
    Ok(())
}

/// Plays the bell announcing `next`; a failure is only logged.
pub fn ring_bell(player: &dyn SoundPlayer, settings: &Settings, next: Phase) {
    let source = SoundSource::for_next_phase(settings, next);
    if let Err(e) = player.play(&source) {
        warn!(sound = source.name(), error = %e, "Failed to queue bell");
    }
}

/// Turns a command reply into a snapshot, printing state errors.
fn report(screen: &mut Screen, reply: Reply) -> Result<Option<EngineSnapshot>> {
    match reply {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) if e.is_state_error() => {
            screen.message(&e.to_string());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads stdin on a plain thread and forwards each line.
///
/// The thread ends on EOF or when the receiver is dropped.
fn spawn_stdin_reader() -> Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("xtimer-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to start input thread")?;
    Ok(rx)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_input_tests {
        use super::*;

        #[test]
        fn test_empty_line_toggles() {
            assert_eq!(parse_input(""), Input::Toggle);
            assert_eq!(parse_input("  \n"), Input::Toggle);
            assert_eq!(parse_input("s"), Input::Toggle);
        }

        #[test]
        fn test_confirm_answers() {
            assert_eq!(parse_input("y"), Input::Confirm(true));
            assert_eq!(parse_input("YES"), Input::Confirm(true));
            assert_eq!(parse_input("n"), Input::Confirm(false));
        }

        #[test]
        fn test_other_commands() {
            assert_eq!(parse_input("r"), Input::Reset);
            assert_eq!(parse_input("q"), Input::Quit);
            assert_eq!(parse_input("?"), Input::Help);
        }

        #[test]
        fn test_unknown_is_reported() {
            assert_eq!(parse_input("xyz"), Input::Unknown("xyz".to_string()));
        }
    }

    mod run_durations_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_uses_settings_by_default() {
            let settings = Settings {
                work_minutes: 40,
                break_minutes: 10,
                ..Settings::default()
            };
            let durations = run_durations(&settings, &RunArgs::default());
            assert_eq!(durations.work, Duration::from_secs(40 * 60));
            assert_eq!(durations.brk, Duration::from_secs(10 * 60));
        }

        #[test]
        fn test_flags_override_settings() {
            let args = RunArgs {
                work: Some(1),
                break_time: None,
                no_sound: true,
            };
            let durations = run_durations(&Settings::default(), &args);
            assert_eq!(durations.work, Duration::from_secs(60));
            assert_eq!(durations.brk, Duration::from_secs(5 * 60));
        }
    }

    mod ring_bell_tests {
        use super::*;
        use crate::sound::MockSoundPlayer;
        use std::path::PathBuf;

        fn settings_with_bells() -> Settings {
            Settings {
                work_sound_path: Some(PathBuf::from("/s/work.mp3")),
                break_sound_path: Some(PathBuf::from("/s/break.mp3")),
                ..Settings::default()
            }
        }

        #[test]
        fn test_work_completion_rings_break_bell() {
            let player = MockSoundPlayer::new();
            ring_bell(&player, &settings_with_bells(), Phase::Working.following());
            assert_eq!(player.get_play_calls(), vec![SoundSource::file("/s/break.mp3")]);
        }

        #[test]
        fn test_break_completion_rings_work_bell() {
            let player = MockSoundPlayer::new();
            ring_bell(&player, &settings_with_bells(), Phase::Breaking.following());
            assert_eq!(player.get_play_calls(), vec![SoundSource::file("/s/work.mp3")]);
        }

        #[test]
        fn test_missing_path_rings_beep() {
            let player = MockSoundPlayer::new();
            ring_bell(&player, &Settings::default(), Phase::Breaking);
            assert_eq!(player.get_play_calls(), vec![SoundSource::Beep]);
        }

        #[test]
        fn test_playback_failure_is_swallowed() {
            let player = MockSoundPlayer::new();
            player.set_should_fail(true);
            ring_bell(&player, &Settings::default(), Phase::Working);
            assert_eq!(player.play_count(), 0);
        }
    }

    mod report_tests {
        use super::*;
        use crate::timer::EngineError;

        #[test]
        fn test_state_error_is_not_fatal() {
            let mut screen = Screen::new(false);
            let result = report(&mut screen, Err(EngineError::NotRunning));
            assert!(matches!(result, Ok(None)));
        }

        #[test]
        fn test_stopped_engine_is_fatal() {
            let mut screen = Screen::new(false);
            assert!(report(&mut screen, Err(EngineError::Stopped)).is_err());
        }
    }
}
