//! CLI module for xtimer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `shell`: The interactive timer driven from stdin

pub mod commands;
pub mod display;
pub mod shell;

pub use commands::{Cli, Commands, RunArgs, SetArgs, SettingsCommand, StatsArgs};
pub use display::Display;
pub use shell::run_shell;
