//! Timer engine for the pomodoro timer.
//!
//! This module provides the core timer functionality:
//! - The phase state machine and its running-time accumulator
//! - A cancellable one-second ticker
//! - Session recording and today's statistics
//! - The engine task and its command handle
//! - Observer and notifier interfaces for the user interface

mod clock;
mod engine;
mod error;
mod format;
mod handle;
mod observer;
mod state;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineSnapshot, TimerEngine};
pub use error::EngineError;
pub use format::{format_duration, format_minutes_total};
pub use handle::{Command, EngineHandle, Reply, Request};
pub use observer::{EngineObserver, MockNotifier, Notifier, TimerEvent};
pub use state::TimerState;
pub use ticker::{Ticker, TICK_INTERVAL};
