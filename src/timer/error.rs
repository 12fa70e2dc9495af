//! Timer engine error types.

use thiserror::Error;

/// Errors returned by engine commands.
///
/// A command that fails leaves the timer state untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// `start` was issued while a phase is already counting down.
    #[error("Timer is already running")]
    AlreadyRunning,

    /// `pause` was issued while the timer is not counting down.
    #[error("Timer is not running")]
    NotRunning,

    /// `confirm` was issued while no completed phase is pending.
    #[error("No completed phase is waiting for confirmation")]
    NotAwaitingConfirm,

    /// The engine task has exited.
    #[error("Timer engine has stopped")]
    Stopped,
}

impl EngineError {
    /// Returns true if the error reflects the current timer state rather
    /// than a broken engine.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}
