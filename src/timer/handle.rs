//! Command interface to a running engine task.

use tokio::sync::{mpsc, oneshot};

use super::engine::EngineSnapshot;
use super::error::EngineError;
use crate::types::PhaseDurations;

/// Capacity of the request channel between handles and the engine task.
pub(crate) const REQUEST_CHANNEL_CAPACITY: usize = 32;

/// Commands understood by the engine task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the next phase, resume, or accept a pending completion
    Start,
    /// Pause the running phase
    Pause,
    /// Return to idle
    Reset,
    /// Answer a pending completion
    Confirm(bool),
    /// Replace the phase lengths
    ApplyDurations(PhaseDurations),
    /// Read the current state
    Snapshot,
}

/// Reply to a command: the engine state after it was applied.
pub type Reply = Result<EngineSnapshot, EngineError>;

/// A command together with the channel its reply goes to.
#[derive(Debug)]
pub struct Request {
    /// Command to apply
    pub command: Command,
    /// Reply channel
    pub reply: oneshot::Sender<Reply>,
}

/// Cloneable handle to a spawned `TimerEngine`.
///
/// Each call waits until the engine task has applied the command, so once
/// `pause().await` returns the ticker is already stopped. The engine task
/// exits when the last handle is dropped.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Request>,
}

impl EngineHandle {
    pub(crate) fn new(tx: mpsc::Sender<Request>) -> Self {
        Self { tx }
    }

    /// Starts the next phase, resumes, or accepts a pending completion.
    pub async fn start(&self) -> Reply {
        self.send(Command::Start).await
    }

    /// Pauses the running phase.
    pub async fn pause(&self) -> Reply {
        self.send(Command::Pause).await
    }

    /// Resets to idle.
    pub async fn reset(&self) -> Reply {
        self.send(Command::Reset).await
    }

    /// Answers a pending completion.
    pub async fn confirm(&self, proceed: bool) -> Reply {
        self.send(Command::Confirm(proceed)).await
    }

    /// Replaces the phase lengths from the next phase on.
    pub async fn apply_durations(&self, durations: PhaseDurations) -> Reply {
        self.send(Command::ApplyDurations(durations)).await
    }

    /// Returns the current engine state.
    pub async fn snapshot(&self) -> Reply {
        self.send(Command::Snapshot).await
    }

    /// Toggles between running and paused.
    ///
    /// Starts (or accepts a pending completion) when the timer is not
    /// running.
    pub async fn toggle(&self) -> Reply {
        let snapshot = self.snapshot().await?;
        if snapshot.phase.is_active() {
            self.pause().await
        } else {
            self.start().await
        }
    }

    async fn send(&self, command: Command) -> Reply {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { command, reply })
            .await
            .map_err(|_| EngineError::Stopped)?;
        rx.await.map_err(|_| EngineError::Stopped)?
    }
}
