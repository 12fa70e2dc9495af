//! Observer and notifier interfaces of the timer engine.
//!
//! The engine pushes state changes through `EngineObserver` and announces
//! natural phase completions through `Notifier`. Both are implemented for an
//! unbounded tokio channel of `TimerEvent`s, which is how the terminal shell
//! receives them on its own task.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::types::{DailyStats, Phase};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One tick elapsed while running
    Tick {
        /// Time left in the current phase (always positive)
        remaining: Duration,
    },
    /// The timer entered a new phase
    PhaseChanged {
        /// The new phase
        phase: Phase,
    },
    /// Today's statistics changed
    StatsChanged {
        /// Refreshed statistics
        stats: DailyStats,
    },
    /// A phase ran to completion and waits for confirmation
    PhaseCompleted {
        /// Phase that just finished
        completed: Phase,
        /// Phase that starts on confirmation
        next: Phase,
    },
}

// ============================================================================
// EngineObserver
// ============================================================================

/// Receives engine state changes.
pub trait EngineObserver: Send {
    /// Called once per tick with the time left, never with zero.
    fn on_tick(&self, remaining: Duration);

    /// Called whenever the phase changes.
    fn on_phase_changed(&self, phase: Phase);

    /// Called when today's cached statistics change.
    fn on_stats_changed(&self, stats: DailyStats);
}

impl EngineObserver for mpsc::UnboundedSender<TimerEvent> {
    fn on_tick(&self, remaining: Duration) {
        let _ = self.send(TimerEvent::Tick { remaining });
    }

    fn on_phase_changed(&self, phase: Phase) {
        let _ = self.send(TimerEvent::PhaseChanged { phase });
    }

    fn on_stats_changed(&self, stats: DailyStats) {
        let _ = self.send(TimerEvent::StatsChanged { stats });
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Collaborator invoked when a phase completes naturally.
///
/// The collaborator answers later by calling `EngineHandle::confirm`.
pub trait Notifier: Send {
    /// Announces that `completed` finished and `next` is ready to start.
    fn on_phase_complete(&self, completed: Phase, next: Phase);
}

impl Notifier for mpsc::UnboundedSender<TimerEvent> {
    fn on_phase_complete(&self, completed: Phase, next: Phase) {
        let _ = self.send(TimerEvent::PhaseCompleted { completed, next });
    }
}

/// Mock notifier for testing.
///
/// Records every completion it is told about.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<(Phase, Phase)>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(completed, next)` pairs.
    #[must_use]
    pub fn calls(&self) -> Vec<(Phase, Phase)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Notifier for MockNotifier {
    fn on_phase_complete(&self, completed: Phase, next: Phase) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((completed, next));
    }
}

impl<T: Notifier + Sync> Notifier for std::sync::Arc<T> {
    fn on_phase_complete(&self, completed: Phase, next: Phase) {
        (**self).on_phase_complete(completed, next);
    }
}
