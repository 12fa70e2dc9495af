//! Live timer state.
//!
//! `TimerState` holds the phase and the running-time accumulator. It knows
//! nothing about ticking, persistence or observers; the engine drives it.
//!
//! Remaining time is always derived as `total - accumulated` and is never
//! stored on its own. The accumulator only moves forward while the timer is
//! running, one increment per `advance` call measured from the previous
//! anchor, so paused wall time never counts.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;

use crate::types::Phase;

/// Represents the current state of the timer.
#[derive(Debug, Clone)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: Phase,
    /// Length of the current phase
    pub total: Duration,
    /// Time actually spent running in the current phase
    pub accumulated: Duration,
    /// Anchor for the next increment (only set while running)
    pub last_tick_at: Option<Instant>,
    /// Whether time is currently accumulating
    pub is_running: bool,
    /// Phase to enter on the next start from idle
    pub next_phase: Phase,
    /// Wall-clock start of the current work/break phase
    pub phase_started_at: Option<DateTime<Local>>,
    /// Active phase to return to when resuming from pause
    resume_phase: Option<Phase>,
}

impl TimerState {
    /// Creates a new idle state showing `total` (the work length).
    pub fn new(total: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            total,
            accumulated: Duration::ZERO,
            last_tick_at: None,
            is_running: false,
            next_phase: Phase::Working,
            phase_started_at: None,
            resume_phase: None,
        }
    }

    /// Returns the time left in the current phase, saturating at zero.
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.accumulated)
    }

    /// Enters an active phase with a fresh accumulator.
    pub fn begin(&mut self, phase: Phase, total: Duration, now: Instant, wall: DateTime<Local>) {
        debug_assert!(phase.is_active());
        self.phase = phase;
        self.total = total;
        self.accumulated = Duration::ZERO;
        self.last_tick_at = Some(now);
        self.is_running = true;
        self.phase_started_at = Some(wall);
        self.resume_phase = None;
    }

    /// Folds the time since the last anchor into the accumulator.
    ///
    /// Returns the remaining time afterwards. Does nothing while stopped.
    pub fn advance(&mut self, now: Instant) -> Duration {
        if self.is_running {
            if let Some(last) = self.last_tick_at {
                self.accumulated += now.saturating_duration_since(last);
            }
            self.last_tick_at = Some(now);
        }
        self.remaining()
    }

    /// Pauses the timer.
    ///
    /// Only works if the timer is currently running. Returns true if the
    /// state changed.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.is_running || !self.phase.is_active() {
            return false;
        }
        self.advance(now);
        self.resume_phase = Some(self.phase);
        self.phase = Phase::Paused;
        self.is_running = false;
        self.last_tick_at = None;
        true
    }

    /// Resumes the timer from pause.
    ///
    /// Restores the phase that was active before the pause and re-anchors
    /// the accumulator at `now`. Returns true if the state changed.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        // Fallback to working if the previous phase is unknown
        self.phase = self.resume_phase.take().unwrap_or(Phase::Working);
        self.is_running = true;
        self.last_tick_at = Some(now);
        true
    }

    /// Stops the clock after a natural completion.
    ///
    /// The state drops to `Idle` while the completion is being confirmed;
    /// `total` and `accumulated` are left as they were. Returns the phase
    /// that just completed.
    pub fn finish(&mut self) -> Phase {
        let completed = self.phase;
        self.phase = Phase::Idle;
        self.is_running = false;
        self.last_tick_at = None;
        self.resume_phase = None;
        completed
    }

    /// Resets to idle, ready to start a work phase of length `work_total`.
    pub fn reset(&mut self, work_total: Duration) {
        self.phase = Phase::Idle;
        self.total = work_total;
        self.accumulated = Duration::ZERO;
        self.last_tick_at = None;
        self.is_running = false;
        self.next_phase = Phase::Working;
        self.phase_started_at = None;
        self.resume_phase = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
