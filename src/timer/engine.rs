//! Timer engine.
//!
//! `TimerEngine` owns the timer state and implements every transition:
//! - Start, pause, resume and reset
//! - Tick handling and natural completion
//! - Completion confirmation (continue into the next phase or stop)
//! - Session recording and today's cached statistics
//! - Day rollover
//!
//! The command methods take the current monotonic instant so they can be
//! driven directly in tests. In production the engine is moved into a task
//! by `spawn` and driven through an `EngineHandle`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::error::EngineError;
use super::handle::{Command, EngineHandle, Request, REQUEST_CHANNEL_CAPACITY};
use super::observer::{EngineObserver, Notifier};
use super::state::TimerState;
use super::ticker::Ticker;
use crate::store::SessionStore;
use crate::types::{DailyStats, Phase, PhaseDurations, SessionRecord};

// ============================================================================
// EngineSnapshot
// ============================================================================

/// Point-in-time view of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSnapshot {
    /// Current phase
    pub phase: Phase,
    /// Time left in the current phase
    pub remaining: Duration,
    /// Length of the current phase
    pub total: Duration,
    /// Phase entered on the next start
    pub next_phase: Phase,
    /// Whether a completed phase waits for confirmation
    pub awaiting_confirm: bool,
    /// Date today's statistics belong to
    pub today: NaiveDate,
    /// Today's statistics
    pub stats: DailyStats,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Pomodoro state machine.
pub struct TimerEngine {
    state: TimerState,
    durations: PhaseDurations,
    ticker: Ticker,
    awaiting_confirm: bool,
    today: NaiveDate,
    stats: DailyStats,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    observers: Vec<Box<dyn EngineObserver>>,
    notifier: Option<Box<dyn Notifier>>,
}

impl TimerEngine {
    /// Creates an idle engine and loads today's statistics from `store`.
    pub fn new(
        durations: PhaseDurations,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let today = clock.today();
        let stats = load_stats(store.as_ref(), today);
        Self {
            state: TimerState::new(durations.work),
            durations,
            ticker: Ticker::default(),
            awaiting_confirm: false,
            today,
            stats,
            store,
            clock,
            observers: Vec::new(),
            notifier: None,
        }
    }

    /// Adds an observer of state changes.
    #[must_use]
    pub fn with_observer(mut self, observer: impl EngineObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Sets the collaborator told about natural phase completions.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the current state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns a snapshot of the engine.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.state.phase,
            remaining: self.state.remaining(),
            total: self.state.total,
            next_phase: self.state.next_phase,
            awaiting_confirm: self.awaiting_confirm,
            today: self.today,
            stats: self.stats,
        }
    }

    /// Returns true while a completed phase waits for confirmation.
    pub fn is_awaiting_confirm(&self) -> bool {
        self.awaiting_confirm
    }

    /// Returns true while the ticker is scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Returns today's cached statistics.
    pub fn stats(&self) -> DailyStats {
        self.stats
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts the next phase from idle, or resumes from pause.
    ///
    /// While a completion waits for confirmation this acts as
    /// `confirm(true)`.
    pub fn start(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.awaiting_confirm {
            return self.confirm(true, now);
        }
        match self.state.phase {
            Phase::Idle => {
                self.enter_phase(self.state.next_phase, now);
                Ok(())
            }
            Phase::Paused => {
                self.check_day_rollover();
                self.state.resume(now);
                self.ticker.start();
                info!(phase = %self.state.phase, remaining = ?self.state.remaining(), "timer resumed");
                self.emit_phase_changed();
                Ok(())
            }
            Phase::Working | Phase::Breaking => Err(EngineError::AlreadyRunning),
        }
    }

    /// Pauses the running phase.
    ///
    /// If the time since the last tick uses up the phase, it completes
    /// instead of pausing.
    pub fn pause(&mut self, now: Instant) -> Result<(), EngineError> {
        if !self.state.is_running {
            return Err(EngineError::NotRunning);
        }
        self.ticker.stop();
        // The partial interval since the last tick may already finish the phase
        if self.state.advance(now).is_zero() {
            self.complete();
            return Ok(());
        }
        self.state.pause(now);
        info!(remaining = ?self.state.remaining(), "timer paused");
        self.check_day_rollover();
        self.emit_phase_changed();
        Ok(())
    }

    /// Stops everything and returns to idle, ready for a work phase.
    pub fn reset(&mut self) {
        self.ticker.stop();
        self.awaiting_confirm = false;
        self.state.reset(self.durations.work);
        info!("timer reset");
        self.check_day_rollover();
        self.emit_phase_changed();
    }

    /// Answers a pending completion.
    ///
    /// `true` starts the next phase, `false` resets.
    pub fn confirm(&mut self, proceed: bool, now: Instant) -> Result<(), EngineError> {
        if !self.awaiting_confirm {
            return Err(EngineError::NotAwaitingConfirm);
        }
        self.awaiting_confirm = false;
        if proceed {
            self.enter_phase(self.state.next_phase, now);
        } else {
            self.reset();
        }
        Ok(())
    }

    /// Replaces the phase lengths used from the next phase start on.
    pub fn apply_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        if self.state.phase == Phase::Idle && !self.awaiting_confirm {
            self.state.total = durations.length_of(self.state.next_phase);
        }
        debug!(?durations, "phase durations updated");
    }

    /// Handles one tick of the ticker.
    pub fn handle_tick(&mut self, now: Instant) {
        if !self.state.is_running {
            return;
        }
        let remaining = self.state.advance(now);
        if remaining.is_zero() {
            self.ticker.stop();
            self.complete();
        } else {
            for observer in &self.observers {
                observer.on_tick(remaining);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn enter_phase(&mut self, phase: Phase, now: Instant) {
        self.check_day_rollover();
        let total = self.durations.length_of(phase);
        self.state.begin(phase, total, now, self.clock.now());
        self.ticker.start();
        info!(%phase, ?total, "phase started");
        self.emit_phase_changed();
    }

    fn complete(&mut self) {
        let ended_at = self.clock.now();
        let completed = self.state.finish();
        info!(phase = %completed, "phase completed");

        self.check_day_rollover();
        if completed == Phase::Working {
            self.record_session(ended_at);
        }

        let next = completed.following();
        self.state.next_phase = next;
        self.awaiting_confirm = true;
        self.emit_phase_changed();

        if let Some(notifier) = &self.notifier {
            notifier.on_phase_complete(completed, next);
        }
    }

    fn record_session(&mut self, ended_at: DateTime<Local>) {
        let total = self.state.total;
        let started_at = self.state.phase_started_at.unwrap_or_else(|| {
            ended_at - chrono::Duration::from_std(total).unwrap_or_else(|_| chrono::Duration::zero())
        });
        let record = SessionRecord::pomodoro(started_at, ended_at, total);

        match self.store.append(&record) {
            Ok(id) => {
                debug!(id, date = %record.date, minutes = record.duration_minutes, "session recorded");
                if record.date == self.today {
                    self.stats.record(record.duration_minutes);
                    self.emit_stats_changed();
                }
            }
            Err(err) => warn!(error = %err, "failed to record session"),
        }
    }

    fn check_day_rollover(&mut self) {
        let today = self.clock.today();
        if today == self.today {
            return;
        }
        info!(from = %self.today, to = %today, "day rolled over");
        self.today = today;
        self.stats = load_stats(self.store.as_ref(), today);
        self.emit_stats_changed();
    }

    fn emit_phase_changed(&self) {
        for observer in &self.observers {
            observer.on_phase_changed(self.state.phase);
        }
    }

    fn emit_stats_changed(&self) {
        for observer in &self.observers {
            observer.on_stats_changed(self.stats);
        }
    }

    // ------------------------------------------------------------------------
    // Actor
    // ------------------------------------------------------------------------

    /// Moves the engine into a new task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> (EngineHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let task = tokio::spawn(self.run(rx));
        (EngineHandle::new(tx), task)
    }

    /// Runs the engine loop until every handle is dropped.
    ///
    /// Ticks and requests are processed one at a time, so a command never
    /// observes a half-applied tick. On exit the timer is reset.
    pub async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        debug!("timer engine started");
        loop {
            tokio::select! {
                biased;

                _ = self.ticker.tick() => self.handle_tick(Instant::now()),
                request = requests.recv() => match request {
                    Some(request) => self.handle_request(request),
                    None => break,
                },
            }
        }
        self.reset();
        debug!("timer engine stopped");
    }

    fn handle_request(&mut self, request: Request) {
        let now = Instant::now();
        let result = match request.command {
            Command::Start => self.start(now),
            Command::Pause => self.pause(now),
            Command::Reset => {
                self.reset();
                Ok(())
            }
            Command::Confirm(proceed) => self.confirm(proceed, now),
            Command::ApplyDurations(durations) => {
                self.apply_durations(durations);
                Ok(())
            }
            Command::Snapshot => Ok(()),
        };
        if let Err(err) = &result {
            debug!(command = ?request.command, error = %err, "command rejected");
        }
        // The caller may have given up waiting
        let _ = request.reply.send(result.map(|()| self.snapshot()));
    }
}

fn load_stats(store: &dyn SessionStore, date: NaiveDate) -> DailyStats {
    store.daily_stats(date).unwrap_or_else(|err| {
        warn!(error = %err, %date, "failed to load daily stats");
        DailyStats::default()
    })
}

// ============================================================================
// Tests
// ============================================================================
