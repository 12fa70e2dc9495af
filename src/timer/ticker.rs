//! Cancellable periodic ticker.
//!
//! The ticker is owned by the engine task. Stopping it drops the underlying
//! `Interval`, so once `stop` returns no further tick can be delivered.

use std::future;

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Interval between engine ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A periodic tick source that can be started and stopped.
///
/// The underlying `Interval` is created on the first `tick` after `start`,
/// so a ticker can be started and stopped outside of a runtime.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    schedule: Schedule,
}

#[derive(Debug)]
enum Schedule {
    Stopped,
    Armed(Instant),
    Running(Interval),
}

impl Ticker {
    /// Creates a stopped ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            schedule: Schedule::Stopped,
        }
    }

    /// Starts (or restarts) ticking; the first tick fires one period from now.
    pub fn start(&mut self) {
        self.schedule = Schedule::Armed(Instant::now());
    }

    /// Stops ticking. Stopping a stopped ticker is a no-op.
    pub fn stop(&mut self) {
        self.schedule = Schedule::Stopped;
    }

    /// Returns true if the ticker is running.
    pub fn is_active(&self) -> bool {
        !matches!(self.schedule, Schedule::Stopped)
    }

    /// Waits for the next tick.
    ///
    /// Never resolves while the ticker is stopped.
    pub async fn tick(&mut self) -> Instant {
        if let Schedule::Armed(started_at) = self.schedule {
            let mut interval = interval_at(started_at + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.schedule = Schedule::Running(interval);
        }
        match &mut self.schedule {
            Schedule::Running(interval) => interval.tick().await,
            _ => future::pending().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}
