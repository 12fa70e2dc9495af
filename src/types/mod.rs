//! Core data types for the timer.
//!
//! This module defines the data structures shared by the engine, the
//! session store and the terminal shell:
//! - Timer phases
//! - Phase durations taken from the settings snapshot
//! - Completed session records and daily statistics

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kind tag stored with every completed work session.
pub const SESSION_KIND_POMODORO: &str = "pomodoro";

// ============================================================================
// Phase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Timer is idle (not started, reset, or waiting for confirmation)
    #[default]
    Idle,
    /// Currently in a work session
    Working,
    /// Currently in a break
    Breaking,
    /// Timer is paused
    Paused,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Working => "working",
            Phase::Breaking => "breaking",
            Phase::Paused => "paused",
        }
    }

    /// Returns a human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Working => "Focusing",
            Phase::Breaking => "On break",
            Phase::Paused => "Paused",
        }
    }

    /// Returns true if the phase counts down time.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Working | Phase::Breaking)
    }

    /// Returns the phase that follows this one on natural completion.
    ///
    /// Only meaningful for active phases; everything else leads to work.
    pub fn following(&self) -> Phase {
        match self {
            Phase::Working => Phase::Breaking,
            _ => Phase::Working,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PhaseDurations
// ============================================================================

/// Snapshot of the configured phase lengths.
///
/// The engine reads this when a phase starts; changing it never affects a
/// phase that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Length of a work phase
    pub work: Duration,
    /// Length of a break phase
    pub brk: Duration,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::from_minutes(25, 5)
    }
}

impl PhaseDurations {
    /// Creates durations from whole minutes.
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work: Duration::from_secs(u64::from(work_minutes) * 60),
            brk: Duration::from_secs(u64::from(break_minutes) * 60),
        }
    }

    /// Returns the length of the given phase.
    ///
    /// Non-active phases report the work length, which is what the idle
    /// display shows.
    pub fn length_of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Breaking => self.brk,
            _ => self.work,
        }
    }
}

// ============================================================================
// SessionRecord
// ============================================================================

/// One completed work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Row id assigned by the store (`None` before insertion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Calendar date the session started on
    pub date: NaiveDate,
    /// Local wall-clock start time
    pub started_at: NaiveDateTime,
    /// Local wall-clock end time
    pub ended_at: NaiveDateTime,
    /// Planned phase length in whole minutes, rounded up
    pub duration_minutes: u32,
    /// Session kind tag
    pub kind: String,
}

impl SessionRecord {
    /// Creates a pomodoro record for a work phase of length `total`.
    pub fn pomodoro(started_at: DateTime<Local>, ended_at: DateTime<Local>, total: Duration) -> Self {
        let started_at = started_at.naive_local();
        Self {
            id: None,
            date: started_at.date(),
            started_at,
            ended_at: ended_at.naive_local(),
            duration_minutes: ceil_minutes(total),
            kind: SESSION_KIND_POMODORO.to_string(),
        }
    }

    /// Returns a copy of this record carrying the given row id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Rounds a duration up to whole minutes.
pub fn ceil_minutes(duration: Duration) -> u32 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    u32::try_from(secs.div_ceil(60)).unwrap_or(u32::MAX)
}

// ============================================================================
// DailyStats
// ============================================================================

/// Aggregated statistics for one calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Number of completed work sessions
    pub count: u32,
    /// Sum of session durations in minutes
    pub total_minutes: u32,
}

impl DailyStats {
    /// Creates stats from raw values.
    pub fn new(count: u32, total_minutes: u32) -> Self {
        Self {
            count,
            total_minutes,
        }
    }

    /// Adds one completed session.
    pub fn record(&mut self, duration_minutes: u32) {
        self.count = self.count.saturating_add(1);
        self.total_minutes = self.total_minutes.saturating_add(duration_minutes);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // ------------------------------------------------------------------------
    // Phase Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(Phase::default(), Phase::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Phase::Idle.as_str(), "idle");
            assert_eq!(Phase::Working.as_str(), "working");
            assert_eq!(Phase::Breaking.as_str(), "breaking");
            assert_eq!(Phase::Paused.as_str(), "paused");
        }

        #[test]
        fn test_is_active() {
            assert!(!Phase::Idle.is_active());
            assert!(Phase::Working.is_active());
            assert!(Phase::Breaking.is_active());
            assert!(!Phase::Paused.is_active());
        }

        #[test]
        fn test_following_alternates() {
            assert_eq!(Phase::Working.following(), Phase::Breaking);
            assert_eq!(Phase::Breaking.following(), Phase::Working);
            assert_eq!(Phase::Idle.following(), Phase::Working);
        }

        #[test]
        fn test_serialize_deserialize() {
            let json = serde_json::to_string(&Phase::Breaking).unwrap();
            assert_eq!(json, "\"breaking\"");

            let phase: Phase = serde_json::from_str("\"paused\"").unwrap();
            assert_eq!(phase, Phase::Paused);
        }

        #[test]
        fn test_display() {
            assert_eq!(Phase::Working.to_string(), "working");
        }
    }

    // ------------------------------------------------------------------------
    // PhaseDurations Tests
    // ------------------------------------------------------------------------

    mod phase_durations_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let durations = PhaseDurations::default();
            assert_eq!(durations.work, Duration::from_secs(25 * 60));
            assert_eq!(durations.brk, Duration::from_secs(5 * 60));
        }

        #[test]
        fn test_length_of() {
            let durations = PhaseDurations::from_minutes(50, 10);
            assert_eq!(durations.length_of(Phase::Working), Duration::from_secs(3000));
            assert_eq!(durations.length_of(Phase::Breaking), Duration::from_secs(600));
            assert_eq!(durations.length_of(Phase::Idle), Duration::from_secs(3000));
        }
    }

    // ------------------------------------------------------------------------
    // SessionRecord Tests
    // ------------------------------------------------------------------------

    mod session_record_tests {
        use super::*;

        #[test]
        fn test_ceil_minutes() {
            assert_eq!(ceil_minutes(Duration::ZERO), 0);
            assert_eq!(ceil_minutes(Duration::from_secs(60)), 1);
            assert_eq!(ceil_minutes(Duration::from_secs(61)), 2);
            assert_eq!(ceil_minutes(Duration::from_millis(60_001)), 2);
            assert_eq!(ceil_minutes(Duration::from_secs(25 * 60)), 25);
        }

        #[test]
        fn test_pomodoro_record() {
            let start = Local.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
            let end = Local.with_ymd_and_hms(2024, 3, 9, 9, 25, 0).unwrap();

            let record = SessionRecord::pomodoro(start, end, Duration::from_secs(25 * 60));

            assert_eq!(record.id, None);
            assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
            assert_eq!(record.started_at, start.naive_local());
            assert_eq!(record.ended_at, end.naive_local());
            assert_eq!(record.duration_minutes, 25);
            assert_eq!(record.kind, SESSION_KIND_POMODORO);
        }

        #[test]
        fn test_record_date_comes_from_start() {
            let start = Local.with_ymd_and_hms(2024, 3, 9, 23, 50, 0).unwrap();
            let end = Local.with_ymd_and_hms(2024, 3, 10, 0, 15, 0).unwrap();

            let record = SessionRecord::pomodoro(start, end, Duration::from_secs(25 * 60));

            assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        }

        #[test]
        fn test_with_id() {
            let start = Local.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
            let record = SessionRecord::pomodoro(start, start, Duration::from_secs(60)).with_id(7);
            assert_eq!(record.id, Some(7));
        }
    }

    // ------------------------------------------------------------------------
    // DailyStats Tests
    // ------------------------------------------------------------------------

    mod daily_stats_tests {
        use super::*;

        #[test]
        fn test_record_accumulates() {
            let mut stats = DailyStats::default();
            stats.record(25);
            stats.record(30);
            assert_eq!(stats, DailyStats::new(2, 55));
        }
    }
}
