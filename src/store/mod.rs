//! Persistence of completed work sessions.
//!
//! Sessions are append-only and keyed by the calendar date they started on.
//! This module provides:
//! - The `SessionStore` trait consumed by the timer engine
//! - `SqliteStore`, the on-disk implementation
//! - `MemoryStore`, an in-memory implementation for tests and headless runs
//! - `stats_for_last_days` for multi-day reports

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::{SqliteStore, DATABASE_FILE_NAME};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{Days, NaiveDate};

use crate::types::{DailyStats, SessionRecord};

// ============================================================================
// SessionStore
// ============================================================================

/// Storage for completed work sessions.
pub trait SessionStore: Send + Sync {
    /// Appends one record and returns the id assigned to it.
    fn append(&self, record: &SessionRecord) -> Result<i64, StoreError>;

    /// Returns the number of sessions recorded on `date`.
    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StoreError>;

    /// Returns the summed duration in minutes of sessions on `date`.
    ///
    /// A date without sessions sums to zero.
    fn sum_duration_by_date(&self, date: NaiveDate) -> Result<u32, StoreError>;

    /// Returns the sessions recorded on `date`, ordered by start time.
    fn records_by_date(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StoreError>;

    /// Returns count and total minutes for `date`.
    fn daily_stats(&self, date: NaiveDate) -> Result<DailyStats, StoreError> {
        Ok(DailyStats::new(
            self.count_by_date(date)?,
            self.sum_duration_by_date(date)?,
        ))
    }
}

/// Returns per-day statistics for `days` consecutive dates ending at `end`.
///
/// The most recent date comes first.
pub fn stats_for_last_days<S>(
    store: &S,
    end: NaiveDate,
    days: u32,
) -> Result<Vec<(NaiveDate, DailyStats)>, StoreError>
where
    S: SessionStore + ?Sized,
{
    let mut result = Vec::with_capacity(days as usize);
    for offset in 0..days {
        let Some(date) = end.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        result.push((date, store.daily_stats(date)?));
    }
    Ok(result)
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory session store.
///
/// Can be told to fail every call, which lets tests exercise the engine's
/// error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SessionRecord>>,
    should_fail: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns a copy of every stored record in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated failure".to_string()));
        }
        Ok(())
    }

    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut Vec<SessionRecord>) -> T,
    ) -> Result<T, StoreError> {
        self.check()?;
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&mut records))
    }
}

impl SessionStore for MemoryStore {
    fn append(&self, record: &SessionRecord) -> Result<i64, StoreError> {
        self.with_records(|records| {
            let id = records.len() as i64 + 1;
            records.push(record.clone().with_id(id));
            id
        })
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StoreError> {
        self.with_records(|records| records.iter().filter(|r| r.date == date).count() as u32)
    }

    fn sum_duration_by_date(&self, date: NaiveDate) -> Result<u32, StoreError> {
        self.with_records(|records| {
            records
                .iter()
                .filter(|r| r.date == date)
                .map(|r| r.duration_minutes)
                .sum()
        })
    }

    fn records_by_date(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StoreError> {
        self.with_records(|records| {
            let mut matching: Vec<SessionRecord> =
                records.iter().filter(|r| r.date == date).cloned().collect();
            // Stable sort keeps insertion order for equal start times
            matching.sort_by_key(|r| r.started_at);
            matching
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::time::Duration;

    fn record_at(day: u32, hour: u32, minutes: u64) -> SessionRecord {
        let start = Local.with_ymd_and_hms(2024, 4, day, hour, 0, 0).unwrap();
        let end = start + chrono::Duration::minutes(minutes as i64);
        SessionRecord::pomodoro(start, end, Duration::from_secs(minutes * 60))
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    mod memory_store_tests {
        use super::*;

        #[test]
        fn test_append_assigns_increasing_ids() {
            let store = MemoryStore::new();
            assert_eq!(store.append(&record_at(1, 9, 25)).unwrap(), 1);
            assert_eq!(store.append(&record_at(1, 10, 25)).unwrap(), 2);
            assert_eq!(store.records()[1].id, Some(2));
        }

        #[test]
        fn test_aggregates_by_date() {
            let store = MemoryStore::new();
            store.append(&record_at(1, 9, 25)).unwrap();
            store.append(&record_at(1, 11, 30)).unwrap();
            store.append(&record_at(2, 9, 25)).unwrap();

            assert_eq!(store.count_by_date(date(1)).unwrap(), 2);
            assert_eq!(store.sum_duration_by_date(date(1)).unwrap(), 55);
            assert_eq!(store.daily_stats(date(2)).unwrap(), DailyStats::new(1, 25));
        }

        #[test]
        fn test_empty_date_sums_to_zero() {
            let store = MemoryStore::new();
            assert_eq!(store.count_by_date(date(5)).unwrap(), 0);
            assert_eq!(store.sum_duration_by_date(date(5)).unwrap(), 0);
        }

        #[test]
        fn test_records_by_date_are_ordered_by_start() {
            let store = MemoryStore::new();
            store.append(&record_at(1, 15, 25)).unwrap();
            store.append(&record_at(1, 8, 25)).unwrap();

            let records = store.records_by_date(date(1)).unwrap();
            assert_eq!(records.len(), 2);
            assert!(records[0].started_at < records[1].started_at);
        }

        #[test]
        fn test_should_fail() {
            let store = MemoryStore::new();
            store.set_should_fail(true);
            assert!(store.append(&record_at(1, 9, 25)).is_err());
            assert!(store.daily_stats(date(1)).is_err());

            store.set_should_fail(false);
            assert!(store.append(&record_at(1, 9, 25)).is_ok());
            assert_eq!(store.records().len(), 1);
        }
    }

    mod stats_for_last_days_tests {
        use super::*;

        #[test]
        fn test_most_recent_first() {
            let store = MemoryStore::new();
            store.append(&record_at(3, 9, 25)).unwrap();
            store.append(&record_at(1, 9, 25)).unwrap();
            store.append(&record_at(1, 10, 25)).unwrap();

            let stats = stats_for_last_days(&store, date(3), 3).unwrap();

            assert_eq!(
                stats,
                vec![
                    (date(3), DailyStats::new(1, 25)),
                    (date(2), DailyStats::default()),
                    (date(1), DailyStats::new(2, 50)),
                ]
            );
        }

        #[test]
        fn test_zero_days() {
            let store = MemoryStore::new();
            assert!(stats_for_last_days(&store, date(3), 0).unwrap().is_empty());
        }

        #[test]
        fn test_works_through_trait_object() {
            let store: Box<dyn SessionStore> = Box::new(MemoryStore::new());
            let stats = stats_for_last_days(store.as_ref(), date(3), 2).unwrap();
            assert_eq!(stats.len(), 2);
        }

        #[test]
        fn test_propagates_errors() {
            let store = MemoryStore::new();
            store.set_should_fail(true);
            assert!(stats_for_last_days(&store, date(3), 2).is_err());
        }
    }
}
