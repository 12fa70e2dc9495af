//! SQLite-backed session store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row, Transaction};
use tracing::debug;

use super::{SessionStore, StoreError};
use crate::types::SessionRecord;

/// File name of the session database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "sessions.db";

const CURRENT_SCHEMA_VERSION: i32 = 1;
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Session store persisted in a single SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and brings its schema up
    /// to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        debug!(path = %path.display(), "opened session database");
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl SessionStore for SqliteStore {
    fn append(&self, record: &SessionRecord) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO task_record (date, start_time, end_time, duration_minutes, kind)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date.format(DATE_FORMAT).to_string(),
                record.started_at.format(DATETIME_FORMAT).to_string(),
                record.ended_at.format(DATETIME_FORMAT).to_string(),
                record.duration_minutes,
                record.kind,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM task_record WHERE date = ?1",
            params![date.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )?;
        to_u32(count, "count")
    }

    fn sum_duration_by_date(&self, date: NaiveDate) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(duration_minutes), 0) FROM task_record WHERE date = ?1",
            params![date.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )?;
        to_u32(total, "duration_minutes")
    }

    fn records_by_date(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, start_time, end_time, duration_minutes, kind
             FROM task_record
             WHERE date = ?1
             ORDER BY start_time ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![date.format(DATE_FORMAT).to_string()], RawRow::read)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

// ============================================================================
// Row conversion
// ============================================================================

struct RawRow {
    id: i64,
    date: String,
    start_time: String,
    end_time: String,
    duration_minutes: i64,
    kind: String,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            duration_minutes: row.get("duration_minutes")?,
            kind: row.get("kind")?,
        })
    }

    fn into_record(self) -> Result<SessionRecord, StoreError> {
        Ok(SessionRecord {
            id: Some(self.id),
            date: NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
                .map_err(|err| invalid("date", &self.date, err))?,
            started_at: parse_datetime(&self.start_time, "start_time")?,
            ended_at: parse_datetime(&self.end_time, "end_time")?,
            duration_minutes: to_u32(self.duration_minutes, "duration_minutes")?,
            kind: self.kind,
        })
    }
}

fn parse_datetime(value: &str, field: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|err| invalid(field, value, err))
}

fn to_u32(value: i64, field: &str) -> Result<u32, StoreError> {
    u32::try_from(value)
        .map_err(|_| StoreError::InvalidRow(format!("{field} value {value} out of range")))
}

fn invalid(field: &str, value: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::InvalidRow(format!("invalid {field} '{value}': {err}"))
}

// ============================================================================
// Migrations
// ============================================================================

fn run_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let mut version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    while version < CURRENT_SCHEMA_VERSION {
        version += 1;
        apply_migration(&tx, version)?;
        debug!(version, "applied session schema migration");
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<(), StoreError> {
    match version {
        1 => tx.execute_batch(include_str!("schemas/schema_v1.sql"))?,
        other => {
            return Err(StoreError::UnsupportedSchema {
                found: other,
                supported: CURRENT_SCHEMA_VERSION,
            })
        }
    }
    Ok(())
}
