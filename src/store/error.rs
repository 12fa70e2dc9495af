//! Session store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing completed sessions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite database reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database directory could not be prepared.
    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be converted back into a record.
    #[error("Invalid row in session store: {0}")]
    InvalidRow(String),

    /// The schema on disk is newer than this build understands.
    #[error("Database version ({found}) is newer than supported schema ({supported})")]
    UnsupportedSchema {
        /// Version found in the database
        found: i32,
        /// Highest version this build can read
        supported: i32,
    },

    /// A lock guarding the store was poisoned.
    #[error("Session store lock poisoned")]
    LockPoisoned,

    /// Simulated failure from the in-memory store.
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if the error came from the database engine.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::UnsupportedSchema { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidRow("bad date".to_string());
        assert!(err.to_string().contains("bad date"));

        let err = StoreError::UnsupportedSchema {
            found: 9,
            supported: 1,
        };
        assert!(err.to_string().contains("(9)"));
        assert!(err.is_database_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(!err.is_database_error());
    }
}
