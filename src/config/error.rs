//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Work length outside the accepted range.
    #[error("Work time must be between {min} and {max} minutes (got {value})")]
    InvalidWorkMinutes {
        /// Rejected value
        value: u32,
        /// Lowest accepted value
        min: u32,
        /// Highest accepted value
        max: u32,
    },

    /// Break length outside the accepted range.
    #[error("Break time must be between {min} and {max} minutes (got {value})")]
    InvalidBreakMinutes {
        /// Rejected value
        value: u32,
        /// Lowest accepted value
        min: u32,
        /// Highest accepted value
        max: u32,
    },

    /// Sound path that does not look like an audio file.
    #[error("Not an audio file: {}", .0.display())]
    NotAudioFile(PathBuf),

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Settings file could not be written.
    #[error("Failed to write settings file {}: {source}", .path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns true if the error is a rejected value rather than an I/O
    /// failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkMinutes { .. } | Self::InvalidBreakMinutes { .. } | Self::NotAudioFile(_)
        )
    }
}
