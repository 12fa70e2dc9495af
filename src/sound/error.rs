//! Sound system error types.
//!
//! Every sound error is recoverable: the timer keeps running when a bell
//! cannot be played.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("Sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("Failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("Failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("Sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the synthesized beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio device or run with --no-sound",
            Self::FileNotFound(_) => "Check the path with `xtimer settings show`",
            Self::DecodeError(_) => "Use an mp3, wav, ogg or flac file",
            Self::StreamError(_) => "Check the system audio settings",
            Self::PlaybackError(_) => "Restart the timer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("Audio device not available"));

        let err = SoundError::FileNotFound("/path/to/bell.mp3".to_string());
        assert!(err.to_string().contains("/path/to/bell.mp3"));

        let err = SoundError::DecodeError("invalid format".to_string());
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn test_is_device_error() {
        assert!(SoundError::DeviceNotAvailable("x".into()).is_device_error());
        assert!(SoundError::StreamError("x".into()).is_device_error());
        assert!(!SoundError::FileNotFound("x".into()).is_device_error());
        assert!(!SoundError::PlaybackError("x".into()).is_device_error());
    }

    #[test]
    fn test_should_fallback_to_beep() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_beep());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_beep());
        assert!(!SoundError::DeviceNotAvailable("x".into()).should_fallback_to_beep());
        assert!(!SoundError::StreamError("x".into()).should_fallback_to_beep());
    }

    #[test]
    fn test_suggestion() {
        assert!(SoundError::DeviceNotAvailable("x".into())
            .suggestion()
            .contains("--no-sound"));
        assert!(SoundError::DecodeError("x".into())
            .suggestion()
            .contains("mp3"));
    }
}
