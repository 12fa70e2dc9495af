//! Sound playback for phase bells.
//!
//! This module provides audio notification capabilities, including:
//!
//! - User-chosen bell files for work and break
//! - A synthesized fallback beep
//! - Non-blocking playback on a dedicated audio thread
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  crossbeam   ┌──────────────────┐
//! │   AudioWorker    │─────────────▶│ RodioSoundPlayer │
//! │  (any thread)    │   channel    │ (audio thread)   │
//! └──────────────────┘              └────────┬─────────┘
//!                                            │
//!                                            ▼
//!                                   ┌──────────────────┐
//!                                   │   SoundSource    │
//!                                   │  File │ Beep     │
//!                                   └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use xtimer::config::Settings;
//! use xtimer::sound::{AudioWorker, SoundPlayer, SoundSource};
//! use xtimer::types::Phase;
//!
//! let worker = AudioWorker::spawn().expect("audio thread");
//! let bell = SoundSource::for_next_phase(&Settings::default(), Phase::Breaking);
//! worker.play(&bell).expect("playback failed");
//! ```

mod error;
mod player;
mod source;
mod worker;

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::SoundSource;
pub use worker::AudioWorker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(source.clone());
        Ok(())
    }
}
