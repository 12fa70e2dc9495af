//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

const BEEP_FREQUENCY_HZ: f32 = 880.0;
const BEEP_LENGTH: Duration = Duration::from_millis(400);
const BEEP_VOLUME: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// The rodio output stream cannot leave the thread that opened it, so this
/// player is not `Send`. Use `AudioWorker` to play from async code.
/// Sound playback is non-blocking; sounds continue playing in the background.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound from the given source.
    ///
    /// A file that cannot be opened or decoded falls back to the beep.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { name, path } => {
                debug!(name = %name, "Playing sound file");
                match self.play_file(path) {
                    Err(e) if e.should_fallback_to_beep() => {
                        warn!(name = %name, error = %e, "Failed to play sound file, falling back to beep");
                        self.play_beep()
                    }
                    other => other,
                }
            }
            SoundSource::Beep => self.play_beep(),
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        sink.detach(); // Non-blocking: sound continues after function returns

        debug!("Sound playback started (detached)");
        Ok(())
    }

    fn play_beep(&self) -> Result<(), SoundError> {
        let beep = SineWave::new(BEEP_FREQUENCY_HZ)
            .take_duration(BEEP_LENGTH)
            .amplify(BEEP_VOLUME);
        let sink = self.new_sink()?;
        sink.append(beep);
        sink.detach();
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
