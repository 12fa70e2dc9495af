//! Dedicated audio thread.
//!
//! `RodioSoundPlayer` must stay on the thread that opened the output
//! stream. `AudioWorker` owns that thread and forwards play requests to it
//! over a crossbeam channel, so the rest of the application can trigger
//! bells from any thread or task.

use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, warn};

use super::error::SoundError;
use super::player::RodioSoundPlayer;
use super::source::SoundSource;
use super::SoundPlayer;

enum AudioRequest {
    Play(SoundSource),
    Shutdown,
}

/// Handle to the audio thread.
///
/// Dropping the worker stops the thread.
pub struct AudioWorker {
    sender: Sender<AudioRequest>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl AudioWorker {
    /// Starts the audio thread.
    ///
    /// Opening the audio device happens on the new thread; when it fails the
    /// failure is logged once and every request is dropped.
    pub fn spawn() -> Result<Self, SoundError> {
        let (sender, receiver) = unbounded();

        let thread = thread::Builder::new()
            .name("xtimer-audio".to_string())
            .spawn(move || run(receiver))
            .map_err(|e| SoundError::PlaybackError(format!("failed to start audio thread: {e}")))?;

        Ok(Self {
            sender,
            thread: Mutex::new(Some(thread)),
        })
    }
}

fn run(receiver: Receiver<AudioRequest>) {
    let player = match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!(error = %e, suggestion = e.suggestion(), "Audio not available, sound disabled");
            None
        }
    };

    for request in receiver.iter() {
        match request {
            AudioRequest::Play(source) => {
                let Some(player) = &player else { continue };
                if let Err(e) = player.play(&source) {
                    warn!(sound = source.name(), error = %e, "Failed to play bell");
                }
            }
            AudioRequest::Shutdown => break,
        }
    }
    debug!("Audio thread stopped");
}

impl SoundPlayer for AudioWorker {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.sender
            .send(AudioRequest::Play(source.clone()))
            .map_err(|_| SoundError::PlaybackError("audio thread stopped".to_string()))
    }
}

impl Drop for AudioWorker {
    fn drop(&mut self) {
        let mut guard = match self.thread.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            // The thread may already be gone if it panicked
            let _ = self.sender.send(AudioRequest::Shutdown);
            if let Err(join_err) = handle.join() {
                error!("Failed to join audio thread: {join_err:?}");
            }
        }
    }
}

impl std::fmt::Debug for AudioWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioWorker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_play_and_drop() {
        // Works with or without an audio device
        let worker = AudioWorker::spawn().unwrap();
        assert!(worker.play(&SoundSource::Beep).is_ok());
        drop(worker);
    }

    #[test]
    fn test_debug_impl() {
        let worker = AudioWorker::spawn().unwrap();
        assert!(format!("{worker:?}").contains("AudioWorker"));
    }
}
