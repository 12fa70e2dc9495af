//! xtimer library
//!
//! This library provides the core functionality of the xtimer CLI.
//! It includes:
//! - Timer engine running work and break phases on a tokio task
//! - Session persistence in SQLite and per-day statistics
//! - Settings stored as JSON in the data directory
//! - Bell playback for phase changes
//! - CLI command parsing, display utilities, and the interactive shell

pub mod app;
pub mod cli;
pub mod config;
pub mod sound;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use app::{open_log_file, App, LOG_FILE_NAME};
pub use config::{ConfigError, Settings, SettingsStore};
pub use store::{stats_for_last_days, MemoryStore, SessionStore, SqliteStore, StoreError};
pub use timer::{
    EngineError, EngineHandle, EngineSnapshot, TimerEngine, TimerEvent, TimerState,
};
pub use types::{DailyStats, Phase, PhaseDurations, SessionRecord};

// Re-export sound types
pub use sound::{AudioWorker, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
