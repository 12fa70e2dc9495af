//! Application context.
//!
//! `App` owns everything that outlives a single command: the data
//! directory, the settings and their store, and the session database. It is
//! created once in `main` and passed down; nothing here is global.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{Settings, SettingsStore};
use crate::store::{SessionStore, SqliteStore, DATABASE_FILE_NAME};
use crate::timer::{EngineHandle, SystemClock, TimerEngine, TimerEvent};
use crate::types::PhaseDurations;

/// Log file written inside the data directory while the timer runs.
pub const LOG_FILE_NAME: &str = "xtimer.log";

/// Opens the log file in `data_dir` for appending, creating both as needed.
pub fn open_log_file(data_dir: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(data_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE_NAME))
}

/// Shared application state.
pub struct App {
    data_dir: PathBuf,
    settings_store: SettingsStore,
    settings: Settings,
    sessions: Arc<dyn SessionStore>,
}

impl App {
    /// Opens the application state in `data_dir`, creating it if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let settings_store = SettingsStore::in_dir(&data_dir);
        let settings = settings_store.load();

        let db_path = data_dir.join(DATABASE_FILE_NAME);
        let sessions = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open session database {}", db_path.display()))?;

        debug!(data_dir = %data_dir.display(), "application state opened");

        Ok(Self {
            data_dir,
            settings_store,
            settings,
            sessions: Arc::new(sessions),
        })
    }

    /// Creates an application context from parts.
    pub fn from_parts(
        data_dir: PathBuf,
        settings_store: SettingsStore,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let settings = settings_store.load();
        Self {
            data_dir,
            settings_store,
            settings,
            sessions,
        }
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the path of the settings file.
    pub fn settings_path(&self) -> &Path {
        self.settings_store.path()
    }

    /// Returns the session store.
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Validates and saves new settings, then makes them current.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.settings_store
            .save(&settings)
            .context("Failed to save settings")?;
        self.settings = settings;
        Ok(())
    }

    /// Spawns a timer engine that reports to `events`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_engine(
        &self,
        durations: PhaseDurations,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> (EngineHandle, JoinHandle<()>) {
        TimerEngine::new(durations, Arc::clone(&self.sessions), Arc::new(SystemClock))
            .with_observer(events.clone())
            .with_notifier(events)
            .spawn()
    }
}
