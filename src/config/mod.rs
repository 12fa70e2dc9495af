//! User settings.
//!
//! Settings are stored as one pretty-printed JSON file in the data
//! directory. Loading never fails: a missing or unreadable file yields the
//! defaults, and each out-of-range value is replaced by its default on its
//! own. The short key names `workTime`, `breakTime`, `workInformPath` and
//! `breakInformPath` are read as aliases.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::types::PhaseDurations;

/// File name of the settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Name of the application directory under the platform data directory.
pub const APP_DIR_NAME: &str = "xtimer";

/// Accepted work lengths in minutes.
pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);

/// Accepted break lengths in minutes.
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);

/// File extensions accepted for bell sounds.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "m4a", "ogg", "oga", "flac"];

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

/// Reads a minute count, mapping negative or oversized values to zero so
/// `sanitize` can replace them.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(u32::try_from(value).unwrap_or(0))
}

// ============================================================================
// Settings
// ============================================================================

/// Window geometry remembered between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 550,
            height: 380,
        }
    }
}

/// Display colors as `#RRGGBB` or `#RRGGBBAA` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    pub background: String,
    pub timer_text: String,
    pub state_text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: "#32783250".to_string(),
            timer_text: "#b41e1e".to_string(),
            state_text: "#327832".to_string(),
        }
    }
}

/// User settings.
///
/// # Example
///
/// ```
/// use xtimer::config::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.work_minutes, 25);
/// assert_eq!(settings.break_minutes, 5);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Work phase length in minutes
    #[serde(
        alias = "workTime",
        default = "default_work_minutes",
        deserialize_with = "lenient_minutes"
    )]
    pub work_minutes: u32,

    /// Break phase length in minutes
    #[serde(
        alias = "breakTime",
        default = "default_break_minutes",
        deserialize_with = "lenient_minutes"
    )]
    pub break_minutes: u32,

    /// Bell played when a work phase is about to start
    #[serde(alias = "workInformPath", default, skip_serializing_if = "Option::is_none")]
    pub work_sound_path: Option<PathBuf>,

    /// Bell played when a break phase is about to start
    #[serde(alias = "breakInformPath", default, skip_serializing_if = "Option::is_none")]
    pub break_sound_path: Option<PathBuf>,

    /// Window geometry
    #[serde(default)]
    pub window: WindowSize,

    /// Display colors
    #[serde(default)]
    pub colors: ColorScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            work_sound_path: None,
            break_sound_path: None,
            window: WindowSize::default(),
            colors: ColorScheme::default(),
        }
    }
}

impl Settings {
    /// Returns the phase lengths these settings describe.
    #[must_use]
    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations::from_minutes(self.work_minutes, self.break_minutes)
    }

    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = WORK_MINUTES_RANGE;
        if !(min..=max).contains(&self.work_minutes) {
            return Err(ConfigError::InvalidWorkMinutes {
                value: self.work_minutes,
                min,
                max,
            });
        }

        let (min, max) = BREAK_MINUTES_RANGE;
        if !(min..=max).contains(&self.break_minutes) {
            return Err(ConfigError::InvalidBreakMinutes {
                value: self.break_minutes,
                min,
                max,
            });
        }

        for path in [&self.work_sound_path, &self.break_sound_path]
            .into_iter()
            .flatten()
        {
            if !is_audio_file(path) {
                return Err(ConfigError::NotAudioFile(path.clone()));
            }
        }

        Ok(())
    }

    /// Replaces non-positive minute values by their defaults.
    fn sanitize(mut self) -> Self {
        if self.work_minutes == 0 {
            warn!("work time must be positive, using default");
            self.work_minutes = default_work_minutes();
        }
        if self.break_minutes == 0 {
            warn!("break time must be positive, using default");
            self.break_minutes = default_break_minutes();
        }
        // An empty path means no sound
        self.work_sound_path = self.work_sound_path.filter(|p| !p.as_os_str().is_empty());
        self.break_sound_path = self.break_sound_path.filter(|p| !p.as_os_str().is_empty());
        self
    }
}

/// Returns true if `path` has one of the accepted audio extensions.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

// ============================================================================
// SettingsStore
// ============================================================================

/// Reads and writes the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for the settings file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SETTINGS_FILE_NAME))
    }

    /// Returns the path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings, falling back to defaults.
    pub fn load(&self) -> Settings {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Settings::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read settings, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&data) {
            Ok(settings) => settings.sanitize(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "malformed settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Writes the settings, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, json).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Returns the platform data directory for the application.
///
/// Falls back to the current directory when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Tests
// ============================================================================
