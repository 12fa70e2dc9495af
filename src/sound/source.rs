//! Sound source selection.
//!
//! A bell is either a user-chosen audio file or a short synthesized beep.
//! The beep is also the fallback when a file cannot be played.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::types::Phase;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file chosen by the user.
    File {
        /// Display name (the file stem).
        name: String,
        /// Full path to the sound file.
        path: PathBuf,
    },
    /// A synthesized beep.
    Beep,
}

impl SoundSource {
    /// Creates a file source named after the file stem.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::File { name, path }
    }

    /// Returns the bell announcing `next`.
    ///
    /// The break bell rings when a break is about to start and the work bell
    /// when work is about to start. A missing path selects the beep.
    #[must_use]
    pub fn for_next_phase(settings: &Settings, next: Phase) -> Self {
        let path = match next {
            Phase::Breaking => settings.break_sound_path.as_deref(),
            _ => settings.work_sound_path.as_deref(),
        };
        path.map(Self::file).unwrap_or(Self::Beep)
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } => name,
            Self::Beep => "beep",
        }
    }

    /// Returns true if this is a file source.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Beep => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_name_from_stem() {
        let source = SoundSource::file("/music/bells/gong.mp3");
        assert!(source.is_file());
        assert_eq!(source.name(), "gong");
        assert_eq!(source.path(), Some(Path::new("/music/bells/gong.mp3")));
    }

    #[test]
    fn test_beep() {
        let source = SoundSource::Beep;
        assert!(!source.is_file());
        assert_eq!(source.name(), "beep");
        assert!(source.path().is_none());
    }

    #[test]
    fn test_for_next_phase_picks_matching_bell() {
        let settings = Settings {
            work_sound_path: Some(PathBuf::from("/s/work.mp3")),
            break_sound_path: Some(PathBuf::from("/s/break.mp3")),
            ..Settings::default()
        };

        assert_eq!(
            SoundSource::for_next_phase(&settings, Phase::Breaking),
            SoundSource::file("/s/break.mp3")
        );
        assert_eq!(
            SoundSource::for_next_phase(&settings, Phase::Working),
            SoundSource::file("/s/work.mp3")
        );
    }

    #[test]
    fn test_for_next_phase_without_paths_beeps() {
        let settings = Settings::default();
        assert_eq!(
            SoundSource::for_next_phase(&settings, Phase::Breaking),
            SoundSource::Beep
        );
    }
}
