//! Persisted application settings.
//!
//! A small TOML file under the `.errlens` root holding the UI defaults that
//! survive restarts. Missing files yield defaults; values are normalized on
//! load so a hand-edited file can never put the UI in an invalid state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::persist::{self, PersistError};

/// File name of the settings store inside the app root directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Could not resolve the application directory.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read the settings file.
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file is not valid TOML.
    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize settings for writing.
    #[error("Failed to serialize settings: {0}")]
    Serialize(toml::ser::Error),
    /// Failed to write the settings file.
    #[error(transparent)]
    Write(#[from] PersistError),
}

/// UI defaults persisted between launches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay between replay steps, in milliseconds.
    pub replay_step_ms: u64,
    /// Bin count preselected when a file is opened.
    pub default_bin_count: u32,
    /// Hull retention percentage preselected when a file is opened.
    pub default_hull_retention: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            replay_step_ms: 2000,
            default_bin_count: 10,
            default_hull_retention: 80,
        }
    }
}

impl Settings {
    /// Clamp persisted values into the ranges the UI controls accept.
    pub fn normalized(mut self) -> Self {
        self.replay_step_ms = self.replay_step_ms.max(100);
        self.default_bin_count = self.default_bin_count.clamp(1, 100);
        self.default_hull_retention = self.default_hull_retention.min(100);
        self
    }
}

/// Resolve the settings file path inside the app root directory.
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    Ok(app_dirs::app_root_dir()?.join(SETTINGS_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<Settings, SettingsError> {
    load_from(&settings_path()?)
}

/// Load settings from a specific path, returning defaults if missing.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(settings.normalized())
}

/// Persist settings to the default location, overwriting previous contents.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    save_to(settings, &settings_path()?)
}

/// Persist settings to a specific path atomically.
pub fn save_to(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    let data = toml::to_string_pretty(settings).map_err(SettingsError::Serialize)?;
    persist::atomic_write(path, data.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_from(&dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let settings = Settings {
            replay_step_ms: 750,
            default_bin_count: 25,
            default_hull_retention: 50,
        };
        save_to(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn out_of_range_values_are_normalized_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            "replay_step_ms = 1\ndefault_bin_count = 0\ndefault_hull_retention = 250\n",
        )
        .unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.replay_step_ms, 100);
        assert_eq!(loaded.default_bin_count, 1);
        assert_eq!(loaded.default_hull_retention, 100);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "replay_step_ms = 500\nfuture_option = true\n").unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.replay_step_ms, 500);
    }
}
