//! Recent-files store.
//!
//! A JSON list under the `.errlens` root remembering how each file was last
//! opened: separator, index flag, the compared model pair, and the chosen
//! target/individual columns. The list is capped, kept most-recent-first,
//! and deduplicated by everything except the timestamp, so re-opening a file
//! with the same selection just moves it to the front.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::app_dirs;
use crate::persist::{self, PersistError};

/// File name of the recent-files store inside the app root directory.
pub const RECENT_FILE_NAME: &str = "recent_files.json";
/// Maximum number of remembered entries.
pub const MAX_RECENT_ENTRIES: usize = 10;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Errors raised while loading or saving the recent-files store.
#[derive(Debug, Error)]
pub enum RecentFilesError {
    /// Could not resolve the application directory.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read the store file.
    #[error("Failed to read recent files store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The store file is not a valid JSON list.
    #[error("Recent files store {path} is not a JSON list: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Failed to serialize the store for writing.
    #[error("Failed to serialize recent files: {0}")]
    Serialize(serde_json::Error),
    /// Failed to write the store file.
    #[error(transparent)]
    Write(#[from] PersistError),
}

/// One remembered file with the selections used to open it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub file_path: PathBuf,
    pub separator: char,
    pub has_index: bool,
    pub models: [String; 2],
    pub individual: Option<String>,
    pub target: String,
    pub opened_at: String,
}

impl RecentEntry {
    /// Whether two entries describe the same file and selection, ignoring
    /// when they were opened.
    pub fn same_selection(&self, other: &RecentEntry) -> bool {
        self.file_path == other.file_path
            && self.separator == other.separator
            && self.has_index == other.has_index
            && self.models == other.models
            && self.individual == other.individual
            && self.target == other.target
    }

    /// Short label for menus: file name plus the compared pair.
    pub fn menu_label(&self) -> String {
        format!(
            "{} - {} vs {}",
            self.file_path.display(),
            self.models[0],
            self.models[1]
        )
    }
}

/// Current wall-clock time formatted for `opened_at`.
pub fn timestamp_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| String::new())
}

/// Resolve the store path inside the app root directory.
pub fn store_path() -> Result<PathBuf, RecentFilesError> {
    Ok(app_dirs::app_root_dir()?.join(RECENT_FILE_NAME))
}

/// Load the store, skipping malformed entries with a warning.
pub fn load() -> Result<Vec<RecentEntry>, RecentFilesError> {
    load_from(&store_path()?)
}

/// Load the store from a specific path; a missing file is an empty list.
///
/// Each entry is decoded independently so one malformed record degrades to a
/// single warning instead of discarding the whole store.
pub fn load_from(path: &Path) -> Result<Vec<RecentEntry>, RecentFilesError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).map_err(|source| RecentFilesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&text).map_err(|source| RecentFilesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut entries = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<RecentEntry>(value) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                tracing::warn!("Skipping malformed recent-files entry: {err}");
            }
        }
    }
    entries.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
    entries.truncate(MAX_RECENT_ENTRIES);
    Ok(entries)
}

/// Record `entry` at the front of `entries`, deduplicating by selection and
/// enforcing the cap. Returns the updated list ready for saving.
pub fn record(entries: &mut Vec<RecentEntry>, entry: RecentEntry) {
    entries.retain(|existing| !existing.same_selection(&entry));
    entries.insert(0, entry);
    entries.truncate(MAX_RECENT_ENTRIES);
}

/// Persist the store to the default location.
pub fn save(entries: &[RecentEntry]) -> Result<(), RecentFilesError> {
    save_to(entries, &store_path()?)
}

/// Persist the store to a specific path atomically.
pub fn save_to(entries: &[RecentEntry], path: &Path) -> Result<(), RecentFilesError> {
    let data = serde_json::to_vec_pretty(entries).map_err(RecentFilesError::Serialize)?;
    persist::atomic_write(path, &data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(path: &str, stamp: &str) -> RecentEntry {
        RecentEntry {
            file_path: PathBuf::from(path),
            separator: ',',
            has_index: false,
            models: ["alpha".into(), "beta".into()],
            individual: None,
            target: "load".into(),
            opened_at: stamp.into(),
        }
    }

    #[test]
    fn round_trip_preserves_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        let entries = vec![
            entry("b.csv", "2026-02-01 10:00:00"),
            entry("a.csv", "2026-01-01 10:00:00"),
        ];
        save_to(&entries, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), entries);
    }

    #[test]
    fn record_moves_existing_selection_to_front() {
        let mut entries = vec![
            entry("a.csv", "2026-01-01 10:00:00"),
            entry("b.csv", "2026-01-01 09:00:00"),
        ];
        record(&mut entries, entry("b.csv", "2026-01-02 12:00:00"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_path, PathBuf::from("b.csv"));
        assert_eq!(entries[0].opened_at, "2026-01-02 12:00:00");
    }

    #[test]
    fn record_caps_the_list() {
        let mut entries = Vec::new();
        for idx in 0..12 {
            record(
                &mut entries,
                entry(&format!("file_{idx}.csv"), &format!("2026-01-01 10:00:{idx:02}")),
            );
        }
        assert_eq!(entries.len(), MAX_RECENT_ENTRIES);
        assert_eq!(entries[0].file_path, PathBuf::from("file_11.csv"));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        let good = entry("a.csv", "2026-01-01 10:00:00");
        let text = format!(
            "[{},{{\"file_path\": \"broken.csv\"}}]",
            serde_json::to_string(&good).unwrap()
        );
        std::fs::write(&path, text).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, vec![good]);
    }

    #[test]
    fn missing_store_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_from(&dir.path().join(RECENT_FILE_NAME)).unwrap().is_empty());
    }

    #[test]
    fn load_orders_most_recent_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RECENT_FILE_NAME);
        let entries = vec![
            entry("old.csv", "2025-01-01 10:00:00"),
            entry("new.csv", "2026-01-01 10:00:00"),
        ];
        save_to(&entries, &path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded[0].file_path, PathBuf::from("new.csv"));
    }
}
