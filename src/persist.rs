//! Atomic file persistence shared by the settings and recent-files stores.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while writing an application file to disk.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Failed to create the parent directory for the file.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write or replace the file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `data` to `path` atomically: the bytes land in a temporary sibling
/// file first, are fsync'd, and only then renamed over the destination, so a
/// crash can never leave a partially written file behind.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), PersistError> {
    let dir = path.parent().ok_or_else(|| PersistError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("path has no parent directory"),
    })?;
    std::fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let file_name = path.file_name().ok_or_else(|| PersistError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("path has no file name"),
    })?;

    let mut last_err = None;
    for _ in 0..5 {
        let tmp_path = dir.join(format!(
            "{}.tmp-{}",
            file_name.to_string_lossy(),
            random_suffix()
        ));
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path);
        let mut file = match file {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(source) => {
                return Err(PersistError::Write {
                    path: tmp_path,
                    source,
                });
            }
        };

        let written = file.write_all(data).and_then(|()| file.sync_all());
        if let Err(source) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(PersistError::Write {
                path: tmp_path,
                source,
            });
        }
        drop(file);
        if let Err(source) = replace_file(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(PersistError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        sync_parent_dir(dir)?;
        return Ok(());
    }

    Err(PersistError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "failed to create temporary file: {}",
                last_err
                    .as_ref()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "unknown error".into())
            ),
        ),
    })
}

fn random_suffix() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 6];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn replace_file(temp_path: &Path, path: &Path) -> Result<(), std::io::Error> {
    match std::fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            #[cfg(target_os = "windows")]
            if err.kind() == std::io::ErrorKind::AlreadyExists
                || err.kind() == std::io::ErrorKind::PermissionDenied
            {
                if let Err(inner) = std::fs::remove_file(path) {
                    if inner.kind() != std::io::ErrorKind::NotFound {
                        return Err(inner);
                    }
                }
                std::fs::rename(temp_path, path)?;
                return Ok(());
            }
            Err(err)
        }
    }
}

fn sync_parent_dir(dir: &Path) -> Result<(), PersistError> {
    #[cfg(unix)]
    {
        let handle = std::fs::File::open(dir).map_err(|source| PersistError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        handle.sync_all().map_err(|source| PersistError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_contents_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        atomic_write(&path, b"[1,2,3]").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"[1,2,3]");
        let siblings = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(siblings, 1);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("store.json");
        atomic_write(&path, b"x").unwrap();
        assert!(path.is_file());
    }
}
