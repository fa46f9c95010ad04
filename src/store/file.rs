//! Directory-backed [`DurableStore`]; each slot is one file.

use crate::store::{DurableStore, StoreError};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Persists each slot to `<dir>/<name>.json`, replacing it atomically.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (or creates) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::backend(format!("Failed to create store directory {}: {e}", dir.display()))
        })?;

        Ok(Self { dir })
    }

    fn slot_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !name.starts_with('.');

        if !valid {
            return Err(StoreError::backend(format!("Invalid slot name {name:?}")));
        }

        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl DurableStore for FileStore {
    fn get_item(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(name)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::backend(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set_item(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(name)?;
        let mut tmp_path = path.clone();

        tmp_path.set_extension("tmp");

        let written = File::create(&tmp_path)
            .map_err(|e| {
                StoreError::backend(format!("Failed to create {}: {e}", tmp_path.display()))
            })
            .and_then(|mut file| {
                file.write_all(value.as_bytes()).map_err(|e| {
                    StoreError::backend(format!("Failed to write {}: {e}", tmp_path.display()))
                })?;
                file.sync_all().map_err(|e| {
                    StoreError::backend(format!("Failed to sync {}: {e}", tmp_path.display()))
                })
            })
            .and_then(|()| {
                fs::rename(&tmp_path, &path).map_err(|e| {
                    StoreError::backend(format!("Failed to replace {}: {e}", path.display()))
                })
            });

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        written
    }

    fn remove_item(&self, name: &str) -> Result<(), StoreError> {
        let path = self.slot_path(name)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::backend(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}
