use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use arena_core::{Storage, StorageError};
use log::warn;
use parking_lot::Mutex;

/// A storage persisted to a single file on disk.
/// Every write rewrites the whole file, and memory only changes once the file did.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the storage at the given path, starting empty if the file is missing or unreadable
    pub fn open<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(data) => ron::from_str(&data).unwrap_or_else(|e| {
                warn!("Storage file {} is invalid, ignoring it: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: entries.into(),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Write(e.to_string()))?;
        }

        let data = ron::to_string(entries).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::write(&self.path, data).map_err(|e| StorageError::Write(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();

        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());

        self.save(&updated)?;
        *entries = updated;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();

        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(key);

        self.save(&updated)?;
        *entries = updated;

        Ok(())
    }
}
