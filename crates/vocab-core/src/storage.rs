//! [`Storage`] implementations and JSON helpers.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::traits::Storage;

/// Stores each key as a file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves a half-written file.
        let path = self.path_for(key);
        let tmp = self.path_for(&format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Serialize `value` as pretty JSON and store it under `key`.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    storage.write(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "persisted");
    Ok(())
}

/// Load and decode the JSON stored under `key`.
///
/// Returns `Ok(None)` when nothing is stored.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    match storage.read(key)? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}

/// Like [`load_json`], but falls back to `T::default()` when the stored data
/// is missing or unreadable.
pub fn load_json_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("ignoring unreadable {key}: {e}");
            T::default()
        }
    }
}

/// Storage whose writes can be switched off, for exercising failure paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStorage {
    inner: MemoryStorage,
    failing: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FailingStorage {
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check(&self) -> io::Result<()> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        Ok(())
    }
}

#[cfg(test)]
impl Storage for FailingStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.check()?;
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.check()?;
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.read("theme").unwrap(), None);
        storage.write("theme", "dark").unwrap();
        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("dark"));

        storage.write("theme", "light").unwrap();
        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("light"));

        storage.remove("theme").unwrap();
        assert_eq!(storage.read("theme").unwrap(), None);
        storage.remove("theme").unwrap();
    }

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.write("a", "1").unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.len(), 1);
        storage.remove("a").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn json_helpers() {
        let storage = MemoryStorage::new();
        save_json(&storage, "nums.json", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = load_json(&storage, "nums.json").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = load_json(&storage, "missing.json").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn failing_storage_rejects_writes_until_reset() {
        let storage = FailingStorage::default();
        storage.write("a", "1").unwrap();
        storage.set_failing(true);
        assert!(storage.write("a", "2").is_err());
        assert!(storage.remove("a").is_err());
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        storage.set_failing(false);
        storage.write("a", "2").unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_json_falls_back_to_default() {
        let storage = MemoryStorage::new();
        storage.write("nums.json", "not json [").unwrap();
        assert!(load_json::<Vec<i32>>(&storage, "nums.json").is_err());
        let nums: Vec<i32> = load_json_or_default(&storage, "nums.json");
        assert!(nums.is_empty());
    }
}
