//! Flat key-value storage.
//!
//! Values are plain strings. The file-backed store keeps them in a single
//! JSON object and rewrites the whole file on every batch. Values it did not
//! write are read per key, so one odd entry never hides the others.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::StorageError;

/// String-keyed, string-valued persistent storage.
pub trait KeyValueStore {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes several values as one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Writes a single value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.set_many(&[(key, value)])
    }
}

// ============================================================================
// FileKeyValueStore
// ============================================================================

/// Key-value store persisted as a JSON object of strings.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        write_atomic(&self.path, &json)?;
        debug!("Wrote {} keys to {:?}", map.len(), self.path);
        Ok(())
    }
}

/// Reads a stored value back as a string.
///
/// Hand-edited files may hold bare numbers or booleans; those are accepted
/// in their JSON spelling. Anything else only invalidates its own key.
fn value_as_string(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            debug!("Ignoring non-scalar value for '{}': {}", key, other);
            None
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_map()?
            .get(key)
            .and_then(|value| value_as_string(key, value)))
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) if e.is_malformed() => {
                warn!("Replacing malformed key-value file: {}", e);
                Map::new()
            }
            Err(e) => return Err(e),
        };

        for (key, value) in entries {
            map.insert((*key).to_string(), Value::String(value.clone()));
        }

        self.write_map(&map)
    }
}

/// Replaces `path` with `contents`, creating parent directories.
///
/// Write-then-rename so a crash never leaves a half-written file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

// ============================================================================
// MemoryKeyValueStore
// ============================================================================

/// In-memory key-value store.
///
/// Clones share the same map, so tests can inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    map: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            map: Arc::new(Mutex::new(map)),
        }
    }

    /// Returns a copy of everything stored.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}
