//! Persistence of the Completed-set
//!
//! Progress is a single value kept under a fixed key in a key-value
//! [`Storage`]: a JSON array of course codes. Reading never fails; an absent
//! or malformed value is treated as "nothing completed yet".

use crate::error::{MallaError, Result};
use crate::{debug, warn};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

/// Key under which progress is stored when the config does not override it
pub const DEFAULT_STORAGE_KEY: &str = "approved_courses";

/// Set of completed course codes
pub type CompletedSet = BTreeSet<String>;

/// Check that `key` names a single entry of a storage
///
/// [`FileStorage`] joins the key into a file name, so a key must not be empty,
/// contain a path separator, or be a relative path component.
///
/// # Errors
/// Returns [`MallaError::Config`] describing the rejected key
pub fn validate_storage_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(MallaError::Config(format!(
            "Invalid storage key '{key}' (must be non-empty, no path separators)"
        )));
    }
    Ok(())
}

/// Durable string key-value storage scoped to one user profile
pub trait Storage {
    /// Read the value stored under `key`, if any
    ///
    /// # Errors
    /// Returns an error if the backing medium fails for a reason other than absence
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns an error if the value cannot be written
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`; removing an absent key is not an error
    ///
    /// # Errors
    /// Returns an error if the value exists but cannot be removed
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage keeping one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory; it is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MallaError::io(path, e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| MallaError::io(&self.dir, e))?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| MallaError::io(path, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(MallaError::io(path, e)),
            _ => Ok(()),
        }
    }
}

/// Loads and saves the Completed-set under a fixed key
#[derive(Debug, Clone)]
pub struct ProgressStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> ProgressStore<S> {
    /// Store progress in `storage` under [`DEFAULT_STORAGE_KEY`]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Store progress in `storage` under a custom key
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key in use
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying storage
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted Completed-set
    ///
    /// Absent values, unreadable storage and anything that is not a JSON array
    /// of strings all yield an empty set.
    #[must_use]
    pub fn load(&self) -> CompletedSet {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored progress under '{}'", self.key);
                return CompletedSet::new();
            }
            Err(e) => {
                warn!("Could not read stored progress: {e}");
                return CompletedSet::new();
            }
        };
        serde_json::from_str::<Vec<String>>(&raw).map_or_else(
            |e| {
                warn!("Ignoring malformed progress under '{}': {e}", self.key);
                CompletedSet::new()
            },
            |codes| codes.into_iter().collect(),
        )
    }

    /// Persist the Completed-set synchronously
    ///
    /// # Errors
    /// Returns an error if serialization or the storage write fails
    pub fn save(&mut self, completed: &CompletedSet) -> Result<()> {
        let value = serde_json::to_string(completed)?;
        self.storage.set_item(&self.key, &value)?;
        debug!("Saved {} completed course(s) under '{}'", completed.len(), self.key);
        Ok(())
    }

    /// Remove the persisted value entirely
    ///
    /// # Errors
    /// Returns an error if the storage cannot remove it
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }
}
