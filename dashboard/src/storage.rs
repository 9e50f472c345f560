//! Local key-value storage backing the layout and metrics stores.
//!
//! The stores only need `get`, `set` and `remove` by string key. Two
//! implementations are provided:
//!
//! - [`MemoryStorage`]: a process-local map, used for tests and ephemeral
//!   sessions
//! - [`FileStorage`]: one JSON file per key under a data directory
//!
//! # Atomic Writes
//!
//! [`FileStorage::set`] writes the value to a sibling temp file and renames it
//! over the target, so a reader never observes a half-written value. Rapid
//! consecutive writes to the same key resolve as last-write-wins.
//!
//! # Example
//!
//! ```
//! use jobdeck_dashboard::storage::{KeyValueStorage, MemoryStorage};
//!
//! let storage = MemoryStorage::new();
//! storage.set("greeting", "hello").unwrap();
//! assert_eq!(storage.get("greeting").unwrap().as_deref(), Some("hello"));
//!
//! storage.remove("greeting").unwrap();
//! assert_eq!(storage.get("greeting").unwrap(), None);
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, trace};

/// File extension used for stored values.
const VALUE_EXTENSION: &str = "json";

/// Errors that can occur while reading or writing storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The key contains characters that cannot be used as a file name.
    #[error("invalid storage key '{0}': only letters, digits, '_', '-', '.' and '@' are allowed")]
    InvalidKey(String),

    /// An I/O operation on a stored value failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The storage directory could not be created.
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A local key-value store with string keys and string values.
///
/// Implementations use interior mutability so a single instance can be shared
/// between stores behind an `Arc`.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value for `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if an existing value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns `true` if `key` is safe to use as a storage key.
///
/// Keys become file names in [`FileStorage`], so path separators and other
/// special characters are rejected.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'))
}

// =============================================================================
// In-memory Storage
// =============================================================================

/// Process-local storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// Directory-backed storage with one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CreateDir`] if the directory cannot be created.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use jobdeck_dashboard::storage::FileStorage;
    ///
    /// let storage = FileStorage::open("/tmp/jobdeck").unwrap();
    /// assert!(storage.root().exists());
    /// ```
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StorageError::CreateDir {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "Opened file storage");
        Ok(Self { root })
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the key is not a safe file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    fn io_error(key: &str, source: io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));

        let write_tmp = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &path)
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(Self::io_error(key, e));
        }

        trace!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}
