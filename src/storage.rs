//! Storage
//!
//! Pluggable key-value persistence for session state (cart, wishlist and the
//! logged-in user). Values are JSON documents stored under well-known keys.
//! Reads fail soft: a missing or undecodable value yields the default.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage i/o failed for key {key}")]
    Io {
        /// Key being accessed
        key: String,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode value for key {key}")]
    Encode {
        /// Key being written
        key: String,

        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend could not be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend could not be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);

        Ok(())
    }
}

/// Directory-backed store holding one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the directory could not be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// Directory holding the stored values
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::write(path, value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Loads a JSON value, falling back to `T::default()` when the key is absent,
/// unreadable or holds something that does not decode.
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(error) => {
            warn!(key, %error, "failed to read persisted state; using default");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|error| {
        warn!(key, %error, "discarding corrupt persisted state");
        T::default()
    })
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns a `StorageError` if encoding or writing fails.
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    store.set(key, encoded)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() -> TestResult {
        let mut store = MemoryStore::new();

        store.set("cartItems", "[]".to_string())?;
        assert_eq!(store.get("cartItems")?, Some("[]".to_string()));

        store.remove("cartItems")?;
        assert_eq!(store.get("cartItems")?, None);

        // removing again is fine
        store.remove("cartItems")?;

        Ok(())
    }

    #[test]
    fn file_store_persists_across_instances() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut store = FileStore::open(dir.path())?;
        store.set("wishlistItems", "[1,2]".to_string())?;

        let reopened = FileStore::open(dir.path())?;
        assert_eq!(reopened.get("wishlistItems")?, Some("[1,2]".to_string()));
        assert_eq!(reopened.get("cartItems")?, None);

        Ok(())
    }

    #[test]
    fn file_store_remove_missing_key_is_ok() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = FileStore::open(dir.path())?;

        store.remove("user")?;

        Ok(())
    }

    #[test]
    fn file_store_rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileStore::open(dir.path())?;

        assert!(matches!(
            store.get("../secrets"),
            Err(StorageError::InvalidKey(_))
        ));

        Ok(())
    }

    #[test]
    fn load_json_defaults_on_missing_and_corrupt() -> TestResult {
        let mut store = MemoryStore::new();

        let missing: Vec<u32> = load_json(&store, "cartItems");
        assert!(missing.is_empty());

        store.set("cartItems", "{not json".to_string())?;
        let corrupt: Vec<u32> = load_json(&store, "cartItems");
        assert!(corrupt.is_empty());

        save_json(&mut store, "cartItems", &[1_u32, 2, 3])?;
        let loaded: Vec<u32> = load_json(&store, "cartItems");
        assert_eq!(loaded, vec![1, 2, 3]);

        Ok(())
    }
}
