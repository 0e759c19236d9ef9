//! Persisted storage.
//!
//! Three independent keys: the full state blob, the theme preference and
//! the voice settings. Each key holds one JSON document. The backend is
//! injectable so tests can run against an in-memory map; production uses
//! one file per key under the user data directory.
//!
//! A corrupted state blob is dropped and default state used; losing a
//! broken blob is preferable to refusing to start.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::state::{StudyState, VoiceSettings};

/// Storage key for the main state blob.
pub const STATE_KEY: &str = "study_state";
/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Storage key for voice settings.
pub const VOICE_KEY: &str = "voice_settings";

/// Key-value persistence backend.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value for a key, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Write the raw value for a key.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove a key; absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-based backend: one `<key>.json` file per key under a root
/// directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at the user data directory
    /// (`~/.local/share/vidya` on Linux).
    pub fn new() -> Result<Self, StorageError> {
        let root = dirs::data_dir()
            .ok_or_else(|| StorageError::Io("no user data directory".to_string()))?
            .join("vidya");
        Self::with_root(root)
    }

    /// Create a backend rooted at an explicit directory.
    pub fn with_root(root: PathBuf) -> Result<Self, StorageError> {
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory backend for tests.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .map
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Typed facade over a storage backend.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    /// Create a store over any backend.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over the production file backend.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(Box::new(FileStorage::new()?)))
    }

    /// Load a JSON value; unparseable content drops the key and yields
    /// `None`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.read(key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "dropping unparseable storage entry");
                let _ = self.backend.remove(key);
                None
            }
        }
    }

    /// Save a JSON value.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value)?;
        self.backend.write(key, &raw)
    }

    /// Remove a key.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }

    /// Load the state blob, falling back to defaults on absence or
    /// corruption.
    pub fn load_state(&self) -> StudyState {
        self.load_json(STATE_KEY).unwrap_or_default()
    }

    /// Persist the full state blob.
    pub fn save_state(&self, state: &StudyState) -> Result<(), StorageError> {
        self.save_json(STATE_KEY, state)
    }

    /// Drop the state blob entirely (course reset).
    pub fn clear_state(&self) -> Result<(), StorageError> {
        self.backend.remove(STATE_KEY)
    }

    /// Load voice settings, falling back to defaults.
    pub fn load_voice(&self) -> VoiceSettings {
        self.load_json(VOICE_KEY).unwrap_or_default()
    }

    /// Persist voice settings.
    pub fn save_voice(&self, settings: &VoiceSettings) -> Result<(), StorageError> {
        self.save_json(VOICE_KEY, settings)
    }
}
