// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session persistence
//!
//! The client only needs a durable string key/value capability. Stores know
//! nothing about games; [`SessionStore`] owns the keys and the JSON encoding
//! of the values kept across restarts.

use chess_client_core::{GameState, MoveHistory};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Key of the last confirmed snapshot
pub const BOARD_STATE_KEY: &str = "board-state";
/// Key of the move history
pub const HISTORY_KEY: &str = "moves-so-far";
/// Key of the AI toggle
pub const USE_AI_KEY: &str = "use-ai";

/// Errors raised by stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Could not encode {key}: {reason}")]
    Encode { key: String, reason: String },

    #[error("Stored value for {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Durable string key/value store
pub trait KeyValueStore: Send {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store keeping one file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        tracing::debug!(path = ?dir, "Opened state directory");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let final_path = self.path_for(key)?;
        let temp_path = final_path.with_extension("json.tmp");

        // Write then rename so a crash never leaves a half-written value
        std::fs::write(&temp_path, value).map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &final_path).map_err(|source| StorageError::Io {
            path: final_path.clone(),
            source,
        })?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Typed access to the values a session keeps across restarts
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn save_state(&self, state: &GameState) -> Result<(), StorageError> {
        self.save_json(BOARD_STATE_KEY, state)
    }

    pub fn load_state(&self) -> Result<Option<GameState>, StorageError> {
        self.load_json(BOARD_STATE_KEY)
    }

    pub fn save_history(&self, history: &MoveHistory) -> Result<(), StorageError> {
        self.save_json(HISTORY_KEY, history)
    }

    pub fn load_history(&self) -> Result<Option<MoveHistory>, StorageError> {
        self.load_json(HISTORY_KEY)
    }

    pub fn save_use_ai(&self, use_ai: bool) -> Result<(), StorageError> {
        self.save_json(USE_AI_KEY, &use_ai)
    }

    pub fn load_use_ai(&self) -> Result<Option<bool>, StorageError> {
        self.load_json(USE_AI_KEY)
    }

    /// Forget everything the session saved
    pub fn clear(&self) -> Result<(), StorageError> {
        for key in [BOARD_STATE_KEY, HISTORY_KEY, USE_AI_KEY] {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.save(key, &encoded)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.load(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}
