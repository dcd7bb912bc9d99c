//! Persistence for the user's named saved scripts.
//! （使用者已命名腳本的持久化儲存。）
//!
//! The whole `name → code` mapping lives under one well-known key and is read
//! and rewritten as a unit on every mutation; there is no partial-entry update
//! at the storage layer.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

mod port;

pub use port::{FileStorage, MemoryStorage, StoragePort};

/// Well-known key the saved-code mapping is persisted under.
pub const SAVED_CODE_KEY: &str = "code";

/// Errors raised by saved-code persistence.
/// （已儲存程式碼持久化相關錯誤。）
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("saved code requires a non-empty name")]
    EmptyName,
    #[error("failed to read storage {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse storage {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize storage payload: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write storage {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The user's library of named scripts, backed by an injected storage port.
/// （由注入式儲存介面支援的已命名腳本庫。）
///
/// Names are unique and compared exactly, case-sensitively. Overwrite
/// confirmation is the caller's concern; `save` itself always upserts.
pub struct SavedCodeStore {
    port: Box<dyn StoragePort>,
    entries: BTreeMap<String, String>,
}

impl SavedCodeStore {
    /// Opens the store, reading whatever mapping the port currently holds.
    ///
    /// A missing or unreadable mapping degrades to an empty library rather
    /// than failing: the session must still open, the feature is simply
    /// unavailable until the next successful write.
    pub fn new(port: Box<dyn StoragePort>) -> Self {
        let mut store = Self {
            port,
            entries: BTreeMap::new(),
        };
        store.reload();
        store
    }

    /// Re-reads the persisted mapping from the port.
    /// （重新自儲存介面讀取持久化的對應表。）
    pub fn reload(&mut self) {
        self.entries = match self.port.get(SAVED_CODE_KEY) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(entries) => entries,
                Err(error) => {
                    log::warn!("saved code mapping is malformed, starting empty: {error}");
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(error) => {
                log::warn!("saved code unavailable, starting empty: {error}");
                BTreeMap::new()
            }
        };
    }

    /// Returns the whole persisted mapping.
    pub fn load_all(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Saved names in ascending order, for display.
    pub fn names(&self) -> Vec<&String> {
        self.entries.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upserts `name → code` and persists the entire mapping.
    ///
    /// An empty name is rejected without touching the mapping.
    pub fn save(&mut self, name: &str, code: &str) -> Result<(), StorageError> {
        if name.is_empty() {
            return Err(StorageError::EmptyName);
        }
        self.entries.insert(name.to_string(), code.to_string());
        self.persist()
    }

    /// Removes `name` if present and persists; an absent name is a no-op.
    pub fn delete(&mut self, name: &str) -> Result<bool, StorageError> {
        if self.entries.remove(name).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.entries).map_err(StorageError::Serialize)?;
        self.port.set(SAVED_CODE_KEY, value)
    }
}

impl std::fmt::Debug for SavedCodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedCodeStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
