use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::StorageError;

/// Key-value persistence boundary for extension-private storage.
/// （擴充功能私有儲存空間的鍵值持久化介面。）
///
/// Injected into [`crate::SavedCodeStore`] rather than reached through a
/// global, so tests can substitute [`MemoryStorage`]. Values are opaque JSON.
/// All access happens from a single logical thread of control; callers that
/// introduce real concurrency must serialize access externally, because the
/// store's overwrite detection is a check-then-act sequence.
pub trait StoragePort {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// In-memory storage used by tests and ephemeral sessions.
/// （供測試與暫時性工作階段使用的記憶體儲存。）
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed storage holding one JSON object of key→value pairs.
/// （以單一 JSON 物件保存鍵值對的檔案式儲存。）
///
/// Writes go through a temp file plus rename so a crash never leaves a
/// half-written store behind. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn read_entries_or_empty(&self) -> BTreeMap<String, Value> {
        self.read_entries().unwrap_or_else(|error| {
            log::warn!("existing storage file is unusable, rewriting from scratch: {error}");
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload =
            serde_json::to_string_pretty(entries).map_err(StorageError::Serialize)?;
        write_atomic(&self.path, payload.as_bytes()).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut entries = self.read_entries_or_empty();
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
