use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::AppState;

/// Fixed identifier of the storage slot.
pub const STORAGE_KEY: &str = "gtd-storage";

/// Schema version written into the slot envelope.
pub const STATE_VERSION: u32 = 0;

/// A durable slot holding one snapshot of the whole state.
///
/// `load` is called once at startup; `save` after every mutation.
pub trait Storage: Send {
    /// Returns `Ok(None)` when the slot has never been written.
    fn load(&self) -> Result<Option<AppState>, StorageError>;
    fn save(&self, state: &AppState) -> Result<(), StorageError>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a AppState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: AppState,
    #[allow(dead_code)]
    #[serde(default)]
    version: u32,
}

/// Serializes the state into the slot format.
pub fn encode_state(state: &AppState) -> Result<String, StorageError> {
    serde_json::to_string_pretty(&EnvelopeRef { state, version: STATE_VERSION })
        .map_err(StorageError::Serialize)
}

/// Parses slot contents. Accepts the versioned envelope or a bare state.
///
/// An object with a `state` key is always read as an envelope, so a broken
/// envelope is reported as corrupt rather than loaded as a bare default.
pub fn decode_state(raw: &str) -> Result<AppState, StorageError> {
    let value: Value = serde_json::from_str(raw).map_err(StorageError::Corrupt)?;
    if value.get("state").is_some() {
        let envelope: Envelope = serde_json::from_value(value).map_err(StorageError::Corrupt)?;
        Ok(envelope.state)
    } else {
        serde_json::from_value(value).map_err(StorageError::Corrupt)
    }
}

/// Returns the path to the storage slot file (`gtd-storage.json`).
///
/// The path is determined in the following order:
/// 1. `GTD_STORE` environment variable.
/// 2. `~/.local/share/gtdust/gtd-storage.json` (on Linux).
/// 3. `./gtd-storage.json` (fallback).
pub fn db_path() -> PathBuf {
    std::env::var("GTD_STORE").map(PathBuf::from).unwrap_or_else(|_| {
        match dirs::data_local_dir() {
            Some(mut p) => {
                p.push("gtdust");
                p.push(format!("{STORAGE_KEY}.json"));
                p
            }
            None => PathBuf::from(format!("{STORAGE_KEY}.json")),
        }
    })
}

/// Slot backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    /// Storage at the configured default location.
    pub fn at_default_location() -> Self {
        JsonFileStorage::new(db_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the slot file.
    pub fn delete(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| self.io_error(source))?;
            info!(path = %self.path.display(), "storage slot deleted");
        }
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut f = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let mut s = String::new();
        f.read_to_string(&mut s).map_err(|source| self.io_error(source))?;
        if s.trim().is_empty() {
            return Ok(None);
        }
        decode_state(&s).map(Some)
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
            }
        }
        let s = encode_state(state)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        f.write_all(s.as_bytes()).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), tasks = state.tasks.len(), "state saved");
        Ok(())
    }
}

/// In-process slot holding the serialized state. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Pre-seeds the slot with raw contents.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryStorage { slot: Arc::new(Mutex::new(Some(raw.into()))) }
    }

    /// Current raw slot contents.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().map(|s| s.clone()).unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        match self.raw() {
            Some(raw) => decode_state(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let encoded = encode_state(state)?;
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(encoded);
        Ok(())
    }
}
