//! persist - JSON persistence of the configuration
//!
//! The snapshot is stored as one JSON object under [`STORAGE_KEY`] in a
//! string key-value store. Loading merges the stored object over the
//! defaults key by key: unknown keys are ignored, and missing keys or keys
//! holding an unusable value keep their default.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ConfigPatch, ParticleConfig, DEFAULT_CONFIG};
use crate::store::Persistence;

pub const STORAGE_KEY: &str = "qiangnet_particles_config";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A durable string store, one value per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`; the directory is created on the
/// first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

pub fn to_json(config: &ParticleConfig) -> Result<String, StorageError> {
    Ok(serde_json::to_string(config)?)
}

/// Parses a stored snapshot over [`DEFAULT_CONFIG`]. Only data that is not a
/// JSON object is an error; a field whose value does not fit is dropped with
/// a warning and keeps its default.
pub fn from_json(data: &str) -> Result<ParticleConfig, StorageError> {
    let stored: Map<String, Value> = serde_json::from_str(data)?;
    let mut config = DEFAULT_CONFIG;
    for (key, value) in stored {
        // CHANGE: One field at a time through a single-key patch
        // REASON: A bad value must not take the valid fields down with it
        let mut field = Map::new();
        field.insert(key.clone(), value);
        match serde_json::from_value::<ConfigPatch>(Value::Object(field)) {
            Ok(patch) => config = config.merged(&patch),
            Err(e) => log::warn!("dropping stored particles field {:?}: {}", key, e),
        }
    }
    Ok(config)
}

/// [`Persistence`] over any [`KeyValueStore`]. Failures are logged and
/// swallowed: a bad snapshot loads as the defaults, a failed write is dropped.
pub struct JsonPersistence<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> JsonPersistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

}

impl<K: KeyValueStore> Persistence for JsonPersistence<K> {
    fn load(&mut self) -> Option<ParticleConfig> {
        let data = match self.store.get(STORAGE_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read particles config: {}", e);
                return None;
            }
        };
        match from_json(&data) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring stored particles config: {}", e);
                None
            }
        }
    }

    fn save(&mut self, config: &ParticleConfig) {
        let result = to_json(config).and_then(|json| self.store.set(STORAGE_KEY, &json));
        if let Err(e) = result {
            log::warn!("could not save particles config: {}", e);
        }
    }
}
