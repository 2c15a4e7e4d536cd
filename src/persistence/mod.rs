//! Persisted key-value state
//!
//! Features:
//! - `KeyValueStore` trait over string values
//! - In-memory store for tests and the headless driver
//! - JSON file store (whole map rewritten on every change)
//! - Scalar helpers that default malformed or missing values

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Storage key for the high score
pub const HIGH_SCORE_KEY: &str = "flappy_sim_high_score";
/// Storage key for the mute flag
pub const MUTED_KEY: &str = "flappy_sim_muted";

/// String-valued key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with raw values
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring malformed store {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => {
                log::info!("No store at {}, starting fresh", path.display());
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        // Replace atomically via a sibling temp file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Non-negative integer; missing or malformed reads as 0
pub fn load_u32(store: &dyn KeyValueStore, key: &str) -> u32 {
    match store.get(key) {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Malformed value for {key}: {raw:?}, using 0");
            0
        }),
    }
}

/// Boolean; anything other than "true" reads as false
pub fn load_bool(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.get(key).as_deref().map(str::trim) {
        None | Some("false") => false,
        Some("true") => true,
        Some(other) => {
            log::warn!("Malformed value for {key}: {other:?}, using false");
            false
        }
    }
}

pub fn save_u32(store: &mut dyn KeyValueStore, key: &str, value: u32) -> Result<(), StoreError> {
    store.set(key, &value.to_string())
}

pub fn save_bool(store: &mut dyn KeyValueStore, key: &str, value: bool) -> Result<(), StoreError> {
    store.set(key, if value { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_default() {
        let store = MemoryStore::new();
        assert_eq!(load_u32(&store, HIGH_SCORE_KEY), 0);
        assert!(!load_bool(&store, MUTED_KEY));
    }

    #[test]
    fn test_malformed_values_default() {
        let store = MemoryStore::with_values([(HIGH_SCORE_KEY, "lots"), (MUTED_KEY, "yes")]);
        assert_eq!(load_u32(&store, HIGH_SCORE_KEY), 0);
        assert!(!load_bool(&store, MUTED_KEY));

        let negative = MemoryStore::with_values([(HIGH_SCORE_KEY, "-4")]);
        assert_eq!(load_u32(&negative, HIGH_SCORE_KEY), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_u32(&mut store, HIGH_SCORE_KEY, 42).unwrap();
        save_bool(&mut store, MUTED_KEY, true).unwrap();
        assert_eq!(load_u32(&store, HIGH_SCORE_KEY), 42);
        assert!(load_bool(&store, MUTED_KEY));
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("42"));
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = std::env::temp_dir().join(format!("flappy-sim-store-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path);
            assert_eq!(store.get(HIGH_SCORE_KEY), None);
            save_u32(&mut store, HIGH_SCORE_KEY, 17).unwrap();
        }

        let reopened = JsonFileStore::open(&path);
        assert_eq!(load_u32(&reopened, HIGH_SCORE_KEY), 17);
        assert_eq!(reopened.path(), path.as_path());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_file_store_malformed_file() {
        let dir = std::env::temp_dir().join(format!("flappy-sim-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(load_u32(&store, HIGH_SCORE_KEY), 0);

        fs::remove_dir_all(&dir).unwrap();
    }
}
