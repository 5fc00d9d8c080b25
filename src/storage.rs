//! Key-value persistence for ranking and match history.
//!
//! The core reads initial state on game creation and writes after every
//! report. Absent or malformed stored data degrades to defaults; save
//! failures are logged and swallowed rather than propagated.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Storage key for cumulative ranking records.
pub const RANKING_KEY: &str = "team_fortune_ranking";

/// Storage key for completed-round history.
pub const HISTORY_KEY: &str = "team_fortune_history";

/// Minimal key-value persistence boundary (localStorage-shaped).
pub trait KeyValueStore {
    /// Raw stored value for a key, if any.
    fn load_raw(&self, key: &str) -> Option<String>;
    /// Store a raw value under a key. Failures are swallowed by implementors.
    fn save_raw(&self, key: &str, value: &str);

    /// Deserialize the value under `key`, falling back to `T::default()`
    /// when the key is absent or the stored data is malformed.
    fn load_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load_raw(key) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding malformed data under key '{}': {}", key, e);
                T::default()
            }),
            None => T::default(),
        }
    }

    /// Serialize and store a value under `key`.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.save_raw(key, &raw),
            Err(e) => log::warn!("Could not serialize data for key '{}': {}", key, e),
        }
    }
}

/// In-memory store, used in tests and as a default.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn save_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one `<key>.json` file per key under a data directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn save_raw(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            log::warn!("Could not create data dir {}: {}", self.dir.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            log::warn!("Could not persist key '{}': {}", key, e);
        }
    }
}
