use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "COMMONS_DATA_DIR";
/// Environment variable switching per-collection locking (`true`/`false`, `1`/`0`).
pub const LOCK_ENV: &str = "COMMONS_STORE_LOCK";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_lock() -> bool {
    true
}

/// Settings for a file-backed store.
///
/// Deserializable so a host application can embed it in its own config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding one `<collection>.json` per collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Serialize load-mutate-save cycles per collection.
    #[serde(default = "default_lock")]
    pub lock: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lock: default_lock(),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `COMMONS_DATA_DIR` and `COMMONS_STORE_LOCK`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(lock) = lookup(LOCK_ENV).and_then(|value| parse_bool(&value)) {
            config.lock = lock;
        }
        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions { lock: self.lock }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Runtime options for a `Store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Whether mutating operations take the collection lock.
    pub lock: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { lock: true }
    }
}

impl StoreOptions {
    /// Options that skip locking: concurrent writers may lose updates.
    pub fn no_lock() -> Self {
        Self { lock: false }
    }
}
