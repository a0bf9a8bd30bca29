//! Durable key-value storage backing every config slot
//!
//! Values are stored as JSON text under a string key, the same contract a
//! browser's local storage offers. [`FileStore`] keeps the whole map in one
//! JSON file and flushes it on every write; [`MemoryStore`] is used for tests
//! and ephemeral sessions.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Local persistent storage of named JSON values
pub trait KeyValueStore {
    /// Raw JSON text stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Drop the value stored under `key`
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store that counts writes
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw JSON text under `key` without counting a write
    pub fn with_entry(mut self, key: &str, raw: &str) -> Self {
        self.entries.insert(key.to_string(), raw.to_string());
        self
    }

    /// Number of `set`/`remove` calls seen so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.writes += 1;
        self.entries.remove(key);
        Ok(())
    }
}

/// Single JSON file holding every slot
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location under the platform config directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Open the store at `path`
    ///
    /// A missing file yields an empty store. A file that fails to parse is
    /// moved aside with a `.corrupt` suffix and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    info!(path = %path.display(), slots = entries.len(), "Loaded store");
                    entries
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse store file, starting from defaults");
                    Self::quarantine(&path)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Store file not found, starting from defaults");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read store from {}", path.display()));
            }
        };
        Ok(Self { path, entries })
    }

    fn quarantine(path: &Path) -> Result<()> {
        let mut target = path.as_os_str().to_owned();
        target.push(".");
        target.push(crate::constants::config::CORRUPT_SUFFIX);
        let target = PathBuf::from(target);
        fs::rename(path, &target).with_context(|| {
            format!("Failed to move corrupt store {} aside", path.display())
        })?;
        warn!(from = %path.display(), to = %target.display(), "Moved corrupt store aside");
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write store to {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
