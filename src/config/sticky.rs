//! Write-through cache of one storage slot

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::persistence::KeyValueStore;

/// One storage slot with an in-memory copy of its decoded value
///
/// Reads never touch the store after [`StickyCell::load`]; writes update the
/// cache and persist immediately.
#[derive(Debug, Clone)]
pub struct StickyCell<T> {
    key: &'static str,
    value: T,
}

impl<T> StickyCell<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Read `key` from `store`, falling back to `default`
    ///
    /// When nothing usable is stored (absent or corrupt JSON) the default is
    /// written back so subsequent loads see the same value.
    pub fn load(store: &mut dyn KeyValueStore, key: &'static str, default: T) -> Self {
        let decoded = store.get(key).and_then(|raw| match serde_json::from_str::<T>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value is unreadable, using default");
                None
            }
        });

        match decoded {
            Some(value) => Self { key, value },
            None => {
                let cell = Self { key, value: default };
                debug!(key = %key, "Materializing default value");
                cell.persist(store);
                cell
            }
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and persist it
    pub fn set(&mut self, store: &mut dyn KeyValueStore, value: T) {
        self.value = value;
        self.persist(store);
    }

    /// Functional update: `f` receives the current value and returns the next
    pub fn update(&mut self, store: &mut dyn KeyValueStore, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(store, next);
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let raw = match serde_json::to_string(&self.value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize value");
                return;
            }
        };
        if let Err(e) = store.set(self.key, raw) {
            error!(key = %self.key, error = ?e, "Failed to persist value, keeping in-memory copy");
        }
    }
}
