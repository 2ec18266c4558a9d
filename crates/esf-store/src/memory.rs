use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. An optional quota caps the total size
/// (keys plus values, in bytes) so storage exhaustion can be exercised.
pub struct InMemoryKeyValueStore {
    items: RwLock<HashMap<String, String>>,
    quota: Option<u64>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store with no size limit.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// Create a store that rejects writes once `quota` bytes are used.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.items.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes used by keys and values.
    pub fn used_bytes(&self) -> u64 {
        self.items
            .read()
            .map(|m| m.iter().map(|(k, v)| entry_size(k, v)).sum())
            .unwrap_or(0)
    }
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {e}"))
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.items.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.items.write().map_err(poisoned)?;
        if let Some(quota) = self.quota {
            let used: u64 = map.iter().map(|(k, v)| entry_size(k, v)).sum();
            let replaced = map.get(key).map(|old| entry_size(key, old)).unwrap_or(0);
            let needed = used - replaced + entry_size(key, value);
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.items.write().map_err(poisoned)?;
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyValueStore")
            .field("key_count", &self.len())
            .field("quota", &self.quota)
            .finish()
    }
}
