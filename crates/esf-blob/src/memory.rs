use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use esf_types::MediaRecord;

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// In-memory blob store.
///
/// Intended for tests and embedding. An optional quota caps the total
/// payload bytes so write failures can be exercised.
pub struct InMemoryBlobStore {
    records: RwLock<HashMap<String, MediaRecord>>,
    quota: Option<u64>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            quota: None,
        }
    }

    /// A store that rejects writes once `quota` payload bytes are used.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records
            .read()
            .map(|m| m.contains_key(id))
            .unwrap_or(false)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> BlobError {
    BlobError::Unavailable(format!("lock poisoned: {e}"))
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, record: &MediaRecord) -> BlobResult<()> {
        if record.id().is_empty() {
            return Err(BlobError::EmptyId);
        }
        let mut map = self.records.write().map_err(poisoned)?;
        if let Some(quota) = self.quota {
            let used: u64 = map.values().map(|r| r.payload_len() as u64).sum();
            let replaced = map
                .get(record.id())
                .map(|r| r.payload_len() as u64)
                .unwrap_or(0);
            let needed = used - replaced + record.payload_len() as u64;
            if needed > quota {
                return Err(BlobError::QuotaExceeded {
                    id: record.id().to_string(),
                    needed,
                    quota,
                });
            }
        }
        map.insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> BlobResult<Option<MediaRecord>> {
        let map = self.records.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> BlobResult<bool> {
        let mut map = self.records.write().map_err(poisoned)?;
        Ok(map.remove(id).is_some())
    }

    async fn ids(&self) -> BlobResult<Vec<String>> {
        let map = self.records.read().map_err(poisoned)?;
        let mut ids: Vec<String> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("record_count", &self.len())
            .field("quota", &self.quota)
            .finish()
    }
}
