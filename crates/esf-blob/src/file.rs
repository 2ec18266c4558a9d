use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use esf_types::MediaRecord;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Schema version written by this code. There is no migration path: a
/// database with a newer version is refused.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the single record store inside the database.
pub const MEDIA_STORE: &str = "media";

const VERSION_FILE: &str = "SCHEMA_VERSION";
const RECORD_EXTENSION: &str = "json";

/// File-backed blob store.
///
/// Layout:
/// ```text
/// <data_dir>/<database>/SCHEMA_VERSION
/// <data_dir>/<database>/media/<hex(asset id)>.json
/// ```
///
/// Each operation opens the database on its own; the record store is created
/// on first open. Writes go to a temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    db_dir: PathBuf,
    quota: Option<u64>,
}

/// Handle to an opened database, valid for a single operation.
struct Connection {
    store_dir: PathBuf,
}

impl FileBlobStore {
    /// Describe a database named `database` under `data_dir`. Nothing is
    /// touched on disk until the first operation.
    pub fn new(data_dir: &Path, database: &str) -> Self {
        Self {
            db_dir: data_dir.join(database),
            quota: None,
        }
    }

    /// Cap the total bytes of stored records.
    pub fn with_quota(mut self, quota: u64) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn db_dir(&self) -> &Path {
        &self.db_dir
    }

    async fn open(&self) -> BlobResult<Connection> {
        fs::create_dir_all(&self.db_dir).await?;
        let store_dir = self.db_dir.join(MEDIA_STORE);
        let version_path = self.db_dir.join(VERSION_FILE);

        match fs::read_to_string(&version_path).await {
            Ok(text) => {
                let found = text.trim();
                if found.parse::<u32>().ok() != Some(SCHEMA_VERSION) {
                    return Err(BlobError::SchemaVersion {
                        found: found.to_string(),
                        expected: SCHEMA_VERSION,
                    });
                }
                fs::create_dir_all(&store_dir).await?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&store_dir).await?;
                fs::write(&version_path, SCHEMA_VERSION.to_string()).await?;
                info!(path = %self.db_dir.display(), version = SCHEMA_VERSION, "created media store");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Connection { store_dir })
    }
}

impl Connection {
    fn record_path(&self, id: &str) -> BlobResult<PathBuf> {
        if id.is_empty() {
            return Err(BlobError::EmptyId);
        }
        Ok(self
            .store_dir
            .join(format!("{}.{RECORD_EXTENSION}", hex::encode(id))))
    }

    async fn used_bytes(&self) -> BlobResult<u64> {
        let mut total = 0;
        let mut entries = fs::read_dir(&self.store_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION) {
                total += entry.metadata().await?.len();
            }
        }
        Ok(total)
    }
}

async fn file_len(path: &Path) -> BlobResult<u64> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, record: &MediaRecord) -> BlobResult<()> {
        let conn = self.open().await?;
        let path = conn.record_path(record.id())?;
        let bytes = serde_json::to_vec(record)?;

        if let Some(quota) = self.quota {
            let replaced = file_len(&path).await?;
            let needed = conn.used_bytes().await?.saturating_sub(replaced) + bytes.len() as u64;
            if needed > quota {
                return Err(BlobError::QuotaExceeded {
                    id: record.id().to_string(),
                    needed,
                    quota,
                });
            }
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(id = record.id(), len = bytes.len(), "media record stored");
        Ok(())
    }

    async fn get(&self, id: &str) -> BlobResult<Option<MediaRecord>> {
        let conn = self.open().await?;
        let path = conn.record_path(id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| BlobError::CorruptRecord {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }

    async fn delete(&self, id: &str) -> BlobResult<bool> {
        let conn = self.open().await?;
        let path = conn.record_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(id, "media record deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn ids(&self) -> BlobResult<Vec<String>> {
        let conn = self.open().await?;
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&conn.store_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(id) = hex::decode(stem)
                .ok()
                .and_then(|raw| String::from_utf8(raw).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esf_types::MediaAsset;

    fn record(payload: &str) -> MediaRecord {
        MediaRecord::new(MediaAsset::new("admin-1", "guia.pdf", "application/pdf"), payload)
    }

    #[tokio::test]
    async fn first_open_creates_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path(), "ESFFinancasDB");
        assert!(!store.db_dir().exists());

        assert!(store.ids().await.unwrap().is_empty());
        assert!(store.db_dir().join(MEDIA_STORE).is_dir());
        let version = std::fs::read_to_string(store.db_dir().join(VERSION_FILE)).unwrap();
        assert_eq!(version, "1");
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path(), "db");
        let r = record("data:application/pdf;base64,JVBERi0=");

        store.put(&r).await.unwrap();
        assert_eq!(store.get(r.id()).await.unwrap(), Some(r.clone()));
        assert_eq!(store.ids().await.unwrap(), vec![r.id().to_string()]);

        assert!(store.delete(r.id()).await.unwrap());
        assert!(!store.delete(r.id()).await.unwrap());
        assert!(store.get(r.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn records_survive_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("payload");
        FileBlobStore::new(dir.path(), "db").put(&r).await.unwrap();
        let reopened = FileBlobStore::new(dir.path(), "db");
        assert_eq!(reopened.get(r.id()).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path(), "db");
        std::fs::create_dir_all(store.db_dir()).unwrap();
        std::fs::write(store.db_dir().join(VERSION_FILE), "2").unwrap();

        let err = store.put(&record("x")).await.unwrap_err();
        assert!(matches!(err, BlobError::SchemaVersion { expected: 1, .. }));
    }

    #[tokio::test]
    async fn quota_rejects_put_and_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path(), "db").with_quota(64);
        let big = record(&"A".repeat(512));

        let err = store.put(&big).await.unwrap_err();
        assert!(matches!(err, BlobError::QuotaExceeded { .. }));
        assert!(store.ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_record_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(dir.path(), "db");
        let r = record("x");
        store.put(&r).await.unwrap();

        let path = store
            .db_dir()
            .join(MEDIA_STORE)
            .join(format!("{}.json", hex::encode(r.id())));
        std::fs::write(path, b"{oops").unwrap();

        let err = store.get(r.id()).await.unwrap_err();
        assert!(matches!(err, BlobError::CorruptRecord { .. }));
    }
}
