use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

const VALUE_EXTENSION: &str = "json";

/// Directory-backed key-value store: one file per key.
///
/// Values are written to a temporary file in the same directory and renamed
/// over the target, so a failed write leaves the previous value intact.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    quota: Option<u64>,
}

impl FileKeyValueStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            quota: None,
        })
    }

    /// Open a store that rejects writes once `quota` bytes are used.
    pub fn open_with_quota(root: &Path, quota: u64) -> StoreResult<Self> {
        let mut store = Self::open(root)?;
        store.quota = Some(quota);
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    /// Bytes used by all value files.
    pub fn used_bytes(&self) -> StoreResult<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(VALUE_EXTENSION) {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        if let Some(quota) = self.quota {
            let replaced = match fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
                Err(e) => return Err(e.into()),
            };
            let needed = self.used_bytes()?.saturating_sub(replaced) + value.len() as u64;
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(key, len = value.len(), "value written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        assert!(store.get_item("esf_teens_users").unwrap().is_none());
        store.set_item("esf_teens_users", "[]").unwrap();
        assert_eq!(
            store.get_item("esf_teens_users").unwrap().as_deref(),
            Some("[]")
        );
        assert!(store.remove_item("esf_teens_users").unwrap());
        assert!(!store.remove_item("esf_teens_users").unwrap());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileKeyValueStore::open(dir.path()).unwrap();
            store.set_item("theme", "true").unwrap();
        }
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set_item("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get_item(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn quota_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open_with_quota(dir.path(), 8).unwrap();
        store.set_item("posts", "[1,2]").unwrap();
        let err = store.set_item("posts", "[1,2,3,4,5,6]").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get_item("posts").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.used_bytes().unwrap(), 5);
    }
}
