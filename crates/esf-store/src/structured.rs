use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::StoreResult;
use crate::slice::Slice;
use crate::traits::KeyValueStore;

/// Typed JSON access to the [`Slice`]s of a [`KeyValueStore`].
#[derive(Clone)]
pub struct StructuredStore {
    backend: Arc<dyn KeyValueStore>,
    dev_mode: bool,
}

impl StructuredStore {
    /// Wrap a backend. With `dev_mode` on, failed saves and fallback loads are
    /// logged as warnings; otherwise they are only traced.
    pub fn new(backend: Arc<dyn KeyValueStore>, dev_mode: bool) -> Self {
        Self { backend, dev_mode }
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// Load a slice, falling back to `default()` when the key is missing, the
    /// backend fails, or the stored text does not decode as `T`.
    pub fn load<T, F>(&self, slice: Slice, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.backend.get_item(slice.key()) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    self.diagnose(slice, &e, "malformed value; using default");
                    default()
                }
            },
            Ok(None) => default(),
            Err(e) => {
                self.diagnose(slice, &e, "unreadable value; using default");
                default()
            }
        }
    }

    /// Encode and write a slice, reporting the failure to the caller.
    pub fn try_save<T: Serialize + ?Sized>(&self, slice: Slice, value: &T) -> StoreResult<()> {
        let text = serde_json::to_string(value)?;
        self.backend.set_item(slice.key(), &text)?;
        debug!(key = slice.key(), len = text.len(), "slice saved");
        Ok(())
    }

    /// Encode and write a slice. Returns `false` if the write was rejected;
    /// the failure is swallowed and the previously stored value remains.
    pub fn save<T: Serialize + ?Sized>(&self, slice: Slice, value: &T) -> bool {
        match self.try_save(slice, value) {
            Ok(()) => true,
            Err(e) => {
                self.diagnose(slice, &e, "save failed; storage limit may be near");
                false
            }
        }
    }

    /// Remove a slice entirely.
    pub fn clear(&self, slice: Slice) -> StoreResult<bool> {
        self.backend.remove_item(slice.key())
    }

    fn diagnose(&self, slice: Slice, error: &dyn std::fmt::Display, message: &str) {
        if self.dev_mode {
            warn!(key = slice.key(), error = %error, "{message}");
        } else {
            trace!(key = slice.key(), error = %error, "{message}");
        }
    }
}

impl std::fmt::Debug for StructuredStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredStore")
            .field("dev_mode", &self.dev_mode)
            .finish()
    }
}
