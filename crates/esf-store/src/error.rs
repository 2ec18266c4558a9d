/// Errors from structured store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write would exceed the store's size limit.
    #[error("quota exceeded writing {key}: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: u64,
        quota: u64,
    },

    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The backend is not usable (poisoned lock, missing directory).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
