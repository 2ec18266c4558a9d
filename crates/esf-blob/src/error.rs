/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The payload does not fit in the remaining space.
    #[error("quota exceeded storing {id}: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { id: String, needed: u64, quota: u64 },

    /// The database on disk was written by an incompatible schema.
    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: String, expected: u32 },

    /// A stored record could not be decoded.
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Empty asset id.
    #[error("asset id must not be empty")]
    EmptyId,

    /// JSON encoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store cannot be used (poisoned lock).
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
