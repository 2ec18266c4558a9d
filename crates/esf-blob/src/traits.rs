use async_trait::async_trait;
use esf_types::MediaRecord;

use crate::error::BlobResult;

/// Id-keyed store of full media records.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Insert or replace the record under its asset id.
    async fn put(&self, record: &MediaRecord) -> BlobResult<()>;

    /// Read a record. Returns `Ok(None)` if the id is unknown.
    async fn get(&self, id: &str) -> BlobResult<Option<MediaRecord>>;

    /// Delete a record. Returns `true` if it existed; a missing id is not an
    /// error.
    async fn delete(&self, id: &str) -> BlobResult<bool>;

    /// All stored asset ids, sorted.
    async fn ids(&self) -> BlobResult<Vec<String>>;
}
