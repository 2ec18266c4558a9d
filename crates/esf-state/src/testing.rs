//! Shared fixtures for the state tests.

use std::sync::Arc;

use async_trait::async_trait;
use esf_advisor::{AdvisoryService, DailyTip, LocalAdvisor, Moderation};
use esf_blob::{BlobError, BlobResult, BlobStore, InMemoryBlobStore};
use esf_store::InMemoryKeyValueStore;
use esf_types::MediaRecord;

use crate::academy::Academy;
use crate::config::AppConfig;

pub(crate) const BLOCKED_TERM: &str = "golpe";

pub(crate) struct Fixture {
    pub academy: Academy,
    pub kv: Arc<InMemoryKeyValueStore>,
    pub blobs: Arc<InMemoryBlobStore>,
}

fn config() -> AppConfig {
    AppConfig {
        dev_mode: true,
        ..AppConfig::default()
    }
}

fn advisor() -> Arc<dyn AdvisoryService> {
    Arc::new(LocalAdvisor::new(Vec::new(), vec![BLOCKED_TERM.to_string()]))
}

pub(crate) fn fixture() -> Fixture {
    fixture_with_kv(Arc::new(InMemoryKeyValueStore::new()))
}

pub(crate) fn fixture_with_kv(kv: Arc<InMemoryKeyValueStore>) -> Fixture {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let academy = Academy::open(config(), kv.clone(), blobs.clone(), advisor());
    Fixture { academy, kv, blobs }
}

/// An academy whose blob store rejects every operation.
pub(crate) fn fixture_with_broken_blobs() -> (Academy, Arc<InMemoryKeyValueStore>) {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let academy = Academy::open(config(), kv.clone(), Arc::new(BrokenBlobStore), advisor());
    (academy, kv)
}

pub(crate) fn with_advisor(advisor: Arc<dyn AdvisoryService>) -> Academy {
    Academy::open(
        config(),
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(InMemoryBlobStore::new()),
        advisor,
    )
}

pub(crate) struct BrokenBlobStore;

#[async_trait]
impl BlobStore for BrokenBlobStore {
    async fn put(&self, _record: &MediaRecord) -> BlobResult<()> {
        Err(BlobError::Unavailable("disk offline".into()))
    }
    async fn get(&self, _id: &str) -> BlobResult<Option<MediaRecord>> {
        Err(BlobError::Unavailable("disk offline".into()))
    }
    async fn delete(&self, _id: &str) -> BlobResult<bool> {
        Err(BlobError::Unavailable("disk offline".into()))
    }
    async fn ids(&self) -> BlobResult<Vec<String>> {
        Err(BlobError::Unavailable("disk offline".into()))
    }
}

/// Rejects every comment without giving a reason.
pub(crate) struct SilentRejecter;

#[async_trait]
impl AdvisoryService for SilentRejecter {
    async fn fetch_daily_tip(&self) -> Option<DailyTip> {
        None
    }
    async fn classify_comment(&self, _text: &str) -> Moderation {
        Moderation {
            safe: false,
            reason: None,
        }
    }
}
