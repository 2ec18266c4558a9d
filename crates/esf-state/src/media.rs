//! Media library: metadata in the structured store, payloads in the blob
//! store under the same id.

use std::collections::BTreeSet;
use std::sync::Arc;

use esf_store::Slice;
use esf_types::{MediaAsset, MediaKind, MediaRecord};
use tracing::{debug, error, info, warn};

use crate::academy::Academy;
use crate::confirm::{Confirm, Deletion, DELETE_MEDIA_PROMPT};
use crate::error::{StateError, StateResult};

/// Disagreement between media metadata and stored payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrphanReport {
    /// Payloads no metadata entry points at.
    pub blobs_without_metadata: Vec<String>,
    /// Metadata entries whose payload is missing; these assets are unusable.
    pub metadata_without_blob: Vec<String>,
}

impl OrphanReport {
    pub fn is_clean(&self) -> bool {
        self.blobs_without_metadata.is_empty() && self.metadata_without_blob.is_empty()
    }
}

impl Academy {
    /// Store a media payload, then record its metadata (newest first).
    ///
    /// If the payload write fails the metadata collection is left untouched
    /// and [`StateError::MediaWrite`] is returned.
    pub async fn add_media_asset(&mut self, record: MediaRecord) -> StateResult<&MediaAsset> {
        let blobs = Arc::clone(&self.blobs);
        if let Err(e) = blobs.put(&record).await {
            error!(asset = record.id(), error = %e, "failed to store media payload");
            return Err(StateError::MediaWrite(e));
        }

        info!(
            asset = record.id(),
            kind = ?record.asset.kind,
            bytes = record.payload_len(),
            "media stored"
        );
        self.media.insert(0, record.asset);
        self.persist(Slice::MediaMeta);
        Ok(&self.media[0])
    }

    /// Delete a media asset after confirmation.
    ///
    /// The payload delete is best-effort; the metadata entry is removed
    /// whatever its outcome.
    pub async fn delete_media_asset(
        &mut self,
        id: &str,
        confirm: &impl Confirm,
    ) -> StateResult<Deletion> {
        if !confirm.confirm(DELETE_MEDIA_PROMPT) {
            return Ok(Deletion::Declined);
        }

        let blobs = Arc::clone(&self.blobs);
        match blobs.delete(id).await {
            Ok(existed) => debug!(asset = id, existed, "media payload deleted"),
            Err(e) => debug!(asset = id, error = %e, "media payload delete failed; ignoring"),
        }

        let before = self.media.len();
        self.media.retain(|m| m.id != id);
        let removed = self.media.len() != before;
        self.persist(Slice::MediaMeta);

        Ok(if removed {
            info!(asset = id, "media deleted");
            Deletion::Removed
        } else {
            Deletion::NotFound
        })
    }

    /// Fetch an asset's full record, payload included.
    pub async fn media_payload(&self, id: &str) -> StateResult<Option<MediaRecord>> {
        Ok(self.blobs.get(id).await?)
    }

    /// Metadata entries of one kind, newest first.
    pub fn media_of_kind(&self, kind: MediaKind) -> Vec<&MediaAsset> {
        self.media.iter().filter(|m| m.kind == kind).collect()
    }

    /// Compare metadata ids with stored payload ids. Reports only; nothing
    /// is repaired.
    pub async fn orphaned_blobs(&self) -> StateResult<OrphanReport> {
        let stored: BTreeSet<String> = self.blobs.ids().await?.into_iter().collect();
        let known: BTreeSet<String> = self.media.iter().map(|m| m.id.clone()).collect();

        let report = OrphanReport {
            blobs_without_metadata: stored.difference(&known).cloned().collect(),
            metadata_without_blob: known.difference(&stored).cloned().collect(),
        };
        if !report.is_clean() {
            warn!(
                orphan_blobs = report.blobs_without_metadata.len(),
                missing_blobs = report.metadata_without_blob.len(),
                "media stores disagree"
            );
        }
        Ok(report)
    }
}
