use serde::{Deserialize, Serialize};

use crate::id::{new_id, now_ms};

/// Kind of media asset in the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    Pdf,
    Image,
}

impl MediaKind {
    /// Guess the kind from a mime type; unknown types are treated as PDFs
    /// (documents) since the library has no generic kind.
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "audio" => Self::Audio,
            "video" => Self::Video,
            "image" => Self::Image,
            _ => Self::Pdf,
        }
    }
}

/// Metadata of a media asset, as kept in the structured store.
///
/// The payload itself lives in the blob store under the same `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub name: String,
    pub mime_type: String,
    pub timestamp: u64,
}

impl MediaAsset {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            kind: MediaKind::from_mime(&mime_type),
            name: name.into(),
            mime_type,
            timestamp: now_ms(),
        }
    }
}

/// Full blob-store record: the metadata plus the payload reference
/// (a base64 data URL or an external URL).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(flatten)]
    pub asset: MediaAsset,
    pub url: String,
}

impl MediaRecord {
    pub fn new(asset: MediaAsset, url: impl Into<String>) -> Self {
        Self {
            asset,
            url: url.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.asset.id
    }

    /// Payload size in bytes as stored.
    pub fn payload_len(&self) -> usize {
        self.url.len()
    }
}
