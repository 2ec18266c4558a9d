use esf_blob::BlobError;
use esf_store::StoreError;
use esf_types::{TypeError, UserRole};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no user is signed in")]
    NoSession,

    #[error("{role} may not {action}: only admins manage the lesson library")]
    Unauthorized { action: &'static str, role: UserRole },

    #[error("comment rejected by moderation: {reason}")]
    Moderated { reason: String },

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("lesson not found: {0}")]
    LessonNotFound(String),

    #[error("no user with email {0}")]
    UserNotFound(String),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid data: {0}")]
    Invalid(#[from] TypeError),

    /// The media payload could not be written; no metadata was recorded.
    #[error("critical: failed to store media payload: {0}")]
    MediaWrite(#[source] BlobError),

    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StateError {
    /// Failures that must block the user with a notice (as opposed to
    /// silently lagging persistence).
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::Moderated { .. } | Self::MediaWrite(_)
        )
    }
}

pub type StateResult<T> = Result<T, StateError>;
