use std::fmt;

/// Independently keyed slice of persisted application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slice {
    Users,
    Posts,
    Lessons,
    /// Media asset metadata; payloads live in the blob store.
    MediaMeta,
    /// The single optional session user.
    Session,
    /// Dark-mode preference.
    DarkMode,
}

impl Slice {
    pub const ALL: [Slice; 6] = [
        Self::Users,
        Self::Posts,
        Self::Lessons,
        Self::MediaMeta,
        Self::Session,
        Self::DarkMode,
    ];

    /// Storage key of this slice.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Users => "esf_teens_users",
            Self::Posts => "esf_teens_posts",
            Self::Lessons => "esf_teens_lessons",
            Self::MediaMeta => "esf_teens_media_meta",
            Self::Session => "esf_teens_session",
            Self::DarkMode => "esf_teens_darkmode",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
