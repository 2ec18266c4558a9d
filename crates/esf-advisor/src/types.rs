use serde::{Deserialize, Serialize};

/// Citation attached to a tip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipSource {
    pub title: String,
    pub uri: String,
}

/// The tip of the day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTip {
    pub text: String,
    pub sources: Vec<TipSource>,
}

impl DailyTip {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }

    /// Waiting text shown while nothing has been fetched.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(text)
    }

    pub fn with_source(mut self, title: impl Into<String>, uri: impl Into<String>) -> Self {
        self.sources.push(TipSource {
            title: title.into(),
            uri: uri.into(),
        });
        self
    }
}

/// Outcome of classifying a comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moderation {
    pub safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Moderation {
    pub fn safe() -> Self {
        Self {
            safe: true,
            reason: None,
        }
    }

    pub fn unsafe_because(reason: impl Into<String>) -> Self {
        Self {
            safe: false,
            reason: Some(reason.into()),
        }
    }
}
