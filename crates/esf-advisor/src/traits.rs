use async_trait::async_trait;

use crate::types::{DailyTip, Moderation};

/// Capability producing daily tips and comment-safety verdicts.
///
/// Implementations absorb their own failures: an unavailable tip is `None`,
/// and the classifier always returns a verdict.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// The tip of the day, or `None` if none could be produced.
    async fn fetch_daily_tip(&self) -> Option<DailyTip>;

    /// Classify a comment before it is published.
    async fn classify_comment(&self, text: &str) -> Moderation;
}
