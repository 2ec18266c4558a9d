use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{new_id, now_ms};
use crate::user::User;

/// Kind of content carried by a post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
    Audio,
    Article,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Article => write!(f, "article"),
        }
    }
}

/// Post payload: one string, or an ordered list (e.g. a multi-image post).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostContent {
    Single(String),
    Many(Vec<String>),
}

impl PostContent {
    /// The payload items in order.
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for PostContent {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for PostContent {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for PostContent {
    fn from(items: Vec<String>) -> Self {
        Self::Many(items)
    }
}

/// A comment on a post. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub timestamp: u64,
}

impl Comment {
    /// New comment by `author`, stamped now.
    pub fn new(author: &User, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            text: text.into(),
            timestamp: now_ms(),
        }
    }
}

/// Fields supplied by the author when publishing a post.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub content: PostContent,
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub source_url: Option<String>,
}

impl PostDraft {
    pub fn article(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Article,
            content: PostContent::Single(body.into()),
            title: Some(title.into()),
            description: String::new(),
            source_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

/// A feed post.
///
/// Author name and avatar are copied at creation time and never re-derived
/// from the users collection. `likes` holds each user id at most once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub content: PostContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub views: u64,
    pub timestamp: u64,
}

impl Post {
    /// Build a fresh post from a draft: new id, no likes, comments or views.
    pub fn publish(draft: PostDraft, author: &User) -> Self {
        Self {
            id: new_id(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_avatar: author.avatar.clone(),
            content_type: draft.content_type,
            content: draft.content,
            thumbnail: None,
            title: draft.title,
            description: draft.description,
            source_url: draft.source_url,
            likes: Vec::new(),
            comments: Vec::new(),
            views: 0,
            timestamp: now_ms(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    /// Add the like if absent, remove it if present. Returns `true` when the
    /// post ends up liked by `user_id`.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            self.likes.retain(|id| id != user_id);
            false
        } else {
            self.likes.push(user_id.to_string());
            true
        }
    }

    /// Case-insensitive substring match on the description or author name.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.description.to_lowercase().contains(&q) || self.user_name.to_lowercase().contains(&q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::NewUser;
    use proptest::prelude::*;

    fn author() -> User {
        User::from_signup(NewUser {
            name: "Tiago Aprendiz".into(),
            email: "aluno@esf.com".into(),
            ..Default::default()
        })
    }

    fn post() -> Post {
        Post::publish(
            PostDraft::article("Mesada", "50-30-20").with_description("Dica de ouro"),
            &author(),
        )
    }

    #[test]
    fn publish_starts_empty() {
        let p = post();
        assert!(p.likes.is_empty());
        assert!(p.comments.is_empty());
        assert_eq!(p.views, 0);
        assert_eq!(p.user_name, "Tiago Aprendiz");
        assert_eq!(p.title.as_deref(), Some("Mesada"));
    }

    #[test]
    fn toggle_like_adds_then_removes() {
        let mut p = post();
        assert!(p.toggle_like("u1"));
        assert!(p.is_liked_by("u1"));
        assert!(!p.toggle_like("u1"));
        assert!(p.likes.is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let p = post();
        assert!(p.matches_query("OURO"));
        assert!(p.matches_query("tiago"));
        assert!(p.matches_query(""));
        assert!(!p.matches_query("cripto"));
    }

    #[test]
    fn content_untagged_layout() {
        let single: PostContent = serde_json::from_str("\"texto\"").unwrap();
        assert_eq!(single, PostContent::Single("texto".into()));
        let many: PostContent = serde_json::from_str("[\"a.png\",\"b.png\"]").unwrap();
        assert_eq!(many.items(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn type_field_is_renamed() {
        let json = serde_json::to_value(post()).unwrap();
        assert_eq!(json["type"], "article");
        assert!(json.get("sourceUrl").is_none());
        assert!(json.get("userAvatar").is_some());
    }

    proptest! {
        #[test]
        fn toggle_twice_restores_likes(
            existing in proptest::collection::btree_set("[a-z]{1,6}", 0..8),
            user in "[a-z]{1,6}",
        ) {
            let mut p = post();
            p.likes = existing.into_iter().collect();
            let before = p.likes.clone();
            p.toggle_like(&user);
            p.toggle_like(&user);
            let mut after = p.likes.clone();
            let mut expected = before;
            after.sort();
            expected.sort();
            prop_assert_eq!(after, expected);
        }

        #[test]
        fn likes_never_duplicate(toggles in proptest::collection::vec("[ab]", 0..20)) {
            let mut p = post();
            for user in &toggles {
                p.toggle_like(user);
            }
            let mut sorted = p.likes.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), p.likes.len());
        }
    }
}
