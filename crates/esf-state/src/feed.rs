//! Feed operations: likes, moderated comments, publishing and search.

use std::sync::Arc;

use esf_store::Slice;
use esf_types::{Comment, Post, PostDraft};
use tracing::{debug, info};

use crate::academy::Academy;
use crate::error::{StateError, StateResult};

/// Reason reported when the classifier rejects a comment without one.
const UNSPECIFIED_REASON: &str = "Conteúdo não permitido.";

impl Academy {
    fn post_index(&self, post_id: &str) -> StateResult<usize> {
        self.posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| StateError::PostNotFound(post_id.to_string()))
    }

    /// Toggle the session user's like on a post. Returns `true` if the post
    /// is now liked by them.
    pub fn toggle_like(&mut self, post_id: &str) -> StateResult<bool> {
        let user_id = self.acting_user()?.id.clone();
        let idx = self.post_index(post_id)?;
        let liked = self.posts[idx].toggle_like(&user_id);
        debug!(post = post_id, user = %user_id, liked, "like toggled");
        self.persist(Slice::Posts);
        Ok(liked)
    }

    /// Classify `text` and, if safe, append it as the session user's comment.
    ///
    /// An unsafe verdict aborts with [`StateError::Moderated`] carrying the
    /// classifier's reason; nothing is appended.
    pub async fn add_comment(&mut self, post_id: &str, text: &str) -> StateResult<&Comment> {
        let author = self.acting_user()?.clone();
        self.post_index(post_id)?;

        let advisor = Arc::clone(&self.advisor);
        let verdict = advisor.classify_comment(text).await;
        if !verdict.safe {
            let reason = verdict
                .reason
                .unwrap_or_else(|| UNSPECIFIED_REASON.to_string());
            info!(post = post_id, user = %author.id, %reason, "comment rejected");
            return Err(StateError::Moderated { reason });
        }

        // Re-resolve: the index is not held across the classifier call.
        let idx = self.post_index(post_id)?;
        self.posts[idx].comments.push(Comment::new(&author, text.trim()));
        self.persist(Slice::Posts);

        let post = &self.posts[idx];
        post.comments
            .last()
            .ok_or_else(|| StateError::PostNotFound(post_id.to_string()))
    }

    /// Publish a post as the session user. New posts go to the front.
    pub fn publish_post(&mut self, draft: PostDraft) -> StateResult<&Post> {
        let post = Post::publish(draft, self.acting_user()?);
        info!(post = %post.id, kind = %post.content_type, "post published");
        self.posts.insert(0, post);
        self.persist(Slice::Posts);
        Ok(&self.posts[0])
    }

    /// Posts whose description or author name contains `query`,
    /// case-insensitively, newest first. An empty query matches everything.
    pub fn search_posts(&self, query: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.matches_query(query)).collect()
    }

    /// The feed as filtered by the current search box.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.search_posts(&self.view.search_query)
    }
}
