use std::collections::VecDeque;

use thiserror::Error;

use crate::entities::post::Post;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("post {0} is not visible")]
    PostNotFound(String),
}

/// Ordered feed state for one view: what the user can currently see, plus the
/// buffer of pushed posts waiting behind the "show N new posts" affordance.
///
/// Both lists are newest first. No post id ever appears twice within either
/// list; `on_push_received` dedupes at ingestion and `load_snapshot` prunes
/// the buffer against the fresh snapshot.
#[derive(Debug, Default)]
pub struct FeedState {
    visible: Vec<Post>,
    pending: VecDeque<Post>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(posts: Vec<Post>) -> Self {
        let mut state = Self::new();
        state.load_snapshot(posts);
        state
    }

    pub fn visible(&self) -> &[Post] {
        &self.visible
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Replaces the visible list wholesale; the source is assumed to already
    /// be newest first. Last snapshot wins: this is a replacement, not a
    /// merge. Buffered entries whose id just became visible are dropped so a
    /// later reveal can't show the same id twice.
    pub fn load_snapshot(&mut self, posts: Vec<Post>) {
        self.visible = posts;
        let visible = &self.visible;
        self.pending
            .retain(|p| !visible.iter().any(|v| v.post_id == p.post_id));
    }

    /// One inbound push event, in arrival order. Arrival order is
    /// authoritative for buffer position; the timestamp field never reorders
    /// anything.
    pub fn on_push_received(&mut self, post: Post) {
        if self.visible.iter().any(|v| v.post_id == post.post_id) {
            // Already revealed once; visibility is sticky.
            return;
        }
        if let Some(slot) = self
            .pending
            .iter_mut()
            .find(|p| p.post_id == post.post_id)
        {
            // Duplicate delivery before the next reveal: last write wins,
            // position in the buffer is kept.
            *slot = post;
            return;
        }
        self.pending.push_front(post);
    }

    /// Promotes the whole buffer to the front of the visible list, clears it,
    /// and returns the promoted posts (newest first) for the caller to
    /// highlight. Empty buffer means an empty return and no other effect.
    pub fn reveal(&mut self) -> Vec<Post> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let revealed: Vec<Post> = self.pending.drain(..).collect();
        let mut merged = Vec::with_capacity(revealed.len() + self.visible.len());
        merged.extend(revealed.iter().cloned());
        merged.append(&mut self.visible);
        self.visible = merged;
        revealed
    }

    /// Optimistic like/unlike on a visible post: exactly +1 or -1 on the
    /// count, so the caller can undo it with the opposite call when the
    /// remote request fails. Buffered posts can't be toggled before reveal.
    pub fn apply_like_toggle(&mut self, id: &str, liked: bool) -> Result<Post, FeedError> {
        let post = self
            .visible
            .iter_mut()
            .find(|p| p.post_id == id)
            .ok_or_else(|| FeedError::PostNotFound(id.to_string()))?;

        post.like_count += if liked { 1 } else { -1 };
        post.liked_by_me = liked;
        Ok(post.clone())
    }
}
