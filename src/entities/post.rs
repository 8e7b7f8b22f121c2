use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

/// A snapshot or push payload arrived without a usable post id.
/// Identity is what reconciliation dedupes on, so these never enter the feed.
#[derive(Debug, Error)]
#[error("post payload has no id")]
pub struct MissingPostId;

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub post_id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: Option<i64>,
    pub liked_by_me: bool,
    /// Which server this post came from, when the backend reports it.
    pub origin: Option<String>,
}

/// What the wire actually carries. Servers disagree about `likes`: some send a
/// bare count, some the list of liker ids. Both are accepted here.
#[derive(Deserialize, Debug, Clone)]
pub struct PostPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub likes: LikesField,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub shares: Option<i64>,
    #[serde(default)]
    pub server: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum LikesField {
    Count(i64),
    List(Vec<String>),
}

impl Default for LikesField {
    fn default() -> Self {
        LikesField::Count(0)
    }
}

impl LikesField {
    pub fn count(&self) -> i64 {
        match self {
            LikesField::Count(n) => *n,
            LikesField::List(ids) => ids.len() as i64,
        }
    }

    /// Only the list form can answer this; the count form is a degraded view
    /// that simply doesn't know who liked what.
    pub fn liked_by(&self, user_id: Option<&str>) -> bool {
        match (self, user_id) {
            (LikesField::List(ids), Some(user_id)) => ids.iter().any(|id| id == user_id),
            _ => false,
        }
    }
}

impl Post {
    /// Boundary decoding for both snapshot and push input. A payload without an
    /// id (or with an empty one) is rejected rather than admitted with an
    /// undefined identity.
    pub fn from_payload(
        payload: PostPayload,
        current_user: Option<&str>,
    ) -> Result<Post, MissingPostId> {
        let post_id = match payload.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(MissingPostId),
        };

        Ok(Post {
            post_id,
            author: payload.username,
            content: payload.content,
            created_at: payload.timestamp,
            like_count: payload.likes.count(),
            liked_by_me: payload.likes.liked_by(current_user),
            comment_count: payload.comments,
            share_count: payload.shares,
            origin: payload.server,
        })
    }
}
