use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use crate::entities::post::{MissingPostId, Post};

pub mod http;
pub mod socket;

/// Outbound create-post payload. Same limit the compose form enforces.
#[derive(Debug, Serialize, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, max = 280, message = "post must be 1..=280 characters"))]
    pub content: String,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("live socket failed: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed server payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidPost(#[from] MissingPostId),

    #[error("invalid request payload: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The server answered but flagged the request as failed, with its error
    /// code from the response envelope.
    #[error("server rejected the request: {0}")]
    Api(String),
}

/// Remote API collaborator contract. The view layer applies like toggles
/// optimistically through the reconciler first, then calls [`set_like`]
/// here; on failure it compensates with the opposite toggle.
///
/// [`set_like`]: ServerApi::set_like
pub trait ServerApi {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Vec<Post>, ClientError>> + Send;

    fn set_like(
        &self,
        post_id: &str,
        liked: bool,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn publish(&self, post: &NewPost) -> impl Future<Output = Result<Post, ClientError>> + Send;
}
