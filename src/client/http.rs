use reqwest::RequestBuilder;
use serde::Deserialize;
use validator::Validate;

use crate::client::{ClientError, NewPost, ServerApi};
use crate::entities::post::{Post, PostPayload};
use crate::utils::state::ArcClientState;

/// Consumer side of the backend's `{success, data, error}` response envelope.
#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn check(self) -> Result<Option<T>, ClientError> {
        if !self.success {
            return Err(ClientError::Api(
                self.error.unwrap_or_else(|| "UNKNOWN_ERROR".to_string()),
            ));
        }
        Ok(self.data)
    }

    fn into_data(self) -> Result<T, ClientError> {
        self.check()?
            .ok_or_else(|| ClientError::Api("EMPTY_RESPONSE".to_string()))
    }
}

/// REST implementation of [`ServerApi`] against the active server.
pub struct HttpApi {
    state: ArcClientState,
}

impl HttpApi {
    pub fn new(state: ArcClientState) -> Self {
        Self { state }
    }

    fn url(&self, path: &str) -> String {
        let server = self.state.config.current_server.trim_end_matches('/');
        format!("{server}{path}")
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.state.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn current_user(&self) -> Option<&str> {
        self.state.config.user_id.as_deref()
    }
}

impl ServerApi for HttpApi {
    async fn fetch_snapshot(&self) -> Result<Vec<Post>, ClientError> {
        let envelope: ApiEnvelope<Vec<PostPayload>> = self
            .authorized(self.state.http.get(self.url("/api/posts")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let payloads = envelope.into_data()?;
        let mut posts = Vec::with_capacity(payloads.len());
        for payload in payloads {
            posts.push(Post::from_payload(payload, self.current_user())?);
        }
        Ok(posts)
    }

    async fn set_like(&self, post_id: &str, liked: bool) -> Result<(), ClientError> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .authorized(
                self.state
                    .http
                    .put(self.url(&format!("/api/posts/{post_id}/like"))),
            )
            .json(&serde_json::json!({ "liked": liked }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        envelope.check()?;
        Ok(())
    }

    async fn publish(&self, post: &NewPost) -> Result<Post, ClientError> {
        post.validate()?;

        let envelope: ApiEnvelope<PostPayload> = self
            .authorized(self.state.http.post(self.url("/api/posts")))
            .json(post)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Post::from_payload(
            envelope.into_data()?,
            self.current_user(),
        )?)
    }
}
