use futures_util::StreamExt;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::entities::post::{Post, PostPayload};
use crate::feed::session::PushChannel;
use crate::utils::state::ArcClientState;

/// One frame on the live socket. The server currently only pushes `new_post`,
/// but the envelope is tagged so it can grow.
#[derive(Deserialize, Debug)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum SocketEvent {
    NewPost(PostPayload),
}

/// Live-feed push channel over a websocket to the active server.
pub struct WsPushChannel {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    current_user: Option<String>,
}

impl WsPushChannel {
    pub async fn connect(state: &ArcClientState) -> Result<Self, ClientError> {
        let url = feed_socket_url(&state.config.current_server);
        let (socket, _) = connect_async(url.as_str()).await?;
        debug!(%url, "live feed socket connected");

        Ok(Self {
            socket,
            current_user: state.config.user_id.clone(),
        })
    }

    fn decode(&self, text: &str) -> Result<Post, ClientError> {
        let event: SocketEvent = serde_json::from_str(text)?;
        match event {
            SocketEvent::NewPost(payload) => {
                Ok(Post::from_payload(payload, self.current_user.as_deref())?)
            }
        }
    }
}

/// http(s) origin of the active server -> its ws(s) feed endpoint.
fn feed_socket_url(server: &str) -> String {
    let server = server.trim_end_matches('/');
    let origin = if let Some(rest) = server.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        server.to_string()
    };
    format!("{origin}/ws/feed")
}

impl PushChannel for WsPushChannel {
    async fn recv(&mut self) -> Option<Post> {
        while let Some(frame) = self.socket.next().await {
            let message = match frame {
                Ok(message) => message,
                Err(err) => {
                    warn!("live feed socket error: {err}");
                    return None;
                }
            };

            match message {
                Message::Text(text) => match self.decode(&text) {
                    Ok(post) => return Some(post),
                    // At-least-once channel: one bad frame must not end the
                    // whole subscription.
                    Err(err) => warn!("dropping malformed push event: {err}"),
                },
                Message::Close(_) => return None,
                _ => {}
            }
        }
        None
    }
}
