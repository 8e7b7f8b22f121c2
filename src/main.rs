use std::sync::Arc;
use std::time::Duration;

use coffinated_feed::client::ServerApi;
use coffinated_feed::client::http::HttpApi;
use coffinated_feed::client::socket::WsPushChannel;
use coffinated_feed::feed::{FeedSession, LiveFeed};
use coffinated_feed::utils::state::ClientState;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::fmt()
        .with_writer(std::io::stderr)
        .init();

    let state = match ClientState::create_from_env() {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!("Failed to create ClientState: {:?}", err);
            return;
        }
    };
    info!("using server {}", state.config.current_server);

    let api = HttpApi::new(state.clone());
    let feed = LiveFeed::new();

    match api.fetch_snapshot().await {
        Ok(posts) => {
            info!("snapshot loaded: {} posts", posts.len());
            feed.load_snapshot(posts).await;
        }
        Err(err) => error!("snapshot fetch failed: {:?}", err),
    }

    let channel = match WsPushChannel::connect(&state).await {
        Ok(channel) => channel,
        Err(err) => {
            error!("Failed to connect live feed socket: {:?}", err);
            return;
        }
    };
    let mut session = FeedSession::subscribe(feed.clone(), channel);

    let mut pending = feed.pending_counts();
    let mut reveal_tick = tokio::time::interval(Duration::from_secs(30));
    reveal_tick.tick().await; // the first tick fires immediately

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = pending.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = *pending.borrow_and_update();
                if count > 0 {
                    info!("{count} new posts waiting");
                }
            }
            _ = reveal_tick.tick() => {
                let revealed = feed.reveal().await;
                if !revealed.is_empty() {
                    info!("revealed {} new posts", revealed.len());
                    for post in &revealed {
                        info!("@{}: {}", post.author, post.content);
                    }
                }
            }
        }
    }

    session.close();
    session.join().await;
    info!("feed session closed");
}
