use std::sync::Arc;

use tokio::sync::{Mutex, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::entities::post::Post;
use crate::feed::reconciler::{FeedError, FeedState};

/// Push-channel collaborator contract: decoded posts, one at a time, in send
/// order, at-least-once (duplicates possible). `None` means the channel is
/// gone for good.
pub trait PushChannel: Send + 'static {
    fn recv(&mut self) -> impl Future<Output = Option<Post>> + Send;
}

/// Plain mpsc receivers work as a push channel, which is also how tests
/// script deliveries.
impl PushChannel for tokio::sync::mpsc::Receiver<Post> {
    async fn recv(&mut self) -> Option<Post> {
        tokio::sync::mpsc::Receiver::recv(self).await
    }
}

/// Single mutation funnel for one feed view. Snapshot fetch, push stream and
/// user actions all go through the same lock, so `FeedState` never sees two
/// contexts at once. Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    state: Arc<Mutex<FeedState>>,
    pending_tx: watch::Sender<usize>,
}

impl LiveFeed {
    pub fn new() -> Self {
        let (pending_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(FeedState::new())),
            pending_tx,
        }
    }

    /// Receiver side of the "N new posts" affordance; updated on every
    /// mutation that can change the buffer.
    pub fn pending_counts(&self) -> watch::Receiver<usize> {
        self.pending_tx.subscribe()
    }

    pub async fn load_snapshot(&self, posts: Vec<Post>) {
        let mut state = self.state.lock().await;
        state.load_snapshot(posts);
        self.publish_pending(&state);
    }

    pub async fn on_push_received(&self, post: Post) {
        let mut state = self.state.lock().await;
        state.on_push_received(post);
        self.publish_pending(&state);
    }

    pub async fn reveal(&self) -> Vec<Post> {
        let mut state = self.state.lock().await;
        let revealed = state.reveal();
        self.publish_pending(&state);
        revealed
    }

    pub async fn apply_like_toggle(&self, id: &str, liked: bool) -> Result<Post, FeedError> {
        self.state.lock().await.apply_like_toggle(id, liked)
    }

    pub async fn visible(&self) -> Vec<Post> {
        self.state.lock().await.visible().to_vec()
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending_count()
    }

    fn publish_pending(&self, state: &FeedState) {
        self.pending_tx.send_replace(state.pending_count());
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped ownership of a push subscription. The subscription is released
/// exactly once, either by an explicit [`close`](Self::close) or by dropping
/// the session; every exit path tears it down. A delivery that races teardown
/// is discarded, never applied to a torn-down view.
pub struct FeedSession {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl FeedSession {
    /// Spawns the forwarder that serializes channel deliveries into the
    /// feed's mutation funnel.
    pub fn subscribe<C: PushChannel>(feed: LiveFeed, mut channel: C) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Stop wins the race: a delivery arriving alongside
                    // teardown is dropped.
                    biased;
                    _ = &mut stop_rx => break,
                    delivery = channel.recv() => match delivery {
                        Some(post) => feed.on_push_received(post).await,
                        None => {
                            debug!("push channel closed by peer");
                            break;
                        }
                    },
                }
            }
            // `channel` drops here, which is what actually unsubscribes.
        });

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Stops the forwarder. Idempotent: the second and later calls do
    /// nothing.
    pub fn close(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Closes and waits for the forwarder to finish. After this returns, no
    /// further delivery can touch the feed.
    pub async fn join(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
