pub mod reconciler;
pub mod session;

pub use reconciler::{FeedError, FeedState};
pub use session::{FeedSession, LiveFeed, PushChannel};
