use chrono::{TimeZone, Utc};
use coffinated_feed::entities::post::Post;
use coffinated_feed::feed::LiveFeed;

fn post(id: &str) -> Post {
    Post {
        post_id: id.to_string(),
        author: format!("user-{id}"),
        content: format!("post {id}"),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        like_count: 0,
        comment_count: 0,
        share_count: None,
        liked_by_me: false,
        origin: None,
    }
}

#[tokio::test]
async fn scenario_new_posts_affordance_tracks_buffer() {
    let feed = LiveFeed::new();
    let pending = feed.pending_counts();

    feed.load_snapshot(vec![post("1")]).await;
    assert_eq!(*pending.borrow(), 0);

    feed.on_push_received(post("2")).await;
    feed.on_push_received(post("3")).await;
    assert_eq!(*pending.borrow(), 2);

    // A duplicate delivery doesn't inflate the badge.
    feed.on_push_received(post("3")).await;
    assert_eq!(*pending.borrow(), 2);

    let revealed = feed.reveal().await;
    assert_eq!(revealed.len(), 2);
    assert_eq!(*pending.borrow(), 0);
}

#[tokio::test]
async fn scenario_all_mutations_go_through_one_funnel() {
    let feed = LiveFeed::new();
    feed.load_snapshot(vec![post("1")]).await;

    // Interleave user action and push input through the shared handle.
    let pusher = {
        let feed = feed.clone();
        tokio::spawn(async move {
            for id in ["2", "3", "4"] {
                feed.on_push_received(post(id)).await;
            }
        })
    };

    let toggled = feed.apply_like_toggle("1", true).await.unwrap();
    assert_eq!(toggled.like_count, 1);

    pusher.await.unwrap();
    assert_eq!(feed.pending_count().await, 3);

    let revealed = feed.reveal().await;
    assert_eq!(revealed.len(), 3);
    assert_eq!(feed.visible().await.len(), 4);
}
