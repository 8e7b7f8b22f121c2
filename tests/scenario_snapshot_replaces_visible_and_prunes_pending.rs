use chrono::{TimeZone, Utc};
use coffinated_feed::entities::post::Post;
use coffinated_feed::feed::FeedState;

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

fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.post_id.as_str()).collect()
}

#[test]
fn scenario_last_snapshot_wins_wholesale() {
    let mut feed = FeedState::new();

    feed.load_snapshot(vec![post("2"), post("1")]);
    feed.load_snapshot(vec![post("5"), post("4"), post("3")]);

    // Replacement, not a merge.
    assert_eq!(ids(feed.visible()), ["5", "4", "3"]);
}

#[test]
fn scenario_snapshot_prunes_buffered_ids_it_already_contains() {
    let mut feed = FeedState::new();

    feed.on_push_received(post("2"));
    feed.on_push_received(post("3"));

    // The snapshot raced ahead and already contains id 2.
    feed.load_snapshot(vec![post("2"), post("1")]);
    assert_eq!(feed.pending_count(), 1);

    let revealed = feed.reveal();
    assert_eq!(ids(&revealed), ["3"]);
    // No id appears twice in the visible list.
    assert_eq!(ids(feed.visible()), ["3", "2", "1"]);
}

#[test]
fn scenario_snapshot_leaves_unrelated_buffer_entries_alone() {
    let mut feed = FeedState::new();

    feed.on_push_received(post("9"));
    feed.load_snapshot(vec![post("1")]);

    assert_eq!(feed.pending_count(), 1);
    assert_eq!(ids(&feed.reveal()), ["9"]);
}
