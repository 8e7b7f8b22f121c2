use chrono::{TimeZone, Utc};
use coffinated_feed::entities::post::Post;
use coffinated_feed::feed::FeedState;

fn post(id: &str, content: &str) -> Post {
    Post {
        post_id: id.to_string(),
        author: format!("user-{id}"),
        content: content.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        like_count: 0,
        comment_count: 0,
        share_count: None,
        liked_by_me: false,
        origin: None,
    }
}

#[test]
fn scenario_duplicate_push_replaces_buffered_entry() {
    let mut feed = FeedState::new();

    feed.on_push_received(post("2", "first delivery"));
    feed.on_push_received(post("3", "unrelated"));
    feed.on_push_received(post("2", "second delivery"));

    // Last write wins for id 2, without growing the buffer.
    assert_eq!(feed.pending_count(), 2);

    let revealed = feed.reveal();
    // The replacement kept id 2's original buffer position.
    assert_eq!(revealed[0].post_id, "3");
    assert_eq!(revealed[1].post_id, "2");
    assert_eq!(revealed[1].content, "second delivery");
}
