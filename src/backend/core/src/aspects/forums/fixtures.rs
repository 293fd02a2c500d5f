use chrono::Duration;

use super::entity::{Forum, ForumPost, ForumTopic};
use crate::aspects::people::fixtures::{ADMIN_ID, HUNTER_ID, MAKER_ID};
use crate::store::iso;

pub const GENERAL_FORUM_ID: &str = "2d7e4a90-5b1f-4f0e-8a3c-0c1f9e7b2f01";
pub const SHOW_FORUM_ID: &str = "2d7e4a90-5b1f-4f0e-8a3c-0c1f9e7b2f02";
pub const WELCOME_TOPIC_ID: &str = "2d7e4a90-5b1f-4f0e-8a3c-0c1f9e7b2f11";
pub const FEEDBACK_TOPIC_ID: &str = "2d7e4a90-5b1f-4f0e-8a3c-0c1f9e7b2f12";

pub fn forums() -> Vec<Forum> {
    let now = iso::now();
    vec![
        Forum {
            id: GENERAL_FORUM_ID.into(),
            title: "General".into(),
            description: "Introductions, questions and everything in between.".into(),
            author_id: ADMIN_ID.into(),
            created_at: now - Duration::days(8),
            updated_at: now - Duration::days(8),
        },
        Forum {
            id: SHOW_FORUM_ID.into(),
            title: "Show and Tell".into(),
            description: "Share what you are building and get early feedback.".into(),
            author_id: MAKER_ID.into(),
            created_at: now - Duration::days(6),
            updated_at: now - Duration::days(6),
        },
    ]
}

pub fn topics() -> Vec<ForumTopic> {
    let now = iso::now();
    vec![
        ForumTopic {
            id: WELCOME_TOPIC_ID.into(),
            forum_id: GENERAL_FORUM_ID.into(),
            title: "Welcome to Launchpad".into(),
            content: "Say hello and tell us what you are hunting for.".into(),
            author_id: ADMIN_ID.into(),
            created_at: now - Duration::days(7),
            updated_at: now - Duration::days(7),
        },
        ForumTopic {
            id: FEEDBACK_TOPIC_ID.into(),
            forum_id: SHOW_FORUM_ID.into(),
            title: "Feedback on my terminal dashboard".into(),
            content: "It renders crate download stats in real time. Thoughts?".into(),
            author_id: MAKER_ID.into(),
            created_at: now - Duration::days(5),
            updated_at: now - Duration::days(5),
        },
    ]
}

pub fn posts() -> Vec<ForumPost> {
    let now = iso::now();
    [
        (WELCOME_TOPIC_ID, HUNTER_ID, "Hi all, here for the dev tools.", 6),
        (WELCOME_TOPIC_ID, MAKER_ID, "Hello! Shipping something soon.", 5),
        (FEEDBACK_TOPIC_ID, HUNTER_ID, "Love it. A dark theme would help.", 4),
    ]
    .into_iter()
    .map(|(topic_id, author_id, content, days_ago)| ForumPost {
        id: String::new(),
        topic_id: topic_id.into(),
        content: content.into(),
        author_id: author_id.into(),
        created_at: now - Duration::days(days_ago),
        updated_at: now - Duration::days(days_ago),
    })
    .collect()
}
