use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::search::Indexable;
use crate::store::iso;
use crate::validation::{
    validate_field, validate_request, MaxLength, Required, Validate, ValidationResult,
    MAX_BODY_LENGTH, MAX_TITLE_LENGTH,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Forum {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author_id: String,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct ForumTopic {
    pub id: String,
    pub forum_id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub topic_id: String,
    pub content: String,
    pub author_id: String,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Forum {
    const COLLECTION: &'static str = "forums";
    const NAME: &'static str = "Forum";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ForumTopic {
    const COLLECTION: &'static str = "forum_topics";
    const NAME: &'static str = "ForumTopic";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ForumPost {
    const COLLECTION: &'static str = "forum_posts";
    const NAME: &'static str = "ForumPost";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Indexable for Forum {
    const SEARCH_TYPE: &'static str = "forum";

    fn search_title(&self) -> String {
        self.title.clone()
    }

    fn search_body(&self) -> String {
        self.description.clone()
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/forums/{}", self.id))
    }
}

impl Indexable for ForumTopic {
    const SEARCH_TYPE: &'static str = "topic";

    fn search_title(&self) -> String {
        self.title.clone()
    }

    fn search_body(&self) -> String {
        self.content.clone()
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/forums/{}/topics/{}", self.forum_id, self.id))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════════════

impl Validate for Forum {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("title", &self.title).rule(Required).rule(MaxLength(MAX_TITLE_LENGTH)))
            .field(
                validate_field("description", &self.description)
                    .rule(Required)
                    .rule(MaxLength(MAX_BODY_LENGTH)),
            )
            .result()
    }
}

impl Validate for ForumTopic {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("title", &self.title).rule(Required).rule(MaxLength(MAX_TITLE_LENGTH)))
            .field(validate_field("content", &self.content).rule(Required).rule(MaxLength(MAX_BODY_LENGTH)))
            .result()
    }
}

impl Validate for ForumPost {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("content", &self.content).rule(Required).rule(MaxLength(MAX_BODY_LENGTH)))
            .result()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, InputObject)]
pub struct CreateForumInput {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateForumInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateTopicInput {
    pub forum_id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateTopicInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreatePostInput {
    pub topic_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdatePostInput {
    pub content: Option<String>,
}

impl Forum {
    pub(crate) fn apply(&mut self, input: UpdateForumInput) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        self.updated_at = iso::now();
    }
}

impl ForumTopic {
    pub(crate) fn apply(&mut self, input: UpdateTopicInput) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = input.content {
            self.content = content;
        }
        self.updated_at = iso::now();
    }
}

impl ForumPost {
    pub(crate) fn apply(&mut self, input: UpdatePostInput) {
        if let Some(content) = input.content {
            self.content = content;
        }
        self.updated_at = iso::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_round_trip_and_fields() {
        let now = iso::now();
        let topic = ForumTopic {
            id: "t1".into(),
            forum_id: "f1".into(),
            title: "Hello".into(),
            content: "First!".into(),
            author_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };

        let doc = topic.to_document().unwrap();
        assert_eq!(doc["forumId"], "f1");
        assert_eq!(doc["authorId"], "u1");
        assert_eq!(ForumTopic::from_document(doc).unwrap(), topic);
    }

    #[test]
    fn test_forum_title_limits() {
        let now = iso::now();
        let mut forum = Forum {
            id: "f1".into(),
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            description: "About".into(),
            author_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(forum.validate().unwrap_err().has_errors("title"));

        forum.apply(UpdateForumInput {
            title: Some("  Trimmed  ".into()),
            description: None,
        });
        assert_eq!(forum.title, "Trimmed");
        assert!(forum.validate().is_ok());
    }
}
