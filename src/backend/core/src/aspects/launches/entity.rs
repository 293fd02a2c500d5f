use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::search::Indexable;
use crate::store::iso;
use crate::validation::{
    validate_field, validate_request, MaxLength, Required, Validate, ValidationResult,
    MAX_BODY_LENGTH, MAX_TITLE_LENGTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStatus {
    Upcoming,
    Live,
}

impl LaunchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
        }
    }
}

/// A scheduled product launch. Goes live once its launch date passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Launch {
    pub id: String,
    pub product_id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "crate::store::iso")]
    pub launch_date: DateTime<Utc>,
    pub status: LaunchStatus,
    pub author_id: String,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for Launch {
    const COLLECTION: &'static str = "launches";
    const NAME: &'static str = "Launch";
    const SORT_FIELD: &'static str = "launchDate";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Indexable for Launch {
    const SEARCH_TYPE: &'static str = "launch";

    fn search_title(&self) -> String {
        self.title.clone()
    }

    fn search_body(&self) -> String {
        self.description.clone()
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/launches/{}", self.id))
    }
}

impl Validate for Launch {
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

impl Launch {
    /// Upcoming and due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == LaunchStatus::Upcoming && self.launch_date <= now
    }

    pub(crate) fn apply(&mut self, input: UpdateLaunchInput) {
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(launch_date) = input.launch_date {
            self.launch_date = iso::truncate(launch_date);
        }
        self.updated_at = iso::now();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, InputObject)]
pub struct CreateLaunchInput {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub launch_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateLaunchInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub launch_date: Option<DateTime<Utc>>,
}

/// Narrows `listLaunches`. The date bounds are inclusive.
#[derive(Debug, Clone, Default, InputObject)]
pub struct LaunchFilter {
    pub product_id: Option<String>,
    pub status: Option<LaunchStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_due_only_when_upcoming_and_past() {
        let now = iso::now();
        let mut launch = Launch {
            id: "l1".into(),
            product_id: "p1".into(),
            title: "v1".into(),
            description: "First release".into(),
            launch_date: now - Duration::seconds(1),
            status: LaunchStatus::Upcoming,
            author_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(launch.is_due(now));

        launch.launch_date = now + Duration::hours(1);
        assert!(!launch.is_due(now));

        launch.launch_date = now;
        launch.status = LaunchStatus::Live;
        assert!(!launch.is_due(now));
    }

    #[test]
    fn test_launch_date_is_stored_fixed_width() {
        let now = iso::now();
        let launch = Launch {
            id: "l1".into(),
            product_id: "p1".into(),
            title: "v1".into(),
            description: "First release".into(),
            launch_date: now,
            status: LaunchStatus::Upcoming,
            author_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };
        let doc = launch.to_document().unwrap();
        assert_eq!(doc["launchDate"].as_str().unwrap().len(), 24);
        assert_eq!(doc["status"], "upcoming");
        assert_eq!(Launch::from_document(doc).unwrap(), launch);
    }
}
