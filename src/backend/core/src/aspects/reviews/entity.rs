use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aspects::products::SubmissionStatus;
use crate::repository::Entity;
use crate::search::Indexable;
use crate::store::iso;
use crate::validation::{
    validate_field, validate_request, MaxLength, Range, Required, Validate, ValidationResult,
    MAX_BODY_LENGTH, MAX_SHORT_TEXT_LENGTH, MAX_TITLE_LENGTH,
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub author_id: String,
    pub rating: i32,
    pub title: String,
    pub content: String,
    pub status: SubmissionStatus,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

/// A user's complaint about a review, handled by moderators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReport {
    pub id: String,
    pub review_id: String,
    pub reporter_id: String,
    pub reason: String,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub resolved_by: Option<String>,
    #[serde(default, with = "crate::store::iso::option")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

/// Count and mean rating of a product's visible reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub count: u64,
    /// Zero when there are no reviews.
    pub average: f64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: impl IntoIterator<Item = i32>) -> Self {
        let (count, total) = ratings
            .into_iter()
            .fold((0u64, 0i64), |(count, total), r| (count + 1, total + i64::from(r)));
        let average = if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        };
        Self { count, average }
    }
}

impl Entity for Review {
    const COLLECTION: &'static str = "reviews";
    const NAME: &'static str = "Review";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ReviewReport {
    const COLLECTION: &'static str = "review_reports";
    const NAME: &'static str = "ReviewReport";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Indexable for Review {
    const SEARCH_TYPE: &'static str = "review";

    fn search_title(&self) -> String {
        self.title.clone()
    }

    fn search_body(&self) -> String {
        self.content.clone()
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/products/{}", self.product_id))
    }
}

impl Validate for Review {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("rating", &self.rating).rule(Range::new(MIN_RATING, MAX_RATING)))
            .field(validate_field("title", &self.title).rule(Required).rule(MaxLength(MAX_TITLE_LENGTH)))
            .field(validate_field("content", &self.content).rule(Required).rule(MaxLength(MAX_BODY_LENGTH)))
            .result()
    }
}

impl Validate for ReviewReport {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("reason", &self.reason)
                    .rule(Required)
                    .rule(MaxLength(MAX_SHORT_TEXT_LENGTH)),
            )
            .field(validate_field("details", &self.details).rule(MaxLength(MAX_BODY_LENGTH)))
            .result()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, InputObject)]
pub struct CreateReviewInput {
    pub product_id: String,
    pub rating: i32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateReviewInput {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Narrows `listReviews`. Unset fields match everything.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ReviewFilter {
    pub product_id: Option<String>,
    pub author_id: Option<String>,
    /// Only reviews rated at least this.
    pub min_rating: Option<i32>,
    pub status: Option<SubmissionStatus>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateReportInput {
    pub review_id: String,
    pub reason: String,
    pub details: Option<String>,
}

impl Review {
    pub(crate) fn apply(&mut self, input: UpdateReviewInput) {
        if let Some(rating) = input.rating {
            self.rating = rating;
        }
        if let Some(title) = input.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = input.content {
            self.content = content;
        }
        self.updated_at = iso::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32) -> Review {
        let now = iso::now();
        Review {
            id: "r1".into(),
            product_id: "p1".into(),
            author_id: "u1".into(),
            rating,
            title: "Solid".into(),
            content: "Does what it says".into(),
            status: SubmissionStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(review(1).validate().is_ok());
        assert!(review(5).validate().is_ok());
        assert!(review(0).validate().unwrap_err().has_errors("rating"));
        assert!(review(6).validate().unwrap_err().has_errors("rating"));
    }

    #[test]
    fn test_summary_average() {
        assert_eq!(
            RatingSummary::from_ratings([4, 5, 3]),
            RatingSummary { count: 3, average: 4.0 }
        );
        assert_eq!(
            RatingSummary::from_ratings(std::iter::empty()),
            RatingSummary { count: 0, average: 0.0 }
        );
    }

    #[test]
    fn test_report_optional_dates_round_trip() {
        let now = iso::now();
        let report = ReviewReport {
            id: "rp1".into(),
            review_id: "r1".into(),
            reporter_id: "u2".into(),
            reason: "Spam".into(),
            details: None,
            status: ReportStatus::Resolved,
            resolved_by: Some("mod".into()),
            resolved_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let doc = report.to_document().unwrap();
        assert_eq!(doc["resolvedAt"], iso::format(&now));
        assert_eq!(ReviewReport::from_document(doc).unwrap(), report);
    }
}
