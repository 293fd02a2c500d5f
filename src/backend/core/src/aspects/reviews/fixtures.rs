use chrono::Duration;

use super::entity::{ReportStatus, Review, ReviewReport};
use crate::aspects::people::fixtures::{ADMIN_ID, HUNTER_ID, MAKER_ID};
use crate::aspects::products::fixtures::{FOCUS_PRODUCT_ID, RADAR_PRODUCT_ID};
use crate::aspects::products::SubmissionStatus;
use crate::store::iso;

pub const RADAR_REVIEW_ID: &str = "e7b9a1c3-5d6f-4a8b-9c0d-2e3f4a5b6c01";
pub const FOCUS_REVIEW_ID: &str = "e7b9a1c3-5d6f-4a8b-9c0d-2e3f4a5b6c02";

pub fn reviews() -> Vec<Review> {
    let now = iso::now();
    [
        (
            RADAR_REVIEW_ID,
            RADAR_PRODUCT_ID,
            HUNTER_ID,
            5,
            "Caught a yanked crate before it hit prod",
            "Setup took two minutes and the advisory digest is genuinely useful.",
            SubmissionStatus::Approved,
        ),
        (
            FOCUS_REVIEW_ID,
            FOCUS_PRODUCT_ID,
            MAKER_ID,
            4,
            "Simple and quiet",
            "Does one thing well. I would like a weekly summary.",
            SubmissionStatus::Submitted,
        ),
    ]
    .into_iter()
    .map(|(id, product_id, author_id, rating, title, content, status)| {
        let created_at = now - Duration::days(1);
        Review {
            id: id.into(),
            product_id: product_id.into(),
            author_id: author_id.into(),
            rating,
            title: title.into(),
            content: content.into(),
            status,
            created_at,
            updated_at: created_at,
        }
    })
    .collect()
}

pub fn reports() -> Vec<ReviewReport> {
    let now = iso::now();
    vec![ReviewReport {
        id: String::new(),
        review_id: FOCUS_REVIEW_ID.into(),
        reporter_id: ADMIN_ID.into(),
        reason: "Reviewer built a competing product".into(),
        details: None,
        status: ReportStatus::Open,
        resolved_by: None,
        resolved_at: None,
        created_at: now,
        updated_at: now,
    }]
}
