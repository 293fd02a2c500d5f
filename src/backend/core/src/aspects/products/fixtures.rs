use chrono::Duration;

use super::entity::{Product, ProductCategory, SubmissionStatus};
use crate::aspects::people::fixtures::{HUNTER_ID, MAKER_ID};
use crate::store::iso;

pub const DEVTOOLS_CATEGORY_ID: &str = "91a3c5e7-1d2b-4f6a-b8c9-3e4f5a6b7c01";
pub const PRODUCTIVITY_CATEGORY_ID: &str = "91a3c5e7-1d2b-4f6a-b8c9-3e4f5a6b7c02";

pub const RADAR_PRODUCT_ID: &str = "91a3c5e7-1d2b-4f6a-b8c9-3e4f5a6b7c11";
pub const FOCUS_PRODUCT_ID: &str = "91a3c5e7-1d2b-4f6a-b8c9-3e4f5a6b7c12";
pub const DRAFT_PRODUCT_ID: &str = "91a3c5e7-1d2b-4f6a-b8c9-3e4f5a6b7c13";

pub fn categories() -> Vec<ProductCategory> {
    let now = iso::now();
    [
        (DEVTOOLS_CATEGORY_ID, "Developer Tools", "developer-tools", "Build, test and ship faster."),
        (PRODUCTIVITY_CATEGORY_ID, "Productivity", "productivity", "Get more done with less."),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, name, slug, description))| {
        let created_at = now - Duration::days(20 - i as i64);
        ProductCategory {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: Some(description.into()),
            created_at,
            updated_at: created_at,
        }
    })
    .collect()
}

pub fn products() -> Vec<Product> {
    let now = iso::now();
    let product = |id: &str,
                   name: &str,
                   tagline: &str,
                   description: &str,
                   category_id: &str,
                   owner_id: &str,
                   tags: &[&str],
                   status: SubmissionStatus,
                   days_ago: i64| {
        let created_at = now - Duration::days(days_ago);
        Product {
            id: id.into(),
            name: name.into(),
            tagline: tagline.into(),
            description: description.into(),
            website_url: format!("https://{}.example.com", name.to_lowercase().replace(' ', "-")),
            logo_url: None,
            category_id: Some(category_id.into()),
            owner_id: owner_id.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status,
            created_at,
            updated_at: created_at,
        }
    };

    vec![
        product(
            RADAR_PRODUCT_ID,
            "Crate Radar",
            "Know when your dependencies ship",
            "Watches your lockfile and pings you about new releases and advisories.",
            DEVTOOLS_CATEGORY_ID,
            MAKER_ID,
            &["rust", "devtools", "security"],
            SubmissionStatus::Approved,
            5,
        ),
        product(
            FOCUS_PRODUCT_ID,
            "Focus Timer",
            "Deep work in twenty five minute blocks",
            "A terminal pomodoro timer that silences notifications while you work.",
            PRODUCTIVITY_CATEGORY_ID,
            HUNTER_ID,
            &["cli", "productivity"],
            SubmissionStatus::Approved,
            4,
        ),
        product(
            DRAFT_PRODUCT_ID,
            "Log Lens",
            "Structured log explorer",
            "Filter JSON logs from any service with a query language you already know.",
            DEVTOOLS_CATEGORY_ID,
            MAKER_ID,
            &["observability"],
            SubmissionStatus::Submitted,
            1,
        ),
    ]
}
