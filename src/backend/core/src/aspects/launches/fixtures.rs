use chrono::Duration;

use super::entity::{Launch, LaunchStatus};
use crate::aspects::people::fixtures::{HUNTER_ID, MAKER_ID};
use crate::aspects::products::fixtures::{FOCUS_PRODUCT_ID, RADAR_PRODUCT_ID};
use crate::store::iso;

pub const RADAR_LAUNCH_ID: &str = "c4d2e8f1-7a3b-4c9d-8e5f-1a2b3c4d5e01";
pub const FOCUS_LAUNCH_ID: &str = "c4d2e8f1-7a3b-4c9d-8e5f-1a2b3c4d5e02";

/// One launch already live and one a day out.
pub fn launches() -> Vec<Launch> {
    let now = iso::now();
    [
        (
            RADAR_LAUNCH_ID,
            RADAR_PRODUCT_ID,
            MAKER_ID,
            "Crate Radar 1.0",
            "Release tracking for every crate in your lockfile.",
            now - Duration::days(2),
            LaunchStatus::Live,
        ),
        (
            FOCUS_LAUNCH_ID,
            FOCUS_PRODUCT_ID,
            HUNTER_ID,
            "Focus Timer public beta",
            "Open to everyone starting tomorrow.",
            now + Duration::days(1),
            LaunchStatus::Upcoming,
        ),
    ]
    .into_iter()
    .map(|(id, product_id, author_id, title, description, launch_date, status)| {
        let created_at = now - Duration::days(3);
        Launch {
            id: id.into(),
            product_id: product_id.into(),
            title: title.into(),
            description: description.into(),
            launch_date,
            status,
            author_id: author_id.into(),
            created_at,
            updated_at: created_at,
        }
    })
    .collect()
}
