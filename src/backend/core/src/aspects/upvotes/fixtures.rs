use super::entity::Upvote;
use crate::aspects::people::fixtures::{ADMIN_ID, HUNTER_ID, MAKER_ID};
use crate::aspects::products::fixtures::{FOCUS_PRODUCT_ID, RADAR_PRODUCT_ID};
use crate::store::iso;

pub fn upvotes() -> Vec<Upvote> {
    let now = iso::now();
    [
        (RADAR_PRODUCT_ID, ADMIN_ID),
        (RADAR_PRODUCT_ID, HUNTER_ID),
        (FOCUS_PRODUCT_ID, MAKER_ID),
    ]
    .into_iter()
    .map(|(product_id, user_id)| Upvote {
        id: Upvote::key(product_id, user_id),
        product_id: product_id.into(),
        user_id: user_id.into(),
        created_at: now,
        updated_at: now,
    })
    .collect()
}
