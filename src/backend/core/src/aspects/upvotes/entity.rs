use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// One user's vote for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Upvote {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

impl Upvote {
    /// Votes are keyed by voter and product, so a second vote collides on id.
    pub fn key(product_id: &str, user_id: &str) -> String {
        format!("{}:{}", product_id, user_id)
    }
}

impl Entity for Upvote {
    const COLLECTION: &'static str = "upvotes";
    const NAME: &'static str = "Upvote";

    fn id(&self) -> &str {
        &self.id
    }
}
