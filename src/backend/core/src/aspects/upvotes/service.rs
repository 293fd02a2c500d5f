use crate::aspects::products::Product;
use crate::aspects::{created, deleted};
use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_authenticated, Actor};
use crate::repository::{Entity, Repository};
use crate::store::{iso, Filter, SharedStore};

use super::entity::Upvote;

/// Product upvotes. A user holds at most one vote per product.
#[derive(Clone)]
pub struct UpvoteService {
    pub(crate) upvotes: Repository<Upvote>,
    products: Repository<Product>,
}

impl UpvoteService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            upvotes: Repository::new(store.clone()),
            products: Repository::new(store),
        }
    }

    /// Upvote a product. Voting again returns the existing vote.
    pub async fn upvote(&self, actor: &Actor, product_id: &str) -> Result<Upvote> {
        let user_id = ensure_authenticated(actor)?;
        self.products.get(product_id).await?;

        let key = Upvote::key(product_id, user_id);
        if let Some(existing) = self.upvotes.find_by_id(&key).await? {
            return Ok(existing);
        }

        let now = iso::now();
        let inserted = self
            .upvotes
            .insert(&Upvote {
                id: key.clone(),
                product_id: product_id.to_string(),
                user_id: user_id.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await;

        match inserted {
            Ok(vote) => {
                created(&vote, actor);
                Ok(vote)
            }
            // A concurrent vote landed first.
            Err(e) if e.code() == ErrorCode::DuplicateRecord => self.upvotes.get(&key).await,
            Err(e) => Err(e),
        }
    }

    pub async fn remove_upvote(&self, actor: &Actor, product_id: &str) -> Result<Upvote> {
        let user_id = ensure_authenticated(actor)?;
        let removed = self
            .upvotes
            .delete(&Upvote::key(product_id, user_id))
            .await
            .map_err(|e| match e.code() {
                ErrorCode::NotFound => LaunchpadError::not_found(Upvote::NAME, product_id),
                _ => e,
            })?;

        deleted(&removed, 0);
        Ok(removed)
    }

    pub async fn count_upvotes(&self, product_id: &str) -> Result<u64> {
        self.upvotes.count(&Filter::new().eq("productId", product_id)).await
    }

    /// False for anonymous actors.
    pub async fn has_upvoted(&self, actor: &Actor, product_id: &str) -> Result<bool> {
        match actor.user_id.as_deref() {
            Some(user_id) => Ok(self
                .upvotes
                .find_by_id(&Upvote::key(product_id, user_id))
                .await?
                .is_some()),
            None => Ok(false),
        }
    }

    pub async fn list_upvotes_by_user(&self, user_id: &str, page: OffsetPagination) -> Result<Vec<Upvote>> {
        self.upvotes.find(Filter::new().eq("userId", user_id), page).await
    }
}
