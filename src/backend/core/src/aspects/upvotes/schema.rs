use async_graphql::{Context, Object, Result, ResultExt, ID};

use crate::graphql::{actor, page, services};

use super::entity::Upvote;

#[derive(Default)]
pub struct UpvoteQuery;

#[Object]
impl UpvoteQuery {
    async fn count_upvotes(&self, ctx: &Context<'_>, product_id: ID) -> Result<u64> {
        services(ctx)?.upvotes.count_upvotes(product_id.as_str()).await.extend()
    }

    async fn has_upvoted(&self, ctx: &Context<'_>, product_id: ID) -> Result<bool> {
        services(ctx)?
            .upvotes
            .has_upvoted(&actor(ctx), product_id.as_str())
            .await
            .extend()
    }

    async fn list_upvotes_by_user(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Upvote>> {
        services(ctx)?
            .upvotes
            .list_upvotes_by_user(user_id.as_str(), page(offset, limit)?)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct UpvoteMutation;

#[Object]
impl UpvoteMutation {
    async fn upvote(&self, ctx: &Context<'_>, product_id: ID) -> Result<Upvote> {
        services(ctx)?.upvotes.upvote(&actor(ctx), product_id.as_str()).await.extend()
    }

    async fn remove_upvote(&self, ctx: &Context<'_>, product_id: ID) -> Result<Upvote> {
        services(ctx)?
            .upvotes
            .remove_upvote(&actor(ctx), product_id.as_str())
            .await
            .extend()
    }
}
