use async_graphql::{ComplexObject, Context, Object, Result, ResultExt, ID};

use crate::aspects::products::Product;
use crate::graphql::{actor, page, services};

use super::entity::{CreateLaunchInput, Launch, LaunchFilter, UpdateLaunchInput};

#[ComplexObject]
impl Launch {
    async fn product(&self, ctx: &Context<'_>) -> Result<Product> {
        services(ctx)?.products.get_product(&self.product_id).await.extend()
    }
}

#[derive(Default)]
pub struct LaunchQuery;

#[Object]
impl LaunchQuery {
    async fn get_launch(&self, ctx: &Context<'_>, id: ID) -> Result<Launch> {
        services(ctx)?.launches.get_launch(id.as_str()).await.extend()
    }

    /// Launches ordered by launch date, latest first.
    async fn list_launches(
        &self,
        ctx: &Context<'_>,
        filter: Option<LaunchFilter>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Launch>> {
        services(ctx)?
            .launches
            .list_launches(filter.unwrap_or_default(), page(offset, limit)?)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct LaunchMutation;

#[Object]
impl LaunchMutation {
    async fn create_launch(&self, ctx: &Context<'_>, input: CreateLaunchInput) -> Result<Launch> {
        services(ctx)?.launches.create_launch(&actor(ctx), input).await.extend()
    }

    async fn update_launch(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateLaunchInput,
    ) -> Result<Launch> {
        services(ctx)?
            .launches
            .update_launch(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_launch(&self, ctx: &Context<'_>, id: ID) -> Result<Launch> {
        services(ctx)?
            .launches
            .delete_launch(&actor(ctx), id.as_str())
            .await
            .extend()
    }

    async fn go_live(&self, ctx: &Context<'_>, id: ID) -> Result<Launch> {
        services(ctx)?.launches.go_live(&actor(ctx), id.as_str()).await.extend()
    }
}
