//! GraphQL schema assembled from every aspect's query and mutation objects.

use async_graphql::{
    Context, EmptySubscription, MergedObject, Object, ResultExt, Schema, SchemaBuilder,
};
use std::sync::Arc;

use crate::aspects::{
    forums::{ForumMutation, ForumQuery},
    launches::{LaunchMutation, LaunchQuery},
    people::{PeopleMutation, PeopleQuery},
    products::{ProductMutation, ProductQuery},
    reviews::{ReviewMutation, ReviewQuery},
    upvotes::{UpvoteMutation, UpvoteQuery},
    Services,
};
use crate::pagination::OffsetPagination;
use crate::platform::Platform;
use crate::rbac::Actor;
use crate::search::schema::SearchQueryRoot;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    PlatformQuery,
    PeopleQuery,
    ForumQuery,
    ProductQuery,
    LaunchQuery,
    ReviewQuery,
    UpvoteQuery,
    SearchQueryRoot,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    PeopleMutation,
    ForumMutation,
    ProductMutation,
    LaunchMutation,
    ReviewMutation,
    UpvoteMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Schema builder with services and the composed platform attached.
///
/// Each request adds its [`Actor`] as request data.
pub fn schema_builder(
    services: Services,
    platform: Arc<Platform>,
) -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(services)
        .data(platform)
        .limit_depth(12)
}

pub fn build_schema(services: Services, platform: Arc<Platform>) -> AppSchema {
    schema_builder(services, platform).finish()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolver Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// The caller of the current request. Missing request data means anonymous.
pub fn actor(ctx: &Context<'_>) -> Actor {
    ctx.data_opt::<Actor>().cloned().unwrap_or_default()
}

pub fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Services> {
    ctx.data::<Services>()
}

/// Offset and limit arguments as a validated page.
pub fn page(offset: Option<i32>, limit: Option<i32>) -> async_graphql::Result<OffsetPagination> {
    OffsetPagination::from_args(offset, limit).extend()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Platform
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct PlatformQuery;

#[Object]
impl PlatformQuery {
    /// Ids of the registered aspects, in registration order.
    async fn aspects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<String>> {
        let platform = ctx.data::<Arc<Platform>>()?;
        Ok(platform.shell().aspects().iter().map(|a| a.id.clone()).collect())
    }

    /// Platform manifest as JSON.
    async fn manifest(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<async_graphql::Json<serde_json::Value>> {
        let platform = ctx.data::<Arc<Platform>>()?;
        Ok(async_graphql::Json(serde_json::to_value(platform.manifest())?))
    }
}
