use async_graphql::{Context, Object, Result, ResultExt};

use crate::graphql::services;

use super::{SearchHit, SearchType};

#[derive(Default)]
pub struct SearchQueryRoot;

#[Object]
impl SearchQueryRoot {
    /// Full-text search across every registered type, or only `types`.
    async fn search(
        &self,
        ctx: &Context<'_>,
        query: String,
        types: Option<Vec<String>>,
        limit: Option<i32>,
    ) -> Result<Vec<SearchHit>> {
        services(ctx)?.search.search(&query, types, limit).await.extend()
    }

    async fn search_types(&self, ctx: &Context<'_>) -> Result<Vec<SearchType>> {
        Ok(services(ctx)?.search.search_types())
    }
}
