use async_graphql::{ComplexObject, Context, Object, Result, ResultExt, ID};

use crate::aspects::launches::{Launch, LaunchFilter};
use crate::aspects::reviews::{RatingSummary, Review, ReviewFilter};
use crate::graphql::{actor, page, services};

use super::entity::{
    CreateCategoryInput, CreateProductInput, Product, ProductCategory, ProductFilter,
    SubmissionStatus, UpdateCategoryInput, UpdateProductInput,
};

#[ComplexObject]
impl Product {
    async fn category(&self, ctx: &Context<'_>) -> Result<Option<ProductCategory>> {
        match &self.category_id {
            Some(id) => services(ctx)?.products.get_category(id).await.map(Some).extend(),
            None => Ok(None),
        }
    }

    async fn launches(&self, ctx: &Context<'_>) -> Result<Vec<Launch>> {
        let filter = LaunchFilter {
            product_id: Some(self.id.clone()),
            ..Default::default()
        };
        services(ctx)?
            .launches
            .list_launches(filter, page(None, None)?)
            .await
            .extend()
    }

    async fn reviews(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Review>> {
        let filter = ReviewFilter {
            product_id: Some(self.id.clone()),
            ..Default::default()
        };
        services(ctx)?
            .reviews
            .list_reviews(filter, page(offset, limit)?)
            .await
            .extend()
    }

    async fn rating_summary(&self, ctx: &Context<'_>) -> Result<RatingSummary> {
        services(ctx)?
            .reviews
            .product_rating_summary(&self.id)
            .await
            .extend()
    }

    async fn upvote_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?.upvotes.count_upvotes(&self.id).await.extend()
    }

    /// Whether the caller has upvoted this product. False for anonymous callers.
    async fn viewer_has_upvoted(&self, ctx: &Context<'_>) -> Result<bool> {
        services(ctx)?
            .upvotes
            .has_upvoted(&actor(ctx), &self.id)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct ProductQuery;

#[Object]
impl ProductQuery {
    async fn get_product(&self, ctx: &Context<'_>, id: ID) -> Result<Product> {
        services(ctx)?.products.get_product(id.as_str()).await.extend()
    }

    async fn list_products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilter>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Product>> {
        services(ctx)?
            .products
            .list_products(filter.unwrap_or_default(), page(offset, limit)?)
            .await
            .extend()
    }

    async fn count_products(&self, ctx: &Context<'_>, filter: Option<ProductFilter>) -> Result<u64> {
        services(ctx)?
            .products
            .count_products(filter.unwrap_or_default())
            .await
            .extend()
    }

    async fn get_category(&self, ctx: &Context<'_>, id: ID) -> Result<ProductCategory> {
        services(ctx)?.products.get_category(id.as_str()).await.extend()
    }

    async fn get_category_by_slug(&self, ctx: &Context<'_>, slug: String) -> Result<ProductCategory> {
        services(ctx)?.products.get_category_by_slug(&slug).await.extend()
    }

    async fn list_categories(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ProductCategory>> {
        services(ctx)?
            .products
            .list_categories(page(offset, limit)?)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    async fn create_product(&self, ctx: &Context<'_>, input: CreateProductInput) -> Result<Product> {
        services(ctx)?.products.create_product(&actor(ctx), input).await.extend()
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateProductInput,
    ) -> Result<Product> {
        services(ctx)?
            .products
            .update_product(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<Product> {
        services(ctx)?
            .products
            .delete_product(&actor(ctx), id.as_str())
            .await
            .extend()
    }

    async fn submit_product(&self, ctx: &Context<'_>, id: ID) -> Result<Product> {
        services(ctx)?
            .products
            .submit_product(&actor(ctx), id.as_str())
            .await
            .extend()
    }

    async fn review_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        decision: SubmissionStatus,
    ) -> Result<Product> {
        services(ctx)?
            .products
            .review_product(&actor(ctx), id.as_str(), decision)
            .await
            .extend()
    }

    async fn create_category(
        &self,
        ctx: &Context<'_>,
        input: CreateCategoryInput,
    ) -> Result<ProductCategory> {
        services(ctx)?.products.create_category(&actor(ctx), input).await.extend()
    }

    async fn update_category(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCategoryInput,
    ) -> Result<ProductCategory> {
        services(ctx)?
            .products
            .update_category(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_category(&self, ctx: &Context<'_>, id: ID) -> Result<ProductCategory> {
        services(ctx)?
            .products
            .delete_category(&actor(ctx), id.as_str())
            .await
            .extend()
    }
}
