use async_graphql::{ComplexObject, Context, Object, Result, ResultExt, ID};

use crate::aspects::products::{Product, SubmissionStatus};
use crate::graphql::{actor, page, services};

use super::entity::{
    CreateReportInput, CreateReviewInput, RatingSummary, ReportStatus, Review, ReviewFilter,
    ReviewReport, UpdateReviewInput,
};

#[ComplexObject]
impl Review {
    async fn product(&self, ctx: &Context<'_>) -> Result<Product> {
        services(ctx)?.products.get_product(&self.product_id).await.extend()
    }
}

#[derive(Default)]
pub struct ReviewQuery;

#[Object]
impl ReviewQuery {
    async fn get_review(&self, ctx: &Context<'_>, id: ID) -> Result<Review> {
        services(ctx)?.reviews.get_review(id.as_str()).await.extend()
    }

    async fn list_reviews(
        &self,
        ctx: &Context<'_>,
        filter: Option<ReviewFilter>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Review>> {
        services(ctx)?
            .reviews
            .list_reviews(filter.unwrap_or_default(), page(offset, limit)?)
            .await
            .extend()
    }

    async fn product_rating_summary(&self, ctx: &Context<'_>, product_id: ID) -> Result<RatingSummary> {
        services(ctx)?
            .reviews
            .product_rating_summary(product_id.as_str())
            .await
            .extend()
    }

    /// Moderators only.
    async fn list_review_reports(
        &self,
        ctx: &Context<'_>,
        review_id: Option<ID>,
        status: Option<ReportStatus>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ReviewReport>> {
        services(ctx)?
            .reviews
            .list_reports(
                &actor(ctx),
                review_id.map(|id| id.to_string()),
                status,
                page(offset, limit)?,
            )
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct ReviewMutation;

#[Object]
impl ReviewMutation {
    async fn create_review(&self, ctx: &Context<'_>, input: CreateReviewInput) -> Result<Review> {
        services(ctx)?.reviews.create_review(&actor(ctx), input).await.extend()
    }

    async fn update_review(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateReviewInput,
    ) -> Result<Review> {
        services(ctx)?
            .reviews
            .update_review(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_review(&self, ctx: &Context<'_>, id: ID) -> Result<Review> {
        services(ctx)?
            .reviews
            .delete_review(&actor(ctx), id.as_str())
            .await
            .extend()
    }

    async fn moderate_review(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: SubmissionStatus,
    ) -> Result<Review> {
        services(ctx)?
            .reviews
            .moderate_review(&actor(ctx), id.as_str(), status)
            .await
            .extend()
    }

    async fn report_review(&self, ctx: &Context<'_>, input: CreateReportInput) -> Result<ReviewReport> {
        services(ctx)?.reviews.create_report(&actor(ctx), input).await.extend()
    }

    async fn resolve_review_report(
        &self,
        ctx: &Context<'_>,
        id: ID,
        outcome: ReportStatus,
    ) -> Result<ReviewReport> {
        services(ctx)?
            .reviews
            .resolve_report(&actor(ctx), id.as_str(), outcome)
            .await
            .extend()
    }
}
