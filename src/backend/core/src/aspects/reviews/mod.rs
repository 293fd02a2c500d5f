//! Product reviews, moderation and review reports.

pub mod entity;
pub mod fixtures;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::{
    CreateReportInput, CreateReviewInput, RatingSummary, ReportStatus, Review, ReviewFilter,
    ReviewReport, UpdateReviewInput, MAX_RATING, MIN_RATING,
};
pub use schema::{ReviewMutation, ReviewQuery};
pub use service::ReviewService;

use crate::aspects::{seed_collection, seed_indexed, Services};
use crate::error::Result;
use crate::platform::{Aspect, ProductSection, Registrar, Route};
use crate::search::Indexable;

pub const ASPECT_ID: &str = "reviews";

pub struct ReviewsAspect;

#[async_trait]
impl Aspect for ReviewsAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["products"]
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell
            .route(Route::new("/moderation/reports", "review-reports").authenticated())
            .search_type(Review::SEARCH_TYPE, "Reviews", "/products/:productId");
        shell.product_section(ProductSection::new("reviews", "Reviews", "listReviews"))?;
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        let reviews = &services.reviews;
        Ok(seed_indexed(&reviews.reviews, &services.search, fixtures::reviews()).await?
            + seed_collection(&reviews.reports, fixtures::reports()).await?.len())
    }
}
