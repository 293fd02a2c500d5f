use crate::aspects::products::{Product, SubmissionStatus};
use crate::aspects::{created, deleted, updated};
use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_admin_or_author, ensure_authenticated, ensure_moderator, Actor};
use crate::repository::{Entity, Repository};
use crate::search::{Indexable, SearchService};
use crate::store::{iso, Filter, SharedStore};
use crate::validation::Validate;

use super::entity::{
    CreateReportInput, CreateReviewInput, RatingSummary, ReportStatus, Review, ReviewFilter,
    ReviewReport, UpdateReviewInput,
};

/// Product reviews and the reports raised against them.
#[derive(Clone)]
pub struct ReviewService {
    pub(crate) reviews: Repository<Review>,
    pub(crate) reports: Repository<ReviewReport>,
    products: Repository<Product>,
    search: SearchService,
}

impl ReviewService {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            reviews: Repository::new(store.clone()),
            reports: Repository::new(store.clone()),
            products: Repository::new(store),
            search,
        }
    }

    /// Review a product. New reviews are `submitted` until a moderator decides.
    pub async fn create_review(&self, actor: &Actor, input: CreateReviewInput) -> Result<Review> {
        let author_id = ensure_authenticated(actor)?;
        self.products.get(&input.product_id).await?;

        let now = iso::now();
        let review = Review {
            id: String::new(),
            product_id: input.product_id,
            author_id: author_id.to_string(),
            rating: input.rating,
            title: input.title.trim().to_string(),
            content: input.content,
            status: SubmissionStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        review.validate()?;

        let review = self.reviews.insert(&review).await?;
        self.search.index_entity(&review).await?;
        created(&review, actor);
        Ok(review)
    }

    pub async fn get_review(&self, id: &str) -> Result<Review> {
        self.reviews.get(id).await
    }

    pub async fn list_reviews(&self, filter: ReviewFilter, page: OffsetPagination) -> Result<Vec<Review>> {
        self.reviews.find(Self::filter(filter), page).await
    }

    pub async fn count_reviews(&self, filter: ReviewFilter) -> Result<u64> {
        self.reviews.count(&Self::filter(filter)).await
    }

    fn filter(filter: ReviewFilter) -> Filter {
        let mut query = Filter::new()
            .eq_opt("productId", filter.product_id)
            .eq_opt("authorId", filter.author_id)
            .eq_opt("status", filter.status.map(|s| s.as_str()));
        if let Some(min_rating) = filter.min_rating {
            query = query.gte("rating", min_rating);
        }
        query
    }

    pub async fn update_review(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateReviewInput,
    ) -> Result<Review> {
        ensure_authenticated(actor)?;
        let mut review = self.reviews.get(id).await?;
        ensure_admin_or_author(actor, &review.author_id)?;

        review.apply(input);
        review.validate()?;

        let review = self.reviews.replace(&review).await?;
        self.search.index_entity(&review).await?;
        updated(&review, actor);
        Ok(review)
    }

    /// Delete a review and every report raised against it.
    pub async fn delete_review(&self, actor: &Actor, id: &str) -> Result<Review> {
        ensure_authenticated(actor)?;
        let review = self.reviews.get(id).await?;
        ensure_admin_or_author(actor, &review.author_id)?;

        let cascaded = self.reports.delete_where(&Filter::new().eq("reviewId", id)).await?;
        let removed = self.reviews.delete(id).await?;
        self.search.remove_content(Review::SEARCH_TYPE, id).await?;
        deleted(&removed, cascaded as usize);
        Ok(removed)
    }

    /// Moderator sets the visibility of a review.
    pub async fn moderate_review(
        &self,
        actor: &Actor,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<Review> {
        ensure_moderator(actor)?;
        if status == SubmissionStatus::Pending {
            return Err(LaunchpadError::new(
                ErrorCode::InvalidInput,
                "A reviewed item cannot return to pending",
            ));
        }

        let mut review = self.reviews.get(id).await?;
        review.status = status;
        review.updated_at = iso::now();

        let review = self.reviews.replace(&review).await?;
        self.search.index_entity(&review).await?;
        tracing::info!(
            review_id = %review.id,
            status = status.as_str(),
            actor = ?actor.user_id,
            "Review moderated"
        );
        Ok(review)
    }

    /// Count and mean rating over a product's approved and submitted reviews.
    pub async fn product_rating_summary(&self, product_id: &str) -> Result<RatingSummary> {
        let visible = self
            .reviews
            .find_all(
                Filter::new().eq("productId", product_id).one_of(
                    "status",
                    [SubmissionStatus::Approved.as_str(), SubmissionStatus::Submitted.as_str()],
                ),
            )
            .await?;
        Ok(RatingSummary::from_ratings(visible.iter().map(|r| r.rating)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_report(&self, actor: &Actor, input: CreateReportInput) -> Result<ReviewReport> {
        let reporter_id = ensure_authenticated(actor)?;
        self.reviews.get(&input.review_id).await?;

        let now = iso::now();
        let report = ReviewReport {
            id: String::new(),
            review_id: input.review_id,
            reporter_id: reporter_id.to_string(),
            reason: input.reason.trim().to_string(),
            details: input.details,
            status: ReportStatus::Open,
            resolved_by: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        };
        report.validate()?;

        let report = self.reports.insert(&report).await?;
        created(&report, actor);
        Ok(report)
    }

    pub async fn get_report(&self, id: &str) -> Result<ReviewReport> {
        self.reports.get(id).await
    }

    /// Reports are only visible to moderators.
    pub async fn list_reports(
        &self,
        actor: &Actor,
        review_id: Option<String>,
        status: Option<ReportStatus>,
        page: OffsetPagination,
    ) -> Result<Vec<ReviewReport>> {
        ensure_moderator(actor)?;
        let filter = Filter::new()
            .eq_opt("reviewId", review_id)
            .eq_opt("status", status.map(|s| s.as_str()));
        self.reports.find(filter, page).await
    }

    /// Close an open report as resolved or dismissed.
    pub async fn resolve_report(
        &self,
        actor: &Actor,
        id: &str,
        outcome: ReportStatus,
    ) -> Result<ReviewReport> {
        ensure_moderator(actor)?;
        if outcome == ReportStatus::Open {
            return Err(LaunchpadError::new(
                ErrorCode::InvalidInput,
                "A report must be resolved or dismissed",
            ));
        }

        let mut report = self.reports.get(id).await?;
        if report.status != ReportStatus::Open {
            return Err(LaunchpadError::invalid_transition(
                ReviewReport::NAME,
                report.status,
                outcome,
            ));
        }

        let now = iso::now();
        report.status = outcome;
        report.resolved_by = actor.user_id.clone();
        report.resolved_at = Some(now);
        report.updated_at = now;

        let report = self.reports.replace(&report).await?;
        updated(&report, actor);
        Ok(report)
    }
}
