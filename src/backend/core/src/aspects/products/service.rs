use crate::aspects::launches::Launch;
use crate::aspects::reviews::{Review, ReviewReport};
use crate::aspects::upvotes::Upvote;
use crate::aspects::{created, deleted, updated};
use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_admin, ensure_admin_or_author, ensure_authenticated, Actor};
use crate::repository::{Entity, Repository};
use crate::search::{Indexable, SearchService};
use crate::store::{iso, Filter, SharedStore};
use crate::validation::Validate;

use super::entity::{
    normalize_tags, CreateCategoryInput, CreateProductInput, Product, ProductCategory,
    ProductFilter, SubmissionStatus, UpdateCategoryInput, UpdateProductInput,
};

/// Products, their submission workflow, and the category catalogue.
#[derive(Clone)]
pub struct ProductService {
    pub(crate) products: Repository<Product>,
    pub(crate) categories: Repository<ProductCategory>,
    launches: Repository<Launch>,
    reviews: Repository<Review>,
    reports: Repository<ReviewReport>,
    upvotes: Repository<Upvote>,
    search: SearchService,
}

impl ProductService {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            products: Repository::new(store.clone()),
            categories: Repository::new(store.clone()),
            launches: Repository::new(store.clone()),
            reviews: Repository::new(store.clone()),
            reports: Repository::new(store.clone()),
            upvotes: Repository::new(store),
            search,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a product owned by the caller. New products start `pending`.
    pub async fn create_product(&self, actor: &Actor, input: CreateProductInput) -> Result<Product> {
        let owner_id = ensure_authenticated(actor)?;
        if let Some(category_id) = &input.category_id {
            self.categories.get(category_id).await?;
        }

        let now = iso::now();
        let product = Product {
            id: String::new(),
            name: input.name.trim().to_string(),
            tagline: input.tagline.trim().to_string(),
            description: input.description,
            website_url: input.website_url.trim().to_string(),
            logo_url: input.logo_url,
            category_id: input.category_id,
            owner_id: owner_id.to_string(),
            tags: normalize_tags(input.tags),
            status: SubmissionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;

        let product = self.products.insert(&product).await?;
        self.search.index_entity(&product).await?;
        created(&product, actor);
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.products.get(id).await
    }

    pub async fn list_products(&self, filter: ProductFilter, page: OffsetPagination) -> Result<Vec<Product>> {
        self.products.find(Self::filter(filter), page).await
    }

    pub async fn count_products(&self, filter: ProductFilter) -> Result<u64> {
        self.products.count(&Self::filter(filter)).await
    }

    fn filter(filter: ProductFilter) -> Filter {
        let mut query = Filter::new()
            .eq_opt("categoryId", filter.category_id)
            .eq_opt("ownerId", filter.owner_id)
            .eq_opt("status", filter.status.map(|s| s.as_str()));
        if let Some(tag) = filter.tag {
            query = query.contains("tags", tag.trim().to_lowercase());
        }
        query
    }

    pub async fn update_product(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateProductInput,
    ) -> Result<Product> {
        ensure_authenticated(actor)?;
        let mut product = self.products.get(id).await?;
        ensure_admin_or_author(actor, &product.owner_id)?;

        if let Some(category_id) = &input.category_id {
            self.categories.get(category_id).await?;
        }
        product.apply(input);
        product.validate()?;

        let product = self.products.replace(&product).await?;
        self.search.index_entity(&product).await?;
        updated(&product, actor);
        Ok(product)
    }

    /// Delete a product with its launches, reviews, review reports and upvotes.
    pub async fn delete_product(&self, actor: &Actor, id: &str) -> Result<Product> {
        ensure_authenticated(actor)?;
        let product = self.products.get(id).await?;
        ensure_admin_or_author(actor, &product.owner_id)?;

        let by_product = Filter::new().eq("productId", id);
        let mut cascaded = 0;

        for launch in self.launches.find_all(by_product.clone()).await? {
            self.launches.delete(&launch.id).await?;
            self.search.remove_content(Launch::SEARCH_TYPE, &launch.id).await?;
            cascaded += 1;
        }

        for review in self.reviews.find_all(by_product.clone()).await? {
            cascaded += self
                .reports
                .delete_where(&Filter::new().eq("reviewId", review.id.as_str()))
                .await? as usize;
            self.reviews.delete(&review.id).await?;
            self.search.remove_content(Review::SEARCH_TYPE, &review.id).await?;
            cascaded += 1;
        }

        cascaded += self.upvotes.delete_where(&by_product).await? as usize;

        let removed = self.products.delete(id).await?;
        self.search.remove_content(Product::SEARCH_TYPE, id).await?;
        deleted(&removed, cascaded);
        Ok(removed)
    }

    /// Owner hands a pending or rejected product to the admins for review.
    pub async fn submit_product(&self, actor: &Actor, id: &str) -> Result<Product> {
        ensure_authenticated(actor)?;
        let mut product = self.products.get(id).await?;
        ensure_admin_or_author(actor, &product.owner_id)?;

        match product.status {
            SubmissionStatus::Pending | SubmissionStatus::Rejected => {}
            from => {
                return Err(LaunchpadError::invalid_transition(
                    Product::NAME,
                    from,
                    SubmissionStatus::Submitted,
                ))
            }
        }

        self.transition(actor, &mut product, SubmissionStatus::Submitted).await
    }

    /// Admin decision on a submitted product.
    pub async fn review_product(
        &self,
        actor: &Actor,
        id: &str,
        decision: SubmissionStatus,
    ) -> Result<Product> {
        ensure_admin(actor)?;
        if !matches!(decision, SubmissionStatus::Approved | SubmissionStatus::Rejected) {
            return Err(LaunchpadError::new(
                ErrorCode::InvalidInput,
                "A review decision must be approved or rejected",
            ));
        }

        let mut product = self.products.get(id).await?;
        if product.status != SubmissionStatus::Submitted {
            return Err(LaunchpadError::invalid_transition(
                Product::NAME,
                product.status,
                decision,
            ));
        }

        self.transition(actor, &mut product, decision).await
    }

    async fn transition(
        &self,
        actor: &Actor,
        product: &mut Product,
        status: SubmissionStatus,
    ) -> Result<Product> {
        let from = product.status;
        product.status = status;
        product.updated_at = iso::now();

        let product = self.products.replace(product).await?;
        self.search.index_entity(&product).await?;
        tracing::info!(
            product_id = %product.id,
            from = from.as_str(),
            to = status.as_str(),
            actor = ?actor.user_id,
            "Product status changed"
        );
        Ok(product)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_category(&self, actor: &Actor, input: CreateCategoryInput) -> Result<ProductCategory> {
        ensure_admin(actor)?;
        let now = iso::now();
        let category = ProductCategory {
            id: String::new(),
            name: input.name.trim().to_string(),
            slug: input.slug.trim().to_string(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        category.validate()?;
        self.ensure_slug_free(&category.slug, None).await?;

        let category = self.categories.insert(&category).await?;
        created(&category, actor);
        Ok(category)
    }

    pub async fn get_category(&self, id: &str) -> Result<ProductCategory> {
        self.categories.get(id).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<ProductCategory> {
        self.categories
            .find_one(Filter::new().eq("slug", slug))
            .await?
            .ok_or_else(|| LaunchpadError::not_found(ProductCategory::NAME, slug))
    }

    pub async fn list_categories(&self, page: OffsetPagination) -> Result<Vec<ProductCategory>> {
        self.categories.find(Filter::new(), page).await
    }

    pub async fn update_category(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateCategoryInput,
    ) -> Result<ProductCategory> {
        ensure_admin(actor)?;
        let mut category = self.categories.get(id).await?;

        category.apply(input);
        category.validate()?;
        self.ensure_slug_free(&category.slug, Some(id)).await?;

        let category = self.categories.replace(&category).await?;
        updated(&category, actor);
        Ok(category)
    }

    /// Delete a category. Its products stay, without a category.
    pub async fn delete_category(&self, actor: &Actor, id: &str) -> Result<ProductCategory> {
        ensure_admin(actor)?;
        self.categories.get(id).await?;

        let mut detached = 0;
        for mut product in self.products.find_all(Filter::new().eq("categoryId", id)).await? {
            product.category_id = None;
            product.updated_at = iso::now();
            self.products.replace(&product).await?;
            detached += 1;
        }

        let removed = self.categories.delete(id).await?;
        deleted(&removed, detached);
        Ok(removed)
    }

    async fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> Result<()> {
        match self.categories.find_one(Filter::new().eq("slug", slug)).await? {
            Some(existing) if Some(existing.id.as_str()) != except_id => {
                Err(LaunchpadError::duplicate(ProductCategory::NAME, slug))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::Services;

    fn setup() -> ProductService {
        let services = Services::in_memory();
        crate::aspects::compose(&services).unwrap();
        services.products
    }

    fn input(name: &str) -> CreateProductInput {
        CreateProductInput {
            name: name.into(),
            tagline: "Tagline".into(),
            description: "Description".into(),
            website_url: "https://example.com".into(),
            tags: vec!["Rust".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submission_workflow() {
        let service = setup();
        let owner = Actor::member("u1");
        let admin = Actor::admin("root");
        let product = service.create_product(&owner, input("Radar")).await.unwrap();
        assert_eq!(product.status, SubmissionStatus::Pending);
        assert_eq!(product.tags, vec!["rust"]);

        let err = service
            .review_product(&admin, &product.id, SubmissionStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);

        let submitted = service.submit_product(&owner, &product.id).await.unwrap();
        assert_eq!(submitted.status, SubmissionStatus::Submitted);

        let err = service
            .review_product(&owner, &product.id, SubmissionStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AccessDenied);

        let approved = service
            .review_product(&admin, &product.id, SubmissionStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, SubmissionStatus::Approved);

        let err = service.submit_product(&owner, &product.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn test_filters() {
        let service = setup();
        let admin = Actor::admin("root");
        let category = service
            .create_category(
                &admin,
                CreateCategoryInput {
                    name: "Dev Tools".into(),
                    slug: "dev-tools".into(),
                    description: None,
                },
            )
            .await
            .unwrap();

        let mut tooled = input("Radar");
        tooled.category_id = Some(category.id.clone());
        tooled.tags = vec!["cli".into()];
        service.create_product(&Actor::member("u1"), tooled).await.unwrap();
        service.create_product(&Actor::member("u2"), input("Other")).await.unwrap();

        let page = OffsetPagination::default();
        let by_category = service
            .list_products(
                ProductFilter {
                    category_id: Some(category.id.clone()),
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].name, "Radar");

        let by_tag = service
            .list_products(
                ProductFilter {
                    tag: Some("CLI".into()),
                    ..Default::default()
                },
                page,
            )
            .await
            .unwrap();
        assert_eq!(by_tag.len(), 1);

        let by_owner = service
            .count_products(ProductFilter {
                owner_id: Some("u2".into()),
                status: Some(SubmissionStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_owner, 1);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let service = setup();
        let mut bad = input("Radar");
        bad.category_id = Some("missing".into());
        let err = service.create_product(&Actor::member("u1"), bad).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_category_slug_rules() {
        let service = setup();
        let admin = Actor::admin("root");
        let category = |slug: &str| CreateCategoryInput {
            name: "Name".into(),
            slug: slug.into(),
            description: None,
        };

        assert_eq!(
            service
                .create_category(&Actor::member("u1"), category("ai"))
                .await
                .unwrap_err()
                .code(),
            ErrorCode::AccessDenied
        );
        assert_eq!(
            service.create_category(&admin, category("Not A Slug")).await.unwrap_err().code(),
            ErrorCode::ValidationError
        );

        let ai = service.create_category(&admin, category("ai")).await.unwrap();
        assert_eq!(
            service.create_category(&admin, category("ai")).await.unwrap_err().code(),
            ErrorCode::DuplicateRecord
        );
        assert_eq!(service.get_category_by_slug("ai").await.unwrap(), ai);

        let renamed = service
            .update_category(
                &admin,
                &ai.id,
                UpdateCategoryInput {
                    name: Some("Artificial Intelligence".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "ai");
    }

    #[tokio::test]
    async fn test_delete_category_detaches_products() {
        let service = setup();
        let admin = Actor::admin("root");
        let category = service
            .create_category(
                &admin,
                CreateCategoryInput {
                    name: "AI".into(),
                    slug: "ai".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let mut categorized = input("Radar");
        categorized.category_id = Some(category.id.clone());
        let product = service.create_product(&Actor::member("u1"), categorized).await.unwrap();

        service.delete_category(&admin, &category.id).await.unwrap();
        assert_eq!(service.get_product(&product.id).await.unwrap().category_id, None);
    }
}
