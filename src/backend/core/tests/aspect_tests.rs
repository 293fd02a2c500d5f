//! Integration tests for aspect services over the in-memory store.
//!
//! Tests cover:
//! - Entity document round-trips
//! - NotFound, Unauthorized and AccessDenied guards
//! - Offset pagination windows
//! - Parent/child listing and cascading deletes
//! - Product workflow and upvote idempotence
//! - Uniqueness and one-way launch status under concurrent requests

use launchpad_core::aspects::forums::{CreateForumInput, CreatePostInput, CreateTopicInput, Forum, UpdateForumInput};
use launchpad_core::aspects::launches::{CreateLaunchInput, LaunchStatus};
use launchpad_core::aspects::people::{CreateProfileInput, RegisterUserInput};
use launchpad_core::aspects::products::{
    CreateCategoryInput, CreateProductInput, Product, ProductFilter, SubmissionStatus,
};
use launchpad_core::aspects::reviews::{CreateReportInput, CreateReviewInput};
use launchpad_core::aspects::{self, Services};
use launchpad_core::error::ErrorCode;
use launchpad_core::pagination::OffsetPagination;
use launchpad_core::rbac::Actor;
use launchpad_core::repository::Entity;
use launchpad_core::search::SearchService;
use launchpad_core::store::{iso, Document, DocumentStore, Filter, FindQuery, MemoryStore};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn services() -> Services {
    let services = Services::in_memory();
    aspects::compose(&services).unwrap();
    services
}

fn forum_input(title: &str) -> CreateForumInput {
    CreateForumInput {
        title: title.to_string(),
        description: "Talk about anything".to_string(),
    }
}

fn product_input(name: &str) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        tagline: "A tagline".to_string(),
        description: "A description".to_string(),
        website_url: "https://example.com".to_string(),
        tags: vec!["rust".to_string()],
        ..Default::default()
    }
}

// ============================================================================
// Entity Round-Trips
// ============================================================================

#[test]
fn test_forum_document_round_trip() {
    let now = iso::now();
    let forum = Forum {
        id: "f1".to_string(),
        title: "General".to_string(),
        description: "Anything goes".to_string(),
        author_id: "u1".to_string(),
        created_at: now,
        updated_at: now,
    };

    let doc = forum.to_document().unwrap();
    assert_eq!(doc["authorId"], "u1");
    assert_eq!(doc["createdAt"], iso::format(&now));
    assert_eq!(Forum::from_document(doc).unwrap(), forum);
}

#[test]
fn test_product_document_round_trip() {
    let now = iso::now();
    let product = Product {
        id: "p1".to_string(),
        name: "Radar".to_string(),
        tagline: "Know first".to_string(),
        description: "Release tracking".to_string(),
        website_url: "https://radar.dev".to_string(),
        logo_url: None,
        category_id: Some("c1".to_string()),
        owner_id: "u1".to_string(),
        tags: vec!["rust".to_string(), "devtools".to_string()],
        status: SubmissionStatus::Approved,
        created_at: now,
        updated_at: now,
    };

    let doc = product.to_document().unwrap();
    assert_eq!(doc["status"], "approved");
    assert_eq!(Product::from_document(doc).unwrap(), product);
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let services = services();
    let author = Actor::member("u1");

    let err = services
        .forums
        .update_forum(&author, "missing", UpdateForumInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = services.forums.delete_forum(&author, "missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = services.products.delete_product(&author, "missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_only_author_or_admin_mutates() {
    let services = services();
    let forum = services
        .forums
        .create_forum(&Actor::member("author"), forum_input("General"))
        .await
        .unwrap();

    let stranger = Actor::member("stranger");
    let err = services
        .forums
        .update_forum(
            &stranger,
            &forum.id,
            UpdateForumInput {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AccessDenied);

    let err = services.forums.delete_forum(&stranger, &forum.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AccessDenied);

    let updated = services
        .forums
        .update_forum(
            &Actor::admin("admin"),
            &forum.id,
            UpdateForumInput {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
}

#[tokio::test]
async fn test_anonymous_mutation_is_unauthorized() {
    let services = services();
    let anonymous = Actor::anonymous();

    let err = services.forums.create_forum(&anonymous, forum_input("General")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let err = services.products.create_product(&anonymous, product_input("Radar")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_offset_pages_tile_the_full_listing() {
    let services = services();
    let author = Actor::member("u1");
    for i in 0..7 {
        services
            .forums
            .create_forum(&author, forum_input(&format!("Forum {}", i)))
            .await
            .unwrap();
    }

    let all = services
        .forums
        .list_forums(OffsetPagination::new(0, 100))
        .await
        .unwrap();
    assert_eq!(all.len(), 7);

    let mut paged = Vec::new();
    for offset in (0..7).step_by(3) {
        let page = services
            .forums
            .list_forums(OffsetPagination::new(offset, 3))
            .await
            .unwrap();
        assert!(page.len() <= 3);
        paged.extend(page);
    }
    assert_eq!(paged, all);

    let beyond = services
        .forums
        .list_forums(OffsetPagination::new(50, 3))
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

// ============================================================================
// Forums
// ============================================================================

#[tokio::test]
async fn test_children_list_under_their_parent() {
    let services = services();
    let author = Actor::member("u1");
    let forum = services.forums.create_forum(&author, forum_input("General")).await.unwrap();

    let topic = services
        .forums
        .create_topic(
            &author,
            CreateTopicInput {
                forum_id: forum.id.clone(),
                title: "Hello".to_string(),
                content: "First topic".to_string(),
            },
        )
        .await
        .unwrap();
    let post = services
        .forums
        .create_post(
            &Actor::member("u2"),
            CreatePostInput {
                topic_id: topic.id.clone(),
                content: "Welcome".to_string(),
            },
        )
        .await
        .unwrap();

    let topics = services
        .forums
        .list_topics(&forum.id, OffsetPagination::default())
        .await
        .unwrap();
    assert_eq!(topics, vec![topic.clone()]);

    let posts = services
        .forums
        .list_posts(&topic.id, OffsetPagination::default())
        .await
        .unwrap();
    assert_eq!(posts, vec![post]);

    let err = services
        .forums
        .create_topic(
            &author,
            CreateTopicInput {
                forum_id: "missing".to_string(),
                title: "Orphan".to_string(),
                content: "No forum".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_deleting_forum_cascades() {
    let services = services();
    let author = Actor::member("u1");
    let forum = services.forums.create_forum(&author, forum_input("General")).await.unwrap();

    let mut topic_ids = Vec::new();
    let mut post_ids = Vec::new();
    for i in 0..2 {
        let topic = services
            .forums
            .create_topic(
                &author,
                CreateTopicInput {
                    forum_id: forum.id.clone(),
                    title: format!("Topic {}", i),
                    content: "Body".to_string(),
                },
            )
            .await
            .unwrap();
        for _ in 0..2 {
            let post = services
                .forums
                .create_post(
                    &author,
                    CreatePostInput {
                        topic_id: topic.id.clone(),
                        content: "Reply".to_string(),
                    },
                )
                .await
                .unwrap();
            post_ids.push(post.id);
        }
        topic_ids.push(topic.id);
    }

    services.forums.delete_forum(&author, &forum.id).await.unwrap();

    assert!(services.forums.get_forum(&forum.id).await.unwrap_err().is_not_found());
    for id in &topic_ids {
        assert!(services.forums.get_topic(id).await.unwrap_err().is_not_found());
        assert_eq!(services.forums.count_posts(id).await.unwrap(), 0);
    }
    for id in &post_ids {
        assert!(services.forums.get_post(id).await.unwrap_err().is_not_found());
    }

    let hits = services.search.search("Topic", None, None).await.unwrap();
    assert!(hits.is_empty());
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_submission_workflow() {
    let services = services();
    let maker = Actor::member("maker");
    let admin = Actor::admin("admin");
    let product = services.products.create_product(&maker, product_input("Radar")).await.unwrap();
    assert_eq!(product.status, SubmissionStatus::Pending);

    let err = services
        .products
        .review_product(&admin, &product.id, SubmissionStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStateTransition);

    services.products.submit_product(&maker, &product.id).await.unwrap();

    let err = services
        .products
        .review_product(&maker, &product.id, SubmissionStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AccessDenied);

    let approved = services
        .products
        .review_product(&admin, &product.id, SubmissionStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);

    let listed = services
        .products
        .list_products(
            ProductFilter {
                status: Some(SubmissionStatus::Approved),
                ..Default::default()
            },
            OffsetPagination::default(),
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_deleting_product_cascades() {
    let services = services();
    let maker = Actor::member("maker");
    let fan = Actor::member("fan");
    let product = services.products.create_product(&maker, product_input("Radar")).await.unwrap();

    let launch = services
        .launches
        .create_launch(
            &maker,
            CreateLaunchInput {
                product_id: product.id.clone(),
                title: "Launch".to_string(),
                description: "Going live".to_string(),
                launch_date: iso::now(),
            },
        )
        .await
        .unwrap();
    let review = services
        .reviews
        .create_review(
            &fan,
            CreateReviewInput {
                product_id: product.id.clone(),
                rating: 5,
                title: "Great".to_string(),
                content: "Loved it".to_string(),
            },
        )
        .await
        .unwrap();
    let report = services
        .reviews
        .create_report(
            &maker,
            CreateReportInput {
                review_id: review.id.clone(),
                reason: "Suspicious".to_string(),
                details: None,
            },
        )
        .await
        .unwrap();
    services.upvotes.upvote(&fan, &product.id).await.unwrap();

    services.products.delete_product(&maker, &product.id).await.unwrap();

    assert!(services.launches.get_launch(&launch.id).await.unwrap_err().is_not_found());
    assert!(services.reviews.get_review(&review.id).await.unwrap_err().is_not_found());
    assert!(services.reviews.get_report(&report.id).await.unwrap_err().is_not_found());
    assert_eq!(services.upvotes.count_upvotes(&product.id).await.unwrap(), 0);
}

// ============================================================================
// Upvotes
// ============================================================================

#[tokio::test]
async fn test_repeated_upvotes_count_once() {
    let services = services();
    let product = services
        .products
        .create_product(&Actor::member("maker"), product_input("Radar"))
        .await
        .unwrap();
    let fan = Actor::member("fan");

    let first = services.upvotes.upvote(&fan, &product.id).await.unwrap();
    for _ in 0..3 {
        let again = services.upvotes.upvote(&fan, &product.id).await.unwrap();
        assert_eq!(again, first);
    }

    assert_eq!(services.upvotes.count_upvotes(&product.id).await.unwrap(), 1);
    let mine = services
        .upvotes
        .list_upvotes_by_user("fan", OffsetPagination::default())
        .await
        .unwrap();
    assert_eq!(mine, vec![first]);
}

#[tokio::test]
async fn test_removing_an_upvote_twice_fails() {
    let services = services();
    let product = services
        .products
        .create_product(&Actor::member("maker"), product_input("Radar"))
        .await
        .unwrap();
    let fan = Actor::member("fan");

    assert_ok!(services.upvotes.upvote(&fan, &product.id).await);
    assert!(assert_ok!(services.upvotes.has_upvoted(&fan, &product.id).await));

    let removed = assert_ok!(services.upvotes.remove_upvote(&fan, &product.id).await);
    assert_eq!(removed.user_id, "fan");

    let err = assert_err!(services.upvotes.remove_upvote(&fan, &product.id).await);
    assert!(err.is_not_found());
    assert!(!assert_ok!(services.upvotes.has_upvoted(&fan, &product.id).await));
}

// ============================================================================
// Concurrent Requests
// ============================================================================

/// Memory store that yields before every operation, so concurrent requests
/// interleave between their reads and writes the way they do over a network.
#[derive(Default)]
struct YieldingStore {
    inner: MemoryStore,
}

#[async_trait::async_trait]
impl DocumentStore for YieldingStore {
    fn backend_name(&self) -> &'static str {
        "yielding"
    }

    async fn ping(&self) -> launchpad_core::Result<()> {
        self.inner.ping().await
    }

    async fn insert_unique(
        &self,
        collection: &str,
        doc: Document,
        unique: &[&str],
    ) -> launchpad_core::Result<Document> {
        tokio::task::yield_now().await;
        self.inner.insert_unique(collection, doc, unique).await
    }

    async fn find(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> launchpad_core::Result<Vec<Document>> {
        tokio::task::yield_now().await;
        self.inner.find(collection, query).await
    }

    async fn replace_where(
        &self,
        collection: &str,
        id: &str,
        doc: Document,
        expected: &Filter,
        unique: &[&str],
    ) -> launchpad_core::Result<Option<Document>> {
        tokio::task::yield_now().await;
        self.inner.replace_where(collection, id, doc, expected, unique).await
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> launchpad_core::Result<Option<Document>> {
        tokio::task::yield_now().await;
        self.inner.delete(collection, id).await
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> launchpad_core::Result<u64> {
        tokio::task::yield_now().await;
        self.inner.delete_many(collection, filter).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> launchpad_core::Result<u64> {
        tokio::task::yield_now().await;
        self.inner.count(collection, filter).await
    }
}

fn interleaving_services() -> Services {
    let services = Services::new(Arc::new(YieldingStore::default()), SearchService::in_memory());
    aspects::compose(&services).unwrap();
    services
}

#[tokio::test]
async fn test_concurrent_upvotes_store_one_vote() {
    let services = interleaving_services();
    let product = services
        .products
        .create_product(&Actor::member("maker"), product_input("Radar"))
        .await
        .unwrap();
    let fan = Actor::member("fan");

    let (first, second) = tokio::join!(
        services.upvotes.upvote(&fan, &product.id),
        services.upvotes.upvote(&fan, &product.id),
    );

    assert_eq!(assert_ok!(first), assert_ok!(second));
    assert_eq!(services.upvotes.count_upvotes(&product.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_profiles_for_one_user() {
    let services = interleaving_services();
    let user = Actor::member("u1");
    let input = || CreateProfileInput {
        display_name: "Ada".to_string(),
        ..Default::default()
    };

    let (first, second) = tokio::join!(
        services.people.create_profile(&user, input()),
        services.people.create_profile(&user, input()),
    );

    assert!(first.is_ok() != second.is_ok());
    let err = first.err().or(second.err()).unwrap();
    assert_eq!(err.code(), ErrorCode::DuplicateRecord);

    let profiles = services
        .store
        .count("user_profiles", &Filter::new().eq("userId", "u1"))
        .await
        .unwrap();
    assert_eq!(profiles, 1);
}

#[tokio::test]
async fn test_concurrent_sign_ups_share_no_username() {
    let services = interleaving_services();
    let input = || RegisterUserInput {
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        display_name: "Ada".to_string(),
    };

    let (u1, u2) = (Actor::member("u1"), Actor::member("u2"));
    let (first, second) = tokio::join!(
        services.people.register_user(&u1, input()),
        services.people.register_user(&u2, input()),
    );

    assert!(first.is_ok() != second.is_ok());
    let taken = services
        .store
        .count("users", &Filter::new().eq("username", "ada"))
        .await
        .unwrap();
    assert_eq!(taken, 1);
}

#[tokio::test]
async fn test_concurrent_categories_share_no_slug() {
    let services = interleaving_services();
    let admin = Actor::admin("admin");
    let input = |name: &str| CreateCategoryInput {
        name: name.to_string(),
        slug: "dev-tools".to_string(),
        description: None,
    };

    let (first, second) = tokio::join!(
        services.products.create_category(&admin, input("Dev Tools")),
        services.products.create_category(&admin, input("Developer Tools")),
    );

    assert!(first.is_ok() != second.is_ok());
    let err = first.err().or(second.err()).unwrap();
    assert_eq!(err.code(), ErrorCode::DuplicateRecord);
}

#[tokio::test]
async fn test_go_live_racing_the_poller_flips_once() {
    let services = interleaving_services();
    let maker = Actor::member("maker");
    let product = services.products.create_product(&maker, product_input("Radar")).await.unwrap();
    let launch = services
        .launches
        .create_launch(
            &maker,
            CreateLaunchInput {
                product_id: product.id.clone(),
                title: "Launch".to_string(),
                description: "Going live".to_string(),
                launch_date: iso::now() - chrono::Duration::seconds(1),
            },
        )
        .await
        .unwrap();

    let (forced, polled) = tokio::join!(
        services.launches.go_live(&maker, &launch.id),
        services.launches.activate_due_launches(),
    );
    let polled = polled.unwrap();

    match &forced {
        Ok(live) => assert_eq!(live.status, LaunchStatus::Live),
        Err(e) => assert_eq!(e.code(), ErrorCode::InvalidStateTransition),
    }
    assert_eq!(usize::from(forced.is_ok()) + polled.len(), 1);
    assert_eq!(
        services.launches.get_launch(&launch.id).await.unwrap().status,
        LaunchStatus::Live
    );
}
