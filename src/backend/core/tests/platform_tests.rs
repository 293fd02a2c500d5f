//! Integration tests for platform composition, fixtures, search and the
//! launch poller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use launchpad_core::aspects::forums::CreateForumInput;
use launchpad_core::aspects::launches::{CreateLaunchInput, LaunchPoller, LaunchStatus};
use launchpad_core::aspects::products::fixtures::RADAR_PRODUCT_ID;
use launchpad_core::aspects::products::CreateProductInput;
use launchpad_core::aspects::{self, Services};
use launchpad_core::error::{ErrorCode, Result};
use launchpad_core::platform::{Aspect, Platform, ProductSection, Registrar, Route};
use launchpad_core::rbac::Actor;
use launchpad_core::store::iso;

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_builtin_aspects_compose_in_order() {
    let services = Services::in_memory();
    let platform = aspects::compose(&services).unwrap();
    let shell = platform.shell();

    let ids: Vec<_> = shell.aspects().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["people", "forums", "products", "launches", "reviews", "upvotes"]);

    let sections: Vec<_> = shell.product_sections.items().map(|s| s.key.as_str()).collect();
    assert_eq!(sections, ["overview", "launches", "reviews"]);

    let tabs: Vec<_> = shell.profile_tabs.items().map(|t| t.key.as_str()).collect();
    assert_eq!(tabs, ["about", "products", "upvotes"]);

    let mut types: Vec<_> = services.search.search_types().into_iter().map(|t| t.name).collect();
    types.sort();
    assert_eq!(
        types,
        ["forum", "launch", "product", "profile", "review", "topic"]
    );
}

struct Plugin {
    id: &'static str,
    dependencies: &'static [&'static str],
}

#[async_trait]
impl Aspect for Plugin {
    fn id(&self) -> &'static str {
        self.id
    }

    fn dependencies(&self) -> &'static [&'static str] {
        self.dependencies
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell.route(Route::new(format!("/{}", self.id), self.id));
        shell.product_section(ProductSection::new(self.id, "Extra", "getProduct"))?;
        Ok(())
    }
}

#[test]
fn test_third_party_aspect_extends_product_page() {
    let mut all = aspects::all();
    all.push(Arc::new(Plugin {
        id: "changelog",
        dependencies: &["products"],
    }));

    let platform = Platform::compose(all).unwrap();
    let sections = &platform.shell().product_sections;
    assert_eq!(sections.len(), 4);
    assert_eq!(sections.entries()[3].aspect, "changelog");
    assert_eq!(sections.contributed_by("changelog").count(), 1);
}

#[test]
fn test_duplicate_aspect_rejected() {
    let mut all = aspects::all();
    all.push(Arc::new(Plugin {
        id: "forums",
        dependencies: &[],
    }));

    let err = Platform::compose(all).err().unwrap();
    assert_eq!(err.code(), ErrorCode::AspectAlreadyRegistered);
}

#[test]
fn test_aspect_before_its_dependency_rejected() {
    let plugin: Arc<dyn Aspect> = Arc::new(Plugin {
        id: "changelog",
        dependencies: &["products"],
    });

    let err = Platform::compose(vec![plugin]).err().unwrap();
    assert_eq!(err.code(), ErrorCode::MissingAspectDependency);
}

#[test]
fn test_manifest_serializes_slots() {
    let services = Services::in_memory();
    let platform = aspects::compose(&services).unwrap();

    let manifest = serde_json::to_value(platform.manifest()).unwrap();
    assert_eq!(manifest["aspects"][0]["id"], "people");
    assert_eq!(manifest["productSections"][0]["aspect"], "products");
    assert_eq!(manifest["productSections"][0]["key"], "overview");
    assert!(manifest["routes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["path"] == "/launches/:launchId"));
}

// ============================================================================
// Fixtures
// ============================================================================

#[tokio::test]
async fn test_seeding_fills_empty_collections_once() {
    let services = Services::in_memory();
    let platform = aspects::compose(&services).unwrap();

    let seeded = platform.seed(&services).await.unwrap();
    assert!(seeded > 0);
    assert_eq!(platform.seed(&services).await.unwrap(), 0);

    let product = services.products.get_product(RADAR_PRODUCT_ID).await.unwrap();
    assert_eq!(product.name, "Crate Radar");
    assert!(services.upvotes.count_upvotes(RADAR_PRODUCT_ID).await.unwrap() > 0);

    let hits = services.search.search("crate radar", None, None).await.unwrap();
    assert!(hits.iter().any(|h| h.id == RADAR_PRODUCT_ID));
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_follows_create_update_delete() {
    let services = Services::in_memory();
    aspects::compose(&services).unwrap();
    let author = Actor::member("u1");

    let forum = services
        .forums
        .create_forum(
            &author,
            CreateForumInput {
                title: "Typewriters".to_string(),
                description: "Mechanical keyboards and their ancestors".to_string(),
            },
        )
        .await
        .unwrap();

    let hits = services.search.search("keyboards", None, None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, forum.id);
    assert_eq!(hits[0].content_type, "forum");

    let only_products = services
        .search
        .search("keyboards", Some(vec!["product".to_string()]), None)
        .await
        .unwrap();
    assert!(only_products.is_empty());

    let err = services
        .search
        .search("keyboards", Some(vec!["gadget".to_string()]), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownSearchType);

    services.forums.delete_forum(&author, &forum.id).await.unwrap();
    assert!(services.search.search("keyboards", None, None).await.unwrap().is_empty());
}

// ============================================================================
// Launch Poller
// ============================================================================

#[tokio::test]
async fn test_poller_flips_due_launches_exactly_once() {
    let services = Services::in_memory();
    aspects::compose(&services).unwrap();
    let maker = Actor::member("maker");

    let product = services
        .products
        .create_product(
            &maker,
            CreateProductInput {
                name: "Radar".to_string(),
                tagline: "Tagline".to_string(),
                description: "Description".to_string(),
                website_url: "https://radar.dev".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let launch = |minutes: i64| CreateLaunchInput {
        product_id: product.id.clone(),
        title: "Launch".to_string(),
        description: "Scheduled".to_string(),
        launch_date: iso::now() + chrono::Duration::minutes(minutes),
    };
    let due = services.launches.create_launch(&maker, launch(-1)).await.unwrap();
    let later = services.launches.create_launch(&maker, launch(60)).await.unwrap();

    let poller = LaunchPoller::new(services.launches.clone(), Duration::from_secs(60));
    assert_eq!(poller.tick().await, 1);
    assert_eq!(poller.tick().await, 0);

    let due = services.launches.get_launch(&due.id).await.unwrap();
    let later = services.launches.get_launch(&later.id).await.unwrap();
    assert_eq!(due.status, LaunchStatus::Live);
    assert_eq!(later.status, LaunchStatus::Upcoming);
}
