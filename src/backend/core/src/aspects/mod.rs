//! Feature aspects.
//!
//! Each aspect owns its entities, a service enforcing authorization over its
//! repositories, GraphQL query and mutation objects, and the routes and slot
//! items it contributes to the platform shell.

pub mod forums;
pub mod launches;
pub mod people;
pub mod products;
pub mod reviews;
pub mod upvotes;

use std::sync::Arc;

use crate::error::Result;
use crate::observability::LaunchpadEvent;
use crate::platform::{Aspect, Platform};
use crate::rbac::Actor;
use crate::repository::{Entity, Repository};
use crate::search::{Indexable, SearchService};
use crate::store::{MemoryStore, SharedStore};

pub use forums::ForumService;
pub use launches::LaunchService;
pub use people::PeopleService;
pub use products::ProductService;
pub use reviews::ReviewService;
pub use upvotes::UpvoteService;

/// Every aspect service, sharing one store and one search index.
#[derive(Clone)]
pub struct Services {
    pub store: SharedStore,
    pub search: SearchService,
    pub people: PeopleService,
    pub forums: ForumService,
    pub products: ProductService,
    pub launches: LaunchService,
    pub reviews: ReviewService,
    pub upvotes: UpvoteService,
}

impl Services {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            people: PeopleService::new(store.clone(), search.clone()),
            forums: ForumService::new(store.clone(), search.clone()),
            products: ProductService::new(store.clone(), search.clone()),
            launches: LaunchService::new(store.clone(), search.clone()),
            reviews: ReviewService::new(store.clone(), search.clone()),
            upvotes: UpvoteService::new(store.clone()),
            store,
            search,
        }
    }

    /// Services over a fresh memory store and index.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), SearchService::in_memory())
    }
}

/// The built-in aspects in registration order.
pub fn all() -> Vec<Arc<dyn Aspect>> {
    vec![
        Arc::new(people::PeopleAspect),
        Arc::new(forums::ForumsAspect),
        Arc::new(products::ProductsAspect),
        Arc::new(launches::LaunchesAspect),
        Arc::new(reviews::ReviewsAspect),
        Arc::new(upvotes::UpvotesAspect),
    ]
}

pub(crate) fn created<E: Entity>(record: &E, actor: &Actor) {
    LaunchpadEvent::EntityCreated {
        collection: E::COLLECTION,
        id: record.id().to_string(),
        actor: actor.user_id.clone(),
    }
    .log();
}

pub(crate) fn updated<E: Entity>(record: &E, actor: &Actor) {
    LaunchpadEvent::EntityUpdated {
        collection: E::COLLECTION,
        id: record.id().to_string(),
        actor: actor.user_id.clone(),
    }
    .log();
}

pub(crate) fn deleted<E: Entity>(record: &E, cascaded: usize) {
    LaunchpadEvent::EntityDeleted {
        collection: E::COLLECTION,
        id: record.id().to_string(),
        cascaded,
    }
    .log();
}

/// Compose the built-in aspects and register their search types with `services`.
pub fn compose(services: &Services) -> Result<Platform> {
    let platform = Platform::compose(all())?;
    platform.install_search_types(&services.search)?;
    Ok(platform)
}

/// Insert fixtures when the collection is empty. Returns the inserted records.
pub(crate) async fn seed_collection<E: Entity>(
    repo: &Repository<E>,
    records: Vec<E>,
) -> Result<Vec<E>> {
    if !repo.is_empty().await? {
        return Ok(Vec::new());
    }

    let mut inserted = Vec::with_capacity(records.len());
    for record in &records {
        inserted.push(repo.insert(record).await?);
    }

    LaunchpadEvent::FixturesSeeded {
        collection: E::COLLECTION,
        count: inserted.len(),
    }
    .log();
    Ok(inserted)
}

/// Seed fixtures and index each inserted record.
pub(crate) async fn seed_indexed<E: Indexable>(
    repo: &Repository<E>,
    search: &SearchService,
    records: Vec<E>,
) -> Result<usize> {
    let inserted = seed_collection(repo, records).await?;
    for record in &inserted {
        search.index_entity(record).await?;
    }
    Ok(inserted.len())
}
