use crate::aspects::products::Product;
use crate::aspects::{created, deleted, updated};
use crate::error::{LaunchpadError, Result};
use crate::observability::LaunchpadEvent;
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_admin_or_author, ensure_authenticated, Actor};
use crate::repository::{Entity, Repository};
use crate::search::{Indexable, SearchService};
use crate::store::{iso, Filter, SharedStore};
use crate::validation::Validate;

use super::entity::{CreateLaunchInput, Launch, LaunchFilter, LaunchStatus, UpdateLaunchInput};

/// Scheduled product launches.
#[derive(Clone)]
pub struct LaunchService {
    pub(crate) launches: Repository<Launch>,
    products: Repository<Product>,
    search: SearchService,
}

impl LaunchService {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            launches: Repository::new(store.clone()),
            products: Repository::new(store),
            search,
        }
    }

    /// Schedule a launch. Launches start `upcoming` and go live through the
    /// poller or [`go_live`](Self::go_live).
    pub async fn create_launch(&self, actor: &Actor, input: CreateLaunchInput) -> Result<Launch> {
        let author_id = ensure_authenticated(actor)?;
        let product = self.products.get(&input.product_id).await?;
        ensure_admin_or_author(actor, &product.owner_id)?;

        let now = iso::now();
        let launch = Launch {
            id: String::new(),
            product_id: input.product_id,
            title: input.title.trim().to_string(),
            description: input.description,
            launch_date: iso::truncate(input.launch_date),
            status: LaunchStatus::Upcoming,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        launch.validate()?;

        let launch = self.launches.insert(&launch).await?;
        self.search.index_entity(&launch).await?;
        created(&launch, actor);
        Ok(launch)
    }

    pub async fn get_launch(&self, id: &str) -> Result<Launch> {
        self.launches.get(id).await
    }

    /// Launches by launch date, latest first.
    pub async fn list_launches(&self, filter: LaunchFilter, page: OffsetPagination) -> Result<Vec<Launch>> {
        let mut query = Filter::new()
            .eq_opt("productId", filter.product_id)
            .eq_opt("status", filter.status.map(|s| s.as_str()));
        if let Some(from) = filter.from {
            query = query.gte("launchDate", iso::format(&iso::truncate(from)));
        }
        if let Some(to) = filter.to {
            query = query.lte("launchDate", iso::format(&iso::truncate(to)));
        }
        self.launches.find(query, page).await
    }

    pub async fn update_launch(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateLaunchInput,
    ) -> Result<Launch> {
        ensure_authenticated(actor)?;
        let mut launch = self.launches.get(id).await?;
        ensure_admin_or_author(actor, &launch.author_id)?;

        launch.apply(input);
        launch.validate()?;

        // An edit must not undo a go-live that happened since the read.
        let status = launch.status;
        let launch = self
            .launches
            .replace_if(&launch, Filter::new().eq("status", status.as_str()))
            .await?
            .ok_or_else(|| {
                LaunchpadError::invalid_transition(Launch::NAME, status, LaunchStatus::Live)
            })?;
        self.search.index_entity(&launch).await?;
        updated(&launch, actor);
        Ok(launch)
    }

    pub async fn delete_launch(&self, actor: &Actor, id: &str) -> Result<Launch> {
        ensure_authenticated(actor)?;
        let launch = self.launches.get(id).await?;
        ensure_admin_or_author(actor, &launch.author_id)?;

        let removed = self.launches.delete(id).await?;
        self.search.remove_content(Launch::SEARCH_TYPE, id).await?;
        deleted(&removed, 0);
        Ok(removed)
    }

    /// Put a launch live ahead of its date.
    pub async fn go_live(&self, actor: &Actor, id: &str) -> Result<Launch> {
        ensure_authenticated(actor)?;
        let launch = self.launches.get(id).await?;
        ensure_admin_or_author(actor, &launch.author_id)?;

        let already_live = || {
            LaunchpadError::invalid_transition(Launch::NAME, LaunchStatus::Live, LaunchStatus::Live)
        };
        if launch.status == LaunchStatus::Live {
            return Err(already_live());
        }
        self.activate(launch).await?.ok_or_else(already_live)
    }

    /// Flip every upcoming launch whose date has passed to live.
    ///
    /// Returns the launches that changed. A launch only changes once since
    /// live launches no longer match.
    pub async fn activate_due_launches(&self) -> Result<Vec<Launch>> {
        let now = iso::now();
        let due = self
            .launches
            .find_all(
                Filter::new()
                    .eq("status", LaunchStatus::Upcoming.as_str())
                    .lte("launchDate", iso::format(&now)),
            )
            .await?;

        let mut activated = Vec::with_capacity(due.len());
        for launch in due {
            if launch.is_due(now) {
                activated.extend(self.activate(launch).await?);
            }
        }
        Ok(activated)
    }

    /// Flip an upcoming launch to live. `None` when it is gone or another
    /// caller already put it live.
    async fn activate(&self, mut launch: Launch) -> Result<Option<Launch>> {
        launch.status = LaunchStatus::Live;
        launch.updated_at = iso::now();

        let upcoming = Filter::new().eq("status", LaunchStatus::Upcoming.as_str());
        let Some(launch) = self.launches.replace_if(&launch, upcoming).await? else {
            return Ok(None);
        };
        self.search.index_entity(&launch).await?;

        LaunchpadEvent::LaunchWentLive {
            launch_id: launch.id.clone(),
            product_id: launch.product_id.clone(),
        }
        .log();
        Ok(Some(launch))
    }
}
