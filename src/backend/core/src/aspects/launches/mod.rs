//! Product launches and the poller that takes them live.

pub mod entity;
pub mod fixtures;
pub mod poller;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::{CreateLaunchInput, Launch, LaunchFilter, LaunchStatus, UpdateLaunchInput};
pub use poller::LaunchPoller;
pub use schema::{LaunchMutation, LaunchQuery};
pub use service::LaunchService;

use crate::aspects::{seed_indexed, Services};
use crate::error::Result;
use crate::platform::{Aspect, NavItem, ProductSection, Registrar, Route};
use crate::search::Indexable;

pub const ASPECT_ID: &str = "launches";

pub struct LaunchesAspect;

#[async_trait]
impl Aspect for LaunchesAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["products"]
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell
            .route(Route::new("/launches", "launches"))
            .route(Route::new("/launches/:launchId", "launch"))
            .navigation(NavItem::new("Launches", "/launches"))
            .search_type(Launch::SEARCH_TYPE, "Launches", "/launches/:launchId");
        shell.product_section(ProductSection::new("launches", "Launches", "listLaunches"))?;
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        seed_indexed(&services.launches.launches, &services.search, fixtures::launches()).await
    }
}
