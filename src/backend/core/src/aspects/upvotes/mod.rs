//! Product upvotes.

pub mod entity;
pub mod fixtures;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::Upvote;
pub use schema::{UpvoteMutation, UpvoteQuery};
pub use service::UpvoteService;

use crate::aspects::{seed_collection, Services};
use crate::error::Result;
use crate::platform::{Aspect, ProfileTab, Registrar};

pub const ASPECT_ID: &str = "upvotes";

pub struct UpvotesAspect;

#[async_trait]
impl Aspect for UpvotesAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["people", "products"]
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell.profile_tab(ProfileTab::new("upvotes", "Upvoted", "listUpvotesByUser"))?;
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        Ok(seed_collection(&services.upvotes.upvotes, fixtures::upvotes()).await?.len())
    }
}
