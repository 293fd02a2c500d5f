//! Users and their public profiles.

pub mod entity;
pub mod fixtures;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::{CreateProfileInput, RegisterUserInput, UpdateProfileInput, User, UserProfile};
pub use schema::{PeopleMutation, PeopleQuery};
pub use service::PeopleService;

use crate::aspects::{seed_collection, seed_indexed, Services};
use crate::error::Result;
use crate::platform::{Aspect, ProfileTab, Registrar, Route};
use crate::search::Indexable;

pub const ASPECT_ID: &str = "people";

pub struct PeopleAspect;

#[async_trait]
impl Aspect for PeopleAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell
            .route(Route::new("/profile/:userId", "profile"))
            .route(Route::new("/profile/edit", "profile-edit").authenticated())
            .search_type(UserProfile::SEARCH_TYPE, "People", "/profile/:userId");
        shell.profile_tab(ProfileTab::new("about", "About", "getProfileByUser"))?;
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        let people = &services.people;
        let users = seed_collection(&people.users, fixtures::users()).await?.len();
        let profiles = seed_indexed(&people.profiles, &services.search, fixtures::profiles()).await?;
        Ok(users + profiles)
    }
}
