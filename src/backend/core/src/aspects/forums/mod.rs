//! Discussion forums: forums hold topics, topics hold posts.

pub mod entity;
pub mod fixtures;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::{
    CreateForumInput, CreatePostInput, CreateTopicInput, Forum, ForumPost, ForumTopic,
    UpdateForumInput, UpdatePostInput, UpdateTopicInput,
};
pub use schema::{ForumMutation, ForumQuery};
pub use service::ForumService;

use crate::aspects::{seed_collection, seed_indexed, Services};
use crate::error::Result;
use crate::platform::{Aspect, NavItem, Registrar, Route};
use crate::search::Indexable;

pub const ASPECT_ID: &str = "forums";

pub struct ForumsAspect;

#[async_trait]
impl Aspect for ForumsAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["people"]
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell
            .route(Route::new("/forums", "forums"))
            .route(Route::new("/forums/:forumId", "forum"))
            .route(Route::new("/forums/:forumId/topics/:topicId", "forum-topic"))
            .navigation(NavItem::new("Forums", "/forums"))
            .search_type(Forum::SEARCH_TYPE, "Forums", "/forums/:forumId")
            .search_type(ForumTopic::SEARCH_TYPE, "Topics", "/forums/:forumId/topics/:topicId");
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        let forums = &services.forums;
        let search = &services.search;
        Ok(seed_indexed(&forums.forums, search, fixtures::forums()).await?
            + seed_indexed(&forums.topics, search, fixtures::topics()).await?
            + seed_collection(&forums.posts, fixtures::posts()).await?.len())
    }
}
