use crate::aspects::{created, deleted, updated};
use crate::error::Result;
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_admin_or_author, ensure_authenticated, Actor};
use crate::repository::Repository;
use crate::search::{Indexable, SearchService};
use crate::store::{iso, Filter, SharedStore};
use crate::validation::Validate;

use super::entity::{
    CreateForumInput, CreatePostInput, CreateTopicInput, Forum, ForumPost, ForumTopic,
    UpdateForumInput, UpdatePostInput, UpdateTopicInput,
};

/// Forums, their topics, and the posts in each topic.
#[derive(Clone)]
pub struct ForumService {
    pub(crate) forums: Repository<Forum>,
    pub(crate) topics: Repository<ForumTopic>,
    pub(crate) posts: Repository<ForumPost>,
    search: SearchService,
}

impl ForumService {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            forums: Repository::new(store.clone()),
            topics: Repository::new(store.clone()),
            posts: Repository::new(store),
            search,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Forums
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_forum(&self, actor: &Actor, input: CreateForumInput) -> Result<Forum> {
        let author_id = ensure_authenticated(actor)?;
        let now = iso::now();
        let forum = Forum {
            id: String::new(),
            title: input.title.trim().to_string(),
            description: input.description,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        forum.validate()?;

        let forum = self.forums.insert(&forum).await?;
        self.search.index_entity(&forum).await?;
        created(&forum, actor);
        Ok(forum)
    }

    pub async fn get_forum(&self, id: &str) -> Result<Forum> {
        self.forums.get(id).await
    }

    pub async fn list_forums(&self, page: OffsetPagination) -> Result<Vec<Forum>> {
        self.forums.find(Filter::new(), page).await
    }

    pub async fn update_forum(&self, actor: &Actor, id: &str, input: UpdateForumInput) -> Result<Forum> {
        ensure_authenticated(actor)?;
        let mut forum = self.forums.get(id).await?;
        ensure_admin_or_author(actor, &forum.author_id)?;

        forum.apply(input);
        forum.validate()?;

        let forum = self.forums.replace(&forum).await?;
        self.search.index_entity(&forum).await?;
        updated(&forum, actor);
        Ok(forum)
    }

    /// Delete a forum with its topics and every topic's posts.
    pub async fn delete_forum(&self, actor: &Actor, id: &str) -> Result<Forum> {
        ensure_authenticated(actor)?;
        let forum = self.forums.get(id).await?;
        ensure_admin_or_author(actor, &forum.author_id)?;

        let mut cascaded = 0;
        for topic in self.topics.find_all(Filter::new().eq("forumId", id)).await? {
            cascaded += self.remove_topic(&topic).await? + 1;
        }

        let removed = self.forums.delete(id).await?;
        self.search.remove_content(Forum::SEARCH_TYPE, id).await?;
        deleted(&removed, cascaded);
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Topics
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_topic(&self, actor: &Actor, input: CreateTopicInput) -> Result<ForumTopic> {
        let author_id = ensure_authenticated(actor)?;
        self.forums.get(&input.forum_id).await?;

        let now = iso::now();
        let topic = ForumTopic {
            id: String::new(),
            forum_id: input.forum_id,
            title: input.title.trim().to_string(),
            content: input.content,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        topic.validate()?;

        let topic = self.topics.insert(&topic).await?;
        self.search.index_entity(&topic).await?;
        created(&topic, actor);
        Ok(topic)
    }

    pub async fn get_topic(&self, id: &str) -> Result<ForumTopic> {
        self.topics.get(id).await
    }

    pub async fn list_topics(&self, forum_id: &str, page: OffsetPagination) -> Result<Vec<ForumTopic>> {
        self.topics.find(Filter::new().eq("forumId", forum_id), page).await
    }

    pub async fn count_topics(&self, forum_id: &str) -> Result<u64> {
        self.topics.count(&Filter::new().eq("forumId", forum_id)).await
    }

    pub async fn update_topic(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateTopicInput,
    ) -> Result<ForumTopic> {
        ensure_authenticated(actor)?;
        let mut topic = self.topics.get(id).await?;
        ensure_admin_or_author(actor, &topic.author_id)?;

        topic.apply(input);
        topic.validate()?;

        let topic = self.topics.replace(&topic).await?;
        self.search.index_entity(&topic).await?;
        updated(&topic, actor);
        Ok(topic)
    }

    /// Delete a topic and its posts.
    pub async fn delete_topic(&self, actor: &Actor, id: &str) -> Result<ForumTopic> {
        ensure_authenticated(actor)?;
        let topic = self.topics.get(id).await?;
        ensure_admin_or_author(actor, &topic.author_id)?;

        let cascaded = self.remove_topic(&topic).await?;
        deleted(&topic, cascaded);
        Ok(topic)
    }

    /// Remove a topic after its posts. Returns the number of posts removed.
    async fn remove_topic(&self, topic: &ForumTopic) -> Result<usize> {
        let posts = self
            .posts
            .delete_where(&Filter::new().eq("topicId", topic.id.as_str()))
            .await?;
        self.topics.delete(&topic.id).await?;
        self.search.remove_content(ForumTopic::SEARCH_TYPE, &topic.id).await?;
        Ok(posts as usize)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_post(&self, actor: &Actor, input: CreatePostInput) -> Result<ForumPost> {
        let author_id = ensure_authenticated(actor)?;
        self.topics.get(&input.topic_id).await?;

        let now = iso::now();
        let post = ForumPost {
            id: String::new(),
            topic_id: input.topic_id,
            content: input.content,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        post.validate()?;

        let post = self.posts.insert(&post).await?;
        created(&post, actor);
        Ok(post)
    }

    pub async fn get_post(&self, id: &str) -> Result<ForumPost> {
        self.posts.get(id).await
    }

    pub async fn list_posts(&self, topic_id: &str, page: OffsetPagination) -> Result<Vec<ForumPost>> {
        self.posts.find(Filter::new().eq("topicId", topic_id), page).await
    }

    pub async fn count_posts(&self, topic_id: &str) -> Result<u64> {
        self.posts.count(&Filter::new().eq("topicId", topic_id)).await
    }

    pub async fn update_post(&self, actor: &Actor, id: &str, input: UpdatePostInput) -> Result<ForumPost> {
        ensure_authenticated(actor)?;
        let mut post = self.posts.get(id).await?;
        ensure_admin_or_author(actor, &post.author_id)?;

        post.apply(input);
        post.validate()?;

        let post = self.posts.replace(&post).await?;
        updated(&post, actor);
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &Actor, id: &str) -> Result<ForumPost> {
        ensure_authenticated(actor)?;
        let post = self.posts.get(id).await?;
        ensure_admin_or_author(actor, &post.author_id)?;

        let removed = self.posts.delete(id).await?;
        deleted(&removed, 0);
        Ok(removed)
    }
}
