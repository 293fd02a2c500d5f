use async_graphql::{ComplexObject, Context, Object, Result, ResultExt, ID};

use crate::graphql::{actor, page, services};

use super::entity::{
    CreateForumInput, CreatePostInput, CreateTopicInput, Forum, ForumPost, ForumTopic,
    UpdateForumInput, UpdatePostInput, UpdateTopicInput,
};

#[ComplexObject]
impl Forum {
    async fn topics(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ForumTopic>> {
        services(ctx)?
            .forums
            .list_topics(&self.id, page(offset, limit)?)
            .await
            .extend()
    }

    async fn topic_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?.forums.count_topics(&self.id).await.extend()
    }
}

#[ComplexObject]
impl ForumTopic {
    async fn posts(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ForumPost>> {
        services(ctx)?
            .forums
            .list_posts(&self.id, page(offset, limit)?)
            .await
            .extend()
    }

    async fn post_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?.forums.count_posts(&self.id).await.extend()
    }
}

#[derive(Default)]
pub struct ForumQuery;

#[Object]
impl ForumQuery {
    async fn get_forum(&self, ctx: &Context<'_>, id: ID) -> Result<Forum> {
        services(ctx)?.forums.get_forum(id.as_str()).await.extend()
    }

    async fn list_forums(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Forum>> {
        services(ctx)?.forums.list_forums(page(offset, limit)?).await.extend()
    }

    async fn get_topic(&self, ctx: &Context<'_>, id: ID) -> Result<ForumTopic> {
        services(ctx)?.forums.get_topic(id.as_str()).await.extend()
    }

    async fn list_topics(
        &self,
        ctx: &Context<'_>,
        forum_id: ID,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ForumTopic>> {
        services(ctx)?
            .forums
            .list_topics(forum_id.as_str(), page(offset, limit)?)
            .await
            .extend()
    }

    async fn get_post(&self, ctx: &Context<'_>, id: ID) -> Result<ForumPost> {
        services(ctx)?.forums.get_post(id.as_str()).await.extend()
    }

    async fn list_posts(
        &self,
        ctx: &Context<'_>,
        topic_id: ID,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<ForumPost>> {
        services(ctx)?
            .forums
            .list_posts(topic_id.as_str(), page(offset, limit)?)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct ForumMutation;

#[Object]
impl ForumMutation {
    async fn create_forum(&self, ctx: &Context<'_>, input: CreateForumInput) -> Result<Forum> {
        services(ctx)?.forums.create_forum(&actor(ctx), input).await.extend()
    }

    async fn update_forum(&self, ctx: &Context<'_>, id: ID, input: UpdateForumInput) -> Result<Forum> {
        services(ctx)?
            .forums
            .update_forum(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_forum(&self, ctx: &Context<'_>, id: ID) -> Result<Forum> {
        services(ctx)?.forums.delete_forum(&actor(ctx), id.as_str()).await.extend()
    }

    async fn create_topic(&self, ctx: &Context<'_>, input: CreateTopicInput) -> Result<ForumTopic> {
        services(ctx)?.forums.create_topic(&actor(ctx), input).await.extend()
    }

    async fn update_topic(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateTopicInput,
    ) -> Result<ForumTopic> {
        services(ctx)?
            .forums
            .update_topic(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_topic(&self, ctx: &Context<'_>, id: ID) -> Result<ForumTopic> {
        services(ctx)?.forums.delete_topic(&actor(ctx), id.as_str()).await.extend()
    }

    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<ForumPost> {
        services(ctx)?.forums.create_post(&actor(ctx), input).await.extend()
    }

    async fn update_post(&self, ctx: &Context<'_>, id: ID, input: UpdatePostInput) -> Result<ForumPost> {
        services(ctx)?
            .forums
            .update_post(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<ForumPost> {
        services(ctx)?.forums.delete_post(&actor(ctx), id.as_str()).await.extend()
    }
}
