use async_graphql::{Context, Object, Result, ResultExt, ID};

use crate::graphql::{actor, page, services};
use crate::rbac::Role;

use super::entity::{CreateProfileInput, RegisterUserInput, UpdateProfileInput, User, UserProfile};

#[derive(Default)]
pub struct PeopleQuery;

#[Object]
impl PeopleQuery {
    /// The signed-in caller's account.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        services(ctx)?.people.me(&actor(ctx)).await.extend()
    }

    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        services(ctx)?.people.get_user(id.as_str()).await.extend()
    }

    async fn list_users(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<User>> {
        services(ctx)?.people.list_users(page(offset, limit)?).await.extend()
    }

    async fn get_profile(&self, ctx: &Context<'_>, id: ID) -> Result<UserProfile> {
        services(ctx)?.people.get_profile(id.as_str()).await.extend()
    }

    async fn get_profile_by_user(&self, ctx: &Context<'_>, user_id: ID) -> Result<Option<UserProfile>> {
        services(ctx)?
            .people
            .get_profile_by_user(user_id.as_str())
            .await
            .extend()
    }

    async fn list_profiles(
        &self,
        ctx: &Context<'_>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<UserProfile>> {
        services(ctx)?.people.list_profiles(page(offset, limit)?).await.extend()
    }
}

#[derive(Default)]
pub struct PeopleMutation;

#[Object]
impl PeopleMutation {
    async fn register_user(&self, ctx: &Context<'_>, input: RegisterUserInput) -> Result<User> {
        services(ctx)?.people.register_user(&actor(ctx), input).await.extend()
    }

    async fn set_user_roles(&self, ctx: &Context<'_>, user_id: ID, roles: Vec<Role>) -> Result<User> {
        services(ctx)?
            .people
            .set_user_roles(&actor(ctx), user_id.as_str(), roles)
            .await
            .extend()
    }

    async fn create_profile(&self, ctx: &Context<'_>, input: CreateProfileInput) -> Result<UserProfile> {
        services(ctx)?.people.create_profile(&actor(ctx), input).await.extend()
    }

    async fn update_profile(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateProfileInput,
    ) -> Result<UserProfile> {
        services(ctx)?
            .people
            .update_profile(&actor(ctx), id.as_str(), input)
            .await
            .extend()
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: ID) -> Result<UserProfile> {
        services(ctx)?
            .people
            .delete_profile(&actor(ctx), id.as_str())
            .await
            .extend()
    }
}
