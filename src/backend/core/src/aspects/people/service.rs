use crate::aspects::{created, deleted, updated};
use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::pagination::OffsetPagination;
use crate::rbac::{ensure_admin, ensure_admin_or_author, ensure_authenticated, Actor, Role};
use crate::repository::{Entity, Repository};
use crate::search::{Indexable, SearchService};
use crate::store::{iso, Filter, SharedStore};
use crate::validation::Validate;

use super::entity::{CreateProfileInput, RegisterUserInput, UpdateProfileInput, User, UserProfile};

/// Accounts and public profiles.
#[derive(Clone)]
pub struct PeopleService {
    pub(crate) users: Repository<User>,
    pub(crate) profiles: Repository<UserProfile>,
    search: SearchService,
}

impl PeopleService {
    pub fn new(store: SharedStore, search: SearchService) -> Self {
        Self {
            users: Repository::new(store.clone()),
            profiles: Repository::new(store),
            search,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    /// Create the caller's account. New accounts are members.
    pub async fn register_user(&self, actor: &Actor, input: RegisterUserInput) -> Result<User> {
        let user_id = ensure_authenticated(actor)?;
        input.validate()?;

        if self.users.find_by_id(user_id).await?.is_some() {
            return Err(LaunchpadError::duplicate(User::NAME, user_id));
        }
        let taken = self
            .users
            .count(&Filter::new().eq("username", input.username.as_str()))
            .await?;
        if taken > 0 {
            return Err(LaunchpadError::duplicate(User::NAME, input.username));
        }

        let now = iso::now();
        let user = User {
            id: user_id.to_string(),
            username: input.username,
            email: input.email,
            display_name: input.display_name.trim().to_string(),
            roles: vec![Role::Member],
            created_at: now,
            updated_at: now,
        };
        // The insert enforces uniqueness under concurrent sign-ups.
        let user = self.users.insert(&user).await.map_err(|e| match e.code() {
            ErrorCode::DuplicateRecord => LaunchpadError::duplicate(User::NAME, &user.username),
            _ => e,
        })?;

        created(&user, actor);
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.users.get(id).await
    }

    pub async fn list_users(&self, page: OffsetPagination) -> Result<Vec<User>> {
        self.users.find(Filter::new(), page).await
    }

    /// The caller's account, if they registered one.
    pub async fn me(&self, actor: &Actor) -> Result<Option<User>> {
        match &actor.user_id {
            Some(id) => self.users.find_by_id(id).await,
            None => Ok(None),
        }
    }

    pub async fn set_user_roles(&self, actor: &Actor, user_id: &str, roles: Vec<Role>) -> Result<User> {
        ensure_admin(actor)?;
        if roles.is_empty() {
            return Err(LaunchpadError::new(
                ErrorCode::InvalidInput,
                "A user needs at least one role",
            ));
        }

        let mut user = self.users.get(user_id).await?;
        user.roles = Vec::with_capacity(roles.len());
        for role in roles {
            if !user.roles.contains(&role) {
                user.roles.push(role);
            }
        }
        user.updated_at = iso::now();

        let user = self.users.replace(&user).await?;
        tracing::info!(user_id = %user.id, roles = ?user.roles, "User roles changed");
        Ok(user)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Profiles
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a profile. Each user has at most one.
    pub async fn create_profile(&self, actor: &Actor, input: CreateProfileInput) -> Result<UserProfile> {
        let caller = ensure_authenticated(actor)?;
        let user_id = input.user_id.clone().unwrap_or_else(|| caller.to_string());
        ensure_admin_or_author(actor, &user_id)?;

        if self.get_profile_by_user(&user_id).await?.is_some() {
            return Err(LaunchpadError::duplicate(UserProfile::NAME, user_id));
        }

        let now = iso::now();
        let profile = UserProfile {
            id: String::new(),
            user_id,
            display_name: input.display_name.trim().to_string(),
            headline: input.headline,
            bio: input.bio,
            avatar_url: input.avatar_url,
            website_url: input.website_url,
            location: input.location,
            created_at: now,
            updated_at: now,
        };
        profile.validate()?;

        let profile = self.profiles.insert(&profile).await.map_err(|e| match e.code() {
            ErrorCode::DuplicateRecord => {
                LaunchpadError::duplicate(UserProfile::NAME, &profile.user_id)
            }
            _ => e,
        })?;
        self.search.index_entity(&profile).await?;

        created(&profile, actor);
        Ok(profile)
    }

    pub async fn get_profile(&self, id: &str) -> Result<UserProfile> {
        self.profiles.get(id).await
    }

    pub async fn get_profile_by_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.profiles.find_one(Filter::new().eq("userId", user_id)).await
    }

    pub async fn list_profiles(&self, page: OffsetPagination) -> Result<Vec<UserProfile>> {
        self.profiles.find(Filter::new(), page).await
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateProfileInput,
    ) -> Result<UserProfile> {
        ensure_authenticated(actor)?;
        let mut profile = self.profiles.get(id).await?;
        ensure_admin_or_author(actor, &profile.user_id)?;

        profile.apply(input);
        profile.validate()?;

        let profile = self.profiles.replace(&profile).await?;
        self.search.index_entity(&profile).await?;

        updated(&profile, actor);
        Ok(profile)
    }

    pub async fn delete_profile(&self, actor: &Actor, id: &str) -> Result<UserProfile> {
        ensure_authenticated(actor)?;
        let profile = self.profiles.get(id).await?;
        ensure_admin_or_author(actor, &profile.user_id)?;

        let removed = self.profiles.delete(id).await?;
        self.search.remove_content(UserProfile::SEARCH_TYPE, id).await?;

        deleted(&removed, 0);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::Services;

    async fn setup() -> PeopleService {
        let services = Services::in_memory();
        crate::aspects::compose(&services).unwrap();
        services.people
    }

    fn registration(username: &str) -> RegisterUserInput {
        RegisterUserInput {
            username: username.into(),
            email: format!("{}@example.com", username),
            display_name: username.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn test_register_uses_token_subject() {
        let people = setup().await;
        let actor = Actor::member("u1");

        let user = people.register_user(&actor, registration("ada")).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.roles, vec![Role::Member]);
        assert_eq!(people.me(&actor).await.unwrap(), Some(user));

        let err = people.register_user(&actor, registration("other")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let people = setup().await;
        people.register_user(&Actor::member("u1"), registration("ada")).await.unwrap();

        let err = people
            .register_user(&Actor::member("u2"), registration("ada"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateRecord);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_register() {
        let people = setup().await;
        let err = people
            .register_user(&Actor::anonymous(), registration("ada"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_set_roles_requires_admin() {
        let people = setup().await;
        people.register_user(&Actor::member("u1"), registration("ada")).await.unwrap();

        let err = people
            .set_user_roles(&Actor::member("u1"), "u1", vec![Role::Admin])
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AccessDenied);

        let user = people
            .set_user_roles(&Actor::admin("root"), "u1", vec![Role::Moderator, Role::Member])
            .await
            .unwrap();
        assert_eq!(user.roles, vec![Role::Moderator, Role::Member]);
    }

    #[tokio::test]
    async fn test_one_profile_per_user() {
        let people = setup().await;
        let actor = Actor::member("u1");
        let input = CreateProfileInput {
            display_name: "Ada".into(),
            ..Default::default()
        };

        let profile = people.create_profile(&actor, input.clone()).await.unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(
            people.create_profile(&actor, input).await.unwrap_err().code(),
            ErrorCode::DuplicateRecord
        );
    }

    #[tokio::test]
    async fn test_profile_for_someone_else_needs_admin() {
        let people = setup().await;
        let input = CreateProfileInput {
            user_id: Some("u2".into()),
            display_name: "Grace".into(),
            ..Default::default()
        };

        assert_eq!(
            people
                .create_profile(&Actor::member("u1"), input.clone())
                .await
                .unwrap_err()
                .code(),
            ErrorCode::AccessDenied
        );
        let profile = people.create_profile(&Actor::admin("root"), input).await.unwrap();
        assert_eq!(profile.user_id, "u2");
    }

    #[tokio::test]
    async fn test_update_validates_urls() {
        let people = setup().await;
        let actor = Actor::member("u1");
        let profile = people
            .create_profile(
                &actor,
                CreateProfileInput {
                    display_name: "Ada".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = people
            .update_profile(
                &actor,
                &profile.id,
                UpdateProfileInput {
                    website_url: Some("ftp://nope".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let updated = people
            .update_profile(
                &actor,
                &profile.id,
                UpdateProfileInput {
                    headline: Some("Analyst".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.headline.as_deref(), Some("Analyst"));
        assert_eq!(updated.created_at, profile.created_at);
    }
}
