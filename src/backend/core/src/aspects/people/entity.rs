use async_graphql::{ComplexObject, Context, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rbac::{Actor, Role};
use crate::repository::Entity;
use crate::search::Indexable;
use crate::validation::{
    validate_field, validate_request, Email, MaxLength, MinLength, Required, Slug, Url, Validate,
    ValidationResult, MAX_BODY_LENGTH, MAX_SHORT_TEXT_LENGTH, MAX_TITLE_LENGTH,
};

/// A registered account. The id is the `sub` of the account's tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Only visible to the account itself and admins.
    #[graphql(skip)]
    pub email: String,
    pub display_name: String,
    pub roles: Vec<Role>,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl User {
    async fn email(&self, ctx: &Context<'_>) -> Option<String> {
        let actor = ctx.data_opt::<Actor>()?;
        (actor.is(&self.id) || actor.is_admin()).then(|| self.email.clone())
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "User";
    const UNIQUE_FIELDS: &'static [&'static str] = &["username"];

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for UserProfile {
    const COLLECTION: &'static str = "user_profiles";
    const NAME: &'static str = "UserProfile";
    const UNIQUE_FIELDS: &'static [&'static str] = &["userId"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl Indexable for UserProfile {
    const SEARCH_TYPE: &'static str = "profile";

    fn search_title(&self) -> String {
        self.display_name.clone()
    }

    fn search_body(&self) -> String {
        [&self.headline, &self.bio, &self.location]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/profile/{}", self.user_id))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, InputObject)]
pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub display_name: String,
}

impl Validate for RegisterUserInput {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("username", &self.username)
                    .rule(Required)
                    .rule(MinLength(3))
                    .rule(MaxLength(32))
                    .rule(Slug),
            )
            .field(validate_field("email", &self.email).rule(Required).rule(Email))
            .field(
                validate_field("displayName", &self.display_name)
                    .rule(Required)
                    .rule(MaxLength(MAX_TITLE_LENGTH)),
            )
            .result()
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateProfileInput {
    /// Defaults to the caller. Only admins may create profiles for others.
    pub user_id: Option<String>,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
}

impl Validate for UserProfile {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(
                validate_field("displayName", &self.display_name)
                    .rule(Required)
                    .rule(MaxLength(MAX_TITLE_LENGTH)),
            )
            .field(validate_field("headline", &self.headline).rule(MaxLength(MAX_SHORT_TEXT_LENGTH)))
            .field(validate_field("bio", &self.bio).rule(MaxLength(MAX_BODY_LENGTH)))
            .field(validate_field("avatarUrl", &self.avatar_url).rule(Url))
            .field(validate_field("websiteUrl", &self.website_url).rule(Url))
            .field(validate_field("location", &self.location).rule(MaxLength(MAX_TITLE_LENGTH)))
            .result()
    }
}

impl UserProfile {
    pub(crate) fn apply(&mut self, input: UpdateProfileInput) {
        if let Some(display_name) = input.display_name {
            self.display_name = display_name;
        }
        if input.headline.is_some() {
            self.headline = input.headline;
        }
        if input.bio.is_some() {
            self.bio = input.bio;
        }
        if input.avatar_url.is_some() {
            self.avatar_url = input.avatar_url;
        }
        if input.website_url.is_some() {
            self.website_url = input.website_url;
        }
        if input.location.is_some() {
            self.location = input.location;
        }
        self.updated_at = crate::store::iso::now();
    }
}
