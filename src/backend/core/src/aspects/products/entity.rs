use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;
use crate::search::Indexable;
use crate::store::iso;
use crate::validation::{
    validate_field, validate_request, MaxItems, MaxLength, Required, Slug, Url, Validate,
    ValidationResult, ValidationRule, MAX_BODY_LENGTH, MAX_SHORT_TEXT_LENGTH, MAX_TITLE_LENGTH,
};

/// Most tags a product may carry.
pub const MAX_TAGS: usize = 10;

const MAX_TAG_LENGTH: usize = 32;

/// Moderation state of a product or review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub website_url: String,
    pub logo_url: Option<String>,
    pub category_id: Option<String>,
    pub owner_id: String,
    pub tags: Vec<String>,
    pub status: SubmissionStatus,
    #[serde(with = "crate::store::iso")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::store::iso")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for ProductCategory {
    const COLLECTION: &'static str = "product_categories";
    const NAME: &'static str = "ProductCategory";
    const UNIQUE_FIELDS: &'static [&'static str] = &["slug"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const NAME: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Indexable for Product {
    const SEARCH_TYPE: &'static str = "product";

    fn search_title(&self) -> String {
        self.name.clone()
    }

    fn search_body(&self) -> String {
        format!("{}\n{}\n{}", self.tagline, self.description, self.tags.join(" "))
    }

    fn search_url(&self) -> Option<String> {
        Some(format!("/products/{}", self.id))
    }
}

/// Lowercased, trimmed tags without blanks or repeats.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

impl Validate for Product {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(MAX_TITLE_LENGTH)))
            .field(
                validate_field("tagline", &self.tagline)
                    .rule(Required)
                    .rule(MaxLength(MAX_SHORT_TEXT_LENGTH)),
            )
            .field(
                validate_field("description", &self.description)
                    .rule(Required)
                    .rule(MaxLength(MAX_BODY_LENGTH)),
            )
            .field(validate_field("websiteUrl", &self.website_url).rule(Required).rule(Url))
            .field(validate_field("logoUrl", &self.logo_url).rule(Url))
            .field(
                validate_field("tags", &self.tags)
                    .rule(MaxItems(MAX_TAGS))
                    .custom(|tags: &Vec<String>| {
                        tags.iter().find_map(|tag| {
                            ValidationRule::<String>::validate(&Slug, tag)
                                .or_else(|| ValidationRule::<String>::validate(&MaxLength(MAX_TAG_LENGTH), tag))
                        })
                    }),
            )
            .result()
    }
}

impl Validate for ProductCategory {
    fn validate(&self) -> ValidationResult<()> {
        validate_request()
            .field(validate_field("name", &self.name).rule(Required).rule(MaxLength(MAX_TITLE_LENGTH)))
            .field(
                validate_field("slug", &self.slug)
                    .rule(Required)
                    .rule(MaxLength(MAX_TITLE_LENGTH))
                    .rule(Slug),
            )
            .field(validate_field("description", &self.description).rule(MaxLength(MAX_BODY_LENGTH)))
            .result()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateProductInput {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub website_url: String,
    pub logo_url: Option<String>,
    pub category_id: Option<String>,
    #[graphql(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Narrows `listProducts`. Unset fields match everything.
#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub owner_id: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl Product {
    pub(crate) fn apply(&mut self, input: UpdateProductInput) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(tagline) = input.tagline {
            self.tagline = tagline.trim().to_string();
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(website_url) = input.website_url {
            self.website_url = website_url.trim().to_string();
        }
        if input.logo_url.is_some() {
            self.logo_url = input.logo_url;
        }
        if input.category_id.is_some() {
            self.category_id = input.category_id;
        }
        if let Some(tags) = input.tags {
            self.tags = normalize_tags(tags);
        }
        self.updated_at = iso::now();
    }
}

impl ProductCategory {
    pub(crate) fn apply(&mut self, input: UpdateCategoryInput) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = input.slug {
            self.slug = slug.trim().to_string();
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        self.updated_at = iso::now();
    }
}
