use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::slug::slugify;

fn default_active() -> bool {
    true
}

/// Category entity - a named product grouping addressed by its slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Display name (unique)
    pub name: String,
    /// URL identifier derived from the name (unique)
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Parent category; stored, never traversed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "database::mongodb::bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a new category from the create DTO. The id is assigned on insert.
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            image: input.image,
            parent_category: input.parent_category,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name and slug, as embedded in product listings.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Category fields joined onto products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub name: String,
    pub slug: String,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(url)]
    pub image: Option<String>,
    pub parent_category: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// DTO for updating an existing category
///
/// Only the fields present are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateCategory {
    /// Slug to store alongside a renamed category.
    pub fn slug(&self) -> Option<String> {
        self.name.as_deref().map(slugify)
    }
}
