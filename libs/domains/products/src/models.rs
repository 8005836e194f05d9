use chrono::{DateTime, Utc};
use domain_categories::CategorySummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn default_active() -> bool {
    true
}

/// One product specification, e.g. `{"key": "color", "value": "red"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeEntry {
    pub key: String,
    pub value: String,
}

/// Scalar accepted as an attribute value; stored as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<AttributeValue> for String {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Text(s) => s,
            AttributeValue::Integer(n) => n.to_string(),
            AttributeValue::Float(n) => n.to_string(),
            AttributeValue::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    key: String,
    value: AttributeValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttributesRepr {
    Entries(Vec<RawEntry>),
    Map(BTreeMap<String, AttributeValue>),
}

/// Product specifications as key/value pairs.
///
/// Serialized as a list of [`AttributeEntry`] so the text index can weigh
/// keys and values separately; accepts either that list or a plain JSON
/// object on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttributesRepr", into = "Vec<AttributeEntry>")]
pub struct ProductAttributes(BTreeMap<String, String>);

impl ProductAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<AttributesRepr> for ProductAttributes {
    fn from(repr: AttributesRepr) -> Self {
        match repr {
            AttributesRepr::Entries(entries) => entries
                .into_iter()
                .map(|e| (e.key, String::from(e.value)))
                .collect(),
            AttributesRepr::Map(map) => map
                .into_iter()
                .map(|(k, v)| (k, String::from(v)))
                .collect(),
        }
    }
}

impl From<ProductAttributes> for Vec<AttributeEntry> {
    fn from(attributes: ProductAttributes) -> Self {
        attributes
            .0
            .into_iter()
            .map(|(key, value)| AttributeEntry { key, value })
            .collect()
    }
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Product name (unique)
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: Uuid,
    /// Units on hand; zero or less means out of stock
    #[serde(default)]
    pub inventory: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Vec<AttributeEntry>)]
    pub attributes: ProductAttributes,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "database::mongodb::bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "database::mongodb::bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from the create DTO. The id is assigned on insert.
    ///
    /// Non-empty `uploaded` image URLs replace the DTO's own list.
    pub fn new(input: CreateProduct, uploaded: Vec<String>) -> Self {
        let now = Utc::now();
        let images = if uploaded.is_empty() {
            input.images
        } else {
            uploaded
        };

        Self {
            id: Uuid::nil(),
            name: input.name,
            description: input.description,
            price: input.price,
            images,
            category_id: input.category.id,
            inventory: input.inventory,
            sku: input.sku,
            tags: input.tags,
            attributes: input.attributes,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.inventory > 0
    }
}

/// Reference to the owning category, `{"_id": "..."}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Image URLs; replaced by uploaded files when any are sent
    #[serde(default)]
    pub images: Vec<String>,
    pub category: CategoryRef,
    #[serde(default)]
    pub inventory: i64,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: ProductAttributes,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// DTO for updating an existing product
///
/// Only the fields present are written; `category` moves the product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing)]
    pub category: Option<CategoryRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<ProductAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateProduct {
    pub fn category_id(&self) -> Option<Uuid> {
        self.category.map(|c| c.id)
    }
}

/// Body of `POST /category/products`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryProductsRequest {
    /// Category id
    pub category: Uuid,
}

/// Listing sort key
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum SortBy {
    Price,
    Name,
    #[default]
    CreatedAt,
    Popularity,
    /// Text score; only meaningful together with `search`
    Relevance,
}

impl SortBy {
    /// Stored field this key sorts on.
    pub fn field(self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Name => "name",
            SortBy::CreatedAt | SortBy::Relevance => "createdAt",
            SortBy::Popularity => "popularity",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Product as listed: the stored fields plus the joined category and,
/// for text searches, the relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_data: Option<CategorySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Lowest and highest active price in a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Category-wide facets; never narrowed by the active filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFacets {
    /// Category display name
    pub category: String,
    pub price_range: PriceRange,
    pub available_tags: Vec<String>,
}

/// Response of the filtered category listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryProducts {
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
    pub filters: CategoryFacets,
}
