//! Listing filters parsed from the raw query string.
//!
//! Parsing works on the key/value pairs directly because `tags` may repeat
//! and attributes arrive as `attributes[color]=red` or `attributes.color=red`.

use std::str::FromStr;
use thiserror::Error;

use crate::models::{ProductAttributes, SortBy, SortOrder};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 12;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} must be a non-negative number, got '{value}'")]
    InvalidPrice { field: &'static str, value: String },

    #[error("{field} must be a positive integer, got '{value}'")]
    InvalidCount { field: &'static str, value: String },

    #[error("inStock must be true or false, got '{0}'")]
    InvalidBool(String),

    #[error("sortBy must be one of price, name, createdAt, popularity, relevance; got '{0}'")]
    InvalidSortBy(String),

    #[error("sortOrder must be asc or desc, got '{0}'")]
    InvalidSortOrder(String),

    #[error("attribute filters need a key, e.g. attributes[color]=red")]
    EmptyAttributeKey,
}

/// Request-scoped product filter
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Match-any tag list
    pub tags: Vec<String>,
    /// `None` leaves inventory unconstrained
    pub in_stock: Option<bool>,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: u64,
    pub limit: u64,
    /// Exact-match specification filters, all required
    pub attributes: ProductAttributes,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            tags: Vec::new(),
            in_stock: None,
            search: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            attributes: ProductAttributes::new(),
        }
    }
}

impl ProductFilter {
    /// Build a filter from query-string pairs. Unknown keys are ignored;
    /// for repeated scalar keys the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());

            match key {
                "minPrice" => filter.min_price = Some(parse_price("minPrice", value)?),
                "maxPrice" => filter.max_price = Some(parse_price("maxPrice", value)?),
                "tags" | "tags[]" => {
                    for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        if !filter.tags.iter().any(|t| t == tag) {
                            filter.tags.push(tag.to_string());
                        }
                    }
                }
                "inStock" => filter.in_stock = Some(parse_bool(value)?),
                "search" => {
                    filter.search = Some(value.to_string()).filter(|s| !s.is_empty());
                }
                "sortBy" => {
                    filter.sort_by = SortBy::from_str(value)
                        .map_err(|_| FilterError::InvalidSortBy(value.to_string()))?;
                }
                "sortOrder" => {
                    filter.sort_order = SortOrder::from_str(value)
                        .map_err(|_| FilterError::InvalidSortOrder(value.to_string()))?;
                }
                "page" => filter.page = parse_count("page", value)?,
                "limit" => filter.limit = parse_count("limit", value)?.min(MAX_LIMIT),
                other => {
                    if let Some(attribute) = attribute_key(other) {
                        if attribute.is_empty() {
                            return Err(FilterError::EmptyAttributeKey);
                        }
                        filter.attributes.insert(attribute, value);
                    }
                }
            }
        }

        Ok(filter)
    }

    /// Documents to skip before the requested page, saturating at the
    /// largest `$skip` the server accepts.
    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    /// Whether results are ordered by text score.
    pub fn sorts_by_relevance(&self) -> bool {
        self.search.is_some() && self.sort_by == SortBy::Relevance
    }
}

/// `attributes[color]` and `attributes.color` both name the `color` attribute.
fn attribute_key(key: &str) -> Option<&str> {
    if let Some(rest) = key.strip_prefix("attributes[") {
        return rest.strip_suffix(']');
    }
    key.strip_prefix("attributes.")
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, FilterError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(FilterError::InvalidPrice {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<u64, FilterError> {
    match value.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(FilterError::InvalidCount {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_bool(value: &str) -> Result<bool, FilterError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(FilterError::InvalidBool(value.to_string())),
    }
}
