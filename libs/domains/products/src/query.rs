//! Compiles a [`ProductFilter`] into the MongoDB match and sort documents
//! for one category listing. Pure; performs no I/O.

use database::mongodb::uuid_bson;
use domain_categories::Category;
use mongodb::bson::{Document, doc};

use crate::filter::ProductFilter;

/// Name of the text index over name, tags, description and attributes.
pub const TEXT_INDEX_NAME: &str = "product_search_index";

/// Field holding the text score in listing results.
pub const SCORE_FIELD: &str = "score";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Predicate over the products collection
    pub filter: Document,
    pub sort: Document,
    pub skip: u64,
    pub limit: u64,
    pub page: u64,
    /// Project the text score into each result
    pub text_score: bool,
}

impl ProductQuery {
    pub fn compile(category: &Category, filter: &ProductFilter) -> Self {
        let mut predicate = doc! {
            "categoryId": uuid_bson(category.id),
            "isActive": true,
        };

        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut price = Document::new();
            if let Some(min) = filter.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = filter.max_price {
                price.insert("$lte", max);
            }
            predicate.insert("price", price);
        }

        match filter.in_stock {
            Some(true) => {
                predicate.insert("inventory", doc! { "$gt": 0 });
            }
            Some(false) => {
                predicate.insert("inventory", doc! { "$lte": 0 });
            }
            None => {}
        }

        if !filter.tags.is_empty() {
            predicate.insert("tags", doc! { "$in": filter.tags.clone() });
        }

        if let Some(search) = &filter.search {
            predicate.insert("$text", doc! { "$search": search.as_str() });
        }

        if !filter.attributes.is_empty() {
            let all: Vec<Document> = filter
                .attributes
                .iter()
                .map(|(key, value)| {
                    doc! { "attributes": { "$elemMatch": { "key": key, "value": value } } }
                })
                .collect();
            predicate.insert("$and", all);
        }

        let sort = if filter.sorts_by_relevance() {
            doc! { SCORE_FIELD: { "$meta": "textScore" } }
        } else {
            doc! { filter.sort_by.field(): filter.sort_order.direction() }
        };

        Self {
            filter: predicate,
            sort,
            skip: filter.skip(),
            limit: filter.limit,
            page: filter.page,
            text_score: filter.search.is_some(),
        }
    }
}
