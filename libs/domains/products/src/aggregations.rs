//! Aggregation pipelines for listings and category facets, and decoders
//! for their result documents.

use database::mongodb::{DocumentResult, decode_document, uuid_bson};
use domain_categories::CategorySummary;
use mongodb::bson::{Bson, Document, doc};
use uuid::Uuid;

use crate::models::{PriceRange, Product, ProductView};
use crate::query::{ProductQuery, SCORE_FIELD};

const CATEGORY_DATA_FIELD: &str = "categoryData";

fn active_in(category_id: Uuid) -> Document {
    doc! { "$match": { "categoryId": uuid_bson(category_id), "isActive": true } }
}

/// Min and max price over the category's active products.
pub fn price_range_pipeline(category_id: Uuid) -> Vec<Document> {
    vec![
        active_in(category_id),
        doc! {
            "$group": {
                "_id": Bson::Null,
                "min": { "$min": "$price" },
                "max": { "$max": "$price" },
            }
        },
    ]
}

/// Distinct tags over the category's active products.
pub fn category_tags_pipeline(category_id: Uuid) -> Vec<Document> {
    vec![
        active_in(category_id),
        doc! { "$unwind": "$tags" },
        doc! { "$group": { "_id": "$tags" } },
        doc! { "$project": { "_id": 0, "tag": "$_id" } },
    ]
}

/// One page of products with their category's name and slug joined in.
pub fn page_pipeline(query: &ProductQuery) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": query.filter.clone() }];

    if query.text_score {
        pipeline.push(doc! { "$addFields": { SCORE_FIELD: { "$meta": "textScore" } } });
    }

    pipeline.extend([
        doc! { "$sort": query.sort.clone() },
        doc! { "$skip": to_i64(query.skip) },
        doc! { "$limit": to_i64(query.limit) },
        doc! {
            "$lookup": {
                "from": "categories",
                "localField": "categoryId",
                "foreignField": "_id",
                "pipeline": [ { "$project": { "_id": 0, "name": 1, "slug": 1 } } ],
                "as": CATEGORY_DATA_FIELD,
            }
        },
        doc! { "$addFields": { CATEGORY_DATA_FIELD: { "$first": "$categoryData" } } },
    ]);

    pipeline
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn as_f64(value: Option<&Bson>) -> Option<f64> {
    match value? {
        Bson::Double(n) => Some(*n),
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        _ => None,
    }
}

/// Price range from the `$group` output; an empty category is `{0, 0}`.
pub fn price_range_from(rows: &[Document]) -> PriceRange {
    rows.first()
        .map(|row| PriceRange {
            min: as_f64(row.get("min")).unwrap_or(0.0),
            max: as_f64(row.get("max")).unwrap_or(0.0),
        })
        .unwrap_or_default()
}

/// Tag names from the `$project` output, sorted and deduplicated.
pub fn tags_from(rows: &[Document]) -> Vec<String> {
    let mut tags: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get_str("tag").ok())
        .map(str::to_string)
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Split a listing row into the stored product, its joined category and score.
pub fn product_view_from(mut row: Document) -> DocumentResult<ProductView> {
    let category_data = match row.remove(CATEGORY_DATA_FIELD) {
        Some(Bson::Document(category)) => Some(decode_document::<CategorySummary>(&category)?),
        _ => None,
    };
    let score = as_f64(row.remove(SCORE_FIELD).as_ref());
    let product: Product = decode_document(&row)?;

    Ok(ProductView {
        product,
        category_data,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ProductFilter;
    use chrono::Utc;
    use domain_categories::Category;

    fn category() -> Category {
        Category {
            id: Uuid::now_v7(),
            name: "Shoes".into(),
            slug: "shoes".into(),
            description: String::new(),
            image: None,
            parent_category: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stage_names(pipeline: &[Document]) -> Vec<&str> {
        pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().map(String::as_str))
            .collect()
    }

    #[test]
    fn test_price_range_pipeline_shape() {
        let id = Uuid::now_v7();
        let pipeline = price_range_pipeline(id);
        assert_eq!(stage_names(&pipeline), ["$match", "$group"]);
        assert_eq!(
            pipeline[0],
            doc! { "$match": { "categoryId": uuid_bson(id), "isActive": true } }
        );
    }

    #[test]
    fn test_tags_pipeline_shape() {
        let pipeline = category_tags_pipeline(Uuid::now_v7());
        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$unwind", "$group", "$project"]
        );
    }

    #[test]
    fn test_page_pipeline_without_search() {
        let query = ProductQuery::compile(&category(), &ProductFilter::default());
        let pipeline = page_pipeline(&query);
        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$sort", "$skip", "$limit", "$lookup", "$addFields"]
        );
        assert_eq!(pipeline[2], doc! { "$skip": 0_i64 });
        assert_eq!(pipeline[3], doc! { "$limit": 12_i64 });
    }

    #[test]
    fn test_page_pipeline_projects_score_for_search() {
        let filter = ProductFilter::from_pairs([("search", "trail"), ("sortBy", "relevance")]).unwrap();
        let query = ProductQuery::compile(&category(), &filter);
        let pipeline = page_pipeline(&query);
        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$addFields", "$sort", "$skip", "$limit", "$lookup", "$addFields"]
        );
    }

    #[test]
    fn test_empty_price_range_is_zero() {
        assert_eq!(price_range_from(&[]), PriceRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_price_range_accepts_integer_prices() {
        let rows = vec![doc! { "_id": Bson::Null, "min": 20, "max": 80.5 }];
        assert_eq!(price_range_from(&rows), PriceRange { min: 20.0, max: 80.5 });
    }

    #[test]
    fn test_tags_are_distinct() {
        let rows = vec![
            doc! { "tag": "trail" },
            doc! { "tag": "running" },
            doc! { "tag": "trail" },
        ];
        assert_eq!(tags_from(&rows), vec!["running", "trail"]);
    }

    #[test]
    fn test_product_view_from_row() {
        let id = Uuid::now_v7();
        let category_id = Uuid::now_v7();
        let stored = mongodb::bson::DateTime::from_millis(1_700_000_000_120);
        let row = doc! {
            "_id": uuid_bson(id),
            "name": "Trail Runner",
            "description": "",
            "price": 50.0,
            "images": [],
            "categoryId": uuid_bson(category_id),
            "inventory": 3_i64,
            "sku": "TR-1",
            "tags": ["trail"],
            "attributes": [ { "key": "color", "value": "red" } ],
            "isActive": true,
            "createdAt": stored,
            "updatedAt": stored,
            "score": 1.5,
            "categoryData": { "name": "Shoes", "slug": "shoes" },
        };

        let view = product_view_from(row).unwrap();
        assert_eq!(view.product.id, id);
        assert_eq!(view.product.category_id, category_id);
        assert_eq!(view.product.attributes.get("color"), Some("red"));
        assert_eq!(view.score, Some(1.5));
        assert_eq!(view.product.created_at.timestamp_millis(), 1_700_000_000_120);
        assert_eq!(view.category_data.unwrap().slug, "shoes");
    }

    #[test]
    fn test_product_view_without_join() {
        let now = Utc::now().to_rfc3339();
        let row = doc! {
            "_id": uuid_bson(Uuid::now_v7()),
            "name": "Orphan",
            "price": 5,
            "categoryId": uuid_bson(Uuid::now_v7()),
            "createdAt": now.clone(),
            "updatedAt": now,
        };

        let view = product_view_from(row).unwrap();
        assert!(view.category_data.is_none());
        assert!(view.score.is_none());
        assert_eq!(view.product.price, 5.0);
    }
}
