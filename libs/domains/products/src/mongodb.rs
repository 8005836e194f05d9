//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::{
    MongoDocument, MongoRepository, encode_document, id_filter, uuid_bson,
};
use mongodb::{
    Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::aggregations::{
    category_tags_pipeline, page_pipeline, price_range_from, price_range_pipeline,
    product_view_from, tags_from,
};
use crate::error::{ProductError, ProductResult};
use crate::models::{PriceRange, Product, ProductView, UpdateProduct};
use crate::query::{ProductQuery, TEXT_INDEX_NAME};
use crate::repository::ProductRepository;

impl MongoDocument for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    store: MongoRepository<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            store: MongoRepository::new(db),
        }
    }

    /// Documents per `insert_many` call in bulk uploads
    pub fn with_bulk_batch_size(mut self, size: usize) -> Self {
        self.store = self.store.with_bulk_batch_size(size);
        self
    }

    /// Initialize indexes for listing, faceting and text search
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Weighted text search
            IndexModel::builder()
                .keys(doc! {
                    "name": "text",
                    "tags": "text",
                    "description": "text",
                    "attributes.key": "text",
                    "attributes.value": "text",
                })
                .options(
                    IndexOptions::builder()
                        .name(TEXT_INDEX_NAME.to_string())
                        .weights(doc! {
                            "name": 10,
                            "tags": 5,
                            "description": 3,
                            "attributes.key": 2,
                            "attributes.value": 1,
                        })
                        .default_language("english".to_string())
                        .build(),
                )
                .build(),
            // Unique name index
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_name_unique".to_string())
                        .build(),
                )
                .build(),
            // Category listing with price bounds
            IndexModel::builder()
                .keys(doc! { "categoryId": 1, "price": 1, "isActive": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category_price_active".to_string())
                        .build(),
                )
                .build(),
            // Tag filters
            IndexModel::builder()
                .keys(doc! { "tags": 1, "isActive": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_tags_active".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "inventory": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_inventory".to_string())
                        .build(),
                )
                .build(),
            // Newest first
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.store
            .collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| ProductError::Database(e.to_string()))?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        Ok(self.store.create(product).await?)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn bulk_create(&self, products: Vec<Product>) -> ProductResult<Vec<Product>> {
        Ok(self.store.bulk_create(products).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self.store.find(doc! {}).await?)
    }

    #[instrument(skip(self))]
    async fn list_by_category(&self, category_id: Uuid) -> ProductResult<Vec<Product>> {
        Ok(self
            .store
            .find(doc! { "categoryId": uuid_bson(category_id) })
            .await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Product> {
        self.store
            .find_one(id_filter(id))
            .await
            .map_err(|e| ProductError::or_missing(e, ProductError::NotFound(id)))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut changes = encode_document(&input)?;
        if let Some(category_id) = input.category_id() {
            changes.insert("categoryId", uuid_bson(category_id));
        }

        self.store
            .update(id_filter(id), changes)
            .await
            .map_err(|e| ProductError::or_missing(e, ProductError::NotFound(id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        self.store
            .delete(id_filter(id))
            .await
            .map_err(|e| ProductError::or_missing(e, ProductError::NotFound(id)))
    }

    #[instrument(skip(self, query), fields(page = query.page, limit = query.limit))]
    async fn find_page(&self, query: &ProductQuery) -> ProductResult<Vec<ProductView>> {
        let rows = self.store.aggregate(page_pipeline(query)).await?;
        rows.into_iter()
            .map(|row| product_view_from(row).map_err(ProductError::from))
            .collect()
    }

    #[instrument(skip(self, query))]
    async fn count(&self, query: &ProductQuery) -> ProductResult<u64> {
        Ok(self.store.count_documents(query.filter.clone()).await?)
    }

    #[instrument(skip(self))]
    async fn price_range(&self, category_id: Uuid) -> ProductResult<PriceRange> {
        let rows = self.store.aggregate(price_range_pipeline(category_id)).await?;
        Ok(price_range_from(&rows))
    }

    #[instrument(skip(self))]
    async fn category_tags(&self, category_id: Uuid) -> ProductResult<Vec<String>> {
        let rows = self
            .store
            .aggregate(category_tags_pipeline(category_id))
            .await?;
        Ok(tags_from(&rows))
    }
}
