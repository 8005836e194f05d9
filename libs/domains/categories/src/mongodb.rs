//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use database::mongodb::{
    MongoDocument, MongoRepository, encode_document, id_filter, uuid_bson,
};
use mongodb::{
    Database, IndexModel,
    bson::{Bson, doc},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, UpdateCategory};
use crate::repository::CategoryRepository;

impl MongoDocument for Category {
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// MongoDB implementation of the CategoryRepository
#[derive(Clone)]
pub struct MongoCategoryRepository {
    store: MongoRepository<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            store: MongoRepository::new(db),
        }
    }

    /// Documents per `insert_many` call in bulk creates
    pub fn with_bulk_batch_size(mut self, size: usize) -> Self {
        self.store = self.store.with_bulk_batch_size(size);
        self
    }

    /// Unique `name` and `slug` indexes
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_name_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_slug_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        self.store
            .collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| CategoryError::Database(e.to_string()))?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create(&self, category: Category) -> CategoryResult<Category> {
        Ok(self.store.create(category).await?)
    }

    #[instrument(skip(self, categories), fields(count = categories.len()))]
    async fn bulk_create(&self, categories: Vec<Category>) -> CategoryResult<Vec<Category>> {
        Ok(self.store.bulk_create(categories).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        Ok(self.store.find(doc! {}).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Category> {
        self.store
            .find_one(id_filter(id))
            .await
            .map_err(|e| CategoryError::or_missing(e, CategoryError::NotFound(id)))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        self.store
            .find_one(doc! { "slug": slug })
            .await
            .map_err(|e| CategoryError::or_missing(e, CategoryError::SlugNotFound(slug.to_string())))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Uuid]) -> CategoryResult<Vec<Category>> {
        let ids: Vec<Bson> = ids.iter().copied().map(uuid_bson).collect();
        Ok(self.store.find(doc! { "_id": { "$in": ids } }).await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        let mut changes = encode_document(&input)?;
        if let Some(slug) = input.slug() {
            changes.insert("slug", slug);
        }

        self.store
            .update(id_filter(id), changes)
            .await
            .map_err(|e| CategoryError::or_missing(e, CategoryError::NotFound(id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        self.store
            .delete(id_filter(id))
            .await
            .map_err(|e| CategoryError::or_missing(e, CategoryError::NotFound(id)))
    }
}
