use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CategoryResult;
use crate::models::{Category, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category; the id is assigned by the store
    async fn create(&self, category: Category) -> CategoryResult<Category>;

    /// Insert many categories, skipping the ones the store rejects
    async fn bulk_create(&self, categories: Vec<Category>) -> CategoryResult<Vec<Category>>;

    async fn list(&self) -> CategoryResult<Vec<Category>>;

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Category>;

    /// Exact slug match
    async fn find_by_slug(&self, slug: &str) -> CategoryResult<Category>;

    /// Every category whose id is in `ids`
    async fn find_by_ids(&self, ids: &[Uuid]) -> CategoryResult<Vec<Category>>;

    /// Apply the present fields; a new name also rewrites the slug
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category>;

    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}
