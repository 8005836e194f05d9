use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{PriceRange, Product, ProductView, UpdateProduct};
use crate::query::ProductQuery;

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product; the id is assigned by the store
    async fn create(&self, product: Product) -> ProductResult<Product>;

    /// Insert in unordered batches; products the store rejects are left out
    async fn bulk_create(&self, products: Vec<Product>) -> ProductResult<Vec<Product>>;

    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Every product in a category, active or not
    async fn list_by_category(&self, category_id: Uuid) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Product>;

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// One page of a compiled listing query
    async fn find_page(&self, query: &ProductQuery) -> ProductResult<Vec<ProductView>>;

    /// Total matches for a compiled listing query, ignoring paging
    async fn count(&self, query: &ProductQuery) -> ProductResult<u64>;

    /// Price range over the category's active products
    async fn price_range(&self, category_id: Uuid) -> ProductResult<PriceRange>;

    /// Distinct tags over the category's active products
    async fn category_tags(&self, category_id: Uuid) -> ProductResult<Vec<String>>;
}
