//! Products and catalog listing routes

use axum::Router;
use domain_categories::CategoryService;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

fn repository(state: &AppState) -> MongoProductRepository {
    MongoProductRepository::new(&state.db)
        .with_bulk_batch_size(state.config.catalog.bulk_batch_size)
}

/// Create products router, mounted at the API root
pub fn router(state: &AppState) -> Router {
    let service = ProductService::new(
        repository(state),
        CategoryService::new(super::categories::repository(state)),
        state.uploader.clone(),
    );
    handlers::router(service)
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}
