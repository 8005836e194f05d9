//! Categories API routes

use axum::Router;
use domain_categories::{CategoryService, MongoCategoryRepository, handlers};

use crate::state::AppState;

pub fn repository(state: &AppState) -> MongoCategoryRepository {
    MongoCategoryRepository::new(&state.db)
        .with_bulk_batch_size(state.config.catalog.bulk_batch_size)
}

/// Create categories router
pub fn router(state: &AppState) -> Router {
    handlers::router(CategoryService::new(repository(state)))
}

/// Initialize categories indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}
