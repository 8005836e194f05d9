//! Storefront API - catalog REST server

use axum_helpers::{cors_layer_from_env, create_router, health_router, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use database::mongodb::connect_with_retry;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database, "Connecting to MongoDB");
    let mongo_client = connect_with_retry(&config.mongodb, &RetryConfig::default()).await?;
    let db = mongo_client.database(&config.mongodb.database);

    let state = AppState::new(config, mongo_client, db);

    api::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), cors_layer_from_env()?)
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(
        port = state.config.server.port,
        uploader = state.uploader.name(),
        "Starting Storefront API"
    );

    let server_config = state.config.server.clone();
    serve(router, &server_config, async move {
        info!("Shutting down: closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await?;

    info!("Storefront API shutdown complete");
    Ok(())
}
