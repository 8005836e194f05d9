//! Application state management

use media::{CloudinaryUploader, DisabledUploader, MediaUploader};
use mongodb::{Client, Database};
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo_client: Client,
    pub db: Database,
    pub uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client, db: Database) -> Self {
        let uploader = uploader_for(&config);
        Self {
            config,
            mongo_client,
            db,
            uploader,
        }
    }
}

/// Cloudinary when credentials are present, otherwise uploads answer 503.
fn uploader_for(config: &Config) -> Arc<dyn MediaUploader> {
    match &config.cloudinary {
        Some(cloudinary) => Arc::new(CloudinaryUploader::new(cloudinary.clone())),
        None => {
            warn!("CLOUDINARY_* not set, multipart image uploads are disabled");
            Arc::new(DisabledUploader)
        }
    }
}
