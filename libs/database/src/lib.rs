//! Database connectors and the shared document-store adapter.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector and [`mongodb::MongoRepository`]
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig, MongoRepository};
//! use database::common::RetryConfig;
//!
//! let config = MongoConfig::from_env()?;
//! let client = mongodb::connect_with_retry(&config, &RetryConfig::default()).await?;
//! let db = client.database(&config.database);
//! let products = MongoRepository::<Product>::new(&db).with_bulk_batch_size(5000);
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};

#[cfg(feature = "mongodb")]
pub use crate::mongodb::{DocumentError, DocumentResult, MongoDocument, MongoRepository};
