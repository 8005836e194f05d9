//! MongoDB connector, health check and the generic document repository.

pub mod bson_datetime;
pub mod bulk;
mod config;
mod connector;
mod health;
pub mod repository;

pub use bulk::{DEFAULT_BULK_BATCH_SIZE, insert_in_batches};
pub use config::MongoConfig;
pub use connector::{client_options, connect_from_config, connect_with_retry};
pub use health::{HealthStatus, check_health};
pub use repository::{
    DocumentError, DocumentResult, MongoDocument, MongoRepository, UPDATED_AT_FIELD,
    decode_document, encode_document, id_filter, uuid_bson,
};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
