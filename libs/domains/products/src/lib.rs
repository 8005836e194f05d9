//! Products Domain
//!
//! Product CRUD plus the filtered category listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, query-string parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, category checks, image upload, listing assembly
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! A listing request flows through [`filter::ProductFilter`] (query string),
//! [`query::ProductQuery::compile`] (match and sort documents) and the
//! pipelines in [`aggregations`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{CategoryService, MongoCategoryRepository};
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use media::DisabledUploader;
//! use mongodb::Client;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let categories = CategoryService::new(MongoCategoryRepository::new(&db));
//! let repository = MongoProductRepository::new(&db).with_bulk_batch_size(5000);
//! repository.init_indexes().await?;
//!
//! let service = ProductService::new(repository, categories, Arc::new(DisabledUploader));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod aggregations;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;
mod submission;

pub use error::{ProductError, ProductResult};
pub use filter::{FilterError, ProductFilter};
pub use handlers::ApiDoc;
pub use models::{
    AttributeEntry, CategoryFacets, CategoryProducts, CategoryRef, CreateProduct, Pagination,
    PriceRange, Product, ProductAttributes, ProductView, SortBy, SortOrder, UpdateProduct,
};
pub use mongodb::MongoProductRepository;
pub use query::ProductQuery;
pub use repository::ProductRepository;
pub use service::ProductService;
