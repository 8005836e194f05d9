//! Categories Domain
//!
//! Categories group products and give them a URL-addressable slug. Product
//! listings resolve a slug through [`CategoryService::get_by_slug`] and
//! product writes check references with [`CategoryService::ensure_exist`].
//!
//! ```rust,no_run
//! use domain_categories::{handlers, CategoryService, MongoCategoryRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let repository = MongoCategoryRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(CategoryService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
mod slug;

pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use models::{Category, CategorySummary, CreateCategory, UpdateCategory};
pub use mongodb::MongoCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
pub use slug::slugify;
