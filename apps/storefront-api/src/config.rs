//! Configuration for the Storefront API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::mongodb::{DEFAULT_BULK_BATCH_SIZE, MongoConfig};
use media::CloudinaryConfig;

pub use core_config::Environment;

/// Catalog tuning knobs
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Documents per `insertMany` call during bulk uploads
    pub bulk_batch_size: usize,
}

impl FromEnv for CatalogConfig {
    /// `BULK_UPLOAD_BATCH_SIZE` (default: 5000, must be positive)
    fn from_env() -> Result<Self, ConfigError> {
        let bulk_batch_size = env_parse_or("BULK_UPLOAD_BATCH_SIZE", DEFAULT_BULK_BATCH_SIZE)?;
        if bulk_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "BULK_UPLOAD_BATCH_SIZE".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { bulk_batch_size })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub catalog: CatalogConfig,
    /// `None` disables image uploads
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let cloudinary = match std::env::var("CLOUDINARY_CLOUD_NAME") {
            Ok(_) => Some(CloudinaryConfig::from_env()?),
            Err(_) => None,
        };

        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME")),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            catalog: CatalogConfig::from_env()?,
            cloudinary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_cloudinary() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", None),
                ("BULK_UPLOAD_BATCH_SIZE", None),
                ("CLOUDINARY_CLOUD_NAME", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.catalog.bulk_batch_size, 5000);
                assert_eq!(config.mongodb.database, "storefront");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("storefront_api"));
                assert!(config.cloudinary.is_none());
            },
        );
    }

    #[test]
    fn test_cloudinary_requires_every_credential() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("CLOUDINARY_CLOUD_NAME", Some("demo")),
                ("CLOUDINARY_API_KEY", Some("key")),
                ("CLOUDINARY_API_SECRET", None),
            ],
            || assert!(Config::from_env().is_err()),
        );
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        temp_env::with_var("BULK_UPLOAD_BATCH_SIZE", Some("0"), || {
            let err = CatalogConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("BULK_UPLOAD_BATCH_SIZE"));
        });
    }

    #[test]
    fn test_batch_size_from_env() {
        temp_env::with_var("BULK_UPLOAD_BATCH_SIZE", Some("250"), || {
            assert_eq!(CatalogConfig::from_env().unwrap().bulk_batch_size, 250);
        });
    }
}
