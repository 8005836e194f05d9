use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DocumentError;
use domain_categories::CategoryError;
use media::MediaError;
use thiserror::Error;
use uuid::Uuid;

use crate::filter::FilterError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Product already exists: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Image upload failed: {0}")]
    Upload(#[from] MediaError),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Use `missing` when the store reports no match, convert anything else.
    pub(crate) fn or_missing(err: DocumentError, missing: ProductError) -> Self {
        match err {
            DocumentError::NotFound { .. } => missing,
            other => other.into(),
        }
    }
}

impl From<DocumentError> for ProductError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Duplicate(msg) => ProductError::Duplicate(msg),
            other => ProductError::Database(other.to_string()),
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Category(err) => err.into(),
            ProductError::Duplicate(_) => {
                AppError::Conflict("Product with this name already exists".to_string())
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Filter(err) => AppError::BadRequest(err.to_string()),
            ProductError::Upload(MediaError::NotConfigured) => {
                AppError::ServiceUnavailable("Image uploads are not configured".to_string())
            }
            ProductError::Upload(err) => AppError::UploadFailed(err.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
