use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::DocumentError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category {0} not found")]
    NotFound(Uuid),

    #[error("Category with slug '{0}' not found")]
    SlugNotFound(String),

    #[error("Category already exists: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl CategoryError {
    /// Use `missing` when the store reports no match, convert anything else.
    pub(crate) fn or_missing(err: DocumentError, missing: CategoryError) -> Self {
        match err {
            DocumentError::NotFound { .. } => missing,
            other => other.into(),
        }
    }
}

impl From<DocumentError> for CategoryError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Duplicate(msg) => CategoryError::Duplicate(msg),
            other => CategoryError::Database(other.to_string()),
        }
    }
}

/// Convert CategoryError to AppError for standardized error responses
impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) | CategoryError::SlugNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CategoryError::Duplicate(_) => {
                AppError::Conflict("Category with this name or slug already exists".to_string())
            }
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
