/// Connection-level database error
///
/// Raised while establishing or probing a connection. Per-document failures
/// use [`crate::mongodb::DocumentError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver error surfaced while connecting
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for connection-level operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
