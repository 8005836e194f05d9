use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media uploads are not configured")]
    NotConfigured,

    #[error("Upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

pub type MediaResult<T> = Result<T, MediaError>;
