//! Media host integration: turns uploaded files into public URLs.
//!
//! [`MediaUploader`] is the seam the product service depends on;
//! [`CloudinaryUploader`] is the production implementation and
//! [`DisabledUploader`] stands in when no credentials are configured.

pub mod cloudinary;
pub mod error;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};
pub use error::{MediaError, MediaResult};

use async_trait::async_trait;

/// A file received from a client, held in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Store `file` under `folder` and return its public HTTPS URL.
    async fn upload(&self, file: UploadFile, folder: &str) -> MediaResult<String>;

    fn name(&self) -> &'static str;
}

/// Uploader used when no media host is configured; every upload fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledUploader;

#[async_trait]
impl MediaUploader for DisabledUploader {
    async fn upload(&self, file: UploadFile, _folder: &str) -> MediaResult<String> {
        tracing::warn!(file = %file.file_name, "Upload attempted without a configured media host");
        Err(MediaError::NotConfigured)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_uploader_always_fails() {
        let result = DisabledUploader
            .upload(UploadFile::new("a.png", vec![1, 2, 3]), "products")
            .await;
        assert!(matches!(result, Err(MediaError::NotConfigured)));
    }
}
