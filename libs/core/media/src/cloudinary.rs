//! Cloudinary provider
//!
//! Signed uploads through the Cloudinary upload API with `resource_type` auto.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_required};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, instrument};

use crate::{MediaError, MediaResult, MediaUploader, UploadFile};

const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

impl FromEnv for CloudinaryConfig {
    /// Requires `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY` and `CLOUDINARY_API_SECRET`.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: env_required("CLOUDINARY_CLOUD_NAME")?,
            api_key: env_required("CLOUDINARY_API_KEY")?,
            api_secret: env_required("CLOUDINARY_API_SECRET")?,
        })
    }
}

pub struct CloudinaryUploader {
    config: CloudinaryConfig,
    api_base: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            api_base: CLOUDINARY_API_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Point the uploader at a different API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/auto/upload",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// SHA-256 request signature: signed params sorted by name, joined as
/// `k=v&k=v`, with the API secret appended.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    #[instrument(skip(self, file), fields(file = %file.file_name, size = file.bytes.len()))]
    async fn upload(&self, file: UploadFile, folder: &str) -> MediaResult<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!(folder, "Uploading file to Cloudinary");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            MediaError::UploadFailed(format!("unreadable response ({status}): {e}"))
        })?;

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            error!(status = %status, error = %message, "Cloudinary API error");
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        body.secure_url.ok_or_else(|| {
            error!("Cloudinary response carried no secure_url");
            MediaError::UploadFailed("response did not include secure_url".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    fn config() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn test_signature_is_order_independent() {
        let a = sign(&[("timestamp", "1700000000"), ("folder", "products")], "secret");
        let b = sign(&[("folder", "products"), ("timestamp", "1700000000")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sign(&[("folder", "products"), ("timestamp", "1700000000")], "other"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_config_from_env_requires_all_credentials() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("demo")),
                ("CLOUDINARY_API_KEY", Some("key")),
                ("CLOUDINARY_API_SECRET", None::<&str>),
            ],
            || {
                let err = CloudinaryConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("CLOUDINARY_API_SECRET"));
            },
        );
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let router = Router::new().route(
            "/demo/auto/upload",
            post(|| async { Json(json!({ "secure_url": "https://cdn.example.com/products/a.png" })) }),
        );
        let base = spawn(router).await;

        let uploader = CloudinaryUploader::new(config()).with_api_base(base);
        let url = uploader
            .upload(UploadFile::new("a.png", vec![0x89, 0x50]).with_content_type("image/png"), "products")
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/products/a.png");
    }

    #[tokio::test]
    async fn test_missing_secure_url_is_upload_failure() {
        let router = Router::new().route(
            "/demo/auto/upload",
            post(|| async { Json(json!({ "public_id": "products/a" })) }),
        );
        let base = spawn(router).await;

        let result = CloudinaryUploader::new(config())
            .with_api_base(base)
            .upload(UploadFile::new("a.png", vec![1]), "products")
            .await;

        assert!(matches!(result, Err(MediaError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_api_error_is_rejected() {
        let router = Router::new().route(
            "/demo/auto/upload",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": { "message": "Invalid Signature" } })),
                )
            }),
        );
        let base = spawn(router).await;

        let result = CloudinaryUploader::new(config())
            .with_api_base(base)
            .upload(UploadFile::new("a.png", vec![1]), "products")
            .await;

        match result {
            Err(MediaError::Rejected { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
