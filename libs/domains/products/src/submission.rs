//! Request body of product creation: plain JSON, or multipart with a `data`
//! JSON part and any number of `images` file parts.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ValidatedJson};
use media::UploadFile;
use validator::Validate;

use crate::models::CreateProduct;

const DATA_PART: &str = "data";
const IMAGES_PART: &str = "images";

pub struct ProductSubmission {
    pub input: CreateProduct,
    pub files: Vec<UploadFile>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for ProductSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let ValidatedJson(input) = ValidatedJson::<CreateProduct>::from_request(req, state).await?;
            return Ok(Self {
                input,
                files: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        read_multipart(multipart)
            .await
            .map_err(IntoResponse::into_response)
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProductSubmission, AppError> {
    let mut input: Option<CreateProduct> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            DATA_PART => {
                let text = field.text().await?;
                let parsed = serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("Invalid JSON in '{DATA_PART}' part: {e}"))
                })?;
                input = Some(parsed);
            }
            IMAGES_PART | "images[]" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() {
                    continue;
                }

                let mut file = UploadFile::new(file_name, bytes.to_vec());
                if let Some(content_type) = content_type {
                    file = file.with_content_type(content_type);
                }
                files.push(file);
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let input = input.ok_or_else(|| {
        AppError::BadRequest(format!("Multipart body is missing the '{DATA_PART}' part"))
    })?;
    input.validate()?;

    Ok(ProductSubmission { input, files })
}
