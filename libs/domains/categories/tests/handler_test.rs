//! Handler tests for the Categories domain
//!
//! Routes run against an in-memory repository so request parsing, status
//! codes and error bodies can be checked without a database.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_categories::*;
use http_body_util::BodyExt;
use std::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct InMemoryCategories {
    rows: Mutex<Vec<Category>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn create(&self, mut category: Category) -> CategoryResult<Category> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.name == category.name || c.slug == category.slug) {
            return Err(CategoryError::Duplicate(category.name));
        }
        category.id = Uuid::now_v7();
        rows.push(category.clone());
        Ok(category)
    }

    async fn bulk_create(&self, categories: Vec<Category>) -> CategoryResult<Vec<Category>> {
        let mut created = Vec::new();
        for category in categories {
            if let Ok(c) = self.create(category).await {
                created.push(c);
            }
        }
        Ok(created)
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Category> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(CategoryError::NotFound(id))
    }

    async fn find_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| CategoryError::SlugNotFound(slug.to_string()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> CategoryResult<Vec<Category>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CategoryError::NotFound(id))?;
        if let Some(slug) = input.slug() {
            row.slug = slug;
        }
        if let Some(name) = input.name {
            row.name = name;
        }
        if let Some(description) = input.description {
            row.description = description;
        }
        if let Some(is_active) = input.is_active {
            row.is_active = is_active;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(CategoryError::NotFound(id));
        }
        Ok(true)
    }
}

fn app() -> axum::Router {
    handlers::router(CategoryService::new(InMemoryCategories::default()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_category_returns_201_with_slug() {
    let response = app()
        .oneshot(post_json(
            "/",
            serde_json::json!({ "name": "Running Shoes", "description": "Road and trail" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let category: Category = json_body(response.into_body()).await;
    assert_eq!(category.slug, "running-shoes");
    assert!(category.is_active);
}

#[tokio::test]
async fn test_accented_name_gets_ascii_slug() {
    let response = app()
        .oneshot(post_json("/", serde_json::json!({ "name": "Café Crème" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let category: Category = json_body(response.into_body()).await;
    assert_eq!(category.name, "Café Crème");
    assert_eq!(category.slug, "cafe-creme");
}

#[tokio::test]
async fn test_create_category_validates_input() {
    let response = app()
        .oneshot(post_json("/", serde_json::json!({ "name": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_category_returns_409() {
    let app = app();
    let first = app
        .clone()
        .oneshot(post_json("/", serde_json::json!({ "name": "Shoes" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json("/", serde_json::json!({ "name": "Shoes" })))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bulk_create_skips_rejected_entries() {
    let response = app()
        .oneshot(post_json(
            "/bulk",
            serde_json::json!([{ "name": "Shoes" }, { "name": "Hats" }, { "name": "shoes" }]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Vec<Category> = json_body(response.into_body()).await;
    let slugs: Vec<_> = created.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, ["shoes", "hats"]);
}

#[tokio::test]
async fn test_get_by_slug_and_unknown_slug() {
    let app = app();
    app.clone()
        .oneshot(post_json("/", serde_json::json!({ "name": "Kids & Baby" })))
        .await
        .unwrap();

    let found = app
        .clone()
        .oneshot(Request::get("/slug/kids-baby").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let category: Category = json_body(found.into_body()).await;
    assert_eq!(category.name, "Kids & Baby");

    let missing = app
        .oneshot(Request::get("/slug/garden").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = json_body(missing.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "Category with slug 'garden' not found");
}

#[tokio::test]
async fn test_rename_regenerates_slug() {
    let app = app();
    let created = app
        .clone()
        .oneshot(post_json("/", serde_json::json!({ "name": "Shoes" })))
        .await
        .unwrap();
    let category: Category = json_body(created.into_body()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/{}", category.id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Trail Shoes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Category = json_body(response.into_body()).await;
    assert_eq!(updated.slug, "trail-shoes");
}

#[tokio::test]
async fn test_delete_missing_category_returns_404() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_uuid_returns_400() {
    let response = app()
        .oneshot(Request::get("/not-a-uuid").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
