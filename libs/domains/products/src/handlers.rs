//! HTTP handlers for Products API
//!
//! Routes are mounted at the API root: product CRUD under `/products` and
//! category listings under `/category`.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
        UploadFailedResponse,
    },
};
use domain_categories::{CategoryRepository, CategorySummary};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::filter::ProductFilter;
use crate::models::{
    AttributeEntry, CategoryFacets, CategoryProducts, CategoryProductsRequest, CategoryRef,
    CreateProduct, Pagination, PriceRange, Product, ProductView, SortBy, SortOrder,
    UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::submission::ProductSubmission;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_category_products,
        products_by_category,
        list_products,
        create_product,
        bulk_upload,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, ProductView, CreateProduct, UpdateProduct, CategoryRef,
            AttributeEntry, CategoryProducts, CategoryFacets, CategoryProductsRequest,
            CategorySummary, Pagination, PriceRange, SortBy, SortOrder
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UploadFailedResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Catalog", description = "Filtered category listings")
    )
)]
pub struct ApiDoc;

type SharedService<R, C> = State<Arc<ProductService<R, C>>>;

/// Create the products router with all HTTP endpoints
pub fn router<R, C>(service: ProductService<R, C>) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/category/products", post(products_by_category))
        .route("/category/{slug}", get(list_category_products))
        .route("/products", get(list_products).post(create_product))
        .route("/products/bulk-upload", post(bulk_upload))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Filtered, paginated products of one category
///
/// `filters` carries category-wide facets that ignore the active filter.
#[utoipa::path(
    get,
    path = "/category/{slug}",
    tag = "Catalog",
    params(
        ("slug" = String, Path, description = "Category slug"),
        ("minPrice" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("maxPrice" = Option<f64>, Query, description = "Inclusive upper price bound"),
        ("tags" = Option<String>, Query, description = "Comma-separated or repeated; matches any"),
        ("inStock" = Option<bool>, Query, description = "true: inventory > 0, false: inventory <= 0"),
        ("search" = Option<String>, Query, description = "Full-text search"),
        ("sortBy" = Option<SortBy>, Query, description = "Sort key (default createdAt)"),
        ("sortOrder" = Option<SortOrder>, Query, description = "Sort direction (default desc)"),
        ("page" = Option<u64>, Query, description = "1-based page (default 1)"),
        ("limit" = Option<u64>, Query, description = "Page size (default 12, max 100)"),
        ("attributes[key]" = Option<String>, Query, description = "Exact attribute match, e.g. attributes[color]=red")
    ),
    responses(
        (status = 200, description = "Products and facets", body = CategoryProducts),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_category_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    Path(slug): Path<String>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CategoryProducts>, AppError> {
    let Query(pairs) = query?;
    let filter = ProductFilter::from_pairs(pairs).map_err(crate::ProductError::from)?;
    let listing = service.find_by_category_slug(&slug, &filter).await?;
    Ok(Json(listing))
}

/// All products referencing a category id
#[utoipa::path(
    post,
    path = "/category/products",
    tag = "Catalog",
    request_body = CategoryProductsRequest,
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    body: Result<Json<CategoryProductsRequest>, JsonRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Json(request) = body?;
    let products = service.list_by_category(request.category).await?;
    Ok(Json(products))
}

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
///
/// Accepts `application/json`, or `multipart/form-data` with the product
/// JSON in a `data` part and image files in `images` parts. Uploaded
/// image URLs replace `images` from the JSON.
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 502, response = UploadFailedResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    ProductSubmission { input, files }: ProductSubmission,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input, files).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Create many products at once
///
/// Every referenced category must exist. Products rejected by the store
/// (e.g. duplicate names) are left out of the response.
#[utoipa::path(
    post,
    path = "/products/bulk-upload",
    tag = "Products",
    request_body = Vec<CreateProduct>,
    responses(
        (status = 201, description = "Products created", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn bulk_upload<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    body: Result<Json<Vec<CreateProduct>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(inputs) = body?;
    let products = service.create_products(inputs).await?;
    Ok((StatusCode::CREATED, Json(products)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository, C: CategoryRepository>(
    State(service): SharedService<R, C>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
