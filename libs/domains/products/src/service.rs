//! Product Service - Business logic layer

use domain_categories::{CategoryRepository, CategoryService};
use futures::future::try_join_all;
use media::{MediaUploader, UploadFile};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::filter::ProductFilter;
use crate::models::{
    CategoryFacets, CategoryProducts, CreateProduct, Pagination, Product, UpdateProduct,
};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;

/// Media host folder for product images
pub const PRODUCT_IMAGE_FOLDER: &str = "products";

/// Product service providing business logic operations
///
/// Category references are checked through [`CategoryService`]; uploaded
/// images go to the configured [`MediaUploader`].
pub struct ProductService<R: ProductRepository, C: CategoryRepository> {
    repository: Arc<R>,
    categories: CategoryService<C>,
    uploader: Arc<dyn MediaUploader>,
}

impl<R: ProductRepository, C: CategoryRepository> ProductService<R, C> {
    pub fn new(
        repository: R,
        categories: CategoryService<C>,
        uploader: Arc<dyn MediaUploader>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            categories,
            uploader,
        }
    }

    /// Category lookups shared with this service.
    pub fn categories(&self) -> &CategoryService<C> {
        &self.categories
    }

    fn validate(input: &impl Validate) -> ProductResult<()> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))
    }

    /// Create a product in an existing category
    ///
    /// `files` are uploaded first; when any were sent their URLs replace
    /// `input.images`.
    #[instrument(skip(self, input, files), fields(product_name = %input.name, files = files.len()))]
    pub async fn create_product(
        &self,
        input: CreateProduct,
        files: Vec<UploadFile>,
    ) -> ProductResult<Product> {
        Self::validate(&input)?;
        self.categories.get_category(input.category.id).await?;

        let uploaded = try_join_all(
            files
                .into_iter()
                .map(|file| self.uploader.upload(file, PRODUCT_IMAGE_FOLDER)),
        )
        .await?;

        if !uploaded.is_empty() {
            tracing::info!(count = uploaded.len(), uploader = self.uploader.name(), "Product images uploaded");
        }

        self.repository.create(Product::new(input, uploaded)).await
    }

    /// Create many products; every referenced category must exist
    ///
    /// Products the store rejects (e.g. duplicate names) are left out of the result.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn create_products(&self, inputs: Vec<CreateProduct>) -> ProductResult<Vec<Product>> {
        for (index, input) in inputs.iter().enumerate() {
            input
                .validate()
                .map_err(|e| ProductError::Validation(format!("product {index}: {e}")))?;
        }

        let category_ids: Vec<Uuid> = inputs.iter().map(|p| p.category.id).collect();
        self.categories.ensure_exist(&category_ids).await?;

        let products = inputs
            .into_iter()
            .map(|input| Product::new(input, Vec::new()))
            .collect();
        let created = self.repository.bulk_create(products).await?;

        tracing::info!(created = created.len(), "Bulk product upload finished");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// All products referencing `category_id`
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: Uuid) -> ProductResult<Vec<Product>> {
        self.repository.list_by_category(category_id).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository.get_by_id(id).await
    }

    /// Apply a partial update; moving to another category re-checks it exists
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        Self::validate(&input)?;

        if let Some(category_id) = input.category_id() {
            self.categories.get_category(category_id).await?;
        }

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<bool> {
        self.repository.delete(id).await
    }

    /// Filtered, paginated listing of a category with category-wide facets
    ///
    /// The page, the total count and both facets are fetched concurrently.
    #[instrument(skip(self, filter), fields(page = filter.page, limit = filter.limit))]
    pub async fn find_by_category_slug(
        &self,
        slug: &str,
        filter: &ProductFilter,
    ) -> ProductResult<CategoryProducts> {
        let category = self.categories.get_by_slug(slug).await?;

        let query = ProductQuery::compile(&category, filter);

        let (products, total, price_range, available_tags) = tokio::try_join!(
            self.repository.find_page(&query),
            self.repository.count(&query),
            self.repository.price_range(category.id),
            self.repository.category_tags(category.id),
        )?;

        Ok(CategoryProducts {
            products,
            pagination: Pagination::new(query.page, query.limit, total),
            filters: CategoryFacets {
                category: category.name,
                price_range,
                available_tags,
            },
        })
    }
}

impl<R: ProductRepository, C: CategoryRepository> Clone for ProductService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            categories: self.categories.clone(),
            uploader: Arc::clone(&self.uploader),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, PriceRange, ProductView};
    use crate::repository::MockProductRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use domain_categories::{Category, CategoryError, CategoryResult, UpdateCategory};
    use media::{MediaError, MediaResult};
    use std::sync::Mutex;

    /// Fixed set of categories
    struct KnownCategories(Vec<Category>);

    #[async_trait]
    impl CategoryRepository for KnownCategories {
        async fn create(&self, category: Category) -> CategoryResult<Category> {
            Ok(category)
        }

        async fn bulk_create(&self, categories: Vec<Category>) -> CategoryResult<Vec<Category>> {
            Ok(categories)
        }

        async fn list(&self) -> CategoryResult<Vec<Category>> {
            Ok(self.0.clone())
        }

        async fn get_by_id(&self, id: Uuid) -> CategoryResult<Category> {
            self.0
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(CategoryError::NotFound(id))
        }

        async fn find_by_slug(&self, slug: &str) -> CategoryResult<Category> {
            self.0
                .iter()
                .find(|c| c.slug == slug)
                .cloned()
                .ok_or_else(|| CategoryError::SlugNotFound(slug.to_string()))
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> CategoryResult<Vec<Category>> {
            Ok(self.0.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
        }

        async fn update(&self, id: Uuid, _input: UpdateCategory) -> CategoryResult<Category> {
            self.get_by_id(id).await
        }

        async fn delete(&self, _id: Uuid) -> CategoryResult<bool> {
            Ok(true)
        }
    }

    /// Uploader that records folders and returns predictable URLs
    #[derive(Default)]
    struct RecordingUploader {
        folders: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl MediaUploader for RecordingUploader {
        async fn upload(&self, file: UploadFile, folder: &str) -> MediaResult<String> {
            if self.fail {
                return Err(MediaError::UploadFailed("no secure_url".into()));
            }
            self.folders.lock().unwrap().push(folder.to_string());
            Ok(format!("https://cdn.test/{folder}/{}", file.file_name))
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn shoes() -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::now_v7(),
            name: "Shoes".into(),
            slug: "shoes".into(),
            description: String::new(),
            image: None,
            parent_category: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn input(name: &str, category_id: Uuid) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: "Light trail shoe".into(),
            price: 50.0,
            images: vec!["https://example.com/given.png".into()],
            category: CategoryRef { id: category_id },
            inventory: 5,
            sku: "TR-1".into(),
            tags: vec!["trail".into()],
            attributes: Default::default(),
            is_active: true,
        }
    }

    fn service(
        repo: MockProductRepository,
        categories: Vec<Category>,
        uploader: Arc<dyn MediaUploader>,
    ) -> ProductService<MockProductRepository, KnownCategories> {
        ProductService::new(repo, CategoryService::new(KnownCategories(categories)), uploader)
    }

    fn assign_id(mut product: Product) -> ProductResult<Product> {
        product.id = Uuid::now_v7();
        Ok(product)
    }

    #[tokio::test]
    async fn test_create_product_in_missing_category_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let missing = Uuid::now_v7();
        let service = service(repo, vec![shoes()], Arc::new(RecordingUploader::default()));
        let result = service.create_product(input("Runner", missing), vec![]).await;

        assert!(matches!(
            result,
            Err(ProductError::Category(CategoryError::NotFound(id))) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_create_product_keeps_given_images_without_uploads() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|p| p.images == vec!["https://example.com/given.png".to_string()])
            .returning(assign_id);

        let service = service(repo, vec![category.clone()], Arc::new(RecordingUploader::default()));
        let created = service
            .create_product(input("Runner", category.id), vec![])
            .await
            .unwrap();

        assert_eq!(created.category_id, category.id);
        assert!(!created.id.is_nil());
    }

    #[tokio::test]
    async fn test_uploaded_images_replace_given_ones() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .withf(|p| {
                p.images
                    == vec![
                        "https://cdn.test/products/a.png".to_string(),
                        "https://cdn.test/products/b.png".to_string(),
                    ]
            })
            .returning(assign_id);

        let uploader = Arc::new(RecordingUploader::default());
        let service = service(repo, vec![category.clone()], uploader.clone());
        service
            .create_product(
                input("Runner", category.id),
                vec![
                    UploadFile::new("a.png", vec![1]),
                    UploadFile::new("b.png", vec![2]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(*uploader.folders.lock().unwrap(), vec!["products", "products"]);
    }

    #[tokio::test]
    async fn test_failed_upload_aborts_create() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let uploader = Arc::new(RecordingUploader {
            fail: true,
            ..Default::default()
        });
        let service = service(repo, vec![category.clone()], uploader);
        let result = service
            .create_product(input("Runner", category.id), vec![UploadFile::new("a.png", vec![1])])
            .await;

        assert!(matches!(result, Err(ProductError::Upload(_))));
    }

    #[tokio::test]
    async fn test_bulk_create_checks_every_category() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_bulk_create().never();

        let service = service(repo, vec![category.clone()], Arc::new(RecordingUploader::default()));
        let result = service
            .create_products(vec![
                input("Runner", category.id),
                input("Walker", Uuid::now_v7()),
            ])
            .await;

        assert!(matches!(
            result,
            Err(ProductError::Category(CategoryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_bulk_create_reports_invalid_entry() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_bulk_create().never();

        let service = service(repo, vec![category.clone()], Arc::new(RecordingUploader::default()));
        let result = service
            .create_products(vec![input("Runner", category.id), input("", category.id)])
            .await;

        match result {
            Err(ProductError::Validation(msg)) => assert!(msg.starts_with("product 1:")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bulk_create_returns_inserted() {
        let category = shoes();
        let mut repo = MockProductRepository::new();
        repo.expect_bulk_create()
            .withf(|ps| ps.len() == 2)
            .returning(|ps| Ok(ps.into_iter().take(1).collect()));

        let service = service(repo, vec![category.clone()], Arc::new(RecordingUploader::default()));
        let created = service
            .create_products(vec![input("Runner", category.id), input("Runner", category.id)])
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_missing_category_is_rejected() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().never();

        let service = service(repo, vec![shoes()], Arc::new(RecordingUploader::default()));
        let update = UpdateProduct {
            category: Some(CategoryRef { id: Uuid::now_v7() }),
            ..Default::default()
        };
        let result = service.update_product(Uuid::now_v7(), update).await;

        assert!(matches!(result, Err(ProductError::Category(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let id = Uuid::now_v7();
        let mut repo = MockProductRepository::new();
        repo.expect_delete()
            .returning(|id| Err(ProductError::NotFound(id)));

        let service = service(repo, vec![], Arc::new(RecordingUploader::default()));
        assert!(matches!(
            service.delete_product(id).await,
            Err(ProductError::NotFound(got)) if got == id
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_page().never();

        let service = service(repo, vec![shoes()], Arc::new(RecordingUploader::default()));
        let result = service
            .find_by_category_slug("garden", &ProductFilter::default())
            .await;

        assert!(matches!(
            result,
            Err(ProductError::Category(CategoryError::SlugNotFound(s))) if s == "garden"
        ));
    }

    #[tokio::test]
    async fn test_listing_assembles_page_and_facets() {
        let category = shoes();
        let category_id = category.id;
        let page_product = Product::new(input("Runner", category_id), vec![]);

        let mut repo = MockProductRepository::new();
        repo.expect_find_page()
            .withf(|q| q.limit == 2 && q.skip == 2 && q.filter.get("price").is_some())
            .returning(move |_| {
                Ok(vec![ProductView {
                    product: page_product.clone(),
                    category_data: None,
                    score: None,
                }])
            });
        repo.expect_count()
            .withf(move |q| q.filter.get("categoryId").is_some())
            .returning(|_| Ok(5));
        repo.expect_price_range()
            .withf(move |id| *id == category_id)
            .returning(|_| Ok(PriceRange { min: 20.0, max: 80.0 }));
        repo.expect_category_tags()
            .returning(|_| Ok(vec!["road".into(), "trail".into()]));

        let service = service(repo, vec![category], Arc::new(RecordingUploader::default()));
        let filter = ProductFilter::from_pairs([
            ("minPrice", "20"),
            ("maxPrice", "60"),
            ("page", "2"),
            ("limit", "2"),
        ])
        .unwrap();
        let result = service.find_by_category_slug("shoes", &filter).await.unwrap();

        assert_eq!(result.products.len(), 1);
        assert_eq!(
            result.pagination,
            Pagination {
                page: 2,
                limit: 2,
                total: 5,
                total_pages: 3
            }
        );
        assert_eq!(result.filters.category, "Shoes");
        assert_eq!(result.filters.price_range, PriceRange { min: 20.0, max: 80.0 });
        assert_eq!(result.filters.available_tags, vec!["road", "trail"]);
    }

    #[tokio::test]
    async fn test_listing_error_in_any_read_fails_request() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_page().returning(|_| Ok(vec![]));
        repo.expect_count()
            .returning(|_| Err(ProductError::Database("timeout".into())));
        repo.expect_price_range().returning(|_| Ok(PriceRange::default()));
        repo.expect_category_tags().returning(|_| Ok(vec![]));

        let service = service(repo, vec![shoes()], Arc::new(RecordingUploader::default()));
        let result = service
            .find_by_category_slug("shoes", &ProductFilter::default())
            .await;

        assert!(matches!(result, Err(ProductError::Database(_))));
    }
}
