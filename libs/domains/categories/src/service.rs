//! Category Service - Business logic layer

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Category service: slug derivation, validation, lookups used by products
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    fn prepare(input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        let category = Category::new(input);
        if category.slug.is_empty() {
            return Err(CategoryError::Validation(format!(
                "Category name '{}' has no letters or digits to build a slug from",
                category.name
            )));
        }
        Ok(category)
    }

    /// Create a category, deriving its slug from the name
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        let category = Self::prepare(input)?;
        self.repository.create(category).await
    }

    /// Create many categories; entries the store rejects are left out
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn create_categories(
        &self,
        inputs: Vec<CreateCategory>,
    ) -> CategoryResult<Vec<Category>> {
        let categories = inputs
            .into_iter()
            .map(Self::prepare)
            .collect::<CategoryResult<Vec<_>>>()?;
        self.repository.bulk_create(categories).await
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CategoryResult<Category> {
        self.repository.get_by_id(id).await
    }

    /// Resolve a slug; an unknown slug is always an error
    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> CategoryResult<Category> {
        self.repository.find_by_slug(slug).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        if input.slug().is_some_and(|slug| slug.is_empty()) {
            return Err(CategoryError::Validation(
                "Category name has no letters or digits to build a slug from".to_string(),
            ));
        }

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CategoryResult<bool> {
        self.repository.delete(id).await
    }

    /// Fail with NotFound for the first id that has no category
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn ensure_exist(&self, ids: &[Uuid]) -> CategoryResult<()> {
        let wanted: BTreeSet<Uuid> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(());
        }

        let lookup: Vec<Uuid> = wanted.iter().copied().collect();
        let found: BTreeSet<Uuid> = self
            .repository
            .find_by_ids(&lookup)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        match wanted.difference(&found).next() {
            Some(missing) => {
                tracing::warn!(category_id = %missing, "Referenced category does not exist");
                Err(CategoryError::NotFound(*missing))
            }
            None => Ok(()),
        }
    }
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
