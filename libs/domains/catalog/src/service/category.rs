use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Service layer for Category business logic
pub struct CategoryService<C: CategoryRepository> {
    repository: Arc<C>,
}

impl<C: CategoryRepository> Clone for CategoryService<C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(repository: C) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list().await
    }

    pub async fn get_category(&self, id: i64) -> CatalogResult<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Create a category; names are unique (case-sensitive)
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        let draft = input.into_draft()?;

        if self.repository.find_by_name(&draft.name).await?.is_some() {
            return Err(CatalogError::DuplicateCategoryName(draft.name));
        }

        self.repository.insert(draft).await
    }

    /// Rename a category. Keeping the current name is allowed.
    pub async fn update_category(&self, id: i64, input: UpdateCategory) -> CatalogResult<Category> {
        let name = input.into_name()?;
        let mut category = self.get_category(id).await?;

        if let Some(holder) = self.repository.find_by_name(&name).await? {
            if holder.id != id {
                return Err(CatalogError::DuplicateCategoryName(name));
            }
        }

        category.name = name;
        self.repository.update(category).await
    }

    /// Delete a category together with all of its products
    pub async fn delete_category(&self, id: i64) -> CatalogResult<()> {
        if !self.repository.delete_cascade(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }

        Ok(())
    }
}
