use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::{CategoryRepository, ProductRepository};

/// Service layer for Product business logic
///
/// Needs the category repository as well, since every product write is
/// checked against its owning category.
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    async fn ensure_category(&self, category_id: i64) -> CatalogResult<()> {
        if self.categories.exists_by_id(category_id).await? {
            Ok(())
        } else {
            Err(CatalogError::CategoryNotFound(category_id))
        }
    }

    pub async fn list_products_by_category(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        self.ensure_category(category_id).await?;
        self.products.find_by_category_id(category_id).await
    }

    pub async fn get_product(&self, id: i64) -> CatalogResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Create a product owned by `category_id`
    pub async fn create_product(
        &self,
        category_id: i64,
        input: CreateProduct,
    ) -> CatalogResult<Product> {
        let draft = input.into_draft(category_id)?;
        self.ensure_category(category_id).await?;
        self.products.insert(draft).await
    }

    /// Replace name and price; move to another category when one is given
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        let (name, price, category_id) = input.into_fields()?;
        let mut product = self.get_product(id).await?;

        if let Some(target) = category_id {
            if target != product.category_id {
                self.ensure_category(target).await?;
            }
        }

        product.apply_update(name, price, category_id);
        self.products.update(product).await
    }

    pub async fn delete_product(&self, id: i64) -> CatalogResult<()> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound(id))
        }
    }
}
