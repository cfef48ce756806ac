use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CategoryDraft, Product, ProductDraft};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id
    async fn list(&self) -> CatalogResult<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// Exact, case-sensitive name lookup
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    async fn exists_by_id(&self, id: i64) -> CatalogResult<bool>;

    /// Persist a new category; the id is assigned here
    async fn insert(&self, draft: CategoryDraft) -> CatalogResult<Category>;

    /// Overwrite an existing category
    async fn update(&self, category: Category) -> CatalogResult<Category>;

    /// Delete the category and every product it owns as one atomic unit.
    ///
    /// Returns `false` when no category has this id.
    async fn delete_cascade(&self, id: i64) -> CatalogResult<bool>;
}

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// Products owned by a category, ordered by id
    async fn find_by_category_id(&self, category_id: i64) -> CatalogResult<Vec<Product>>;

    /// Persist a new product; fails with `CategoryNotFound` if the owner is gone
    async fn insert(&self, draft: ProductDraft) -> CatalogResult<Product>;

    /// Overwrite an existing product; fails with `CategoryNotFound` if the owner is gone
    async fn update(&self, product: Product) -> CatalogResult<Product>;

    /// Returns `false` when no product has this id.
    async fn delete(&self, id: i64) -> CatalogResult<bool>;
}

#[derive(Debug)]
struct CatalogState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    next_category_id: i64,
    next_product_id: i64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            next_category_id: 1,
            next_product_id: 1,
        }
    }
}

impl CatalogState {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

/// In-memory implementation of both catalog repositories.
///
/// Clones share one store behind a single lock, so a cascade delete and the
/// product writes it races with are serialized.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogRepository {
    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|c| c.name == name).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.categories.contains_key(&id))
    }

    async fn insert(&self, draft: CategoryDraft) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if state.name_taken(&draft.name, None) {
            return Err(CatalogError::DuplicateCategoryName(draft.name));
        }

        let category = Category {
            id: state.next_category_id,
            name: draft.name,
        };
        state.next_category_id += 1;
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&category.id) {
            return Err(CatalogError::CategoryNotFound(category.id));
        }
        if state.name_taken(&category.name, Some(category.id)) {
            return Err(CatalogError::DuplicateCategoryName(category.name));
        }

        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Updated category");
        Ok(category)
    }

    async fn delete_cascade(&self, id: i64) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&id) {
            return Ok(false);
        }

        let before = state.products.len();
        state.products.retain(|_, p| p.category_id != id);
        let removed_products = before - state.products.len();
        state.categories.remove(&id);

        tracing::info!(category_id = id, removed_products, "Deleted category");
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogRepository {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn find_by_category_id(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.categories.contains_key(&draft.category_id) {
            return Err(CatalogError::CategoryNotFound(draft.category_id));
        }

        let product = Product {
            id: state.next_product_id,
            name: draft.name,
            price: draft.price,
            category_id: draft.category_id,
        };
        state.next_product_id += 1;
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, category_id = product.category_id, "Created product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let mut state = self.state.write().await;

        if !state.products.contains_key(&product.id) {
            return Err(CatalogError::ProductNotFound(product.id));
        }
        if !state.categories.contains_key(&product.category_id) {
            return Err(CatalogError::CategoryNotFound(product.category_id));
        }

        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, category_id = product.category_id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let mut state = self.state.write().await;

        if state.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
