use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    models::{Category, CategoryDraft, Product, ProductDraft},
    repository::{CategoryRepository, ProductRepository},
};

/// PostgreSQL implementation of both catalog repositories.
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_id(&self, id: i64) -> CatalogResult<bool> {
        Ok(CategoryRepository::find_by_id(self, id).await?.is_some())
    }

    async fn insert(&self, draft: CategoryDraft) -> CatalogResult<Category> {
        let active_model = category::ActiveModel {
            id: NotSet,
            name: Set(draft.name.clone()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateCategoryName(draft.name)
            } else {
                e.into()
            }
        })?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, updated: Category) -> CatalogResult<Category> {
        let id = updated.id;
        let active_model = category::ActiveModel {
            id: Set(id),
            name: Set(updated.name.clone()),
        };

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => CatalogError::CategoryNotFound(id),
            e if is_unique_violation(&e) => CatalogError::DuplicateCategoryName(updated.name),
            e => e.into(),
        })?;

        tracing::info!(category_id = id, "Updated category");
        Ok(model.into())
    }

    async fn delete_cascade(&self, id: i64) -> CatalogResult<bool> {
        let txn = self.db.begin().await?;

        let removed_products = product::Entity::delete_many()
            .filter(product::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let deleted = category::Entity::delete_by_id(id).exec(&txn).await?;

        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        tracing::info!(category_id = id, removed_products, "Deleted category");
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_category_id(&self, category_id: i64) -> CatalogResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let category_id = draft.category_id;
        let active_model = product::ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            price: Set(draft.price),
            category_id: Set(category_id),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                CatalogError::CategoryNotFound(category_id)
            } else {
                e.into()
            }
        })?;

        tracing::info!(product_id = model.id, category_id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, updated: Product) -> CatalogResult<Product> {
        let Product {
            id,
            name,
            price,
            category_id,
        } = updated;

        let active_model = product::ActiveModel {
            id: Set(id),
            name: Set(name),
            price: Set(price),
            category_id: Set(category_id),
        };

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => CatalogError::ProductNotFound(id),
            e if is_foreign_key_violation(&e) => CatalogError::CategoryNotFound(category_id),
            e => e.into(),
        })?;

        tracing::info!(product_id = id, category_id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
