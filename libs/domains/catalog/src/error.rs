use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found with ID {0}")]
    CategoryNotFound(i64),

    #[error("Product not found with ID {0}")]
    ProductNotFound(i64),

    #[error("Category with name '{0}' already exists.")]
    DuplicateCategoryName(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(_) | CatalogError::ProductNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CatalogError::DuplicateCategoryName(_) => AppError::Conflict(err.to_string()),
            CatalogError::Validation(errors) => AppError::ValidationError(errors),
            CatalogError::Database(e) => AppError::InternalServerError(e.to_string()),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
