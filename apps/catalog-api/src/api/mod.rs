use axum::Router;
use domain_catalog::{CategoryService, ProductService, handlers};

use crate::state::{AppState, CatalogStore};

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    match &state.store {
        CatalogStore::InMemory(repository) => handlers::router(
            CategoryService::new(repository.clone()),
            ProductService::new(repository.clone(), repository.clone()),
        ),
        CatalogStore::Postgres(repository) => handlers::router(
            CategoryService::new(repository.clone()),
            ProductService::new(repository.clone(), repository.clone()),
        ),
    }
}
