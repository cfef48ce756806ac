//! HTTP endpoints for the catalog.
//!
//! Paths are relative to the `/api` prefix the app nests this router under.

mod categories;
mod products;

use axum::Router;

use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::{CategoryService, ProductService};

/// Create the catalog router with all category and product endpoints
pub fn router<C, P, PC>(
    categories: CategoryService<C>,
    products: ProductService<P, PC>,
) -> Router
where
    C: CategoryRepository + 'static,
    P: ProductRepository + 'static,
    PC: CategoryRepository + 'static,
{
    Router::new()
        .merge(categories::router(categories))
        .merge(products::router(products))
}
